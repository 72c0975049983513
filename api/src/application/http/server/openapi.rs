use utoipa::OpenApi;

use crate::application::http::{
    analyze::router::AnalyzeApiDoc, health::HealthApiDoc, server::config::__path_get_config,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Allergy Agents API"
    ),
    paths(get_config),
    nest(
        (path = "/api", api = AnalyzeApiDoc),
        (path = "/health", api = HealthApiDoc),
    )
)]
pub struct ApiDoc;
