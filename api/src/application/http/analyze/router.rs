use axum::{Router, routing::post};
use utoipa::OpenApi;

use super::handlers::analyze_image::{__path_analyze_image, analyze_image};
use crate::application::http::server::app_state::AppState;

#[derive(OpenApi)]
#[openapi(paths(analyze_image))]
pub struct AnalyzeApiDoc;

pub fn analyze_routes(root_path: &str) -> Router<AppState> {
    Router::new().route(&format!("{}/api/analyze", root_path), post(analyze_image))
}
