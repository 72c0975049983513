use allergy_agents_core::domain::common::SiteConfig;
use axum::extract::State;

use crate::application::http::server::{api_entities::response::Response, app_state::AppState};

#[utoipa::path(
    get,
    path = "/config",
    tag = "config",
    summary = "Public site configuration",
    responses(
        (status = 200, body = SiteConfig)
    ),
)]
pub async fn get_config(State(state): State<AppState>) -> Response<SiteConfig> {
    Response::OK(state.site.as_ref().clone())
}
