use std::sync::Arc;

use allergy_agents_core::{application::AllergyAgentsService, domain::common::SiteConfig};

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: AllergyAgentsService,
    pub site: Arc<SiteConfig>,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: AllergyAgentsService, site: SiteConfig) -> Self {
        Self {
            args,
            service,
            site: Arc::new(site),
        }
    }
}
