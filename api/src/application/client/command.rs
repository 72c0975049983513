use std::time::Duration;

use allergy_agents_core::{
    application::create_service,
    domain::{
        common::{AllergyAgentsConfig, SafetyNotice, SiteConfig},
        food_analysis::render::{render_report, render_safety_notice},
        preferences::ports::PreferenceStore,
        session::{ports::AnalysisGateway, services::AnalysisSession},
    },
    infrastructure::{image::load_image_file, preferences::JsonFilePreferenceStore},
};
use tracing::{error, info};

use crate::{application::client::http_gateway::HttpAnalysisGateway, args::AnalyzeArgs};

/// Runs one analysis through a session and returns the rendered report with
/// the safety notice, or the message a user should see.
pub async fn analyze_with<G, P>(
    gateway: G,
    preferences: P,
    image: String,
    allergies: Option<String>,
    notice: &SafetyNotice,
) -> Result<String, String>
where
    G: AnalysisGateway,
    P: PreferenceStore,
{
    let mut session = AnalysisSession::new(gateway, preferences);
    if let Some(allergies) = allergies {
        session.set_allergies(allergies);
    }
    session.set_image(image);

    match session.analyze().await {
        Ok(view) => Ok(render_report(view) + &render_safety_notice(notice)),
        Err(e) => Err(e.user_message()),
    }
}

pub async fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let preferences = JsonFilePreferenceStore::new(&args.preferences);

    let image = load_image_file(&args.image).map_err(|e| {
        error!(path = %args.image.display(), "Cannot use image: {}", e);
        anyhow::anyhow!(e.user_message())
    })?;

    let notice = SiteConfig::default().safety_notice;

    let outcome = if args.local {
        let config = AllergyAgentsConfig::from(args.llm.clone());
        let service = create_service(&config)?;
        info!("Analyzing in-process");
        analyze_with(service, preferences, image, args.allergies, &notice).await
    } else {
        let timeout = Duration::from_millis(args.llm.analysis_timeout_ms);
        let gateway = HttpAnalysisGateway::new(&args.server_url, timeout)?;
        info!(endpoint = %gateway.endpoint(), "Analyzing via server");
        analyze_with(gateway, preferences, image, args.allergies, &notice).await
    };

    match outcome {
        Ok(report) => {
            print!("{report}");
            Ok(())
        }
        Err(message) => Err(anyhow::anyhow!(message)),
    }
}
