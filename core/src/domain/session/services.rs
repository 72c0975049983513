use tracing::{error, info, warn};

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{
        classifier::classify, entities::AnalysisRequest, state::AnalysisState,
        validation::check_analysis_request, value_objects::RenderableResult,
    },
    preferences::{
        ports::PreferenceStore,
        services::{load_allergies, remember_allergies},
    },
    session::ports::AnalysisGateway,
};

/// Client-side view of one user: the inputs, the request state and the last
/// result that was successfully shown.
pub struct AnalysisSession<G, P>
where
    G: AnalysisGateway,
    P: PreferenceStore,
{
    gateway: G,
    preferences: P,
    allergies: String,
    image: Option<String>,
    state: AnalysisState,
    last_result: Option<RenderableResult>,
}

impl<G, P> AnalysisSession<G, P>
where
    G: AnalysisGateway,
    P: PreferenceStore,
{
    /// Reads the saved allergy text once.
    pub fn new(gateway: G, preferences: P) -> Self {
        let allergies = load_allergies(&preferences);

        Self {
            gateway,
            preferences,
            allergies,
            image: None,
            state: AnalysisState::Idle,
            last_result: None,
        }
    }

    pub fn allergies(&self) -> &str {
        &self.allergies
    }

    pub fn set_allergies(&mut self, allergies: impl Into<String>) {
        self.allergies = allergies.into();
        remember_allergies(&self.preferences, &self.allergies);
    }

    /// A new image invalidates whatever was shown for the previous one.
    pub fn set_image(&mut self, image: impl Into<String>) {
        self.image = Some(image.into());
        self.last_result = None;
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn last_result(&self) -> Option<&RenderableResult> {
        self.last_result.as_ref()
    }

    /// Validates the inputs, sends one request and classifies the answer.
    /// On failure the previously shown result is left in place. Dropping the
    /// returned future mid-flight leaves the session in `Failed`.
    pub async fn analyze(&mut self) -> Result<&RenderableResult, CoreError> {
        self.state.begin_validation()?;
        let mut guard = BusyGuard {
            state: &mut self.state,
        };

        if let Err(e) = check_analysis_request(self.image.as_deref(), &self.allergies) {
            guard.state.fail(e.clone())?;
            return Err(e);
        }

        let request = AnalysisRequest::new(
            self.image.clone().unwrap_or_default(),
            self.allergies.trim().to_string(),
        );
        let request_id = request.id;

        guard.state.begin_flight()?;
        info!(request_id = %request_id, "Submitting analysis");

        match self.gateway.submit(request).await {
            Ok(result) => {
                let view = classify(&result);
                guard.state.succeed(result)?;
                Ok(self.last_result.insert(view))
            }
            Err(e) => {
                error!(request_id = %request_id, "Error analyzing ingredients: {}", e);
                guard.state.fail(e.clone())?;
                Err(e)
            }
        }
    }
}

/// Moves a state that is still busy to `Failed` when `analyze` exits early,
/// including when its future is dropped.
struct BusyGuard<'a> {
    state: &'a mut AnalysisState,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if self.state.is_busy() {
            warn!("Analysis abandoned before completion");
            *self.state = AnalysisState::Failed(CoreError::AnalysisCancelled);
        }
    }
}
