use crate::domain::{
    common::entities::app_errors::CoreError, food_analysis::entities::AnalysisResult,
};

/// Lifecycle of one analysis submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisState {
    #[default]
    Idle,
    Validating,
    InFlight,
    Succeeded(AnalysisResult),
    Failed(CoreError),
}

impl AnalysisState {
    /// Whether the Analyze action is enabled.
    pub fn can_submit(&self) -> bool {
        !matches!(self, AnalysisState::Validating | AnalysisState::InFlight)
    }

    pub fn is_busy(&self) -> bool {
        !self.can_submit()
    }

    pub fn begin_validation(&mut self) -> Result<(), CoreError> {
        if !self.can_submit() {
            return Err(CoreError::AnalysisInFlight);
        }
        *self = AnalysisState::Validating;
        Ok(())
    }

    pub fn begin_flight(&mut self) -> Result<(), CoreError> {
        match self {
            AnalysisState::Validating => {
                *self = AnalysisState::InFlight;
                Ok(())
            }
            _ => Err(CoreError::InternalServerError),
        }
    }

    pub fn succeed(&mut self, result: AnalysisResult) -> Result<(), CoreError> {
        match self {
            AnalysisState::InFlight => {
                *self = AnalysisState::Succeeded(result);
                Ok(())
            }
            _ => Err(CoreError::InternalServerError),
        }
    }

    /// Validation and in-flight failures both land here.
    pub fn fail(&mut self, error: CoreError) -> Result<(), CoreError> {
        match self {
            AnalysisState::Validating | AnalysisState::InFlight => {
                *self = AnalysisState::Failed(error);
                Ok(())
            }
            _ => Err(CoreError::InternalServerError),
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CoreError> {
        match self {
            AnalysisState::Failed(error) => Some(error),
            _ => None,
        }
    }
}
