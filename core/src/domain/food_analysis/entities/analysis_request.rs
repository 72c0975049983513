use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::common::generate_timestamp;

/// One "Analyze" submission. Lives for a single inference call and is never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub id: Uuid,
    pub image: String,
    pub allergies: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRequest {
    pub fn new(image: String, allergies: String) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            image,
            allergies,
            created_at: now,
        }
    }

    /// Shape check done by the inference adapter. Emptiness only: trimming is
    /// the validation gate's job.
    pub fn has_required_fields(&self) -> bool {
        !self.image.is_empty() && !self.allergies.is_empty()
    }
}
