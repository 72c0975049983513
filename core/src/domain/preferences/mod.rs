pub mod ports;
pub mod services;

/// Storage key holding the last-entered allergy text.
pub const ALLERGIES_STORAGE_KEY: &str = "userAllergies";
