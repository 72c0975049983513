pub mod common;
pub mod food_analysis;
pub mod preferences;
pub mod session;
