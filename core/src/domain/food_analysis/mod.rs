pub mod classifier;
pub mod encoding;
pub mod entities;
pub mod ports;
pub mod prompts;
pub mod render;
pub mod schema;
pub mod services;
pub mod state;
pub mod validation;
pub mod value_objects;

pub use entities::*;
pub use ports::*;
pub use value_objects::*;
