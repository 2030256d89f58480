pub mod config;
pub mod error;
pub mod result;

pub use config::{AppConfig, Persona};
pub use error::DeskboardError;
pub use result::DeskResult;
