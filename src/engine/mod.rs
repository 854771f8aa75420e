pub mod config;
pub mod error;

pub use config::{Config, GenerationConfig, PacerConfig};
pub use error::ReaderError;
