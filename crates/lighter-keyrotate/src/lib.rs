/*
[INPUT]:  Public API exports for lighter-keyrotate crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod rotation;

// Re-export main types for convenience
pub use config::{ConfigError, Settings};
pub use rotation::{
    DEFAULT_PROPAGATION_DELAY, RotationError, RotationOutcome, RotationRunner, RotationStage,
};
