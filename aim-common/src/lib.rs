// aim-common/src/lib.rs
pub mod config;
pub mod error;
pub mod model;

// Re-export key types
pub use config::{ConfigStore, InstallationManagerConfig};
pub use error::{AimError, Result};
pub use model::{
    ArtifactProperties, InstallOptions, InstallOutcome, InstallType, UserCredentials, Version,
};
