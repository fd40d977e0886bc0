// aim-common/src/model/mod.rs
pub mod credentials;
pub mod install;
pub mod properties;
pub mod version;

// Re-export
pub use credentials::UserCredentials;
pub use install::{InstallOptions, InstallOutcome, InstallState, InstallType};
pub use properties::ArtifactProperties;
pub use version::Version;
