// aim-common/src/model/install.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AimError, Result};

/// Deployment topology of a staged install.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallType {
    #[default]
    SingleNode,
    MultiNode,
}

impl InstallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallType::SingleNode => "single-node",
            InstallType::MultiNode => "multi-node",
        }
    }
}

impl fmt::Display for InstallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallType {
    type Err = AimError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single-node" => Ok(InstallType::SingleNode),
            "multi-node" => Ok(InstallType::MultiNode),
            other => Err(AimError::Generic(format!(
                "Unknown install type '{other}', expected 'single-node' or 'multi-node'"
            ))),
        }
    }
}

/// Options of one `install` invocation. `step` is a 1-based index into the
/// artifact's install plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallOptions {
    pub install_type: InstallType,
    pub step: u32,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            install_type: InstallType::default(),
            step: 1,
        }
    }
}

impl InstallOptions {
    pub fn new(install_type: InstallType, step: u32) -> Self {
        Self { install_type, step }
    }

    /// Options for resuming the plan at the following step.
    pub fn next_step(&self) -> Self {
        Self {
            install_type: self.install_type,
            step: self.step + 1,
        }
    }
}

/// Result of a successful `install` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Nothing remains to be done for this version.
    Completed,
    /// A step was handed off to an external process; the options name the step
    /// in flight so the caller can resume with [`InstallOptions::next_step`].
    InProgress(InstallOptions),
}

impl InstallOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, InstallOutcome::Completed)
    }
}

/// Caller-side view of a staged install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    NotStarted,
    StepInFlight(u32),
    Completed,
}

impl InstallState {
    /// Moves the state along with the outcome of the latest `install` call.
    pub fn advance(self, outcome: &InstallOutcome) -> Self {
        match outcome {
            InstallOutcome::Completed => InstallState::Completed,
            InstallOutcome::InProgress(options) => InstallState::StepInFlight(options.step),
        }
    }

    /// Options for the next `install` call, `None` once completed.
    pub fn next_options(self, install_type: InstallType) -> Option<InstallOptions> {
        match self {
            InstallState::NotStarted => Some(InstallOptions::new(install_type, 1)),
            InstallState::StepInFlight(step) => Some(InstallOptions::new(install_type, step + 1)),
            InstallState::Completed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_type_parses_cli_names() {
        assert_eq!("single-node".parse::<InstallType>().unwrap(), InstallType::SingleNode);
        assert_eq!("multi-node".parse::<InstallType>().unwrap(), InstallType::MultiNode);
        assert!("cluster".parse::<InstallType>().is_err());
    }

    #[test]
    fn test_state_follows_outcomes() {
        let state = InstallState::NotStarted;
        assert_eq!(
            state.next_options(InstallType::MultiNode),
            Some(InstallOptions::new(InstallType::MultiNode, 1))
        );

        let state = state.advance(&InstallOutcome::InProgress(InstallOptions::new(
            InstallType::MultiNode,
            1,
        )));
        assert_eq!(state, InstallState::StepInFlight(1));
        assert_eq!(
            state.next_options(InstallType::MultiNode).map(|o| o.step),
            Some(2)
        );

        let state = state.advance(&InstallOutcome::Completed);
        assert_eq!(state, InstallState::Completed);
        assert_eq!(state.next_options(InstallType::MultiNode), None);
    }

    #[test]
    fn test_default_options_start_at_first_step() {
        let options = InstallOptions::default();
        assert_eq!(options.step, 1);
        assert_eq!(options.next_step().step, 2);
        assert_eq!(options.next_step().install_type, InstallType::SingleNode);
    }
}
