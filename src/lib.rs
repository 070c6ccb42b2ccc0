//! Demo build orchestration and repository provisioning.
//!
//! - [`project`]: resolve a demo project and check its configuration
//! - [`orchestrator`]: intent control, sequence assembly, `validate`/`deploy`
//! - [`sequence`]: sequence descriptions and the executor boundary
//! - [`git`]: remote repository classification and local provisioning

pub mod errors;
pub mod git;
pub mod logging;
pub mod orchestrator;
pub mod project;
pub mod sequence;
#[cfg(test)]
pub(crate) mod test_support;
pub mod ui;

pub use errors::{FalconError, Result};
