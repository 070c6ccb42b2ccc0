//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module  | Commands handled                       |
//! |---------|----------------------------------------|
//! | `build` | `Validate`, `Deploy`                   |
//! | `repo`  | `Clone`, `InitRepo`, `RemoteStatus`    |

pub mod build;
pub mod repo;

pub use build::{BuildKind, cmd_build};
pub use repo::{cmd_clone, cmd_init_repo, cmd_remote_status};
