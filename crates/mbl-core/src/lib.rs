//! Picks a safe MongoDB SECONDARY to back up, finds the availability zone it runs in,
//! and launches a Kubernetes Job pinned to that zone to perform the dump.

pub mod error;
pub mod models;
pub mod services;

pub use error::{ApiError, LauncherError, Result, Stage};
pub use services::launcher::BackupLauncher;
