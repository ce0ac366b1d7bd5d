use clap::error::ErrorKind;
use clap::Parser;

use mbl_core::models::LauncherSettings;
use mbl_core::Stage;

/// Launch a zone-pinned MongoDB backup job next to a healthy SECONDARY.
#[derive(Debug, Parser)]
#[command(name = "mongodb-backup-launcher")]
#[command(version)]
pub struct Cli {
    /// MongoDB connection string (mongodb:// or mongodb+srv://)
    #[arg(long, env = "MONGODB_URI", hide_env_values = true)]
    pub mongodb_uri: String,

    /// Username for the admin database
    #[arg(long, env = "MONGODB_USERNAME")]
    pub mongodb_username: String,

    #[arg(long, env = "MONGODB_PASSWORD", hide_env_values = true)]
    pub mongodb_password: String,

    /// Replica set member that must never be backed up from
    #[arg(long, env = "EXCLUDE_REPLICA", default_value = "")]
    pub exclude_replica: String,

    /// Backup classification, passed to the dump script and used as a label
    #[arg(long, env = "BACKUP_TYPE")]
    pub backup_type: String,

    /// Container image that performs the dump
    #[arg(long, env = "DOCKER_IMAGE_URI")]
    pub docker_image_uri: String,

    /// Recorded as the job's `created-by` annotation
    #[arg(long, env = "HOSTNAME", default_value = "unknown")]
    pub hostname: String,

    /// debug, info, warn or error
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Use ~/.kube/config instead of the in-cluster service account
    #[arg(long, env = "RUNNING_LOCALLY")]
    pub running_locally: bool,

    /// Print the job manifest instead of submitting it
    #[arg(long, env = "DRY_RUN")]
    pub dry_run: bool,
}

/// Exit status for a failed parse, or `None` when clap should exit on its own
/// (help and version output are not failures).
pub fn parse_failure_code(err: &clap::Error) -> Option<u8> {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => None,
        _ => Some(Stage::Configuration.exit_code()),
    }
}

impl Cli {
    pub fn log_directive(&self) -> &'static str {
        match self.log_level.to_lowercase().as_str() {
            "debug" => "debug",
            "warn" | "warning" => "warn",
            "error" => "error",
            _ => "info",
        }
    }

    pub fn settings(&self) -> LauncherSettings {
        LauncherSettings::new(&self.backup_type, &self.docker_image_uri)
            .with_exclude_replica(&self.exclude_replica)
            .with_hostname(&self.hostname)
            .with_verbose(self.log_directive() == "debug")
    }
}
