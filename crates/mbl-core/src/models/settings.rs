use std::sync::LazyLock;

use regex::Regex;

use crate::error::{LauncherError, Result};

static LABEL_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9])?$").unwrap()
});

const MAX_LABEL_VALUE_LEN: usize = 63;

/// Read-only launcher settings, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherSettings {
    /// Member name that must never be targeted, e.g. a replica reserved for analytics.
    pub exclude_replica: Option<String>,
    pub backup_type: String,
    pub image: String,
    /// Recorded in the `created-by` annotation of every launched job.
    pub hostname: String,
    /// Dump the full replica set status before selecting.
    pub verbose: bool,
}

impl LauncherSettings {
    pub fn new(backup_type: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            exclude_replica: None,
            backup_type: backup_type.into(),
            image: image.into(),
            hostname: "unknown".into(),
            verbose: false,
        }
    }

    pub fn with_exclude_replica(mut self, replica: impl Into<String>) -> Self {
        let replica = replica.into();
        self.exclude_replica = (!replica.is_empty()).then_some(replica);
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn excluded(&self) -> Option<&str> {
        self.exclude_replica.as_deref()
    }

    pub fn validate(&self) -> Result<()> {
        if self.image.trim().is_empty() {
            return Err(LauncherError::Config(
                "docker image URI - DOCKER_IMAGE_URI - has not been set".into(),
            ));
        }
        if self.backup_type.is_empty() {
            return Err(LauncherError::Config(
                "backup type - BACKUP_TYPE - has not been set".into(),
            ));
        }
        if self.backup_type.len() > MAX_LABEL_VALUE_LEN
            || !LABEL_VALUE_RE.is_match(&self.backup_type)
        {
            return Err(LauncherError::Config(format!(
                "backup type '{}' is not a valid Kubernetes label value",
                self.backup_type
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_exclusion_excludes_nothing() {
        let settings = LauncherSettings::new("daily", "repo/backups:1").with_exclude_replica("");
        assert_eq!(settings.excluded(), None);
    }

    #[test]
    fn valid_settings_pass() {
        let settings = LauncherSettings::new("daily", "repo/backups:1")
            .with_exclude_replica("mongodb-1.mongodb.database.svc.cluster.local");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn missing_image_is_rejected() {
        let settings = LauncherSettings::new("daily", "  ");
        assert!(matches!(settings.validate(), Err(LauncherError::Config(_))));
    }

    #[test]
    fn backup_type_must_be_a_label_value() {
        for bad in ["", "weekly backup", "-daily", "daily-", &"x".repeat(64)] {
            let settings = LauncherSettings::new(bad, "repo/backups:1");
            assert!(settings.validate().is_err(), "{bad:?} should be rejected");
        }
        for good in ["daily", "hourly_2", "pre.upgrade"] {
            let settings = LauncherSettings::new(good, "repo/backups:1");
            assert!(settings.validate().is_ok(), "{good:?} should be accepted");
        }
    }
}
