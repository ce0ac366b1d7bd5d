use std::fmt;

/// Boxed error returned by the injected database and cluster clients.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Pipeline stage an error belongs to. Each stage has its own exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    ClientSetup,
    ReplicaSelection,
    PlacementResolution,
    JobSubmission,
}

impl Stage {
    pub fn exit_code(self) -> u8 {
        match self {
            Stage::Configuration => 1,
            Stage::ClientSetup => 2,
            Stage::ReplicaSelection => 3,
            Stage::PlacementResolution => 4,
            Stage::JobSubmission => 5,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configuration => "configuration",
            Stage::ClientSetup => "client setup",
            Stage::ReplicaSelection => "replica selection",
            Stage::PlacementResolution => "placement resolution",
            Stage::JobSubmission => "job submission",
        };
        f.write_str(name)
    }
}

/// Error surfaced by the Kubernetes API capability.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error(transparent)]
    Other(BoxError),
}

impl ApiError {
    pub fn other(err: impl Into<BoxError>) -> Self {
        ApiError::Other(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("creating {client} client: {source}")]
    Client {
        client: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("getting replica set status: {0}")]
    StatusQuery(#[source] BoxError),

    #[error("replica set status command did not complete successfully (ok = {ok})")]
    StatusNotOk { ok: f64 },

    #[error("no SECONDARY replica set member found outside the excluded replica '{excluded}'")]
    NoEligibleReplica { excluded: String },

    #[error("replica address '{address}' is not a headless service name: {reason}")]
    MalformedAddress { address: String, reason: &'static str },

    #[error("looking up {target} for replica '{address}': {source}")]
    PlacementLookup {
        target: String,
        address: String,
        #[source]
        source: ApiError,
    },

    #[error("pod '{pod}' in namespace '{namespace}' is not scheduled on a node")]
    PodNotScheduled { pod: String, namespace: String },

    #[error("unable to find label '{label}' on node '{node}'")]
    ZoneLabelMissing { node: String, label: &'static str },

    #[error("creating job in namespace '{namespace}': {source}")]
    JobSubmission {
        namespace: String,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl LauncherError {
    pub fn stage(&self) -> Stage {
        match self {
            LauncherError::Config(_) => Stage::Configuration,
            LauncherError::Client { .. } => Stage::ClientSetup,
            LauncherError::StatusQuery(_)
            | LauncherError::StatusNotOk { .. }
            | LauncherError::NoEligibleReplica { .. }
            | LauncherError::Json(_) => Stage::ReplicaSelection,
            LauncherError::MalformedAddress { .. }
            | LauncherError::PlacementLookup { .. }
            | LauncherError::PodNotScheduled { .. }
            | LauncherError::ZoneLabelMissing { .. } => Stage::PlacementResolution,
            LauncherError::JobSubmission { .. } | LauncherError::Yaml(_) => Stage::JobSubmission,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.stage().exit_code()
    }

    /// True when the API server reported the looked-up pod or node, or the target
    /// namespace of a job submission, as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            LauncherError::PlacementLookup { source, .. }
            | LauncherError::JobSubmission { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;
