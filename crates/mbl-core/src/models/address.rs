use crate::error::{LauncherError, Result};

/// A replica set member address of the form `<member>.<service>.<namespace>.<suffix...>`,
/// as published by a Kubernetes headless service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaAddress {
    raw: String,
    member: String,
    namespace: String,
}

impl ReplicaAddress {
    pub fn parse(address: &str) -> Result<Self> {
        let malformed = |reason| LauncherError::MalformedAddress {
            address: address.to_string(),
            reason,
        };

        // Members are reported as host:port; the port never names a pod or namespace.
        let host = match address.rsplit_once(':') {
            Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
            _ => address,
        };

        let parts: Vec<&str> = host.split('.').collect();
        if parts.len() < 3 {
            return Err(malformed("expected at least 3 domain parts"));
        }
        if parts[0].is_empty() {
            return Err(malformed("empty member name"));
        }
        if parts[2].is_empty() {
            return Err(malformed("empty namespace"));
        }

        Ok(Self {
            raw: address.to_string(),
            member: parts[0].to_string(),
            namespace: parts[2].to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Pod name backing this member.
    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub zone: String,
    pub namespace: String,
    pub node: String,
}
