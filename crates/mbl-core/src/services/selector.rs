use mongodb::bson::{doc, from_document};

use crate::error::{LauncherError, Result};
use crate::models::ReplicaSetStatus;

use super::mongo::AdminCommandRunner;

/// Ask the replica set for its status and decode the parts the selector needs.
pub async fn replica_set_status<M>(commands: &M) -> Result<ReplicaSetStatus>
where
    M: AdminCommandRunner + ?Sized,
{
    let response = commands
        .run_admin_command(doc! { "replSetGetStatus": 1 })
        .await
        .map_err(LauncherError::StatusQuery)?;
    let status: ReplicaSetStatus =
        from_document(response).map_err(|e| LauncherError::StatusQuery(Box::new(e)))?;
    Ok(status)
}

/// Pick the SECONDARY to back up from.
///
/// Members are considered in the order the server returns them; the first SECONDARY
/// that is not `exclude_replica` wins. There is no lag or load based ranking.
pub async fn select_target<M>(
    commands: &M,
    exclude_replica: Option<&str>,
    verbose: bool,
) -> Result<String>
where
    M: AdminCommandRunner + ?Sized,
{
    let status = replica_set_status(commands).await?;

    if !status.is_ok() {
        return Err(LauncherError::StatusNotOk { ok: status.ok });
    }

    if verbose {
        let members = serde_json::to_string_pretty(&status)?;
        tracing::debug!(status = %members, "replica set members");
    }

    let target = status
        .first_eligible_secondary(exclude_replica)
        .map(|m| m.name.clone())
        .ok_or_else(|| LauncherError::NoEligibleReplica {
            excluded: exclude_replica.unwrap_or_default().to_string(),
        })?;

    tracing::debug!(host = %target, "target host");
    Ok(target)
}
