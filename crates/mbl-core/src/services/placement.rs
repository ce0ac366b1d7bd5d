use crate::error::{LauncherError, Result};
use crate::models::{Placement, ReplicaAddress};

use super::cluster::ClusterApi;

pub const ZONE_LABEL: &str = "topology.kubernetes.io/zone";

/// Find the availability zone and namespace of the pod backing `replica_address`.
///
/// Every call hits the API server; placement changes after failovers and node
/// replacements, so nothing is cached.
pub async fn resolve_placement<C>(cluster: &C, replica_address: &str) -> Result<Placement>
where
    C: ClusterApi + ?Sized,
{
    let address = ReplicaAddress::parse(replica_address)?;
    let namespace = address.namespace();
    let pod_name = address.member();

    tracing::debug!(pod = pod_name, namespace, "finding pod in namespace");

    let pod = cluster
        .get_pod(namespace, pod_name)
        .await
        .map_err(|source| LauncherError::PlacementLookup {
            target: format!("pod '{pod_name}' in namespace '{namespace}'"),
            address: replica_address.to_string(),
            source,
        })?;

    let node_name = pod
        .spec
        .and_then(|spec| spec.node_name)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| LauncherError::PodNotScheduled {
            pod: pod_name.to_string(),
            namespace: namespace.to_string(),
        })?;

    tracing::debug!(pod = pod_name, node = %node_name, "pod is running on node");

    let node = cluster
        .get_node(&node_name)
        .await
        .map_err(|source| LauncherError::PlacementLookup {
            target: format!("node '{node_name}'"),
            address: replica_address.to_string(),
            source,
        })?;

    let zone = node
        .metadata
        .labels
        .and_then(|mut labels| labels.remove(ZONE_LABEL))
        .filter(|zone| !zone.is_empty())
        .ok_or_else(|| LauncherError::ZoneLabelMissing {
            node: node_name.clone(),
            label: ZONE_LABEL,
        })?;

    tracing::debug!(az = %zone, namespace, "target placement");

    Ok(Placement {
        zone,
        namespace: namespace.to_string(),
        node: node_name,
    })
}
