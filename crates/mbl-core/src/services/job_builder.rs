use std::collections::BTreeMap;

use k8s_openapi::api::batch::v1::{Job, JobSpec};
use k8s_openapi::api::core::v1::{
    Affinity, ConfigMapEnvSource, Container, EmptyDirVolumeSource, EnvFromSource, EnvVar,
    EnvVarSource, NodeAffinity, NodeSelector, NodeSelectorRequirement, NodeSelectorTerm, PodSpec,
    PodTemplateSpec, ResourceRequirements, SecretKeySelector, Toleration, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::error::{LauncherError, Result};
use crate::models::{LauncherSettings, Placement};

use super::cluster::ClusterApi;
use super::placement::ZONE_LABEL;

pub const JOB_NAME_PREFIX: &str = "targeted-mongodb-backups-";
pub const APP_LABEL: &str = "mongodb-backups";
pub const BACKUP_TYPE_LABEL: &str = "backup-type";
pub const CREATED_BY_ANNOTATION: &str = "created-by";
pub const DO_NOT_DISRUPT_ANNOTATION: &str = "karpenter.sh/do-not-disrupt";
pub const NODE_POOL_LABEL: &str = "karpenter.sh/nodepool";
pub const BACKUP_NODE_POOL: &str = "backups";
pub const BACKUP_TAINT_KEY: &str = "mongodb-backups";
pub const SERVICE_ACCOUNT: &str = "backups";
pub const ENTRYPOINT: &str = "/usr/local/bin/mongodump_k8s.sh";
pub const TTL_SECONDS_AFTER_FINISHED: i32 = 900;
pub const BACKOFF_LIMIT: i32 = 3;

const CONTAINER_NAME: &str = "app";
const CONFIG_MAP: &str = "backups";
const CREDENTIALS_SECRET: &str = "mongodb";
const SCRATCH_VOLUME: &str = "instance-storage";
const SCRATCH_MOUNT_PATH: &str = "/backups";
const MEMORY: &str = "1Gi";
const CPU_REQUEST: &str = "2";

/// Build the backup Job for `target`, pinned to the zone in `placement`.
///
/// Pure: the same inputs always give the same descriptor. The API server assigns the
/// final name from [`JOB_NAME_PREFIX`].
pub fn build_job(settings: &LauncherSettings, target: &str, placement: &Placement) -> Job {
    let labels = BTreeMap::from([
        (BACKUP_TYPE_LABEL.to_string(), settings.backup_type.clone()),
        ("app".to_string(), APP_LABEL.to_string()),
    ]);

    Job {
        metadata: ObjectMeta {
            generate_name: Some(JOB_NAME_PREFIX.to_string()),
            namespace: Some(placement.namespace.clone()),
            annotations: Some(BTreeMap::from([(
                CREATED_BY_ANNOTATION.to_string(),
                settings.hostname.clone(),
            )])),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(JobSpec {
            ttl_seconds_after_finished: Some(TTL_SECONDS_AFTER_FINISHED),
            backoff_limit: Some(BACKOFF_LIMIT),
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    annotations: Some(BTreeMap::from([(
                        DO_NOT_DISRUPT_ANNOTATION.to_string(),
                        "true".to_string(),
                    )])),
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(pod_spec(settings, target, &placement.zone)),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn pod_spec(settings: &LauncherSettings, target: &str, zone: &str) -> PodSpec {
    PodSpec {
        restart_policy: Some("Never".to_string()),
        service_account_name: Some(SERVICE_ACCOUNT.to_string()),
        tolerations: Some(vec![Toleration {
            key: Some(BACKUP_TAINT_KEY.to_string()),
            operator: Some("Equal".to_string()),
            value: Some("true".to_string()),
            effect: Some("NoSchedule".to_string()),
            ..Default::default()
        }]),
        affinity: Some(zone_affinity(zone)),
        containers: vec![backup_container(settings, target)],
        volumes: Some(vec![Volume {
            name: SCRATCH_VOLUME.to_string(),
            empty_dir: Some(EmptyDirVolumeSource::default()),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

/// Hard requirement: the backup must land in the replica's zone, on the backup node pool.
fn zone_affinity(zone: &str) -> Affinity {
    let requirement = |key: &str, value: &str| NodeSelectorRequirement {
        key: key.to_string(),
        operator: "In".to_string(),
        values: Some(vec![value.to_string()]),
    };

    Affinity {
        node_affinity: Some(NodeAffinity {
            required_during_scheduling_ignored_during_execution: Some(NodeSelector {
                node_selector_terms: vec![NodeSelectorTerm {
                    match_expressions: Some(vec![
                        requirement(ZONE_LABEL, zone),
                        requirement(NODE_POOL_LABEL, BACKUP_NODE_POOL),
                    ]),
                    ..Default::default()
                }],
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn backup_container(settings: &LauncherSettings, target: &str) -> Container {
    Container {
        name: CONTAINER_NAME.to_string(),
        image: Some(settings.image.clone()),
        command: Some(vec![ENTRYPOINT.to_string(), settings.backup_type.clone()]),
        env_from: Some(vec![EnvFromSource {
            config_map_ref: Some(ConfigMapEnvSource {
                name: CONFIG_MAP.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        env: Some(vec![
            secret_env("MONGO_INITDB_ROOT_USERNAME", "username"),
            secret_env("MONGO_INITDB_ROOT_PASSWORD", "password"),
            EnvVar {
                name: "MONGO_HOSTLIST".to_string(),
                value: Some(target.to_string()),
                ..Default::default()
            },
        ]),
        resources: Some(ResourceRequirements {
            limits: Some(BTreeMap::from([(
                "memory".to_string(),
                Quantity(MEMORY.to_string()),
            )])),
            requests: Some(BTreeMap::from([
                ("memory".to_string(), Quantity(MEMORY.to_string())),
                ("cpu".to_string(), Quantity(CPU_REQUEST.to_string())),
            ])),
            ..Default::default()
        }),
        volume_mounts: Some(vec![VolumeMount {
            name: SCRATCH_VOLUME.to_string(),
            mount_path: SCRATCH_MOUNT_PATH.to_string(),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

fn secret_env(name: &str, key: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: CREDENTIALS_SECRET.to_string(),
                key: key.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Submit `job` once. No polling and no retries; the Job's backoff limit handles those.
pub async fn submit_job<C>(cluster: &C, job: &Job) -> Result<Job>
where
    C: ClusterApi + ?Sized,
{
    let namespace = job.metadata.namespace.clone().unwrap_or_default();
    let created = cluster
        .create_job(&namespace, job)
        .await
        .map_err(|source| LauncherError::JobSubmission {
            namespace: namespace.clone(),
            source,
        })?;

    tracing::debug!(job = ?created.metadata.name, namespace = %namespace, "job created");
    Ok(created)
}

/// Render `job` as a YAML manifest, as `kubectl apply` would accept it.
pub fn render_manifest(job: &Job) -> Result<String> {
    Ok(serde_yaml::to_string(job)?)
}
