// Each test binary compiles this module independently and uses a different
// subset of helpers, so unused-function warnings are expected.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{Node, Pod, PodSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use mongodb::bson::{doc, Bson, Document};

use mbl_core::error::{ApiError, BoxError};
use mbl_core::models::LauncherSettings;
use mbl_core::services::{AdminCommandRunner, ClusterApi};

pub const ZONE_LABEL: &str = "topology.kubernetes.io/zone";

/// In-memory cluster recording every call made against it.
#[derive(Default)]
pub struct FakeCluster {
    pods: HashMap<(String, String), Pod>,
    nodes: HashMap<String, Node>,
    reject_jobs: Option<String>,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<Job>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pod(mut self, namespace: &str, name: &str, node: Option<&str>) -> Self {
        let pod = Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: Some(PodSpec {
                node_name: node.map(str::to_string),
                ..Default::default()
            }),
            ..Default::default()
        };
        self.pods
            .insert((namespace.to_string(), name.to_string()), pod);
        self
    }

    pub fn with_node(mut self, name: &str, zone: Option<&str>) -> Self {
        let labels = zone.map(|z| BTreeMap::from([(ZONE_LABEL.to_string(), z.to_string())]));
        let node = Node {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                labels,
                ..Default::default()
            },
            ..Default::default()
        };
        self.nodes.insert(name.to_string(), node);
        self
    }

    pub fn rejecting_jobs(mut self, reason: &str) -> Self {
        self.reject_jobs = Some(reason.to_string());
        self
    }

    /// The usual three-member replica set in `database`, spread over two zones.
    pub fn database_cluster() -> Self {
        Self::new()
            .with_pod("database", "mongodb-0", Some("node1"))
            .with_pod("database", "mongodb-1", Some("node2"))
            .with_pod("database", "mongodb-2", Some("node3"))
            .with_node("node1", Some("eu-west-1a"))
            .with_node("node2", Some("eu-west-1b"))
            .with_node("node3", Some("eu-west-1c"))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<Job> {
        self.created.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, ApiError> {
        self.record(format!("get_pod {namespace}/{name}"));
        self.pods
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                kind: "pod",
                name: name.to_string(),
            })
    }

    async fn get_node(&self, name: &str) -> Result<Node, ApiError> {
        self.record(format!("get_node {name}"));
        self.nodes
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                kind: "node",
                name: name.to_string(),
            })
    }

    async fn create_job(&self, namespace: &str, job: &Job) -> Result<Job, ApiError> {
        self.record(format!("create_job {namespace}"));
        if let Some(reason) = &self.reject_jobs {
            return Err(ApiError::other(reason.clone()));
        }
        let mut stored = job.clone();
        let prefix = job.metadata.generate_name.clone().unwrap_or_default();
        stored.metadata.name = Some(format!("{prefix}x7k2p"));
        self.created.lock().unwrap().push(stored.clone());
        Ok(stored)
    }
}

/// Cluster whose every call fails at the transport level.
pub struct UnreachableCluster;

#[async_trait]
impl ClusterApi for UnreachableCluster {
    async fn get_pod(&self, _namespace: &str, _name: &str) -> Result<Pod, ApiError> {
        Err(ApiError::other("connection refused"))
    }

    async fn get_node(&self, _name: &str) -> Result<Node, ApiError> {
        Err(ApiError::other("connection refused"))
    }

    async fn create_job(&self, _namespace: &str, _job: &Job) -> Result<Job, ApiError> {
        Err(ApiError::other("connection refused"))
    }
}

/// Replica set that always answers with the same status document.
pub struct FakeReplicaSet {
    status: Document,
}

impl FakeReplicaSet {
    pub fn new(ok: f64, members: &[(&str, &str)]) -> Self {
        let members: Vec<Bson> = members
            .iter()
            .map(|(name, state)| Bson::Document(doc! { "name": *name, "stateStr": *state }))
            .collect();
        Self {
            status: doc! { "set": "rs0", "ok": ok, "members": members },
        }
    }

    /// `mongodb-0` PRIMARY, `mongodb-1` and `mongodb-2` SECONDARY.
    pub fn healthy() -> Self {
        Self::new(
            1.0,
            &[
                ("mongodb-0.mongodb.database.svc.cluster.local", "PRIMARY"),
                ("mongodb-1.mongodb.database.svc.cluster.local", "SECONDARY"),
                ("mongodb-2.mongodb.database.svc.cluster.local", "SECONDARY"),
            ],
        )
    }
}

#[async_trait]
impl AdminCommandRunner for FakeReplicaSet {
    async fn run_admin_command(&self, _command: Document) -> Result<Document, BoxError> {
        Ok(self.status.clone())
    }
}

pub fn settings() -> LauncherSettings {
    LauncherSettings::new("daily", "registry.example.com/mongodb-backups:1.4.0")
        .with_hostname("backup-launcher-28591200-x2v9q")
}
