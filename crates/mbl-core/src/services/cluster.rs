use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::PostParams;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};

use crate::error::{ApiError, LauncherError, Result};

/// The three Kubernetes operations the launcher needs.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn get_pod(&self, namespace: &str, name: &str) -> std::result::Result<Pod, ApiError>;

    async fn get_node(&self, name: &str) -> std::result::Result<Node, ApiError>;

    /// Create `job` in `namespace` and return the object as stored by the API server.
    async fn create_job(&self, namespace: &str, job: &Job) -> std::result::Result<Job, ApiError>;
}

pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// In-cluster service account config, or `~/.kube/config` when running locally.
    pub async fn connect(running_locally: bool) -> Result<Self> {
        let config = if running_locally {
            let kubeconfig = Kubeconfig::read().map_err(client_error)?;
            Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .map_err(client_error)?
        } else {
            Config::incluster().map_err(client_error)?
        };
        let client = Client::try_from(config).map_err(client_error)?;
        Ok(Self::new(client))
    }
}

fn client_error(e: impl std::error::Error + Send + Sync + 'static) -> LauncherError {
    LauncherError::Client {
        client: "Kubernetes",
        source: Box::new(e),
    }
}

fn api_error(kind: &'static str, name: &str, e: kube::Error) -> ApiError {
    match e {
        kube::Error::Api(response) if response.code == 404 => ApiError::NotFound {
            kind,
            name: name.to_string(),
        },
        other => ApiError::other(other),
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn get_pod(&self, namespace: &str, name: &str) -> std::result::Result<Pod, ApiError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        pods.get(name).await.map_err(|e| api_error("pod", name, e))
    }

    async fn get_node(&self, name: &str) -> std::result::Result<Node, ApiError> {
        let nodes: Api<Node> = Api::all(self.client.clone());
        nodes.get(name).await.map_err(|e| api_error("node", name, e))
    }

    async fn create_job(&self, namespace: &str, job: &Job) -> std::result::Result<Job, ApiError> {
        let jobs: Api<Job> = Api::namespaced(self.client.clone(), namespace);
        jobs.create(&PostParams::default(), job)
            .await
            .map_err(|e| api_error("namespace", namespace, e))
    }
}
