pub mod cluster;
pub mod job_builder;
pub mod launcher;
pub mod mongo;
pub mod placement;
pub mod selector;

pub use cluster::{ClusterApi, KubeCluster};
pub use mongo::{AdminCommandRunner, MongoAdmin};
