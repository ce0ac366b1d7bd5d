use k8s_openapi::api::batch::v1::Job;

use super::Placement;

/// Everything decided before submission: where the backup reads from and the job that will do it.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub target: String,
    pub placement: Placement,
    pub job: Job,
}

/// Handle to a submitted job. The cluster owns the job from here on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedJob {
    pub name: String,
    pub namespace: String,
    pub target: String,
    pub zone: String,
}

impl LaunchedJob {
    pub fn from_created(job: &Job, plan: &LaunchPlan) -> Self {
        Self {
            name: job.metadata.name.clone().unwrap_or_default(),
            namespace: job
                .metadata
                .namespace
                .clone()
                .unwrap_or_else(|| plan.placement.namespace.clone()),
            target: plan.target.clone(),
            zone: plan.placement.zone.clone(),
        }
    }
}
