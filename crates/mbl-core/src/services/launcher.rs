use crate::error::Result;
use crate::models::{LaunchPlan, LaunchedJob, LauncherSettings};

use super::cluster::ClusterApi;
use super::job_builder::{build_job, submit_job};
use super::mongo::AdminCommandRunner;
use super::placement::resolve_placement;
use super::selector::select_target;

/// Runs selection, placement resolution and job submission in order.
///
/// Each stage only sees the previous stage's output; the first failure stops the run.
pub struct BackupLauncher<M, C> {
    commands: M,
    cluster: C,
    settings: LauncherSettings,
}

impl<M, C> BackupLauncher<M, C>
where
    M: AdminCommandRunner,
    C: ClusterApi,
{
    pub fn new(commands: M, cluster: C, settings: LauncherSettings) -> Self {
        Self {
            commands,
            cluster,
            settings,
        }
    }

    pub fn cluster(&self) -> &C {
        &self.cluster
    }

    /// Decide the target and build its job without submitting anything.
    pub async fn plan(&self) -> Result<LaunchPlan> {
        let target = select_target(
            &self.commands,
            self.settings.excluded(),
            self.settings.verbose,
        )
        .await?;

        let placement = resolve_placement(&self.cluster, &target).await?;
        let job = build_job(&self.settings, &target, &placement);

        Ok(LaunchPlan {
            target,
            placement,
            job,
        })
    }

    /// Plan and submit the backup job. Exactly one create call is made on success.
    pub async fn run(&self) -> Result<LaunchedJob> {
        let plan = self.plan().await?;
        let created = submit_job(&self.cluster, &plan.job).await?;
        let launched = LaunchedJob::from_created(&created, &plan);

        tracing::info!(
            job = %launched.name,
            namespace = %launched.namespace,
            target = %launched.target,
            az = %launched.zone,
            "backup job launched"
        );
        Ok(launched)
    }
}
