mod cli;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use mbl_core::services::job_builder::render_manifest;
use mbl_core::services::{KubeCluster, MongoAdmin};
use mbl_core::{BackupLauncher, LauncherError};

use crate::cli::Cli;

const INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match cli::parse_failure_code(&err) {
            Some(code) => {
                // Logging is not configured yet; clap's own rendering names the missing input.
                let _ = err.print();
                return ExitCode::from(code);
            }
            None => err.exit(),
        },
    };
    let _guard = setup_logging(cli.log_directive());

    if let Err(report) = color_eyre::install() {
        tracing::warn!(error = %report, "unable to install error report handler");
    }

    tokio::select! {
        code = launch(&cli) => code,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted, abandoning launch");
            ExitCode::from(INTERRUPTED)
        }
    }
}

/// Log to stderr through a non-blocking writer, leaving stdout for dry-run manifests.
/// `RUST_LOG` overrides `--log-level`.
/// Returns the guard that must be held alive for the duration of the program.
fn setup_logging(level: &str) -> tracing_appender::non_blocking::WorkerGuard {
    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_ansi(false)
        .init();

    guard
}

async fn launch(cli: &Cli) -> ExitCode {
    let launcher = match build_launcher(cli).await {
        Ok(launcher) => launcher,
        Err(report) => {
            let code = report
                .downcast_ref::<LauncherError>()
                .map(LauncherError::exit_code)
                .unwrap_or(1);
            let message = format!("{report:#}");
            tracing::error!(error = %message, "creating launcher");
            return ExitCode::from(code);
        }
    };

    let outcome = if cli.dry_run {
        dry_run(&launcher).await
    } else {
        launcher.run().await.map(|_| ())
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(stage = %err.stage(), error = %error_chain(&err), "running the launcher");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn build_launcher(cli: &Cli) -> color_eyre::Result<BackupLauncher<MongoAdmin, KubeCluster>> {
    let settings = cli.settings();
    settings.validate().wrap_err("loading launcher configuration")?;

    let commands = MongoAdmin::connect(
        &cli.mongodb_uri,
        &cli.mongodb_username,
        &cli.mongodb_password,
    )
    .await
    .wrap_err("creating MongoDB client")?;

    let cluster = KubeCluster::connect(cli.running_locally)
        .await
        .wrap_err("creating Kubernetes client")?;

    Ok(BackupLauncher::new(commands, cluster, settings))
}

async fn dry_run(launcher: &BackupLauncher<MongoAdmin, KubeCluster>) -> mbl_core::Result<()> {
    let plan = launcher.plan().await?;
    tracing::info!(
        target_host = %plan.target,
        az = %plan.placement.zone,
        namespace = %plan.placement.namespace,
        "dry run, job not submitted"
    );
    print!("{}", render_manifest(&plan.job)?);
    Ok(())
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
