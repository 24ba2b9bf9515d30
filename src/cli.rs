use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use crate::config::{parse_duration, parse_max_builds, Config, OutputFormat};
use crate::output::{self, PassProgress};
use crate::providers::{DryRunAccessor, KubernetesAccessor, ResourceAccessor};
use crate::vacuum::{MaxAge, Vacuum, VacuumOptions};

#[derive(Parser)]
#[command(name = "brigade-vacuum")]
#[command(author, version, about = "Prune expired Brigade builds", long_about = None)]
pub struct Cli {
    /// Delete builds older than this (e.g. 72h, 7d). 0 disables age pruning.
    #[arg(short, long, env = "VACUUM_AGE")]
    age: Option<String>,

    /// Keep at most this many builds. -1 keeps every build.
    #[arg(short, long, env = "VACUUM_MAX_BUILDS", allow_negative_numbers = true)]
    max_builds: Option<i64>,

    /// Never delete pods that are still pending or running
    #[arg(long, env = "VACUUM_SKIP_RUNNING_BUILDS")]
    skip_running_builds: bool,

    /// Namespace Brigade builds live in
    #[arg(short, long, env = "BRIGADE_NAMESPACE")]
    namespace: Option<String>,

    /// kubeconfig context to use
    #[arg(long)]
    context: Option<String>,

    /// Report what would be deleted without deleting anything
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, default_value_t = false)]
    pretty: bool,
}

/// Command-line flags merged over the configuration file.
#[derive(Debug, PartialEq)]
struct Settings {
    options: VacuumOptions,
    namespace: String,
    context: Option<String>,
    dry_run: bool,
    format: OutputFormat,
    pretty: bool,
}

impl Cli {
    fn resolve(&self, config: Config, now: DateTime<Utc>) -> Result<Settings> {
        let age = self.age.clone().or(config.vacuum.age);
        let max_age = match age.as_deref() {
            Some(age) => max_age(age, now)?,
            None => MaxAge::Disabled,
        };

        let max_builds = parse_max_builds(self.max_builds.unwrap_or(config.vacuum.max_builds))?;

        Ok(Settings {
            options: VacuumOptions {
                max_age,
                max_builds,
                skip_running_builds: self.skip_running_builds || config.vacuum.skip_running_builds,
            },
            namespace: self.namespace.clone().unwrap_or(config.vacuum.namespace),
            context: self.context.clone().or(config.kubernetes.context),
            dry_run: self.dry_run,
            format: self.format.unwrap_or(config.output.format),
            pretty: self.pretty || config.output.pretty,
        })
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let settings = self.resolve(config, Utc::now())?;

        info!(
            "Vacuuming builds in namespace {} (age: {:?}, max: {:?}, skip running: {})",
            settings.namespace,
            settings.options.max_age,
            settings.options.max_builds,
            settings.options.skip_running_builds
        );

        let cluster =
            KubernetesAccessor::connect(&settings.namespace, settings.context.as_deref()).await?;

        let accessor: Box<dyn ResourceAccessor> = if settings.dry_run {
            warn!("Dry run: no resources will be deleted");
            Box::new(DryRunAccessor::new(cluster))
        } else {
            Box::new(cluster)
        };

        let progress = PassProgress::start(&settings.namespace);
        let report = match Vacuum::new(settings.options, accessor).run().await {
            Ok(report) => {
                progress.finish(&report);
                report
            }
            Err(e) => {
                progress.abandon();
                return Err(e).context("Vacuum pass aborted");
            }
        };

        output::write_report(
            &report,
            settings.format,
            settings.pretty,
            self.output.as_deref(),
        )?;

        if let Some(path) = &self.output {
            info!("Report written to: {}", path.display());
        }

        Ok(())
    }
}

/// Turns a configured age into a cutoff relative to `now`. Zero disables.
fn max_age(age: &str, now: DateTime<Utc>) -> Result<MaxAge> {
    let age = parse_duration(age)?;
    if age.is_zero() {
        return Ok(MaxAge::Disabled);
    }

    let age = chrono::Duration::from_std(age).context("Age is too large")?;
    let cutoff = now
        .checked_sub_signed(age)
        .context("Age reaches before the earliest representable time")?;

    Ok(MaxAge::Before(cutoff))
}
