use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::OutputFormat;
use crate::vacuum::{PassReport, ResourceStatus};

use super::summary::render_summary;

/// Writes a pass report to `output`, or stdout when no path is given.
pub fn write_report(
    report: &PassReport,
    format: OutputFormat,
    pretty: bool,
    output: Option<&Path>,
) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            export_report(report, format, pretty, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            export_report(report, format, pretty, &mut handle)?;
        }
    }
    Ok(())
}

/// Exports a pass report.
///
/// - Summary: human-readable terminal output
/// - JSON: programmatic access
/// - CSV: one row per resource the pass touched
fn export_report(
    report: &PassReport,
    format: OutputFormat,
    pretty: bool,
    output: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Summary => {
            write!(output, "{}", render_summary(report))?;
            Ok(())
        }
        OutputFormat::Json => export_json(report, pretty, output),
        OutputFormat::Csv => export_csv(report, output),
    }
}

fn export_json(report: &PassReport, pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    writeln!(output, "{}", json)?;
    Ok(())
}

fn export_csv(report: &PassReport, output: &mut dyn Write) -> Result<()> {
    writeln!(output, "policy,build,kind,name,status,detail")?;

    for policy in report.policies() {
        for build in &policy.builds {
            for resource in &build.resources {
                let (status, detail) = match &resource.status {
                    ResourceStatus::Deleted => ("deleted", String::new()),
                    ResourceStatus::Skipped { phase } => ("skipped", phase.to_string()),
                    ResourceStatus::Failed { error } => ("failed", error.clone()),
                };
                writeln!(
                    output,
                    "{},{},{},{},{},{}",
                    policy.policy,
                    csv_field(&build.build_id),
                    resource.kind,
                    csv_field(&resource.name),
                    status,
                    csv_field(&detail)
                )?;
            }
        }
    }

    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{ResourceKind, WorkerPhase};
    use crate::vacuum::{BuildOutcome, Policy, PolicyReport};

    fn create_test_report() -> PassReport {
        let mut build = BuildOutcome::new("01abc");
        build.push(ResourceKind::Worker, "unit-01abc", ResourceStatus::Deleted);
        build.push(
            ResourceKind::Worker,
            "deploy-01abc",
            ResourceStatus::Skipped {
                phase: WorkerPhase::Pending,
            },
        );
        build.push(
            ResourceKind::Record,
            "brigade-01abc",
            ResourceStatus::Failed {
                error: "timed out, retry later".to_string(),
            },
        );

        let mut count = PolicyReport::new(Policy::Count, 6);
        count.builds.push(build);

        PassReport {
            count: Some(count),
            ..PassReport::default()
        }
    }

    fn export(format: OutputFormat, pretty: bool) -> String {
        let mut output = Vec::new();
        export_report(&create_test_report(), format, pretty, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_export_json() {
        let output = export(OutputFormat::Json, false);
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert!(json["age"].is_null());
        assert_eq!(json["count"]["policy"], "count");
        assert_eq!(json["count"]["candidates"], 6);
        assert_eq!(json["count"]["builds"][0]["build_id"], "01abc");
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_export_json_pretty() {
        let output = export(OutputFormat::Json, true);

        assert!(output.lines().count() > 1);
        assert!(output.contains("  \"count\""));
    }

    #[test]
    fn test_export_csv() {
        let output = export(OutputFormat::Csv, false);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "policy,build,kind,name,status,detail");
        assert_eq!(lines[1], "count,01abc,pod,unit-01abc,deleted,");
        assert_eq!(lines[2], "count,01abc,pod,deploy-01abc,skipped,Pending");
        assert_eq!(
            lines[3],
            "count,01abc,secret,brigade-01abc,failed,\"timed out, retry later\""
        );
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_export_summary() {
        let output = export(OutputFormat::Summary, false);

        assert!(output.contains("Overview"));
        assert!(output.contains("brigade-01abc"));
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        write_report(&create_test_report(), OutputFormat::Json, false, Some(&path)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"build_id\":\"01abc\""));
    }
}
