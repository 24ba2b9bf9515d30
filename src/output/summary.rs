use std::collections::BTreeSet;
use std::fmt::Write;

use comfy_table::{Cell, Color as TableColor};

use crate::resources::ResourceKind;
use crate::vacuum::{MaxAge, MaxBuilds, PassReport, ResourceStatus};

use super::styling::{failure_count, heading, icon, label, notice, setting, success};
use super::tables::{build_status_cell, count_cell, create_table, cyan_header, status_cell};

/// Renders a human-readable summary of a pass.
///
/// Sections:
/// - Overview: the retention settings and totals
/// - Policies: what each enabled policy saw and did
/// - Evicted Builds: one row per build, color coded by outcome
/// - Problems: failed deletions and records without a build label
pub fn render_summary(report: &PassReport) -> String {
    let mut output = String::new();

    render_overview(&mut output, report);

    if report.age.is_none() && report.count.is_none() {
        let _ = writeln!(
            output,
            "{}",
            notice("Both policies are disabled. Nothing to do.")
        );
        return output;
    }

    render_policies(&mut output, report);
    render_builds(&mut output, report);
    render_problems(&mut output, report);

    output
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", icon(emoji), heading(title));
}

fn describe_max_age(max_age: MaxAge) -> String {
    match max_age {
        MaxAge::Disabled => "disabled".to_string(),
        MaxAge::Before(cutoff) => format!("before {}", cutoff.format("%Y-%m-%d %H:%M UTC")),
    }
}

fn describe_max_builds(max_builds: MaxBuilds) -> String {
    match max_builds {
        MaxBuilds::Unlimited => "unlimited".to_string(),
        MaxBuilds::AtMost(max) => format!("keep newest {max}"),
    }
}

fn render_overview(output: &mut String, report: &PassReport) {
    add_section_header(output, "📊", "Overview");

    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n",
        label("Age policy:"),
        setting(describe_max_age(report.options.max_age)),
        label("Count policy:"),
        setting(describe_max_builds(report.options.max_builds)),
        label("Skip running builds:"),
        setting(report.options.skip_running_builds),
        label("Builds evicted:"),
        notice(report.evicted_builds()),
        label("Resources deleted:"),
        success(report.deleted()),
        label("Pods kept:"),
        notice(report.skipped()),
        label("Failed deletions:"),
        failure_count(report.failed()),
    );
}

fn render_policies(output: &mut String, report: &PassReport) {
    add_section_header(output, "📋", "Policies");

    let mut table = create_table();
    table.set_header(cyan_header(&[
        "Policy",
        "Candidates",
        "Orphans",
        "Evicted",
        "Deleted",
        "Kept",
        "Failed",
    ]));

    for policy in report.policies() {
        table.add_row(vec![
            Cell::new(policy.policy),
            Cell::new(policy.candidates),
            count_cell(policy.orphans.len(), TableColor::Yellow),
            Cell::new(policy.evicted_builds()),
            count_cell(policy.deleted(), TableColor::Green),
            count_cell(policy.skipped(), TableColor::Yellow),
            count_cell(policy.failed(), TableColor::Red),
        ]);
    }

    let _ = writeln!(output, "{table}\n");
}

fn render_builds(output: &mut String, report: &PassReport) {
    add_section_header(output, "🗑️", "Evicted Builds");

    if report.evicted_builds() == 0 {
        let _ = writeln!(output, "  {}\n", label("No builds were evicted."));
        return;
    }

    let mut table = create_table();
    table.set_header(cyan_header(&["Policy", "Build", "Pods", "Secrets", "Status"]));

    for policy in report.policies() {
        for build in &policy.builds {
            let names = |kind: ResourceKind| {
                build
                    .resources
                    .iter()
                    .filter(|r| r.kind == kind)
                    .map(|r| r.name.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            };

            table.add_row(vec![
                Cell::new(policy.policy),
                Cell::new(&build.build_id),
                Cell::new(names(ResourceKind::Worker)),
                Cell::new(names(ResourceKind::Record)),
                build_status_cell(build),
            ]);
        }
    }

    let _ = writeln!(output, "{table}\n");
}

fn render_problems(output: &mut String, report: &PassReport) {
    let orphans: Vec<&str> = report
        .policies()
        .flat_map(|p| p.orphans.iter().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut problems = create_table();
    problems.set_header(cyan_header(&["Policy", "Build", "Kind", "Name", "Status"]));
    let mut rows = 0;

    for policy in report.policies() {
        for build in &policy.builds {
            for resource in &build.resources {
                if matches!(resource.status, ResourceStatus::Deleted) {
                    continue;
                }
                problems.add_row(vec![
                    Cell::new(policy.policy),
                    Cell::new(&build.build_id),
                    Cell::new(resource.kind),
                    Cell::new(&resource.name),
                    status_cell(&resource.status),
                ]);
                rows += 1;
            }
        }
    }

    if rows > 0 {
        add_section_header(output, "⚠️", "Kept or Failed Resources");
        let _ = writeln!(output, "{problems}\n");
    }

    if !orphans.is_empty() {
        add_section_header(output, "👻", "Records Without a Build ID");
        for name in orphans {
            let _ = writeln!(output, "  {} {}", setting("•"), name);
        }
        let _ = writeln!(output);
    }
}
