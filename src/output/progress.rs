use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::vacuum::PassReport;

use super::styling::{failure, heading, icon, notice, success};

/// Spinner shown on stderr while a pass runs.
pub struct PassProgress {
    pb: ProgressBar,
}

impl PassProgress {
    pub fn start(namespace: &str) -> Self {
        eprintln!("{}  {}", icon("⚙️"), heading("Pass"));
        let pb = create_spinner(
            notice(format!("Vacuuming builds in {namespace}")).to_string(),
        );
        Self { pb }
    }

    pub fn finish(self, report: &PassReport) {
        self.pb.finish_with_message(
            success(format!(
                "Evicted {} builds, deleted {} resources ✓",
                report.evicted_builds(),
                report.deleted()
            ))
            .to_string(),
        );
        eprintln!();
    }

    pub fn abandon(self) {
        self.pb
            .abandon_with_message(failure("Pass aborted ✗").to_string());
        eprintln!();
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
