mod exports;
mod progress;
mod styling;
mod summary;
mod tables;

pub use exports::write_report;
pub use progress::PassProgress;
use styling::{brand, label};

/// Prints the brigade-vacuum banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        brand("🧹 brigade-vacuum"),
        label(env!("CARGO_PKG_VERSION")),
        label("Brigade build retention")
    );
}
