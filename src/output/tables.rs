use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::vacuum::{BuildOutcome, ResourceStatus};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

/// Red when anything failed, yellow when workers were retained.
pub fn build_status_cell(build: &BuildOutcome) -> Cell {
    if build.failed() > 0 {
        Cell::new(format!("{} failed", build.failed())).fg(TableColor::Red)
    } else if build.skipped() > 0 {
        Cell::new(format!("{} kept", build.skipped())).fg(TableColor::Yellow)
    } else {
        Cell::new("deleted").fg(TableColor::Green)
    }
}

pub fn count_cell(count: usize, color: TableColor) -> Cell {
    if count == 0 {
        Cell::new(count).fg(TableColor::DarkGrey)
    } else {
        Cell::new(count).fg(color)
    }
}

pub fn status_cell(status: &ResourceStatus) -> Cell {
    match status {
        ResourceStatus::Deleted => Cell::new("deleted").fg(TableColor::Green),
        ResourceStatus::Skipped { phase } => {
            Cell::new(format!("kept ({phase})")).fg(TableColor::Yellow)
        }
        ResourceStatus::Failed { error } => Cell::new(error).fg(TableColor::Red),
    }
}
