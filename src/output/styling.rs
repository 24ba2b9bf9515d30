use std::fmt::Display;

use console::{style, StyledObject};

/// Terminal styles shared by the banner, spinner and summary.
pub fn heading(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().underlined()
}

pub fn icon(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright()
}

pub fn label(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn setting(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).cyan()
}

pub fn success(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().green()
}

pub fn notice(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn failure(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().red()
}

/// Green when nothing failed, red otherwise.
pub fn failure_count(count: usize) -> StyledObject<String> {
    if count == 0 {
        success(count)
    } else {
        failure(count)
    }
}

pub fn brand(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).magenta().bold()
}
