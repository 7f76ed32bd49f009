use std::path::{Component, Path};
use std::time::Duration;

use super::constants::{BYTES_PER_UNIT, SIZE_UNITS};

/// Renders a byte count with two decimals, stepping through the unit table
/// until the value drops below 1024 or the table runs out.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= BYTES_PER_UNIT && unit < SIZE_UNITS.len() - 1 {
        value /= BYTES_PER_UNIT;
        unit += 1;
    }
    format!("{:.2} {}", value, SIZE_UNITS[unit])
}

/// Percentage of `part` in `total` as "NN.NN%". An empty total reads as 0%.
pub fn format_percent(part: u64, total: u64) -> String {
    let percent = if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    };
    format!("{:.2}%", percent)
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let minutes = total / 60;
    let seconds = total % 60;
    if minutes > 0 {
        format!("{} min {:02} sec", minutes, seconds)
    } else {
        format!("{} seconds", seconds)
    }
}

/// Extension bucket key for a file name: the final suffix with its leading
/// dot, case preserved, or "" when the name has no suffix. Dotfiles like
/// `.bashrc` count as extensionless.
pub fn extension_of(file_name: &str) -> String {
    match Path::new(file_name).extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => String::new(),
    }
}

/// Label used to name log files after the analyzed path. Filesystem roots
/// have no final component, so they fall back to the drive prefix on
/// windows and to "root" elsewhere.
pub fn path_label(path: &Path) -> String {
    if let Some(name) = path.file_name() {
        return name.to_string_lossy().into_owned();
    }
    match path.components().next() {
        Some(Component::Prefix(prefix)) => prefix
            .as_os_str()
            .to_string_lossy()
            .trim_end_matches(|c| matches!(c, '\\' | '/' | ':'))
            .to_string(),
        _ => "root".to_string(),
    }
}
