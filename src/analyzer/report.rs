use chrono::Local;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use super::constants::DATE_FORMAT;
use super::tree::write_tree;
use super::types::{ExtensionEntry, ScanErrorKind, SortKey, UsageReport};
use super::utils::format_size;
use super::volume::write_volume_info;

/// Ranks extension buckets by descending total. The stable sort runs over
/// the map's alphabetical order, so equal totals keep one fixed order from
/// run to run.
pub fn sorted_extensions(extension_totals: &BTreeMap<String, u64>) -> Vec<ExtensionEntry> {
    let mut entries: Vec<ExtensionEntry> = extension_totals
        .iter()
        .map(|(extension, total)| ExtensionEntry {
            extension: extension.clone(),
            total_bytes: *total,
        })
        .collect();
    entries.sort_by(|a, b| b.total_bytes.cmp(&a.total_bytes));
    entries
}

pub fn write_extension_usage(out: &mut dyn Write, entries: &[ExtensionEntry]) -> io::Result<()> {
    writeln!(out, "File Extension Usage (sorted by usage):")?;
    for entry in entries {
        let label = if entry.extension.is_empty() {
            "(no extension)"
        } else {
            entry.extension.as_str()
        };
        writeln!(out, "{}: {}", label, format_size(entry.total_bytes))?;
    }
    Ok(())
}

fn write_error_summary(out: &mut dyn Write, report: &UsageReport) -> io::Result<()> {
    if report.errors.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Error Summary:")?;

    let sections = [
        (ScanErrorKind::NotFound, "Missing entries:"),
        (ScanErrorKind::PermissionDenied, "Entries with restricted access:"),
        (ScanErrorKind::Other, "Other I/O failures:"),
    ];
    for (kind, heading) in sections {
        let mut matching = report.errors.iter().filter(|e| e.kind == kind).peekable();
        if matching.peek().is_none() {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "{}", heading)?;
        for error in matching {
            writeln!(out, "'{}' ({})", error.path.display(), error.message)?;
        }
    }
    Ok(())
}

/// Writes the complete report. The same bytes go to the console and to log
/// files, only the surrounding prompts differ.
pub fn write_report(
    out: &mut dyn Write,
    path: &Path,
    report: &UsageReport,
    sort: SortKey,
) -> io::Result<()> {
    writeln!(out, "=== Disk Usage Statistics ===")?;
    writeln!(out, "Generated: {}", Local::now().format(DATE_FORMAT))?;
    writeln!(out, "Path: {}", path.display())?;
    writeln!(out)?;

    write_volume_info(out, path)?;
    writeln!(out)?;

    writeln!(out, "Disk Usage Tree View:")?;
    write_tree(out, &report.root, report.total_bytes, sort)?;
    writeln!(out)?;

    write_extension_usage(out, &sorted_extensions(&report.extension_totals))?;
    write_error_summary(out, report)?;

    writeln!(out)?;
    writeln!(
        out,
        "Scanned {} files in {} directories.",
        report.file_count, report.dir_count
    )?;
    Ok(())
}
