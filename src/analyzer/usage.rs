use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::types::{
    AnalyzerError, EntryKind, EntryNode, ScanError, UsageReport,
};
use super::utils::extension_of;

/// Walks `root` once and returns the materialized tree together with the
/// per-extension totals, the error list and the entry counts. Directory
/// symlinks are never followed, so cycles cannot occur.
pub fn aggregate(root: &Path) -> Result<UsageReport, AnalyzerError> {
    let meta = fs::metadata(root)?;
    if !meta.is_dir() {
        return Err(AnalyzerError::NotADirectory(root.display().to_string()));
    }

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let scan = scan_directory(root, name);

    Ok(UsageReport {
        total_bytes: scan.node.size,
        root: scan.node,
        extension_totals: scan.extension_totals,
        errors: scan.errors,
        file_count: scan.file_count,
        dir_count: scan.dir_count,
    })
}

// Accumulators carried up from one directory entry. Merging these is
// commutative and associative, so the parallel completion order cannot
// change the result.
struct EntryOutcome {
    node: Option<EntryNode>,
    extension_totals: BTreeMap<String, u64>,
    errors: Vec<ScanError>,
    file_count: u64,
    dir_count: u64,
}

impl EntryOutcome {
    fn skip() -> Self {
        EntryOutcome {
            node: None,
            extension_totals: BTreeMap::new(),
            errors: Vec::new(),
            file_count: 0,
            dir_count: 0,
        }
    }

    fn failed(path: &Path, err: &std::io::Error) -> Self {
        let mut outcome = EntryOutcome::skip();
        outcome.errors.push(ScanError::new(path, err));
        outcome
    }

    fn file(name: String, size: u64) -> Self {
        let mut extension_totals = BTreeMap::new();
        extension_totals.insert(extension_of(&name), size);
        EntryOutcome {
            node: Some(EntryNode {
                name,
                kind: EntryKind::File,
                size,
                children: Vec::new(),
                error: None,
            }),
            extension_totals,
            errors: Vec::new(),
            file_count: 1,
            dir_count: 0,
        }
    }
}

struct SubtreeScan {
    node: EntryNode,
    extension_totals: BTreeMap<String, u64>,
    errors: Vec<ScanError>,
    file_count: u64,
    dir_count: u64,
}

fn scan_directory(path: &Path, name: String) -> SubtreeScan {
    let mut scan = SubtreeScan {
        node: EntryNode {
            name,
            kind: EntryKind::Dir,
            size: 0,
            children: Vec::new(),
            error: None,
        },
        extension_totals: BTreeMap::new(),
        errors: Vec::new(),
        file_count: 0,
        dir_count: 1,
    };

    let reader = match fs::read_dir(path) {
        Ok(reader) => reader,
        Err(err) => {
            // the subtree stays in the tree as a zero-sized marker node
            scan.node.error = Some(err.to_string());
            scan.errors.push(ScanError::new(path, &err));
            return scan;
        }
    };

    let mut entries = Vec::new();
    for entry in reader {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(err) => scan.errors.push(ScanError::new(path, &err)),
        }
    }

    // one task per entry; the indexed collect keeps listing order, the
    // render pass applies the user-facing sort later
    let outcomes: Vec<EntryOutcome> = entries
        .into_par_iter()
        .map(|entry| scan_entry(&entry))
        .collect();

    for outcome in outcomes {
        if let Some(node) = outcome.node {
            scan.node.size += node.size;
            scan.node.children.push(node);
        }
        for (ext, bytes) in outcome.extension_totals {
            *scan.extension_totals.entry(ext).or_insert(0) += bytes;
        }
        scan.errors.extend(outcome.errors);
        scan.file_count += outcome.file_count;
        scan.dir_count += outcome.dir_count;
    }
    scan
}

fn scan_entry(entry: &fs::DirEntry) -> EntryOutcome {
    let path = entry.path();
    let name = entry.file_name().to_string_lossy().into_owned();

    let file_type = match entry.file_type() {
        Ok(file_type) => file_type,
        Err(err) => return EntryOutcome::failed(&path, &err),
    };

    if file_type.is_dir() {
        let sub = scan_directory(&path, name);
        return EntryOutcome {
            node: Some(sub.node),
            extension_totals: sub.extension_totals,
            errors: sub.errors,
            file_count: sub.file_count,
            dir_count: sub.dir_count,
        };
    }

    if file_type.is_file() {
        return match entry.metadata() {
            Ok(meta) => EntryOutcome::file(name, meta.len()),
            Err(err) => EntryOutcome::failed(&path, &err),
        };
    }

    if file_type.is_symlink() {
        // stat through the link; a dangling link is a recorded error and a
        // directory target is not descended into
        return match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => EntryOutcome::file(name, meta.len()),
            Ok(_) => EntryOutcome::skip(),
            Err(err) => EntryOutcome::failed(&path, &err),
        };
    }

    // sockets, fifos, devices
    EntryOutcome::skip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(path: &Path, bytes: usize) {
        let mut file = File::create(path).unwrap();
        file.write_all(&vec![0u8; bytes]).unwrap();
    }

    fn sample_tree() -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        write_file(&root.join("a.txt"), 100);
        write_file(&root.join("sub").join("b.txt"), 924);
        write_file(&root.join("sub").join("c.log"), 1000);
        (tmp, root)
    }

    #[test]
    fn directory_sizes_are_recursive_sums() {
        let (_tmp, root) = sample_tree();
        let report = aggregate(&root).unwrap();

        assert_eq!(report.total_bytes, 2024);
        assert_eq!(report.root.size, 2024);
        assert_eq!(report.file_count, 3);
        assert_eq!(report.dir_count, 2);
        assert!(report.errors.is_empty());

        let child_sum: u64 = report.root.children.iter().map(|c| c.size).sum();
        assert_eq!(report.root.size, child_sum);

        let sub = report
            .root
            .children
            .iter()
            .find(|c| c.name == "sub")
            .unwrap();
        assert!(sub.is_dir());
        assert_eq!(sub.size, 1924);
        assert_eq!(sub.children.len(), 2);
    }

    #[test]
    fn extension_totals_cover_every_scanned_byte() {
        let (_tmp, root) = sample_tree();
        write_file(&root.join("LICENSE"), 76);

        let report = aggregate(&root).unwrap();
        assert_eq!(report.extension_totals[".txt"], 1024);
        assert_eq!(report.extension_totals[".log"], 1000);
        assert_eq!(report.extension_totals[""], 76);

        let bucket_sum: u64 = report.extension_totals.values().sum();
        assert_eq!(bucket_sum, report.total_bytes);
    }

    #[test]
    fn empty_directory_reports_zero() {
        let tmp = TempDir::new().unwrap();
        let report = aggregate(tmp.path()).unwrap();
        assert_eq!(report.total_bytes, 0);
        assert_eq!(report.file_count, 0);
        assert_eq!(report.dir_count, 1);
        assert!(report.extension_totals.is_empty());
        assert!(report.root.children.is_empty());
    }

    #[test]
    fn a_file_root_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain.txt");
        write_file(&file, 10);
        let err = aggregate(&file).unwrap_err();
        assert!(matches!(err, AnalyzerError::NotADirectory(_)));
    }

    #[test]
    fn a_missing_root_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("never-created");
        let err = aggregate(&gone).unwrap_err();
        assert!(matches!(err, AnalyzerError::Io(_)));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_keeps_sibling_totals() {
        use crate::analyzer::types::ScanErrorKind;
        use std::os::unix::fs::PermissionsExt;

        // root bypasses directory permission bits entirely
        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::create_dir(root.join("open")).unwrap();
        fs::create_dir(root.join("locked")).unwrap();
        write_file(&root.join("open").join("a.txt"), 64);
        write_file(&root.join("locked").join("secret.bin"), 4096);
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o000)).unwrap();

        let report = aggregate(&root);
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755)).unwrap();
        let report = report.unwrap();

        assert_eq!(report.total_bytes, 64);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ScanErrorKind::PermissionDenied);
        assert!(report.errors[0].path.ends_with("locked"));

        let locked = report
            .root
            .children
            .iter()
            .find(|c| c.name == "locked")
            .unwrap();
        assert_eq!(locked.size, 0);
        assert!(locked.error.is_some());
        assert!(locked.children.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlinks_are_recorded_not_counted() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        write_file(&root.join("real.txt"), 50);
        symlink(root.join("missing-target"), root.join("broken")).unwrap();

        let report = aggregate(&root).unwrap();
        assert_eq!(report.total_bytes, 50);
        assert_eq!(report.file_count, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].path.ends_with("broken"));
    }

    #[cfg(unix)]
    #[test]
    fn directory_symlinks_are_not_followed() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::create_dir(root.join("data")).unwrap();
        write_file(&root.join("data").join("big.bin"), 2048);
        symlink(root.join("data"), root.join("alias")).unwrap();

        let report = aggregate(&root).unwrap();
        // the alias contributes nothing, so the data is counted once
        assert_eq!(report.total_bytes, 2048);
        assert_eq!(report.file_count, 1);
        assert_eq!(report.dir_count, 2);
        assert!(report.errors.is_empty());
    }
}
