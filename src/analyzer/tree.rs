use std::io::{self, Write};

use super::types::{EntryNode, SortKey};
use super::utils::{format_percent, format_size};

const TEE: &str = "├── ";
const ELBOW: &str = "└── ";
const PIPE: &str = "│   ";
const GAP: &str = "    ";

/// Renders the tree with box-drawing connectors. Every percentage is taken
/// against the scan's grand total, directories carry a trailing slash and an
/// unreadable directory gets an inline error line under its entry.
pub fn write_tree(
    out: &mut dyn Write,
    root: &EntryNode,
    total_bytes: u64,
    sort: SortKey,
) -> io::Result<()> {
    writeln!(
        out,
        "{} - {} ({})",
        display_name(root),
        format_size(root.size),
        format_percent(root.size, total_bytes)
    )?;
    if let Some(message) = &root.error {
        writeln!(out, "{}[error: {}]", ELBOW, message)?;
    }
    write_children(out, root, total_bytes, sort, "")
}

fn write_children(
    out: &mut dyn Write,
    parent: &EntryNode,
    total_bytes: u64,
    sort: SortKey,
    prefix: &str,
) -> io::Result<()> {
    let ordered = sorted_children(parent, sort);
    let last = ordered.len().saturating_sub(1);
    for (index, child) in ordered.iter().enumerate() {
        let connector = if index == last { ELBOW } else { TEE };
        writeln!(
            out,
            "{}{}{} - {} ({})",
            prefix,
            connector,
            display_name(child),
            format_size(child.size),
            format_percent(child.size, total_bytes)
        )?;
        let child_prefix = format!("{}{}", prefix, if index == last { GAP } else { PIPE });
        if let Some(message) = &child.error {
            writeln!(out, "{}{}[error: {}]", child_prefix, ELBOW, message)?;
        }
        write_children(out, child, total_bytes, sort, &child_prefix)?;
    }
    Ok(())
}

// Name: case-insensitive ascending, raw name as the tie break so equal
// folds still land in one fixed order. Size: descending, names break ties.
fn sorted_children(parent: &EntryNode, sort: SortKey) -> Vec<&EntryNode> {
    let mut children: Vec<&EntryNode> = parent.children.iter().collect();
    match sort {
        SortKey::Name => children.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        }),
        SortKey::Size => {
            children.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)))
        }
    }
    children
}

fn display_name(node: &EntryNode) -> String {
    if node.is_dir() {
        format!("{}/", node.name)
    } else {
        node.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::types::EntryKind;

    fn file(name: &str, size: u64) -> EntryNode {
        EntryNode {
            name: name.to_string(),
            kind: EntryKind::File,
            size,
            children: Vec::new(),
            error: None,
        }
    }

    fn dir(name: &str, children: Vec<EntryNode>) -> EntryNode {
        let size = children.iter().map(|c| c.size).sum();
        EntryNode {
            name: name.to_string(),
            kind: EntryKind::Dir,
            size,
            children,
            error: None,
        }
    }

    fn render(root: &EntryNode, total: u64, sort: SortKey) -> String {
        let mut buf = Vec::new();
        write_tree(&mut buf, root, total, sort).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn known_tree_renders_with_connectors_and_percentages() {
        let root = dir(
            "root",
            vec![
                file("a.txt", 100),
                dir("sub", vec![file("b.txt", 924), file("c.log", 1000)]),
            ],
        );
        let expected = "\
root/ - 1.98 KB (100.00%)
├── a.txt - 100.00 B (4.94%)
└── sub/ - 1.88 KB (95.06%)
    ├── b.txt - 924.00 B (45.65%)
    └── c.log - 1000.00 B (49.41%)
";
        assert_eq!(render(&root, 2024, SortKey::Name), expected);
    }

    #[test]
    fn middle_children_use_tee_and_pipe_prefixes() {
        let root = dir(
            "top",
            vec![
                dir("inner", vec![file("x", 1), file("y", 2)]),
                file("z", 3),
            ],
        );
        let text = render(&root, 6, SortKey::Name);
        assert!(text.contains("├── inner/"));
        assert!(text.contains("│   ├── x"));
        assert!(text.contains("│   └── y"));
        assert!(text.contains("└── z"));
    }

    #[test]
    fn name_sort_folds_case_and_interleaves() {
        let root = dir(
            "r",
            vec![file("delta", 1), file("Alpha", 1), file("beta", 1)],
        );
        let text = render(&root, 3, SortKey::Name);
        let alpha = text.find("Alpha").unwrap();
        let beta = text.find("beta").unwrap();
        let delta = text.find("delta").unwrap();
        assert!(alpha < beta && beta < delta);
    }

    #[test]
    fn size_sort_is_descending_with_name_tie_break() {
        let root = dir(
            "r",
            vec![file("small", 10), file("big", 300), file("apple", 10)],
        );
        let text = render(&root, 320, SortKey::Size);
        let big = text.find("big").unwrap();
        let apple = text.find("apple").unwrap();
        let small = text.find("small").unwrap();
        assert!(big < apple && apple < small);
    }

    #[test]
    fn an_empty_total_renders_zero_percent() {
        let root = dir("empty", vec![]);
        assert_eq!(render(&root, 0, SortKey::Name), "empty/ - 0.00 B (0.00%)\n");
    }

    #[test]
    fn unreadable_directories_get_an_inline_error_line() {
        let mut locked = dir("locked", vec![]);
        locked.error = Some("permission denied".to_string());
        let root = dir("r", vec![locked, file("wide.txt", 5)]);
        let text = render(&root, 5, SortKey::Name);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "├── locked/ - 0.00 B (0.00%)");
        assert_eq!(lines[2], "│   └── [error: permission denied]");
        // sibling rendering continues past the failure
        assert_eq!(lines[3], "└── wide.txt - 5.00 B (100.00%)");
    }

    #[test]
    fn a_nameless_root_renders_as_a_bare_slash() {
        let root = dir("", vec![]);
        assert!(render(&root, 0, SortKey::Name).starts_with("/ - "));
    }
}
