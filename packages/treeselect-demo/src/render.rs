use treeselect_core::{Identity, Membership, Result, TreeIndex, TreePath, TreeView};

/// One text line per visible row: nodes under a collapsed ancestor are skipped.
pub fn render_rows<I: Identity>(view: &TreeView<I>, dragged: Option<&TreePath>) -> Result<Vec<String>> {
    let tree = view.tree();
    let mut lines = Vec::new();
    for (path, node) in tree.walk() {
        let visible = path
            .strict_prefixes()
            .all(|prefix| tree.node_at(&prefix).is_some_and(|n| n.expanded));
        if !visible {
            continue;
        }
        let row = view.row_state(&path, dragged)?;
        let marker = match row.membership {
            Membership::Selected => "[x]",
            Membership::Covered => "[~]",
            Membership::Unselected => "[ ]",
        };
        let toggle = match (node.has_children(), row.expanded) {
            (false, _) => ' ',
            (true, true) => '-',
            (true, false) => '+',
        };
        let mut line = format!(
            "{indent}{toggle} {marker} {title}",
            indent = "  ".repeat(path.depth() - 1),
            title = node.title
        );
        if row.is_editing {
            line.push_str(" (editing)");
        }
        if !row.can_drag {
            line.push_str(" (locked)");
        }
        if row.dragged_descendant {
            line.push_str(" (dimmed)");
        }
        if row.multiple_dragging {
            line.push_str("  <- multiple nodes are being dragged");
        }
        lines.push(line);
    }
    Ok(lines)
}
