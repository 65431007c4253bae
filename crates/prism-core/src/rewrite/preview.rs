//! Unified diff previews of rewrites
//!
//! Renders what a pending [`Rewritten`] would do to its document, for
//! display before the caller commits the new text.

use similar::{ChangeTag, TextDiff};

use super::Rewritten;
use crate::document::Document;

/// Output style for rewrite previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffStyle {
    /// Bare unified diff, suitable for files and pipes.
    Plain,
    /// ANSI-colored unified diff for terminal display.
    Colored,
}

/// Unified diff between a document and the result of rewriting it.
/// An unchanged document renders as the empty string.
pub fn render(document: &Document, rewritten: &Rewritten, style: DiffStyle) -> String {
    let name = document.path().display().to_string();
    let new_text = rewritten.root.text().to_string();
    let diff = TextDiff::from_lines(document.text(), &new_text);
    match style {
        DiffStyle::Plain => diff
            .unified_diff()
            .context_radius(3)
            .header(&name, &format!("{name} (rewritten)"))
            .to_string(),
        DiffStyle::Colored => colored(&diff, &name),
    }
}

fn colored(diff: &TextDiff<'_, '_, '_, str>, name: &str) -> String {
    let mut out = String::new();
    for (index, group) in diff.grouped_ops(3).iter().enumerate() {
        if group.is_empty() {
            continue;
        }
        if index == 0 {
            out.push_str(&format!("\x1b[1m--- {name}\x1b[0m\n"));
            out.push_str(&format!("\x1b[1m+++ {name} (rewritten)\x1b[0m\n"));
        } else {
            out.push('\n');
        }

        let first = &group[0];
        let last = group.last().unwrap_or(first);
        out.push_str(&format!(
            "\x1b[36m@@ -{},{} +{},{} @@\x1b[0m\n",
            first.old_range().start + 1,
            last.old_range().end - first.old_range().start,
            first.new_range().start + 1,
            last.new_range().end - first.new_range().start,
        ));

        for op in group {
            for change in diff.iter_changes(op) {
                match change.tag() {
                    ChangeTag::Delete => out.push_str(&format!("\x1b[31m-{change}\x1b[0m")),
                    ChangeTag::Insert => out.push_str(&format!("\x1b[32m+{change}\x1b[0m")),
                    ChangeTag::Equal => out.push_str(&format!(" {change}")),
                }
                if change.missing_newline() {
                    out.push('\n');
                }
            }
        }
    }
    out
}
