//! Parsed documents
//!
//! A [`Document`] owns the green tree and source text of one file. Both
//! are `Send`, so documents move freely across worker threads; the red
//! tree (and anything built on it, like a semantic model) is materialized
//! on demand inside whichever thread needs it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rowan::{GreenNode, TextRange};

use crate::diagnostics::Location;
use crate::syntax::{SyntaxKind, SyntaxNode, parse};

#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    text: Arc<str>,
    green: GreenNode,
    has_parse_errors: bool,
    parse_errors: Arc<[String]>,
}

impl Document {
    pub fn parse(path: impl Into<PathBuf>, text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let parsed = parse(&text);
        let parse_errors: Vec<String> = parsed
            .lex_errors()
            .iter()
            .map(|e| e.to_string())
            .chain(parsed.errors().iter().map(|e| e.to_string()))
            .collect();
        Self {
            path: path.into(),
            text,
            green: parsed.green(),
            has_parse_errors: !parse_errors.is_empty(),
            parse_errors: parse_errors.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn green(&self) -> GreenNode {
        self.green.clone()
    }

    pub fn has_parse_errors(&self) -> bool {
        self.has_parse_errors
    }

    pub fn parse_errors(&self) -> &[String] {
        &self.parse_errors
    }

    /// Fresh red root over this document's green tree. Each call builds a
    /// new one; red nodes from different calls compare equal structurally
    /// but are independent values.
    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Re-run the parser over this document's current text.
    pub fn reparse(&self) -> Self {
        Self::parse(self.path.clone(), self.text.clone())
    }

    /// New document over a rewritten tree, keeping the path.
    pub fn with_root(&self, root: &SyntaxNode) -> Self {
        let text: Arc<str> = root.text().to_string().into();
        Self {
            path: self.path.clone(),
            text,
            green: root.green().into_owned(),
            has_parse_errors: self.has_parse_errors,
            parse_errors: self.parse_errors.clone(),
        }
    }

    /// Find the node of `kind` occupying exactly `range`. This is how a
    /// rewrite target recorded as a range is resolved back to a node in
    /// the thread that applies it.
    pub fn find_node_at(&self, range: TextRange, kind: SyntaxKind) -> Option<SyntaxNode> {
        let root = self.root();
        if !root.text_range().contains_range(range) {
            return None;
        }
        let element = root.covering_element(range);
        let start = match element {
            rowan::NodeOrToken::Node(node) => node,
            rowan::NodeOrToken::Token(token) => token.parent()?,
        };
        start
            .ancestors()
            .take_while(|n| n.text_range().contains_range(range))
            .find(|n| n.text_range() == range && n.kind() == kind)
    }

    pub fn location(&self, range: TextRange) -> Location {
        Location::from_range(self.path.clone(), &self.text, range)
    }
}
