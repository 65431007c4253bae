//! Green-tree builder wrapper
//!
//! Thin layer over `rowan::GreenNodeBuilder` that keeps kind conversion in
//! one place and hands back red roots.

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, Language};

use super::{PrismLanguage, SyntaxKind, SyntaxNode};

/// Builder for Prism green trees.
#[derive(Default)]
pub struct TreeBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.inner.start_node(PrismLanguage::kind_to_raw(kind));
    }

    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    pub fn token(&mut self, kind: SyntaxKind, text: &str) {
        self.inner.token(PrismLanguage::kind_to_raw(kind), text);
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.inner.checkpoint()
    }

    /// Wrap everything built since `checkpoint` into a new `kind` node.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.inner
            .start_node_at(checkpoint, PrismLanguage::kind_to_raw(kind));
    }

    pub fn finish_green(self) -> GreenNode {
        self.inner.finish()
    }

    pub fn finish(self) -> SyntaxNode {
        SyntaxNode::new_root(self.finish_green())
    }
}
