//! Rowan language implementation for Prism
//!
//! Connects [`SyntaxKind`] to Rowan's generic CST infrastructure.

use rowan::Language;

use super::SyntaxKind;

/// Zero-sized `rowan::Language` implementation for the Prism source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrismLanguage;

impl Language for PrismLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < SyntaxKind::__Last as u16, "invalid syntax kind: {}", raw.0);
        // Safety: SyntaxKind is repr(u16), dense, and bounds-checked above.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

/// Red-tree node over a Prism green tree.
pub type SyntaxNode = rowan::SyntaxNode<PrismLanguage>;
/// Red-tree token.
pub type SyntaxToken = rowan::SyntaxToken<PrismLanguage>;
/// Node-or-token element.
pub type SyntaxElement = rowan::SyntaxElement<PrismLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<PrismLanguage>;
pub type SyntaxElementChildren = rowan::SyntaxElementChildren<PrismLanguage>;
