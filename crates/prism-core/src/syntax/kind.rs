//! Syntax kinds for the Prism source language
//!
//! One flat enum covers trivia, tokens, and composite nodes. The discriminant
//! is the raw `rowan::SyntaxKind` value, so the enum must stay dense and new
//! variants must be appended before `__Last`.

use serde::{Deserialize, Serialize};

/// Discriminated tag for every token and node in a Prism syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // Trivia
    Whitespace = 0,
    Newline,
    CommentLine,
    CommentBlock,
    /// A `#`-prefixed preprocessor directive line (`#if`, `#endif`, `#region`, ...).
    Directive,

    // Keywords
    ClassKw,
    EnumKw,
    IfKw,
    ElseKw,
    ReturnKw,
    SwitchKw,
    CaseKw,
    DefaultKw,
    BreakKw,
    NewKw,
    NullKw,
    TrueKw,
    FalseKw,
    VarKw,
    VoidKw,
    PublicKw,
    PrivateKw,
    InternalKw,
    ProtectedKw,
    StaticKw,

    // Punctuation and operators
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Question,
    QuestionQuestion,
    Eq,
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    AmpAmp,
    PipePipe,
    Amp,
    Pipe,
    Caret,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,

    // Literals and identifiers
    Ident,
    IntLiteral,
    StringLiteral,

    // Special tokens
    Error,
    Eof,

    // Composite nodes
    SourceFile,
    ClassDecl,
    EnumDecl,
    EnumMember,
    UnderlyingTypeClause,
    MethodDecl,
    FieldDecl,
    ModifierList,
    ParamList,
    Param,
    TypeRef,
    Block,
    LocalDecl,
    EqualsClause,
    ExprStmt,
    IfStmt,
    ElseClause,
    ReturnStmt,
    BreakStmt,
    SwitchStmt,
    SwitchSection,
    CaseLabel,
    DefaultLabel,
    BinaryExpr,
    PrefixUnaryExpr,
    AssignExpr,
    ParenExpr,
    InvocationExpr,
    MemberAccessExpr,
    ObjectCreationExpr,
    NameRef,
    Literal,
    ArgList,
    ErrorNode,

    // Must be last; used for raw-kind bounds checking only.
    #[doc(hidden)]
    __Last,
}

impl SyntaxKind {
    /// Whitespace, newlines, comments, and preprocessor directives.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::Newline
                | SyntaxKind::CommentLine
                | SyntaxKind::CommentBlock
                | SyntaxKind::Directive
        )
    }

    /// Trivia that carries no content worth preserving across list edits.
    pub fn is_whitespace_or_newline(self) -> bool {
        matches!(self, SyntaxKind::Whitespace | SyntaxKind::Newline)
    }

    pub fn is_newline(self) -> bool {
        self == SyntaxKind::Newline
    }

    pub fn is_comment(self) -> bool {
        matches!(self, SyntaxKind::CommentLine | SyntaxKind::CommentBlock)
    }

    /// Preprocessor directives block automatic rewriting of any span that
    /// contains them.
    pub fn is_directive(self) -> bool {
        self == SyntaxKind::Directive
    }

    pub fn is_keyword(self) -> bool {
        (self as u16) >= (SyntaxKind::ClassKw as u16)
            && (self as u16) <= (SyntaxKind::StaticKw as u16)
    }

    /// Access modifiers accepted in a `ModifierList`.
    pub fn is_access_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::PublicKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::InternalKw
                | SyntaxKind::ProtectedKw
        )
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::LocalDecl
                | SyntaxKind::ExprStmt
                | SyntaxKind::IfStmt
                | SyntaxKind::ReturnStmt
                | SyntaxKind::BreakStmt
                | SyntaxKind::SwitchStmt
                | SyntaxKind::Block
        )
    }

    pub fn is_expression(self) -> bool {
        matches!(
            self,
            SyntaxKind::BinaryExpr
                | SyntaxKind::PrefixUnaryExpr
                | SyntaxKind::AssignExpr
                | SyntaxKind::ParenExpr
                | SyntaxKind::InvocationExpr
                | SyntaxKind::MemberAccessExpr
                | SyntaxKind::ObjectCreationExpr
                | SyntaxKind::NameRef
                | SyntaxKind::Literal
        )
    }

    /// Keyword kind for an identifier, if the text is reserved.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "class" => SyntaxKind::ClassKw,
            "enum" => SyntaxKind::EnumKw,
            "if" => SyntaxKind::IfKw,
            "else" => SyntaxKind::ElseKw,
            "return" => SyntaxKind::ReturnKw,
            "switch" => SyntaxKind::SwitchKw,
            "case" => SyntaxKind::CaseKw,
            "default" => SyntaxKind::DefaultKw,
            "break" => SyntaxKind::BreakKw,
            "new" => SyntaxKind::NewKw,
            "null" => SyntaxKind::NullKw,
            "true" => SyntaxKind::TrueKw,
            "false" => SyntaxKind::FalseKw,
            "var" => SyntaxKind::VarKw,
            "void" => SyntaxKind::VoidKw,
            "public" => SyntaxKind::PublicKw,
            "private" => SyntaxKind::PrivateKw,
            "internal" => SyntaxKind::InternalKw,
            "protected" => SyntaxKind::ProtectedKw,
            "static" => SyntaxKind::StaticKw,
            _ => return None,
        };
        Some(kind)
    }

    /// Canonical source text for fixed-text tokens (keywords and punctuation).
    pub fn fixed_text(self) -> Option<&'static str> {
        let text = match self {
            SyntaxKind::ClassKw => "class",
            SyntaxKind::EnumKw => "enum",
            SyntaxKind::IfKw => "if",
            SyntaxKind::ElseKw => "else",
            SyntaxKind::ReturnKw => "return",
            SyntaxKind::SwitchKw => "switch",
            SyntaxKind::CaseKw => "case",
            SyntaxKind::DefaultKw => "default",
            SyntaxKind::BreakKw => "break",
            SyntaxKind::NewKw => "new",
            SyntaxKind::NullKw => "null",
            SyntaxKind::TrueKw => "true",
            SyntaxKind::FalseKw => "false",
            SyntaxKind::VarKw => "var",
            SyntaxKind::VoidKw => "void",
            SyntaxKind::PublicKw => "public",
            SyntaxKind::PrivateKw => "private",
            SyntaxKind::InternalKw => "internal",
            SyntaxKind::ProtectedKw => "protected",
            SyntaxKind::StaticKw => "static",
            SyntaxKind::LParen => "(",
            SyntaxKind::RParen => ")",
            SyntaxKind::LBrace => "{",
            SyntaxKind::RBrace => "}",
            SyntaxKind::LBracket => "[",
            SyntaxKind::RBracket => "]",
            SyntaxKind::Comma => ",",
            SyntaxKind::Semicolon => ";",
            SyntaxKind::Colon => ":",
            SyntaxKind::Dot => ".",
            SyntaxKind::Question => "?",
            SyntaxKind::QuestionQuestion => "??",
            SyntaxKind::Eq => "=",
            SyntaxKind::EqEq => "==",
            SyntaxKind::NotEq => "!=",
            SyntaxKind::Lt => "<",
            SyntaxKind::Gt => ">",
            SyntaxKind::LtEq => "<=",
            SyntaxKind::GtEq => ">=",
            SyntaxKind::AmpAmp => "&&",
            SyntaxKind::PipePipe => "||",
            SyntaxKind::Amp => "&",
            SyntaxKind::Pipe => "|",
            SyntaxKind::Caret => "^",
            SyntaxKind::Plus => "+",
            SyntaxKind::Minus => "-",
            SyntaxKind::Star => "*",
            SyntaxKind::Slash => "/",
            SyntaxKind::Bang => "!",
            _ => return None,
        };
        Some(text)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivia_classification() {
        assert!(SyntaxKind::Whitespace.is_trivia());
        assert!(SyntaxKind::Directive.is_trivia());
        assert!(SyntaxKind::Directive.is_directive());
        assert!(!SyntaxKind::Directive.is_whitespace_or_newline());
        assert!(SyntaxKind::CommentLine.is_comment());
        assert!(!SyntaxKind::Ident.is_trivia());
    }

    #[test]
    fn keyword_lookup_roundtrip() {
        for text in ["class", "if", "return", "switch", "public", "static"] {
            let kind = SyntaxKind::from_keyword(text).unwrap();
            assert!(kind.is_keyword());
            assert_eq!(kind.fixed_text(), Some(text));
        }
        assert_eq!(SyntaxKind::from_keyword("banana"), None);
    }
}
