//! Constant-value evaluation
//!
//! Pure folding of constant expressions: literals, enum-member references
//! (resolved by the caller through a lookup closure), parentheses, unary
//! minus / logical not, and the usual integer/boolean binary operators.
//! Anything non-constant folds to `None`.

use crate::syntax::ast::{
    AstNode, BinaryExpr, Literal, ParenExpr, PrefixUnaryExpr,
};
use crate::syntax::{SyntaxKind, SyntaxNode};

/// A compile-time constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstantValue {
    Int(i64),
    Bool(bool),
    Str(String),
    Null,
}

impl ConstantValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConstantValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConstantValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

/// Evaluate `expr` to a constant, resolving name references through
/// `resolve_name` (the semantic model supplies enum-member and constant
/// field values there).
pub fn eval(
    expr: &SyntaxNode,
    resolve_name: &dyn Fn(&SyntaxNode) -> Option<ConstantValue>,
) -> Option<ConstantValue> {
    match expr.kind() {
        SyntaxKind::Literal => eval_literal(expr),
        SyntaxKind::ParenExpr => {
            let inner = ParenExpr::cast(expr.clone())?.inner()?;
            eval(&inner, resolve_name)
        }
        SyntaxKind::NameRef | SyntaxKind::MemberAccessExpr => resolve_name(expr),
        SyntaxKind::PrefixUnaryExpr => {
            let unary = PrefixUnaryExpr::cast(expr.clone())?;
            let operand = eval(&unary.operand()?, resolve_name)?;
            match (unary.op_token()?.kind(), operand) {
                (SyntaxKind::Minus, ConstantValue::Int(v)) => {
                    Some(ConstantValue::Int(v.checked_neg()?))
                }
                (SyntaxKind::Bang, ConstantValue::Bool(v)) => Some(ConstantValue::Bool(!v)),
                _ => None,
            }
        }
        SyntaxKind::BinaryExpr => {
            let binary = BinaryExpr::cast(expr.clone())?;
            let op = binary.op_kind()?;
            let lhs = eval(&binary.lhs()?, resolve_name)?;
            let rhs = eval(&binary.rhs()?, resolve_name)?;
            eval_binary(op, lhs, rhs)
        }
        _ => None,
    }
}

fn eval_literal(expr: &SyntaxNode) -> Option<ConstantValue> {
    let token = Literal::cast(expr.clone())?.token()?;
    let value = match token.kind() {
        SyntaxKind::IntLiteral => {
            let digits: String = token.text().chars().filter(|c| *c != '_').collect();
            ConstantValue::Int(digits.parse().ok()?)
        }
        SyntaxKind::TrueKw => ConstantValue::Bool(true),
        SyntaxKind::FalseKw => ConstantValue::Bool(false),
        SyntaxKind::NullKw => ConstantValue::Null,
        SyntaxKind::StringLiteral => {
            let text = token.text();
            let unquoted = text
                .strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
                .unwrap_or(text);
            ConstantValue::Str(unquoted.to_string())
        }
        _ => return None,
    };
    Some(value)
}

fn eval_binary(
    op: SyntaxKind,
    lhs: ConstantValue,
    rhs: ConstantValue,
) -> Option<ConstantValue> {
    use ConstantValue::{Bool, Int};

    let value = match (op, lhs, rhs) {
        (SyntaxKind::Plus, Int(a), Int(b)) => Int(a.checked_add(b)?),
        (SyntaxKind::Minus, Int(a), Int(b)) => Int(a.checked_sub(b)?),
        (SyntaxKind::Star, Int(a), Int(b)) => Int(a.checked_mul(b)?),
        (SyntaxKind::Slash, Int(a), Int(b)) => Int(a.checked_div(b)?),
        (SyntaxKind::Pipe, Int(a), Int(b)) => Int(a | b),
        (SyntaxKind::Amp, Int(a), Int(b)) => Int(a & b),
        (SyntaxKind::Caret, Int(a), Int(b)) => Int(a ^ b),
        (SyntaxKind::EqEq, a, b) => Bool(a == b),
        (SyntaxKind::NotEq, a, b) => Bool(a != b),
        (SyntaxKind::Lt, Int(a), Int(b)) => Bool(a < b),
        (SyntaxKind::Gt, Int(a), Int(b)) => Bool(a > b),
        (SyntaxKind::LtEq, Int(a), Int(b)) => Bool(a <= b),
        (SyntaxKind::GtEq, Int(a), Int(b)) => Bool(a >= b),
        (SyntaxKind::AmpAmp, Bool(a), Bool(b)) => Bool(a && b),
        (SyntaxKind::PipePipe, Bool(a), Bool(b)) => Bool(a || b),
        _ => return None,
    };
    Some(value)
}

/// The default value of a declared type: `0` for integer types, `false`
/// for `bool`, `null` for everything else (reference types).
pub fn default_value_of_type(type_text: &str) -> ConstantValue {
    match type_text {
        "int" | "long" | "u8" | "u16" | "u32" | "u64" | "i8" | "i16" | "i32" | "i64" => {
            ConstantValue::Int(0)
        }
        "bool" => ConstantValue::Bool(false),
        _ => ConstantValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse;

    fn eval_source_expr(expr_text: &str) -> Option<ConstantValue> {
        let source = format!("class C {{ void M() {{ x = {expr_text}; }} }}");
        let root = parse(&source).root();
        let assign = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::AssignExpr)
            .unwrap();
        let rhs = crate::syntax::ast::AssignExpr::cast(assign)
            .unwrap()
            .rhs()
            .unwrap();
        eval(&rhs, &|_| None)
    }

    #[test]
    fn folds_literals_and_arithmetic() {
        assert_eq!(eval_source_expr("42"), Some(ConstantValue::Int(42)));
        assert_eq!(eval_source_expr("1 + 2 * 3"), Some(ConstantValue::Int(7)));
        assert_eq!(eval_source_expr("(1 | 2) | 4"), Some(ConstantValue::Int(7)));
        assert_eq!(eval_source_expr("-5"), Some(ConstantValue::Int(-5)));
        assert_eq!(eval_source_expr("true"), Some(ConstantValue::Bool(true)));
        assert_eq!(eval_source_expr("!true"), Some(ConstantValue::Bool(false)));
        assert_eq!(eval_source_expr("null"), Some(ConstantValue::Null));
        assert_eq!(
            eval_source_expr("\"hi\""),
            Some(ConstantValue::Str("hi".into()))
        );
    }

    #[test]
    fn comparisons_and_logic() {
        assert_eq!(eval_source_expr("1 < 2"), Some(ConstantValue::Bool(true)));
        assert_eq!(
            eval_source_expr("1 == 1 && 2 != 3"),
            Some(ConstantValue::Bool(true))
        );
    }

    #[test]
    fn non_constant_folds_to_none() {
        assert_eq!(eval_source_expr("GetValue()"), None);
        assert_eq!(eval_source_expr("1 + GetValue()"), None);
        // Unresolved name with no resolver.
        assert_eq!(eval_source_expr("y"), None);
    }

    #[test]
    fn division_by_zero_is_not_constant() {
        assert_eq!(eval_source_expr("1 / 0"), None);
    }

    #[test]
    fn type_defaults() {
        assert_eq!(default_value_of_type("int"), ConstantValue::Int(0));
        assert_eq!(default_value_of_type("bool"), ConstantValue::Bool(false));
        assert_eq!(default_value_of_type("Widget"), ConstantValue::Null);
        assert_eq!(default_value_of_type("string"), ConstantValue::Null);
    }
}
