//! Semantic model: binder and name resolution
//!
//! One [`SemanticModel`] is built per syntax tree and answers questions the
//! CST alone cannot: which declaration does a name refer to, what is an
//! expression's constant value, is a symbol referenced inside a scope. The
//! model holds red-tree nodes and is therefore bound to the thread that
//! created it; build one per document inside the worker that analyzes it.
//!
//! Binding runs in two passes. The declaration pass allocates a [`Symbol`]
//! for every class, enum, enum member, field, method, and parameter, and
//! folds enum member constant values in declaration order. The resolution
//! pass walks method bodies and initializers with a lexical scope stack and
//! records a `reference node -> SymbolId` edge for every name it can bind.
//! Unresolvable names are simply absent from the map; resolution never
//! fails loudly.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::PrismError;
use crate::result::Result;
use crate::syntax::ast::{
    AstNode, Block, ClassDecl, EnumDecl, ExprStmt, FieldDecl, IfStmt, LocalDecl,
    MemberAccessExpr, MethodDecl, ModifierList, NameRef, ReturnStmt, SourceFile, SwitchStmt,
};
use crate::syntax::{SyntaxKind, SyntaxNode};

use super::constant::{self, ConstantValue};
use super::flags::{FlagsMember, UnderlyingWidth};
use super::symbol::{Accessibility, Symbol, SymbolId, SymbolKind};
use super::well_known::WellKnownNames;

type Scope = HashMap<String, SymbolId>;

/// Bound semantic information for one syntax tree.
pub struct SemanticModel {
    root: SyntaxNode,
    symbols: Vec<Symbol>,
    /// Declaring node of each symbol, indexed by [`SymbolId`].
    decl_nodes: Vec<SyntaxNode>,
    decls: HashMap<SyntaxNode, SymbolId>,
    refs: HashMap<SyntaxNode, SymbolId>,
    enum_member_values: HashMap<SymbolId, i64>,
    enum_widths: HashMap<SymbolId, UnderlyingWidth>,
    /// Members of each enum in declaration order.
    enum_members: HashMap<SymbolId, Vec<SymbolId>>,
    well_known: WellKnownNames,
}

impl SemanticModel {
    /// Bind `root`, which must be a `SourceFile` node.
    pub fn new(root: &SyntaxNode) -> Self {
        let mut binder = Binder::default();
        binder.bind(root);
        debug!(
            symbols = binder.symbols.len(),
            references = binder.refs.len(),
            "bound semantic model"
        );
        SemanticModel {
            root: root.clone(),
            symbols: binder.symbols,
            decl_nodes: binder.decl_nodes,
            decls: binder.decls,
            refs: binder.refs,
            enum_member_values: binder.enum_member_values,
            enum_widths: binder.enum_widths,
            enum_members: binder.enum_members,
            well_known: binder.well_known,
        }
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    /// The node that declares `id`.
    pub fn decl_node(&self, id: SymbolId) -> Option<&SyntaxNode> {
        self.decl_nodes.get(id.0 as usize)
    }

    /// The symbol introduced by a declaration node, if `node` declares one.
    pub fn declared_symbol(&self, node: &SyntaxNode) -> Option<&Symbol> {
        self.decls.get(node).and_then(|id| self.symbol(*id))
    }

    /// Resolve a reference node (`NameRef` or `MemberAccessExpr`) to the
    /// symbol it names.
    pub fn resolve(&self, node: &SyntaxNode) -> Option<&Symbol> {
        self.resolve_id(node).and_then(|id| self.symbol(id))
    }

    pub fn resolve_id(&self, node: &SyntaxNode) -> Option<SymbolId> {
        self.refs.get(node).copied()
    }

    pub fn well_known(&self) -> &WellKnownNames {
        &self.well_known
    }

    /// Folded constant value of an enum member.
    pub fn enum_member_value(&self, id: SymbolId) -> Option<i64> {
        self.enum_member_values.get(&id).copied()
    }

    /// Declared underlying width of an enum (`i32` when unannotated).
    pub fn enum_width(&self, enum_id: SymbolId) -> Option<UnderlyingWidth> {
        self.enum_widths.get(&enum_id).copied()
    }

    /// Position of an enum member within its enum's declaration.
    pub fn member_decl_index(&self, member_id: SymbolId) -> Option<usize> {
        let enum_id = self.symbol(member_id)?.container?;
        self.enum_members
            .get(&enum_id)?
            .iter()
            .position(|id| *id == member_id)
    }

    /// Members of `enum_id` with known constant values, reduced to bit
    /// patterns at the enum's width, in declaration order.
    pub fn flags_members(&self, enum_id: SymbolId) -> Option<Vec<FlagsMember>> {
        let width = self.enum_width(enum_id)?;
        let members = self.enum_members.get(&enum_id)?;
        let flags = members
            .iter()
            .enumerate()
            .filter_map(|(decl_index, id)| {
                let value = self.enum_member_value(*id)?;
                Some(FlagsMember {
                    name: self.symbol(*id)?.name.clone(),
                    bits: width.bits_of(value),
                    decl_index,
                })
            })
            .collect();
        Some(flags)
    }

    /// Evaluate an expression to a compile-time constant. Enum members and
    /// constant-initialized static fields resolve through the model; cyclic
    /// field initializers fold to `None`.
    pub fn constant_value(&self, expr: &SyntaxNode) -> Option<ConstantValue> {
        let visited = RefCell::new(HashSet::new());
        self.eval_guarded(expr, &visited)
    }

    fn eval_guarded(
        &self,
        expr: &SyntaxNode,
        visited: &RefCell<HashSet<SymbolId>>,
    ) -> Option<ConstantValue> {
        constant::eval(expr, &|name_node: &SyntaxNode| {
            let id = self.resolve_id(name_node)?;
            if let Some(value) = self.enum_member_values.get(&id) {
                return Some(ConstantValue::Int(*value));
            }
            let symbol = self.symbol(id)?;
            if symbol.kind != SymbolKind::Field {
                return None;
            }
            if !visited.borrow_mut().insert(id) {
                return None;
            }
            let init = FieldDecl::cast(self.decl_node(id)?.clone())?
                .initializer()?
                .value()?;
            let value = self.eval_guarded(&init, visited);
            visited.borrow_mut().remove(&id);
            value
        })
    }

    /// Does `expr` fold to the default value of `type_text`?
    pub fn is_default_value(&self, type_text: &str, expr: &SyntaxNode) -> bool {
        self.constant_value(expr)
            .is_some_and(|v| v == constant::default_value_of_type(type_text))
    }

    /// Best-effort declared type of an expression, as type text.
    pub fn type_of(&self, expr: &SyntaxNode) -> Option<String> {
        match expr.kind() {
            SyntaxKind::Literal => match self.constant_value(expr)? {
                ConstantValue::Int(_) => Some("int".to_string()),
                ConstantValue::Bool(_) => Some("bool".to_string()),
                ConstantValue::Str(_) => Some("string".to_string()),
                ConstantValue::Null => None,
            },
            SyntaxKind::NameRef | SyntaxKind::MemberAccessExpr => {
                let symbol = self.resolve(expr)?;
                match symbol.kind {
                    SymbolKind::Class | SymbolKind::Enum => Some(symbol.name.clone()),
                    SymbolKind::EnumMember => {
                        let container = symbol.container?;
                        Some(self.symbol(container)?.name.clone())
                    }
                    _ => symbol.declared_type.clone(),
                }
            }
            SyntaxKind::ParenExpr => self.type_of(&crate::syntax::ast::ParenExpr::cast(
                expr.clone(),
            )?
            .inner()?),
            SyntaxKind::AssignExpr => {
                self.type_of(&crate::syntax::ast::AssignExpr::cast(expr.clone())?.lhs()?)
            }
            SyntaxKind::ObjectCreationExpr => {
                crate::syntax::ast::ObjectCreationExpr::cast(expr.clone())?
                    .ty()?
                    .text()
            }
            SyntaxKind::InvocationExpr => {
                self.type_of(&crate::syntax::ast::InvocationExpr::cast(expr.clone())?.callee()?)
            }
            SyntaxKind::PrefixUnaryExpr => {
                let unary = crate::syntax::ast::PrefixUnaryExpr::cast(expr.clone())?;
                match unary.op_token()?.kind() {
                    SyntaxKind::Bang => Some("bool".to_string()),
                    _ => self.type_of(&unary.operand()?),
                }
            }
            SyntaxKind::BinaryExpr => {
                let binary = crate::syntax::ast::BinaryExpr::cast(expr.clone())?;
                match binary.op_kind()? {
                    SyntaxKind::EqEq
                    | SyntaxKind::NotEq
                    | SyntaxKind::Lt
                    | SyntaxKind::Gt
                    | SyntaxKind::LtEq
                    | SyntaxKind::GtEq
                    | SyntaxKind::AmpAmp
                    | SyntaxKind::PipePipe => Some("bool".to_string()),
                    SyntaxKind::QuestionQuestion => binary
                        .lhs()
                        .and_then(|l| self.type_of(&l))
                        .or_else(|| self.type_of(&binary.rhs()?)),
                    _ => binary
                        .lhs()
                        .and_then(|l| self.type_of(&l))
                        .or_else(|| self.type_of(&binary.rhs()?)),
                }
            }
            _ => None,
        }
    }

    /// Is `id` referenced anywhere inside `scope`? Declarations do not
    /// count as references. Checks `token` periodically so large scans can
    /// be abandoned.
    pub fn is_referenced_in(
        &self,
        id: SymbolId,
        scope: &SyntaxNode,
        token: &CancellationToken,
    ) -> Result<bool> {
        for (visited, node) in scope.descendants().enumerate() {
            if visited % 256 == 0 && token.is_cancelled() {
                return Err(PrismError::Cancelled);
            }
            if self.refs.get(&node) == Some(&id) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl std::fmt::Debug for SemanticModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticModel")
            .field("symbols", &self.symbols.len())
            .field("references", &self.refs.len())
            .finish()
    }
}

// === binder ===============================================================

#[derive(Default)]
struct Binder {
    symbols: Vec<Symbol>,
    decl_nodes: Vec<SyntaxNode>,
    decls: HashMap<SyntaxNode, SymbolId>,
    refs: HashMap<SyntaxNode, SymbolId>,
    enum_member_values: HashMap<SymbolId, i64>,
    enum_widths: HashMap<SymbolId, UnderlyingWidth>,
    enum_members: HashMap<SymbolId, Vec<SymbolId>>,
    /// Name -> members, per type, for qualified-reference resolution.
    type_member_scopes: HashMap<SymbolId, Scope>,
    well_known: WellKnownNames,
}

impl Binder {
    fn bind(&mut self, root: &SyntaxNode) {
        let Some(file) = SourceFile::cast(root.clone()) else {
            return;
        };

        let mut type_scope = Scope::new();
        let mut classes = Vec::new();
        let mut enums = Vec::new();

        // Declaration pass. Top-level type names bind before any body so
        // forward references resolve.
        for class in file.classes() {
            if let Some(id) = self.declare_class(&class) {
                classes.push((class, id));
                if let Some(symbol) = self.symbols.get(id.0 as usize) {
                    type_scope.insert(symbol.name.clone(), id);
                }
            }
        }
        for decl in file.enums() {
            if let Some(id) = self.declare_enum(&decl, None) {
                enums.push((decl, id));
                if let Some(symbol) = self.symbols.get(id.0 as usize) {
                    type_scope.insert(symbol.name.clone(), id);
                }
            }
        }

        // Resolution pass.
        for (decl, id) in &enums {
            self.resolve_enum_initializers(decl, *id, &type_scope);
        }
        for (class, id) in &classes {
            self.resolve_class(class, *id, &type_scope);
        }
    }

    fn alloc(&mut self, symbol: Symbol, decl_node: &SyntaxNode) -> SymbolId {
        let id = symbol.id;
        self.symbols.push(symbol);
        self.decl_nodes.push(decl_node.clone());
        self.decls.insert(decl_node.clone(), id);
        id
    }

    fn next_id(&self) -> SymbolId {
        SymbolId(self.symbols.len() as u32)
    }

    fn declare_class(&mut self, class: &ClassDecl) -> Option<SymbolId> {
        let name = class.name()?;
        let (accessibility, is_static) = modifier_info(class.modifier_list());
        let class_id = self.alloc(
            Symbol {
                id: self.next_id(),
                name: name.clone(),
                kind: SymbolKind::Class,
                container: None,
                accessibility,
                is_static,
                declared_type: None,
                decl_range: class.text_range(),
            },
            class.syntax(),
        );
        self.well_known.insert(name.clone(), class_id);

        let mut members = Scope::new();
        for field in class.fields() {
            if let Some(id) = self.declare_field(&field, class_id, &name) {
                members.insert(self.symbols[id.0 as usize].name.clone(), id);
            }
        }
        for method in class.methods() {
            if let Some(id) = self.declare_method(&method, class_id, &name) {
                members.insert(self.symbols[id.0 as usize].name.clone(), id);
            }
        }
        for nested in class.enums() {
            if let Some(id) = self.declare_enum(&nested, Some(class_id)) {
                members.insert(self.symbols[id.0 as usize].name.clone(), id);
            }
        }
        self.type_member_scopes.insert(class_id, members);
        Some(class_id)
    }

    fn declare_field(
        &mut self,
        field: &FieldDecl,
        class_id: SymbolId,
        class_name: &str,
    ) -> Option<SymbolId> {
        let name = field.name()?;
        let (accessibility, is_static) = modifier_info(field.modifier_list());
        let id = self.alloc(
            Symbol {
                id: self.next_id(),
                name: name.clone(),
                kind: SymbolKind::Field,
                container: Some(class_id),
                accessibility,
                is_static,
                declared_type: field.ty().and_then(|t| t.text()),
                decl_range: field.text_range(),
            },
            field.syntax(),
        );
        self.well_known.insert(format!("{class_name}.{name}"), id);
        Some(id)
    }

    fn declare_method(
        &mut self,
        method: &MethodDecl,
        class_id: SymbolId,
        class_name: &str,
    ) -> Option<SymbolId> {
        let name = method.name()?;
        let (accessibility, is_static) = modifier_info(method.modifier_list());
        let method_id = self.alloc(
            Symbol {
                id: self.next_id(),
                name: name.clone(),
                kind: SymbolKind::Method,
                container: Some(class_id),
                accessibility,
                is_static,
                declared_type: method.return_type().and_then(|t| t.text()),
                decl_range: method.text_range(),
            },
            method.syntax(),
        );
        self.well_known
            .insert(format!("{class_name}.{name}"), method_id);

        if let Some(params) = method.param_list() {
            for param in params.params() {
                if let Some(param_name) = param.name() {
                    self.alloc(
                        Symbol {
                            id: self.next_id(),
                            name: param_name,
                            kind: SymbolKind::Param,
                            container: Some(method_id),
                            accessibility: None,
                            is_static: false,
                            declared_type: param.ty().and_then(|t| t.text()),
                            decl_range: param.text_range(),
                        },
                        param.syntax(),
                    );
                }
            }
        }
        Some(method_id)
    }

    fn declare_enum(&mut self, decl: &EnumDecl, container: Option<SymbolId>) -> Option<SymbolId> {
        let name = decl.name()?;
        let (accessibility, _) = modifier_info(decl.modifier_list());
        let enum_id = self.alloc(
            Symbol {
                id: self.next_id(),
                name: name.clone(),
                kind: SymbolKind::Enum,
                container,
                accessibility,
                is_static: false,
                declared_type: decl.underlying_type().and_then(|t| t.text()),
                decl_range: decl.text_range(),
            },
            decl.syntax(),
        );
        self.well_known.insert(name.clone(), enum_id);

        let width = decl
            .underlying_type()
            .and_then(|t| t.text())
            .and_then(|t| UnderlyingWidth::from_type_text(&t))
            .unwrap_or_default();
        self.enum_widths.insert(enum_id, width);

        // Members fold in declaration order; an implicit value continues
        // from the previous member, an unevaluable initializer makes every
        // following implicit value unknown too.
        let mut member_ids = Vec::new();
        let mut sibling_values: HashMap<String, i64> = HashMap::new();
        let mut next_auto: Option<i64> = Some(0);
        for member in decl.members() {
            let Some(member_name) = member.name() else {
                continue;
            };
            let id = self.alloc(
                Symbol {
                    id: self.next_id(),
                    name: member_name.clone(),
                    kind: SymbolKind::EnumMember,
                    container: Some(enum_id),
                    accessibility: None,
                    is_static: true,
                    declared_type: None,
                    decl_range: member.text_range(),
                },
                member.syntax(),
            );
            self.well_known.insert(format!("{name}.{member_name}"), id);
            member_ids.push(id);

            let value = match member.initializer().and_then(|eq| eq.value()) {
                Some(init) => constant::eval(&init, &|node| {
                    sibling_name(node)
                        .and_then(|n| sibling_values.get(&n))
                        .map(|v| ConstantValue::Int(*v))
                })
                .and_then(|v| v.as_int()),
                None => next_auto,
            };
            if let Some(value) = value {
                self.enum_member_values.insert(id, value);
                sibling_values.insert(member_name, value);
                next_auto = value.checked_add(1);
            } else {
                next_auto = None;
            }
        }

        let member_scope: Scope = member_ids
            .iter()
            .map(|id| (self.symbols[id.0 as usize].name.clone(), *id))
            .collect();
        self.type_member_scopes.insert(enum_id, member_scope);
        self.enum_members.insert(enum_id, member_ids);
        Some(enum_id)
    }

    fn resolve_enum_initializers(&mut self, decl: &EnumDecl, enum_id: SymbolId, types: &Scope) {
        let siblings = self.type_member_scopes[&enum_id].clone();
        let scopes = [types.clone(), siblings];
        for member in decl.members() {
            if let Some(init) = member.initializer().and_then(|eq| eq.value()) {
                self.resolve_expr(&init, &scopes);
            }
        }
    }

    fn resolve_class(&mut self, class: &ClassDecl, class_id: SymbolId, types: &Scope) {
        let members = self.type_member_scopes[&class_id].clone();
        let base = vec![types.clone(), members];

        for field in class.fields() {
            if let Some(init) = field.initializer().and_then(|eq| eq.value()) {
                self.resolve_expr(&init, &base);
            }
        }
        for method in class.methods() {
            self.resolve_method(&method, &base);
        }
    }

    fn resolve_method(&mut self, method: &MethodDecl, base: &[Scope]) {
        let mut scopes = base.to_vec();
        let mut params = Scope::new();
        if let Some(list) = method.param_list() {
            for param in list.params() {
                if let Some(id) = self.decls.get(param.syntax()) {
                    params.insert(self.symbols[id.0 as usize].name.clone(), *id);
                }
            }
        }
        scopes.push(params);

        if let Some(body) = method.body() {
            let method_id = self.decls.get(method.syntax()).copied();
            self.resolve_block(&body, &mut scopes, method_id);
        }
    }

    fn resolve_block(
        &mut self,
        block: &Block,
        scopes: &mut Vec<Scope>,
        method_id: Option<SymbolId>,
    ) {
        scopes.push(Scope::new());
        let statements: Vec<_> = block.statements().collect();
        for statement in statements {
            self.resolve_stmt(&statement, scopes, method_id);
        }
        scopes.pop();
    }

    fn resolve_stmt(
        &mut self,
        statement: &SyntaxNode,
        scopes: &mut Vec<Scope>,
        method_id: Option<SymbolId>,
    ) {
        match statement.kind() {
            SyntaxKind::LocalDecl => {
                let Some(local) = LocalDecl::cast(statement.clone()) else {
                    return;
                };
                // The initializer resolves before the local is in scope.
                if let Some(init) = local.initializer().and_then(|eq| eq.value()) {
                    self.resolve_expr(&init, scopes);
                }
                if let Some(name) = local.name() {
                    let id = self.alloc(
                        Symbol {
                            id: self.next_id(),
                            name: name.clone(),
                            kind: SymbolKind::Local,
                            container: method_id,
                            accessibility: None,
                            is_static: false,
                            declared_type: local.ty().and_then(|t| t.text()),
                            decl_range: local.text_range(),
                        },
                        local.syntax(),
                    );
                    if let Some(scope) = scopes.last_mut() {
                        scope.insert(name, id);
                    }
                }
            }
            SyntaxKind::Block => {
                if let Some(block) = Block::cast(statement.clone()) {
                    self.resolve_block(&block, scopes, method_id);
                }
            }
            SyntaxKind::IfStmt => {
                let Some(if_stmt) = IfStmt::cast(statement.clone()) else {
                    return;
                };
                if let Some(condition) = if_stmt.condition() {
                    self.resolve_expr(&condition, scopes);
                }
                if let Some(then) = if_stmt.then_branch() {
                    self.resolve_stmt(&then, scopes, method_id);
                }
                if let Some(body) = if_stmt.else_clause().and_then(|e| e.body()) {
                    self.resolve_stmt(&body, scopes, method_id);
                }
            }
            SyntaxKind::SwitchStmt => {
                let Some(switch) = SwitchStmt::cast(statement.clone()) else {
                    return;
                };
                if let Some(scrutinee) = switch.scrutinee() {
                    self.resolve_expr(&scrutinee, scopes);
                }
                for section in switch.sections() {
                    for label in section.labels() {
                        for expr in label.children().filter(|n| n.kind().is_expression()) {
                            self.resolve_expr(&expr, scopes);
                        }
                    }
                    scopes.push(Scope::new());
                    let statements: Vec<_> = section.statements().collect();
                    for nested in statements {
                        self.resolve_stmt(&nested, scopes, method_id);
                    }
                    scopes.pop();
                }
            }
            SyntaxKind::ReturnStmt => {
                if let Some(value) = ReturnStmt::cast(statement.clone()).and_then(|r| r.value()) {
                    self.resolve_expr(&value, scopes);
                }
            }
            SyntaxKind::ExprStmt => {
                if let Some(expr) = ExprStmt::cast(statement.clone()).and_then(|s| s.expr()) {
                    self.resolve_expr(&expr, scopes);
                }
            }
            _ => {}
        }
    }

    /// Record reference edges for every resolvable name inside `expr`.
    /// Scoping cannot change within an expression, so a flat preorder walk
    /// is enough.
    fn resolve_expr(&mut self, expr: &SyntaxNode, scopes: &[Scope]) {
        for node in expr.descendants() {
            match node.kind() {
                SyntaxKind::NameRef => {
                    let Some(text) = NameRef::cast(node.clone()).and_then(|n| n.text()) else {
                        continue;
                    };
                    if let Some(id) = lookup(scopes, &text) {
                        self.refs.insert(node, id);
                    }
                }
                SyntaxKind::MemberAccessExpr => {
                    // `Type.Member` resolves through the receiver type's
                    // member scope; instance receivers stay unresolved.
                    let Some(access) = MemberAccessExpr::cast(node.clone()) else {
                        continue;
                    };
                    let receiver_id = access
                        .receiver()
                        .and_then(|r| NameRef::cast(r))
                        .and_then(|n| n.text())
                        .and_then(|text| lookup(scopes, &text));
                    let Some(receiver_id) = receiver_id else {
                        continue;
                    };
                    if !self.symbols[receiver_id.0 as usize].is_type() {
                        continue;
                    }
                    let member_id = access.name().and_then(|name| {
                        self.type_member_scopes.get(&receiver_id)?.get(&name).copied()
                    });
                    if let Some(member_id) = member_id {
                        self.refs.insert(node, member_id);
                    }
                }
                _ => {}
            }
        }
    }
}

fn lookup(scopes: &[Scope], name: &str) -> Option<SymbolId> {
    scopes.iter().rev().find_map(|scope| scope.get(name)).copied()
}

/// Bare sibling-member name inside an enum initializer.
fn sibling_name(node: &SyntaxNode) -> Option<String> {
    NameRef::cast(node.clone()).and_then(|n| n.text())
}

fn modifier_info(list: Option<ModifierList>) -> (Option<Accessibility>, bool) {
    let Some(list) = list else {
        return (None, false);
    };
    let accessibility = list
        .access_modifier()
        .and_then(|t| Accessibility::from_keyword(t.text()));
    let is_static = list
        .modifiers()
        .any(|t| t.kind() == SyntaxKind::StaticKw);
    (accessibility, is_static)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse;

    fn model_of(source: &str) -> (SyntaxNode, SemanticModel) {
        let root = parse(source).root();
        let model = SemanticModel::new(&root);
        (root, model)
    }

    fn find_name_ref(root: &SyntaxNode, text: &str) -> SyntaxNode {
        root.descendants()
            .filter(|n| n.kind() == SyntaxKind::NameRef)
            .find(|n| n.text().to_string() == text)
            .expect("name reference not found")
    }

    #[test]
    fn declares_class_members_with_modifiers() {
        let (root, model) = model_of(
            "public class Widget { private static int count; void Run() { } }",
        );
        let field_node = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::FieldDecl)
            .unwrap();
        let field = model.declared_symbol(&field_node).unwrap();
        assert_eq!(field.name, "count");
        assert_eq!(field.kind, SymbolKind::Field);
        assert_eq!(field.accessibility, Some(Accessibility::Private));
        assert!(field.is_static);
        assert_eq!(field.declared_type.as_deref(), Some("int"));

        let class = model.symbol(field.container.unwrap()).unwrap();
        assert_eq!(class.name, "Widget");
        assert_eq!(class.accessibility, Some(Accessibility::Public));
    }

    #[test]
    fn local_shadows_field() {
        let (root, model) = model_of(
            "class C { int x; void M() { int x = 1; return x; } int N() { return x; } }",
        );
        let refs: Vec<_> = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::NameRef)
            .filter(|n| n.text().to_string() == "x")
            .collect();
        assert_eq!(refs.len(), 2);
        let in_m = model.resolve(&refs[0]).unwrap();
        let in_n = model.resolve(&refs[1]).unwrap();
        assert_eq!(in_m.kind, SymbolKind::Local);
        assert_eq!(in_n.kind, SymbolKind::Field);
        assert_ne!(in_m.id, in_n.id);
    }

    #[test]
    fn local_initializer_does_not_see_its_own_declaration() {
        let (root, model) = model_of("class C { int x; void M() { int x = x; } }");
        let init_ref = find_name_ref(&root, "x");
        // The first `x` NameRef in the body is the initializer.
        let symbol = model.resolve(&init_ref).unwrap();
        assert_eq!(symbol.kind, SymbolKind::Field);
    }

    #[test]
    fn params_resolve_in_body() {
        let (root, model) = model_of("class C { int M(int value) { return value; } }");
        let reference = find_name_ref(&root, "value");
        assert_eq!(model.resolve(&reference).unwrap().kind, SymbolKind::Param);
    }

    #[test]
    fn enum_values_fold_with_auto_increment() {
        let (_, model) = model_of("enum E : u8 { None = 0, A, B, AB = A | B, Big = 200 }");
        let e = model.well_known().resolve("E").unwrap();
        assert_eq!(model.enum_width(e), Some(UnderlyingWidth::U8));

        let value = |name: &str| {
            let id = model.well_known().resolve(&format!("E.{name}")).unwrap();
            model.enum_member_value(id)
        };
        assert_eq!(value("None"), Some(0));
        assert_eq!(value("A"), Some(1));
        assert_eq!(value("B"), Some(2));
        assert_eq!(value("AB"), Some(3));
        assert_eq!(value("Big"), Some(200));
    }

    #[test]
    fn qualified_enum_member_reference_resolves() {
        let (root, model) = model_of(
            "enum E { A = 1, B = 2 } class C { void M() { x = E.B; } }",
        );
        let access = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::MemberAccessExpr)
            .unwrap();
        let member = model.resolve(&access).unwrap();
        assert_eq!(member.name, "B");
        assert_eq!(member.kind, SymbolKind::EnumMember);
        assert_eq!(
            model.constant_value(&access),
            Some(ConstantValue::Int(2))
        );
    }

    #[test]
    fn constant_field_folds_through_reference() {
        let (root, model) = model_of(
            "class C { static int Limit = 8; void M() { x = Limit + 1; } }",
        );
        let binary = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::BinaryExpr)
            .unwrap();
        assert_eq!(model.constant_value(&binary), Some(ConstantValue::Int(9)));
    }

    #[test]
    fn cyclic_field_initializers_fold_to_none() {
        let (root, model) = model_of("class C { static int A = B; static int B = A; }");
        let reference = find_name_ref(&root, "B");
        assert_eq!(model.constant_value(&reference), None);
    }

    #[test]
    fn is_referenced_in_scans_scope() {
        let (root, model) = model_of(
            "class C { int x; void M() { x = 1; } void N() { int y = 0; } }",
        );
        let field_node = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::FieldDecl)
            .unwrap();
        let field = model.declared_symbol(&field_node).unwrap().id;
        let methods: Vec<_> = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::MethodDecl)
            .collect();

        let token = CancellationToken::new();
        assert!(model.is_referenced_in(field, &methods[0], &token).unwrap());
        assert!(!model.is_referenced_in(field, &methods[1], &token).unwrap());
    }

    #[test]
    fn cancelled_token_aborts_reference_scan() {
        let (root, model) = model_of("class C { int x; void M() { x = 1; } }");
        let field_node = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::FieldDecl)
            .unwrap();
        let field = model.declared_symbol(&field_node).unwrap().id;
        let token = CancellationToken::new();
        token.cancel();
        assert!(matches!(
            model.is_referenced_in(field, &root, &token),
            Err(PrismError::Cancelled)
        ));
    }

    #[test]
    fn type_of_common_shapes() {
        let (root, model) = model_of(
            "class Foo { } class C { Foo f; void M(int n) { f = new Foo(); x = n + 1; } }",
        );
        let creation = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::ObjectCreationExpr)
            .unwrap();
        assert_eq!(model.type_of(&creation).as_deref(), Some("Foo"));

        let reference = find_name_ref(&root, "f");
        assert_eq!(model.type_of(&reference).as_deref(), Some("Foo"));

        let binary = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::BinaryExpr)
            .unwrap();
        assert_eq!(model.type_of(&binary).as_deref(), Some("int"));
    }

    #[test]
    fn flags_members_in_declaration_order() {
        let (_, model) = model_of("enum E { A = 1, B = 2, C = 4, AB = 3 }");
        let e = model.well_known().resolve("E").unwrap();
        let members = model.flags_members(e).unwrap();
        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "AB"]);
        assert_eq!(members[3].bits, 3);
        assert_eq!(members[3].decl_index, 3);

        let ab = model.well_known().resolve("E.AB").unwrap();
        assert_eq!(model.member_decl_index(ab), Some(3));
    }

    #[test]
    fn default_value_checks() {
        let (root, model) = model_of("class C { void M() { x = 0; y = null; } }");
        let exprs: Vec<_> = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::Literal)
            .collect();
        assert!(model.is_default_value("int", &exprs[0]));
        assert!(!model.is_default_value("Widget", &exprs[0]));
        assert!(model.is_default_value("Widget", &exprs[1]));
        assert!(model.is_default_value("string", &exprs[1]));
    }
}
