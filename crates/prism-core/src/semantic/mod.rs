//! Semantic analysis: symbols, binding, constants, and flags arithmetic

pub mod constant;
pub mod flags;
pub mod model;
pub mod symbol;
pub mod well_known;

pub use constant::{ConstantValue, default_value_of_type};
pub use flags::{FlagsMember, UnderlyingWidth, decompose};
pub use model::SemanticModel;
pub use symbol::{Accessibility, Symbol, SymbolId, SymbolKind};
pub use well_known::WellKnownNames;
