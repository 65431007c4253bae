//! Pattern matchers (syntax info extractors)
//!
//! A library of structural recognizers that decompose ambiguous syntactic
//! shapes into canonical info records. Each matcher is a pure, total
//! function: given a node, it either returns an info struct whose fields
//! reference sub-nodes of the original tree (no copying), or `None`.
//! Malformed shapes are "not a match", never an error.
//!
//! Complex matchers are built by composing simpler ones, and each is
//! independently testable.

mod assignment;
mod invocation;
mod lazy_init;
mod local_decl;
mod null_check;
mod switch_section;

pub use assignment::SimpleAssignmentInfo;
pub use invocation::MemberInvocationInfo;
pub use lazy_init::LazyInitInfo;
pub use local_decl::SingleLocalDeclInfo;
pub use null_check::{NullCheckInfo, NullCheckPolarity};
pub use switch_section::{SwitchSectionInfo, sections_equivalent};
