//! Flags-enum decomposition
//!
//! Rewrites like "expand composite enum constant into `A | B`" need to
//! express a value as a bit-OR of declared members. Decomposition is a
//! greedy high-to-low subtraction of declared member bit patterns from the
//! target value, masked to the enum's declared underlying integer width.
//! It succeeds only when the remainder reaches exactly zero.
//!
//! Rules:
//! - zero is never decomposed;
//! - the member whose value is being decomposed is excluded as a candidate
//!   for its own decomposition;
//! - ties among equal-valued declared members are broken by declaration
//!   order (first wins).

use serde::{Deserialize, Serialize};

/// Underlying integer width of an enum (8/16/32/64-bit, signed or not).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnderlyingWidth {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
}

impl UnderlyingWidth {
    /// Width from a type annotation; the default underlying type is `i32`.
    pub fn from_type_text(text: &str) -> Option<Self> {
        let width = match text {
            "u8" => UnderlyingWidth::U8,
            "u16" => UnderlyingWidth::U16,
            "u32" => UnderlyingWidth::U32,
            "u64" => UnderlyingWidth::U64,
            "i8" => UnderlyingWidth::I8,
            "i16" => UnderlyingWidth::I16,
            "i32" | "int" => UnderlyingWidth::I32,
            "i64" | "long" => UnderlyingWidth::I64,
            _ => return None,
        };
        Some(width)
    }

    /// Bit mask selecting the value bits of this width.
    pub fn mask(self) -> u64 {
        match self {
            UnderlyingWidth::U8 | UnderlyingWidth::I8 => 0xFF,
            UnderlyingWidth::U16 | UnderlyingWidth::I16 => 0xFFFF,
            UnderlyingWidth::U32 | UnderlyingWidth::I32 => 0xFFFF_FFFF,
            UnderlyingWidth::U64 | UnderlyingWidth::I64 => u64::MAX,
        }
    }

    /// Reinterpret a signed constant as the raw bit pattern at this width.
    pub fn bits_of(self, value: i64) -> u64 {
        (value as u64) & self.mask()
    }
}

impl Default for UnderlyingWidth {
    fn default() -> Self {
        UnderlyingWidth::I32
    }
}

/// One declared enum member, reduced to its bit pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagsMember {
    pub name: String,
    pub bits: u64,
    /// Position in the declaration, used for tie-breaking.
    pub decl_index: usize,
}

/// Decompose `value` into declared members whose bit-OR equals it exactly.
///
/// `exclude` names the declaration index of the member being decomposed,
/// which must not appear in its own decomposition. Returns indices into
/// `members` in the order the greedy pass selected them (descending bit
/// value), or `None` when no exact cover exists.
pub fn decompose(
    value: u64,
    width: UnderlyingWidth,
    members: &[FlagsMember],
    exclude: Option<usize>,
) -> Option<Vec<usize>> {
    let target = value & width.mask();
    if target == 0 {
        return None;
    }

    // Candidates sorted by bit value descending; declaration order wins ties.
    let mut candidates: Vec<usize> = (0..members.len())
        .filter(|&i| Some(members[i].decl_index) != exclude)
        .filter(|&i| members[i].bits != 0)
        .collect();
    candidates.sort_by(|&a, &b| {
        members[b]
            .bits
            .cmp(&members[a].bits)
            .then(members[a].decl_index.cmp(&members[b].decl_index))
    });

    let mut remainder = target;
    let mut selected = Vec::new();
    for index in candidates {
        let bits = members[index].bits & width.mask();
        if remainder & bits == bits {
            remainder &= !bits;
            selected.push(index);
            if remainder == 0 {
                break;
            }
        }
    }

    (remainder == 0).then_some(selected)
}
