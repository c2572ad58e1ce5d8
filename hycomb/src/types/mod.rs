//! Types module
//!
//! Programs are typed over a tiny grammar: the unit type `1`, binary sums
//! `A + B` and binary products `A × B`. Every type lives in a [`TypeTable`],
//! an append-only, hash-consed table handing out dense [`TypeRef`] indices:
//!
//! - Structurally equal types always share one entry, so comparing two
//!   ground types is comparing two integers.
//! - An entry only references entries inserted before it, so the table is
//!   acyclic and can be walked bottom-up without recursion.
//!
//! Rendering follows the usual notation: `2` for `1 + 1` and `2^n` for
//! balanced products of bits (`2^8` is a byte, `2^256` a hash).
use std::{collections::HashMap, fmt::Write as _};

use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

pub mod decode;

/// Longest rendering of a type, in bytes, before it is cut short.
pub const RENDER_BUDGET: usize = 1 << 14;

/// A stable reference to a type stored inside a [`TypeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeRef(u32);

impl TypeRef {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One level of a type expression; children are references into the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeExpr {
    Unit,
    Sum(TypeRef, TypeRef),
    Product(TypeRef, TypeRef),
}

impl TypeExpr {
    /// Children in left-to-right order.
    pub fn children(&self) -> Option<(TypeRef, TypeRef)> {
        match *self {
            TypeExpr::Unit => None,
            TypeExpr::Sum(a, b) | TypeExpr::Product(a, b) => Some((a, b)),
        }
    }
}

/// The `source → target` signature of a node or program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Arrow {
    pub source: TypeRef,
    pub target: TypeRef,
}

impl Arrow {
    /// Build a formatting helper rendering `source → target`.
    pub fn fmt<'a>(&'a self, table: &'a TypeTable) -> impl std::fmt::Display + 'a {
        struct Fmt<'a> {
            arrow: &'a Arrow,
            table: &'a TypeTable,
        }

        impl std::fmt::Display for Fmt<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(
                    f,
                    "{} → {}",
                    self.table.fmt(self.arrow.source),
                    self.table.fmt(self.arrow.target)
                )
            }
        }

        Fmt { arrow: self, table }
    }
}

/// Append-only, deduplicating store of [`TypeExpr`] values.
///
/// ```rust
/// # use hycomb::types::{TypeExpr, TypeTable};
/// let mut table = TypeTable::new();
/// let unit = table.unit();
/// let bit = table.intern(TypeExpr::Sum(unit, unit));
/// assert_eq!(table.intern(TypeExpr::Sum(unit, unit)), bit);
/// assert_eq!(table.fmt(bit).to_string(), "2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTable {
    entries: Vec<TypeExpr>,
    // `Some(n)` when the entry is the word type 2^n with n >= 1
    word_exponent: Vec<Option<u32>>,
    lookup: HashMap<TypeExpr, TypeRef>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retrieve the expression stored under `r`.
    ///
    /// # Panics
    /// Panics if `r` was not produced by this table.
    #[inline]
    pub fn get(&self, r: TypeRef) -> TypeExpr {
        self.entries[r.index()]
    }

    /// Iterate over every entry in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeRef, TypeExpr)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (TypeRef(i as u32), *e))
    }

    /// Insert `expr` unless a structurally equal entry exists, and return its reference.
    pub fn intern(&mut self, expr: TypeExpr) -> TypeRef {
        if let Some(&existing) = self.lookup.get(&expr) {
            return existing;
        }

        if let Some((a, b)) = expr.children() {
            debug_assert!(
                a.index() < self.len() && b.index() < self.len(),
                "children must already be interned"
            );
        }

        let exponent = match expr {
            TypeExpr::Unit => None,
            TypeExpr::Sum(a, b) => {
                let unit_like = |r: TypeRef| self.entries[r.index()].is_unit();
                (unit_like(a) && unit_like(b)).then_some(1)
            }
            TypeExpr::Product(a, b) if a == b => {
                self.word_exponent[a.index()].and_then(|n| n.checked_mul(2))
            }
            TypeExpr::Product(..) => None,
        };

        let r = TypeRef(self.entries.len() as u32);
        trace!("interned type #{} = {:?}", r.index(), expr);
        self.entries.push(expr);
        self.word_exponent.push(exponent);
        self.lookup.insert(expr, r);
        r
    }

    pub fn unit(&mut self) -> TypeRef {
        self.intern(TypeExpr::Unit)
    }

    pub fn sum(&mut self, a: TypeRef, b: TypeRef) -> TypeRef {
        self.intern(TypeExpr::Sum(a, b))
    }

    pub fn product(&mut self, a: TypeRef, b: TypeRef) -> TypeRef {
        self.intern(TypeExpr::Product(a, b))
    }

    /// The word type `2^bits`.
    ///
    /// # Panics
    /// Panics if `bits` is not a power of two.
    pub fn word(&mut self, bits: u32) -> TypeRef {
        assert!(bits.is_power_of_two(), "word widths are powers of two");
        let unit = self.unit();
        let mut ty = self.sum(unit, unit);
        let mut width = 1;
        while width < bits {
            ty = self.product(ty, ty);
            width *= 2;
        }
        ty
    }

    /// `Some(n)` if `r` is the word type `2^n`.
    pub fn word_width(&self, r: TypeRef) -> Option<u32> {
        self.word_exponent[r.index()]
    }

    /// Render `r` into a string of at most [`RENDER_BUDGET`] bytes.
    pub fn render(&self, r: TypeRef) -> String {
        self.render_with_budget(r, RENDER_BUDGET)
    }

    /// Render `r`, cutting the text short with `…` once it reaches `budget`
    /// bytes. Iterative, so arbitrarily deep types are safe.
    ///
    /// Shared subtypes are spelled out at every use, so the full text of a
    /// type can be exponential in the size of the table.
    pub fn render_with_budget(&self, r: TypeRef, budget: usize) -> String {
        enum Frame {
            Visit(TypeRef),
            Text(&'static str),
        }

        let mut out = String::new();
        let mut stack = vec![Frame::Visit(r)];
        while let Some(frame) = stack.pop() {
            if out.len() >= budget {
                out.push('…');
                break;
            }
            match frame {
                Frame::Text(s) => out.push_str(s),
                Frame::Visit(r) => match (self.word_exponent[r.index()], self.get(r)) {
                    (Some(1), _) => out.push('2'),
                    (Some(n), _) => {
                        let _ = write!(out, "2^{n}");
                    }
                    (None, TypeExpr::Unit) => out.push('1'),
                    (None, TypeExpr::Sum(a, b)) => {
                        stack.extend([
                            Frame::Text(")"),
                            Frame::Visit(b),
                            Frame::Text(" + "),
                            Frame::Visit(a),
                            Frame::Text("("),
                        ]);
                    }
                    (None, TypeExpr::Product(a, b)) => {
                        stack.extend([
                            Frame::Text(")"),
                            Frame::Visit(b),
                            Frame::Text(" × "),
                            Frame::Visit(a),
                            Frame::Text("("),
                        ]);
                    }
                },
            }
        }
        out
    }

    /// Format a given [`TypeRef`] using this table.
    pub fn fmt(&self, r: TypeRef) -> impl std::fmt::Display + '_ {
        struct Fmt<'a> {
            table: &'a TypeTable,
            r: TypeRef,
        }

        impl std::fmt::Display for Fmt<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.r.index() >= self.table.len() {
                    return write!(f, "<unknown type #{}>", self.r.index());
                }
                f.write_str(&self.table.render(self.r))
            }
        }

        Fmt { table: self, r }
    }
}
