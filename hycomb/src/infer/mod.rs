//! Type inference.
//!
//! Each node receives a source and a target variable. The typing rule of its
//! kind is applied exactly once, in ascending node order, so every parent of
//! a shared node constrains the same two variables: a node has one arrow,
//! whatever the number of its uses.
//!
//! | node              | arrow           | premises                                  |
//! |-------------------|-----------------|-------------------------------------------|
//! | `iden`            | `A → A`         |                                           |
//! | `unit`            | `A → 1`         |                                           |
//! | `injl t`          | `A → B + C`     | `t : A → B`                               |
//! | `injr t`          | `A → B + C`     | `t : A → C`                               |
//! | `take t`          | `A × B → C`     | `t : A → C`                               |
//! | `drop t`          | `A × B → C`     | `t : B → C`                               |
//! | `comp s t`        | `A → C`         | `s : A → B`, `t : B → C`                  |
//! | `case s t`        | `(A + B) × C → D` | `s : A × C → D`, `t : B × C → D`        |
//! | `pair s t`        | `A → B × C`     | `s : A → B`, `t : A → C`                  |
//! | `disconnect s t`  | `A → B × D`     | `s : 2^256 × A → B × C`, `t : C → D`      |
//! | `witness`         | declared        |                                           |
//! | `jet`             | from its descriptor |                                       |
//! | `fail`, `hidden`  | `A → B`         |                                           |
//!
//! Once every rule is applied, [`Inference::finish`] grounds all arrows into
//! the program's [`TypeTable`].
use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::{
    error::{DecodeError, DecodeResult},
    node::{ExprNode, NodeTable},
    types::{Arrow, TypeExpr, TypeRef, TypeTable},
};

mod unify;

use unify::{Clash, Shape, UnionFind, Unresolved, Var};

/// Inference state for one program; discarded once the arrows are known.
pub struct Inference<'a> {
    nodes: &'a NodeTable,
    vars: UnionFind,
    arrows: Vec<(Var, Var)>,
    // Variables already standing for a ground type of the table
    ground: HashMap<TypeRef, Var>,
}

impl<'a> Inference<'a> {
    /// Apply the typing rule of every node of `nodes`.
    ///
    /// Jet descriptors are interned into `types` on the way.
    pub fn new(nodes: &'a NodeTable, types: &mut TypeTable) -> DecodeResult<Self> {
        let mut this = Self {
            nodes,
            vars: UnionFind::new(),
            arrows: Vec::with_capacity(nodes.len()),
            ground: HashMap::new(),
        };
        for (id, node) in nodes.iter() {
            this.constrain(id.index(), node, types)?;
        }
        trace!("{} type variable(s) after constraints", this.vars.len());
        Ok(this)
    }

    fn constrain(
        &mut self,
        index: usize,
        node: &ExprNode,
        types: &mut TypeTable,
    ) -> DecodeResult<()> {
        let a = self.vars.fresh();
        let b = self.vars.fresh();
        self.arrows.push((a, b));

        match node {
            ExprNode::Iden => self.unify(index, a, b)?,
            ExprNode::Unit => {
                let unit = self.vars.bound(Shape::Unit);
                self.unify(index, b, unit)?;
            }
            ExprNode::InjL(t) | ExprNode::InjR(t) => {
                let (ta, tb) = self.arrows[t.index()];
                let other = self.vars.fresh();
                let sum = match node {
                    ExprNode::InjL(_) => Shape::Sum(tb, other),
                    _ => Shape::Sum(other, tb),
                };
                let sum = self.vars.bound(sum);
                self.unify(index, a, ta)?;
                self.unify(index, b, sum)?;
            }
            ExprNode::Take(t) => {
                let (ta, tb) = self.arrows[t.index()];
                let rest = self.vars.fresh();
                let product = self.vars.bound(Shape::Product(ta, rest));
                self.unify(index, a, product)?;
                self.unify(index, b, tb)?;
            }
            ExprNode::Drop(t) => {
                let (ta, tb) = self.arrows[t.index()];
                let rest = self.vars.fresh();
                let product = self.vars.bound(Shape::Product(rest, ta));
                self.unify(index, a, product)?;
                self.unify(index, b, tb)?;
            }
            ExprNode::Comp(s, t) => {
                let (sa, sb) = self.arrows[s.index()];
                let (ta, tb) = self.arrows[t.index()];
                self.unify(index, a, sa)?;
                self.unify(index, sb, ta)?;
                self.unify(index, b, tb)?;
            }
            ExprNode::Case(s, t) => {
                let (sa, sb) = self.arrows[s.index()];
                let (ta, tb) = self.arrows[t.index()];
                let (left, right, context) =
                    (self.vars.fresh(), self.vars.fresh(), self.vars.fresh());
                let s_input = self.vars.bound(Shape::Product(left, context));
                let t_input = self.vars.bound(Shape::Product(right, context));
                let sum = self.vars.bound(Shape::Sum(left, right));
                let input = self.vars.bound(Shape::Product(sum, context));
                self.unify(index, a, input)?;
                self.unify(index, sa, s_input)?;
                self.unify(index, ta, t_input)?;
                self.unify(index, b, sb)?;
                self.unify(index, b, tb)?;
            }
            ExprNode::Pair(s, t) => {
                let (sa, sb) = self.arrows[s.index()];
                let (ta, tb) = self.arrows[t.index()];
                let product = self.vars.bound(Shape::Product(sb, tb));
                self.unify(index, a, sa)?;
                self.unify(index, a, ta)?;
                self.unify(index, b, product)?;
            }
            ExprNode::Disconnect(s, t) => {
                let (sa, sb) = self.arrows[s.index()];
                let (ta, tb) = self.arrows[t.index()];
                let hash = types.word(256);
                let hash = self.instantiate(hash, types);
                let s_input = self.vars.bound(Shape::Product(hash, a));
                let (kept, passed) = (self.vars.fresh(), self.vars.fresh());
                let s_output = self.vars.bound(Shape::Product(kept, passed));
                let output = self.vars.bound(Shape::Product(kept, tb));
                self.unify(index, sa, s_input)?;
                self.unify(index, sb, s_output)?;
                self.unify(index, ta, passed)?;
                self.unify(index, b, output)?;
            }
            ExprNode::Witness(w) => {
                let (source, target) = (w.source, w.target);
                let source = self.instantiate(source, types);
                let target = self.instantiate(target, types);
                self.unify(index, a, source)?;
                self.unify(index, b, target)?;
            }
            ExprNode::Jet(entry) => {
                let arrow = entry.arrow(types);
                let source = self.instantiate(arrow.source, types);
                let target = self.instantiate(arrow.target, types);
                self.unify(index, a, source)?;
                self.unify(index, b, target)?;
            }
            ExprNode::Fail | ExprNode::Hidden(_) => {}
        }
        Ok(())
    }

    /// A variable bound to the ground type `r`, shared by every use of `r`.
    fn instantiate(&mut self, r: TypeRef, types: &TypeTable) -> Var {
        if let Some(&var) = self.ground.get(&r) {
            return var;
        }
        // Children precede their parents in the table, so an ascending sweep
        // over the missing entries never meets an unbuilt child.
        let mut missing = vec![r];
        let mut seen = HashSet::from([r]);
        let mut cursor = 0;
        while cursor < missing.len() {
            if let Some((x, y)) = types.get(missing[cursor]).children() {
                for child in [x, y] {
                    if !self.ground.contains_key(&child) && seen.insert(child) {
                        missing.push(child);
                    }
                }
            }
            cursor += 1;
        }
        missing.sort_unstable();
        for r in missing {
            let shape = match types.get(r) {
                TypeExpr::Unit => Shape::Unit,
                TypeExpr::Sum(x, y) => Shape::Sum(self.ground[&x], self.ground[&y]),
                TypeExpr::Product(x, y) => Shape::Product(self.ground[&x], self.ground[&y]),
            };
            let var = self.vars.bound(shape);
            self.ground.insert(r, var);
        }
        self.ground[&r]
    }

    fn unify(&mut self, node: usize, a: Var, b: Var) -> DecodeResult<()> {
        self.vars
            .unify(a, b)
            .map_err(|Clash { left, right }| DecodeError::TypeMismatch {
                node,
                left: self.vars.render(left),
                right: self.vars.render(right),
            })
    }

    /// Force the root of the program to `arrow`.
    #[cfg(test)]
    pub(crate) fn constrain_root(&mut self, arrow: Arrow, types: &TypeTable) -> DecodeResult<()> {
        let Some(&(a, b)) = self.arrows.last() else {
            return Ok(());
        };
        let node = self.arrows.len() - 1;
        let source = self.instantiate(arrow.source, types);
        let target = self.instantiate(arrow.target, types);
        self.unify(node, a, source)?;
        self.unify(node, b, target)
    }

    /// Ground the arrow of every node, in ascending order, into `types`.
    pub fn finish(mut self, types: &mut TypeTable) -> DecodeResult<Vec<Arrow>> {
        let hidden: Vec<bool> = self.nodes.iter().map(|(_, n)| n.is_hidden()).collect();
        let mut arrows = Vec::with_capacity(self.arrows.len());
        for (index, &(a, b)) in self.arrows.iter().enumerate() {
            let resolve = |vars: &mut UnionFind, var: Var, types: &mut TypeTable| {
                vars.ground(var, types).map_err(|reason| match reason {
                    Unresolved::Cyclic => DecodeError::InfiniteType { node: index },
                    Unresolved::Free => {
                        if hidden[index] {
                            DecodeError::UnrecognizedHiddenPruning { node: index }
                        } else {
                            DecodeError::UnboundTypeVariable { node: index }
                        }
                    }
                })
            };
            let source = resolve(&mut self.vars, a, types)?;
            let target = resolve(&mut self.vars, b, types)?;
            arrows.push(Arrow { source, target });
        }
        debug!(
            "inferred {} arrow(s) over {} distinct type(s)",
            arrows.len(),
            types.len()
        );
        Ok(arrows)
    }
}

/// Infer and ground the arrow of every node of `nodes`.
pub fn infer_arrows(nodes: &NodeTable, types: &mut TypeTable) -> DecodeResult<Vec<Arrow>> {
    Inference::new(nodes, types)?.finish(types)
}
