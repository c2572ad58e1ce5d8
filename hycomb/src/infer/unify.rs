//! Union-find over type variables.
//!
//! Every variable is either free, bound to one level of type structure, or
//! linked to another variable. Unification links representatives *before*
//! visiting their children, so it terminates even when the constraints are
//! cyclic; cycles are only reported when a solution is grounded.
use std::{
    collections::{HashMap, HashSet},
    fmt::Write as _,
};

use crate::types::{RENDER_BUDGET, TypeExpr, TypeRef, TypeTable};

/// Depth past which rendered types are elided.
const RENDER_DEPTH: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Var(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Unit,
    Sum(Var, Var),
    Product(Var, Var),
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Free,
    Bound(Shape),
    Link(Var),
}

/// Two representatives with incompatible shapes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Clash {
    pub left: Var,
    pub right: Var,
}

/// Why a variable has no ground type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unresolved {
    Free,
    Cyclic,
}

#[derive(Debug, Default)]
pub(crate) struct UnionFind {
    slots: Vec<Slot>,
    grounded: HashMap<Var, TypeRef>,
}

impl UnionFind {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn fresh(&mut self) -> Var {
        self.push(Slot::Free)
    }

    pub fn bound(&mut self, shape: Shape) -> Var {
        self.push(Slot::Bound(shape))
    }

    fn push(&mut self, slot: Slot) -> Var {
        let var = Var(self.slots.len() as u32);
        self.slots.push(slot);
        var
    }

    /// Representative of `var`, compressing the path behind it.
    pub fn find(&mut self, var: Var) -> Var {
        let mut root = var;
        while let Slot::Link(next) = self.slots[root.0 as usize] {
            root = next;
        }
        let mut current = var;
        while let Slot::Link(next) = self.slots[current.0 as usize] {
            self.slots[current.0 as usize] = Slot::Link(root);
            current = next;
        }
        root
    }

    pub fn shape(&mut self, var: Var) -> Option<Shape> {
        let root = self.find(var);
        match self.slots[root.0 as usize] {
            Slot::Bound(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn unify(&mut self, a: Var, b: Var) -> Result<(), Clash> {
        let mut pending = vec![(a, b)];
        while let Some((a, b)) = pending.pop() {
            let (a, b) = (self.find(a), self.find(b));
            if a == b {
                continue;
            }
            match (self.slots[a.0 as usize], self.slots[b.0 as usize]) {
                (Slot::Free, _) => self.slots[a.0 as usize] = Slot::Link(b),
                (_, Slot::Free) => self.slots[b.0 as usize] = Slot::Link(a),
                (Slot::Bound(x), Slot::Bound(y)) => {
                    match (x, y) {
                        (Shape::Unit, Shape::Unit) => {}
                        (Shape::Sum(a1, a2), Shape::Sum(b1, b2))
                        | (Shape::Product(a1, a2), Shape::Product(b1, b2)) => {
                            pending.push((a2, b2));
                            pending.push((a1, b1));
                        }
                        _ => return Err(Clash { left: a, right: b }),
                    }
                    self.slots[a.0 as usize] = Slot::Link(b);
                }
                (Slot::Link(_), _) | (_, Slot::Link(_)) => {
                    unreachable!("representatives are never links")
                }
            }
        }
        Ok(())
    }

    /// Render `var` with free variables shown as `?N`.
    ///
    /// Depth-limited, so cyclic solutions render finitely.
    pub fn render(&mut self, var: Var) -> String {
        enum Frame {
            Visit(Var, usize),
            Text(&'static str),
        }

        let mut out = String::new();
        let mut stack = vec![Frame::Visit(var, 0)];
        while let Some(frame) = stack.pop() {
            if out.len() >= RENDER_BUDGET {
                out.push('…');
                break;
            }
            let (var, depth) = match frame {
                Frame::Text(s) => {
                    out.push_str(s);
                    continue;
                }
                Frame::Visit(var, depth) => (var, depth),
            };
            if depth > RENDER_DEPTH {
                out.push('…');
                continue;
            }
            let root = self.find(var);
            let slot = self.slots[root.0 as usize];
            let (a, b, op) = match slot {
                Slot::Free => {
                    let _ = write!(out, "?{}", root.0);
                    continue;
                }
                Slot::Bound(Shape::Unit) => {
                    out.push('1');
                    continue;
                }
                Slot::Bound(Shape::Sum(a, b)) => {
                    if self.shape(a) == Some(Shape::Unit) && self.shape(b) == Some(Shape::Unit) {
                        out.push('2');
                        continue;
                    }
                    (a, b, " + ")
                }
                Slot::Bound(Shape::Product(a, b)) => (a, b, " × "),
                Slot::Link(_) => unreachable!("representatives are never links"),
            };
            stack.extend([
                Frame::Text(")"),
                Frame::Visit(b, depth + 1),
                Frame::Text(op),
                Frame::Visit(a, depth + 1),
                Frame::Text("("),
            ]);
        }
        out
    }

    /// Intern the solution of `var` into `table`.
    ///
    /// Results are memoized per representative, so grounding every node of a
    /// program stays linear in the size of the solution.
    pub fn ground(&mut self, var: Var, table: &mut TypeTable) -> Result<TypeRef, Unresolved> {
        enum Frame {
            Enter(Var),
            Exit(Var, Shape),
        }

        let mut on_path: HashSet<Var> = HashSet::new();
        let mut stack = vec![Frame::Enter(var)];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(var) => {
                    let root = self.find(var);
                    if self.grounded.contains_key(&root) {
                        continue;
                    }
                    if on_path.contains(&root) {
                        return Err(Unresolved::Cyclic);
                    }
                    let shape = match self.slots[root.0 as usize] {
                        Slot::Bound(shape) => shape,
                        _ => return Err(Unresolved::Free),
                    };
                    match shape {
                        Shape::Unit => {
                            self.grounded.insert(root, table.unit());
                        }
                        Shape::Sum(a, b) | Shape::Product(a, b) => {
                            on_path.insert(root);
                            stack.push(Frame::Exit(root, shape));
                            stack.push(Frame::Enter(b));
                            stack.push(Frame::Enter(a));
                        }
                    }
                }
                Frame::Exit(root, shape) => {
                    on_path.remove(&root);
                    let expr = match shape {
                        Shape::Sum(a, b) => TypeExpr::Sum(self.solved(a), self.solved(b)),
                        Shape::Product(a, b) => {
                            TypeExpr::Product(self.solved(a), self.solved(b))
                        }
                        Shape::Unit => TypeExpr::Unit,
                    };
                    self.grounded.insert(root, table.intern(expr));
                }
            }
        }
        let root = self.find(var);
        Ok(self.solved(root))
    }

    fn solved(&mut self, var: Var) -> TypeRef {
        let root = self.find(var);
        self.grounded[&root]
    }
}
