//! The integrand expression tree.
//!
//! Trees are built once through the builder functions in this module and
//! never mutated afterwards. Subtraction has no node of its own: [`sub`]
//! produces `Add(a, Neg(b))` chains, and the renderer recovers the minus
//! sign syntactically.

use crate::arg::{Arg, FixedPoint, FreeVar};
use crate::name::PolyName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the verifier learns a polynomial's evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Committed to the polynomial commitment scheme; openings are checked there.
    Committed,
    /// Claimed by the prover and reduced by a later sumcheck.
    Derived,
    /// Evaluated directly by the verifier from public data.
    Computable,
}

impl Provenance {
    pub const ALL: [Provenance; 3] = [
        Provenance::Committed,
        Provenance::Derived,
        Provenance::Computable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::Committed => "committed",
            Provenance::Derived => "derived",
            Provenance::Computable => "computable",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provenance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "committed" | "cp" => Ok(Provenance::Committed),
            "derived" | "virtual" | "vp" => Ok(Provenance::Derived),
            "computable" | "verifier" | "vr" => Ok(Provenance::Computable),
            _ => Err(format!("unknown provenance: {s}")),
        }
    }
}

/// Value of a constant leaf: a literal integer or an opaque symbol (`γ`, `2^64`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constant {
    Int(i64),
    Symbol(String),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(n) => write!(f, "{n}"),
            Constant::Symbol(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Constant {
    fn from(n: i64) -> Self {
        Constant::Int(n)
    }
}

impl From<i32> for Constant {
    fn from(n: i32) -> Self {
        Constant::Int(i64::from(n))
    }
}

impl From<&str> for Constant {
    fn from(s: &str) -> Self {
        Constant::Symbol(s.to_string())
    }
}

/// Number of terms in a finite sum or product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanIn {
    Exact(u32),
    Symbolic(String),
}

impl FanIn {
    /// Inclusive upper index, `n-1`.
    pub fn upper_bound(&self) -> String {
        match self {
            FanIn::Exact(n) => (i64::from(*n) - 1).to_string(),
            FanIn::Symbolic(name) => format!("{name}-1"),
        }
    }
}

impl From<u32> for FanIn {
    fn from(n: u32) -> Self {
        FanIn::Exact(n)
    }
}

impl From<&str> for FanIn {
    fn from(name: &str) -> Self {
        FanIn::Symbolic(name.to_string())
    }
}

/// A named polynomial evaluated at an ordered argument list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Leaf {
    pub name: PolyName,
    pub args: Vec<Arg>,
}

impl Leaf {
    /// The fixed-point subset of the arguments, in order.
    pub fn fixed_points(&self) -> impl Iterator<Item = &FixedPoint> {
        self.args.iter().filter_map(Arg::as_fixed)
    }
}

/// Body of a symbolic finite sum or product over an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Aggregate {
    pub index: String,
    pub count: FanIn,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Const(Constant),
    Committed(Leaf),
    Derived(Leaf),
    Computable(Leaf),
    Add(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, u32),
    Neg(Box<Expr>),
    /// Sum over the boolean hypercube of one free variable.
    Sum { var: FreeVar, body: Box<Expr> },
    FiniteSum(Aggregate),
    FiniteProduct(Aggregate),
}

impl Expr {
    pub fn leaf(kind: Provenance, name: impl Into<PolyName>, args: Vec<Arg>) -> Expr {
        let leaf = Leaf {
            name: name.into(),
            args,
        };
        match kind {
            Provenance::Committed => Expr::Committed(leaf),
            Provenance::Derived => Expr::Derived(leaf),
            Provenance::Computable => Expr::Computable(leaf),
        }
    }

    pub fn as_leaf(&self) -> Option<(Provenance, &Leaf)> {
        match self {
            Expr::Committed(leaf) => Some((Provenance::Committed, leaf)),
            Expr::Derived(leaf) => Some((Provenance::Derived, leaf)),
            Expr::Computable(leaf) => Some((Provenance::Computable, leaf)),
            _ => None,
        }
    }

    /// True for nodes that bind looser than multiplication.
    pub fn is_additive(&self) -> bool {
        matches!(self, Expr::Add(..) | Expr::Neg(_))
    }

    /// Calls `f` on every polynomial leaf, left to right.
    pub fn visit_leaves<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(Provenance, &'a Leaf),
    {
        match self {
            Expr::Const(_) => {}
            Expr::Committed(leaf) => f(Provenance::Committed, leaf),
            Expr::Derived(leaf) => f(Provenance::Derived, leaf),
            Expr::Computable(leaf) => f(Provenance::Computable, leaf),
            Expr::Add(left, right) | Expr::Mul(left, right) => {
                left.visit_leaves(f);
                right.visit_leaves(f);
            }
            Expr::Pow(inner, _) | Expr::Neg(inner) => inner.visit_leaves(f),
            Expr::Sum { body, .. } => body.visit_leaves(f),
            Expr::FiniteSum(agg) | Expr::FiniteProduct(agg) => agg.body.visit_leaves(f),
        }
    }
}

/// Builds a `Vec<Arg>` from free variables and fixed points by reference.
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::Arg::from(&$arg)),*]
    };
}

pub fn int(n: i64) -> Expr {
    Expr::Const(Constant::Int(n))
}

pub fn symbol(s: &str) -> Expr {
    Expr::Const(Constant::Symbol(s.to_string()))
}

pub fn committed(name: impl Into<PolyName>, args: Vec<Arg>) -> Expr {
    Expr::leaf(Provenance::Committed, name, args)
}

pub fn derived(name: impl Into<PolyName>, args: Vec<Arg>) -> Expr {
    Expr::leaf(Provenance::Derived, name, args)
}

pub fn computable(name: impl Into<PolyName>, args: Vec<Arg>) -> Expr {
    Expr::leaf(Provenance::Computable, name, args)
}

/// The equality polynomial `eq(fixed, free)`.
pub fn eq(fixed: impl Into<Arg>, free: impl Into<Arg>) -> Expr {
    computable("eq", vec![fixed.into(), free.into()])
}

/// Left-folded sum `((a + b) + c) + ...`; the empty sum is `0`.
pub fn add(terms: impl IntoIterator<Item = Expr>) -> Expr {
    fold_left(terms, Expr::Add).unwrap_or_else(|| int(0))
}

/// Left-folded product; the empty product is `1`.
pub fn mul(factors: impl IntoIterator<Item = Expr>) -> Expr {
    fold_left(factors, Expr::Mul).unwrap_or_else(|| int(1))
}

/// `first - r1 - r2 - ...` as `Add(Add(first, Neg(r1)), Neg(r2))`.
pub fn sub(first: Expr, rest: impl IntoIterator<Item = Expr>) -> Expr {
    rest.into_iter().fold(first, |acc, term| {
        Expr::Add(Box::new(acc), Box::new(neg(term)))
    })
}

/// `coeff · expr`, collapsing the coefficients `1` and `-1`.
pub fn scale(coeff: impl Into<Constant>, expr: Expr) -> Expr {
    match coeff.into() {
        Constant::Int(1) => expr,
        Constant::Int(-1) => neg(expr),
        other => Expr::Mul(Box::new(Expr::Const(other)), Box::new(expr)),
    }
}

pub fn neg(expr: Expr) -> Expr {
    Expr::Neg(Box::new(expr))
}

pub fn pow(base: Expr, exponent: u32) -> Expr {
    Expr::Pow(Box::new(base), exponent)
}

pub fn hypercube_sum(var: &FreeVar, body: Expr) -> Expr {
    Expr::Sum {
        var: var.clone(),
        body: Box::new(body),
    }
}

pub fn finite_sum(index: &str, count: impl Into<FanIn>, body: Expr) -> Expr {
    Expr::FiniteSum(aggregate(index, count, body))
}

pub fn finite_product(index: &str, count: impl Into<FanIn>, body: Expr) -> Expr {
    Expr::FiniteProduct(aggregate(index, count, body))
}

fn aggregate(index: &str, count: impl Into<FanIn>, body: Expr) -> Aggregate {
    Aggregate {
        index: index.to_string(),
        count: count.into(),
        body: Box::new(body),
    }
}

fn fold_left(
    items: impl IntoIterator<Item = Expr>,
    node: fn(Box<Expr>, Box<Expr>) -> Expr,
) -> Option<Expr> {
    let mut items = items.into_iter();
    let first = items.next()?;
    Some(items.fold(first, |acc, item| node(Box::new(acc), Box::new(item))))
}
