//! Structural degree inference.
//!
//! Every named polynomial is multilinear in its own variables, so a leaf
//! contributes degree 1 per sumcheck round and the degree of a tree follows
//! from its shape alone.

use crate::expr::{Expr, FanIn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Worst-case per-round degree of `expr`, saturating at `u32::MAX`.
///
/// For a finite product with a symbolic fan-in this is the degree of a
/// single factor; the caller multiplies by the symbolic count.
pub fn degree(expr: &Expr) -> u32 {
    match expr {
        Expr::Const(_) => 0,
        Expr::Committed(_) | Expr::Derived(_) | Expr::Computable(_) => 1,
        Expr::Add(left, right) => degree(left).max(degree(right)),
        Expr::Mul(left, right) => degree(left).saturating_add(degree(right)),
        Expr::Pow(base, exponent) => exponent.saturating_mul(degree(base)),
        Expr::Neg(inner) => degree(inner),
        Expr::Sum { body, .. } => degree(body),
        Expr::FiniteSum(agg) => degree(&agg.body),
        Expr::FiniteProduct(agg) => match agg.count {
            FanIn::Exact(n) => n.saturating_mul(degree(&agg.body)),
            FanIn::Symbolic(_) => degree(&agg.body),
        },
    }
}

/// Degree an author wrote down for a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredDegree {
    Exact(u32),
    /// Depends on a system parameter (`d_bc + 1`).
    Symbolic(String),
}

impl fmt::Display for DeclaredDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredDegree::Exact(n) => write!(f, "{n}"),
            DeclaredDegree::Symbolic(s) => f.write_str(s),
        }
    }
}

impl From<u32> for DeclaredDegree {
    fn from(n: u32) -> Self {
        DeclaredDegree::Exact(n)
    }
}

impl From<&str> for DeclaredDegree {
    fn from(s: &str) -> Self {
        DeclaredDegree::Symbolic(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegreeStatus {
    Consistent,
    Mismatch,
    /// Declared degree is symbolic; nothing to compare against.
    Unchecked,
}

/// Declared versus inferred degree for one integrand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegreeCheck {
    pub spec: String,
    pub declared: DeclaredDegree,
    pub inferred: u32,
    pub status: DegreeStatus,
}

impl DegreeCheck {
    pub fn new(spec: impl Into<String>, declared: &DeclaredDegree, integrand: &Expr) -> Self {
        let inferred = degree(integrand);
        let status = match declared {
            DeclaredDegree::Exact(n) if *n == inferred => DegreeStatus::Consistent,
            DeclaredDegree::Exact(_) => DegreeStatus::Mismatch,
            DeclaredDegree::Symbolic(_) => DegreeStatus::Unchecked,
        };
        Self {
            spec: spec.into(),
            declared: declared.clone(),
            inferred,
            status,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        self.status == DegreeStatus::Mismatch
    }
}
