//! Arguments a polynomial is evaluated at.
//!
//! Every polynomial lives on a product of boolean hypercubes, one factor per
//! [`Dim`]. An evaluation supplies one [`Arg`] per factor: either a free
//! variable still being summed over, or a fixed point pinned by the
//! challenges of an earlier stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of one hypercube factor, literal or symbolic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainSize {
    Count(u64),
    Symbol(String),
}

impl DomainSize {
    /// Number of boolean variables spanning the factor.
    ///
    /// Literal powers of two collapse to a number (`2` gives `1`); anything
    /// else is kept symbolic as `log2(size)`.
    pub fn log_size(&self) -> String {
        match self {
            DomainSize::Count(n) if n.is_power_of_two() => n.trailing_zeros().to_string(),
            DomainSize::Count(n) => format!("log2({n})"),
            DomainSize::Symbol(name) => format!("log2({name})"),
        }
    }
}

impl fmt::Display for DomainSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainSize::Count(n) => write!(f, "{n}"),
            DomainSize::Symbol(name) => f.write_str(name),
        }
    }
}

impl From<&str> for DomainSize {
    fn from(raw: &str) -> Self {
        match raw.parse::<u64>() {
            Ok(n) => DomainSize::Count(n),
            Err(_) => DomainSize::Symbol(raw.to_string()),
        }
    }
}

/// One factor of a polynomial's hypercube domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dim {
    pub size: DomainSize,
    /// Short symbol used when naming fixed points (`cycle`, `K_ram`).
    pub label: String,
    pub description: String,
}

impl Dim {
    pub fn new(
        size: impl Into<DomainSize>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            size: size.into(),
            label: label.into(),
            description: description.into(),
        }
    }
}

/// A variable summed over the hypercube during the current stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FreeVar {
    pub name: String,
    pub dim: Dim,
}

impl FreeVar {
    pub fn new(name: impl Into<String>, dim: Dim) -> Self {
        Self {
            name: name.into(),
            dim,
        }
    }

    pub fn log_size(&self) -> String {
        self.dim.size.log_size()
    }
}

/// A point fixed by the challenges of stage `stage`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedPoint {
    pub stage: u32,
    pub dim: Dim,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FixedPoint {
    pub fn new(stage: u32, dim: Dim) -> Self {
        Self {
            stage,
            dim,
            label: None,
        }
    }

    /// A fixed point whose printed label differs from its dimension label,
    /// e.g. one address chunk `K_instr^(i)` out of a split address space.
    pub fn labeled(stage: u32, dim: Dim, label: impl Into<String>) -> Self {
        Self {
            stage,
            dim,
            label: Some(label.into()),
        }
    }

    pub fn print_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.dim.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arg {
    Free(FreeVar),
    Fixed(FixedPoint),
}

impl Arg {
    pub fn as_fixed(&self) -> Option<&FixedPoint> {
        match self {
            Arg::Fixed(point) => Some(point),
            Arg::Free(_) => None,
        }
    }
}

impl From<FreeVar> for Arg {
    fn from(var: FreeVar) -> Self {
        Arg::Free(var)
    }
}

impl From<&FreeVar> for Arg {
    fn from(var: &FreeVar) -> Self {
        Arg::Free(var.clone())
    }
}

impl From<FixedPoint> for Arg {
    fn from(point: FixedPoint) -> Self {
        Arg::Fixed(point)
    }
}

impl From<&FixedPoint> for Arg {
    fn from(point: &FixedPoint) -> Self {
        Arg::Fixed(point.clone())
    }
}
