//! Stage specifications: expression trees plus protocol metadata.
//!
//! Three shapes occur. A [`SumcheckSpec`] has one integrand. A
//! [`SpartanSpec`] proves `Az · Bz = 0` over a table of constraint rows
//! grouped by a binary selector. A [`ProductVirtSpec`] proves
//! `output = left · right` for a table of product rows. [`StageSpec`] wraps
//! all three so the tracker and printers can treat them uniformly.

use crate::arg::{Arg, FixedPoint, FreeVar};
use crate::degree::{DeclaredDegree, DegreeCheck};
use crate::expr::{Expr, mul};
use crate::format::{Format, render};
use crate::name::PolyName;
use crate::text::TextFormat;
use serde::Serialize;

/// A claim a specification leaves behind: `name` evaluated at `point`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducedClaim {
    pub name: PolyName,
    pub point: Vec<Arg>,
    /// Range clause for family claims, e.g. `i=0..d_v-1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantifier: Option<String>,
}

impl ProducedClaim {
    pub fn new(name: impl Into<PolyName>, point: Vec<Arg>) -> Self {
        Self {
            name: name.into(),
            point,
            quantifier: None,
        }
    }

    pub fn for_each(mut self, clause: impl Into<String>) -> Self {
        self.quantifier = Some(clause.into());
        self
    }

    /// `name(point)` in plain text, with the range clause appended.
    pub fn to_text(&self) -> String {
        let point: Vec<String> = self.point.iter().map(|a| TextFormat.arg(a)).collect();
        let mut out = format!("{}({})", self.name, point.join(", "));
        if let Some(clause) = &self.quantifier {
            out.push_str(" for ");
            out.push_str(clause);
        }
        out
    }
}

/// `Σ_{sum_vars} integrand = input_claim`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SumcheckSpec {
    pub name: String,
    pub sum_vars: Vec<FreeVar>,
    pub integrand: Expr,
    pub input_claim: Expr,
    /// Fresh point bound by this stage's challenges, one per summed variable.
    pub opening_point: Vec<FixedPoint>,
    pub rounds: String,
    pub degree: DeclaredDegree,
    pub produces: Vec<ProducedClaim>,
}

impl SumcheckSpec {
    pub fn degree_check(&self) -> DegreeCheck {
        DegreeCheck::new(&self.name, &self.degree, &self.integrand)
    }
}

/// One row of the constraint table: if `az` is on, `bz` must vanish.
#[derive(Debug, Clone, Serialize)]
pub struct Constraint {
    pub label: String,
    pub az: Expr,
    pub bz: Expr,
}

impl Constraint {
    pub fn new(label: &str, az: Expr, bz: Expr) -> Self {
        Self {
            label: label.to_string(),
            az,
            bz,
        }
    }

    /// `az · bz` as one tree, so printers group additive factors.
    pub fn product(&self) -> Expr {
        mul([self.az.clone(), self.bz.clone()])
    }
}

/// Batched constraint satisfaction:
/// `eq((τ_t, τ_b), (X_t, X_b)) · L_{τ_c}(X_c) · Az · Bz`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpartanSpec {
    pub name: String,
    pub cycle_var: FreeVar,
    pub group_var: FreeVar,
    /// Non-hypercube domain of the constraint index `X_c`.
    pub constraint_domain: Vec<i64>,
    /// `groups[b][i]` is the constraint at `constraint_domain[i]` in group `b`.
    pub groups: Vec<Vec<Constraint>>,
    pub input_claim: Expr,
    pub produces: Vec<ProducedClaim>,
}

impl SpartanSpec {
    pub fn num_constraints(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn rounds(&self) -> String {
        format!(
            "{} + 1 + {}",
            self.cycle_var.log_size(),
            self.constraint_domain.len()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductConstraint {
    pub label: String,
    pub left: Expr,
    pub right: Expr,
    pub output: Expr,
}

impl ProductConstraint {
    pub fn new(label: &str, left: Expr, right: Expr, output: Expr) -> Self {
        Self {
            label: label.to_string(),
            left,
            right,
            output,
        }
    }

    /// `left · right` as one tree.
    pub fn product(&self) -> Expr {
        mul([self.left.clone(), self.right.clone()])
    }
}

/// `eq(r_cycle, X_t) · L(τ_c, X_c) · Left(X_t, X_c) · Right(X_t, X_c)`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVirtSpec {
    pub name: String,
    pub cycle_var: FreeVar,
    pub constraint_domain: Vec<i64>,
    pub constraints: Vec<ProductConstraint>,
    /// When absent, the consumed claims are the constraint outputs.
    pub input_claim: Option<Expr>,
    pub produces: Vec<ProducedClaim>,
}

impl ProductVirtSpec {
    pub fn rounds(&self) -> String {
        format!(
            "{} + {}",
            self.cycle_var.log_size(),
            self.constraint_domain.len()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum StageSpec {
    Sumcheck(SumcheckSpec),
    Spartan(SpartanSpec),
    ProductVirt(ProductVirtSpec),
}

impl StageSpec {
    pub fn name(&self) -> &str {
        match self {
            StageSpec::Sumcheck(spec) => &spec.name,
            StageSpec::Spartan(spec) => &spec.name,
            StageSpec::ProductVirt(spec) => &spec.name,
        }
    }

    pub fn rounds(&self) -> String {
        match self {
            StageSpec::Sumcheck(spec) => spec.rounds.clone(),
            StageSpec::Spartan(spec) => spec.rounds(),
            StageSpec::ProductVirt(spec) => spec.rounds(),
        }
    }

    pub fn produces(&self) -> &[ProducedClaim] {
        match self {
            StageSpec::Sumcheck(spec) => &spec.produces,
            StageSpec::Spartan(spec) => &spec.produces,
            StageSpec::ProductVirt(spec) => &spec.produces,
        }
    }

    /// Trees whose leaves this specification consumes as claims.
    pub fn consumed_trees(&self) -> Vec<&Expr> {
        match self {
            StageSpec::Sumcheck(spec) => vec![&spec.input_claim],
            StageSpec::Spartan(spec) => vec![&spec.input_claim],
            StageSpec::ProductVirt(spec) => match &spec.input_claim {
                Some(claim) => vec![claim],
                None => spec.constraints.iter().map(|c| &c.output).collect(),
            },
        }
    }

    /// Trees the prover's polynomials appear in; used to infer the
    /// provenance of produced claims.
    pub fn internal_trees(&self) -> Vec<&Expr> {
        match self {
            StageSpec::Sumcheck(spec) => vec![&spec.integrand],
            StageSpec::Spartan(spec) => spec
                .groups
                .iter()
                .flatten()
                .flat_map(|c| [&c.az, &c.bz])
                .collect(),
            StageSpec::ProductVirt(spec) => spec
                .constraints
                .iter()
                .flat_map(|c| [&c.left, &c.right])
                .collect(),
        }
    }

    /// Declared-versus-inferred degree; only single-integrand specs carry one.
    pub fn degree_check(&self) -> Option<DegreeCheck> {
        match self {
            StageSpec::Sumcheck(spec) => Some(spec.degree_check()),
            StageSpec::Spartan(_) | StageSpec::ProductVirt(_) => None,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            StageSpec::Sumcheck(_) => "sumcheck",
            StageSpec::Spartan(_) => "spartan",
            StageSpec::ProductVirt(_) => "product_virt",
        }
    }

    /// Plain-text input claim, for listings.
    pub fn input_claim_text(&self) -> String {
        let trees = self.consumed_trees();
        trees
            .iter()
            .map(|tree| render(tree, &TextFormat))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<SumcheckSpec> for StageSpec {
    fn from(spec: SumcheckSpec) -> Self {
        StageSpec::Sumcheck(spec)
    }
}

impl From<SpartanSpec> for StageSpec {
    fn from(spec: SpartanSpec) -> Self {
        StageSpec::Spartan(spec)
    }
}

impl From<ProductVirtSpec> for StageSpec {
    fn from(spec: ProductVirtSpec) -> Self {
        StageSpec::ProductVirt(spec)
    }
}

/// A proving stage: specifications that run in parallel and share one
/// batch of challenges.
#[derive(Debug, Clone, Serialize)]
pub struct Stage {
    pub index: u32,
    pub title: String,
    pub specs: Vec<StageSpec>,
}

impl Stage {
    pub fn new(index: u32, title: impl Into<String>, specs: Vec<StageSpec>) -> Self {
        Self {
            index,
            title: title.into(),
            specs,
        }
    }
}
