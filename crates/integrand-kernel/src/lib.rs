//! # Integrand Kernel
//!
//! Expression trees for the integrands of a multi-stage sumcheck protocol,
//! together with the three analyses run over them: structural degree
//! inference, format-agnostic rendering, and cross-stage claim resolution.
//!
//! This crate is **catalog-agnostic**: it does not prescribe which
//! polynomials exist. It only prescribes how claims about them are built,
//! printed, and discharged.
//!
//! ## Architecture
//!
//! ```text
//! Arg / PolyName        ← Free variables, fixed points, family-tagged names
//!     │
//! Expr                  ← Immutable tree: leaves by provenance + combinators
//!     │
//! degree / render       ← Pure functions over a tree (Format strategies)
//!     │
//! StageSpec / Stage     ← Trees wrapped with rounds, degree, produced claims
//!     │
//! ClaimTracker          ← Ordered produce/consume ledger over stages
//! ```

pub mod arg;
pub mod degree;
pub mod digest;
pub mod error;
pub mod expr;
pub mod format;
pub mod latex;
pub mod name;
pub mod resolve;
pub mod spec;
pub mod text;
pub mod validate;

pub use arg::{Arg, Dim, DomainSize, FixedPoint, FreeVar};
pub use degree::{DeclaredDegree, DegreeCheck, DegreeStatus, degree};
pub use error::IntegrandError;
pub use expr::{Aggregate, Constant, Expr, FanIn, Leaf, Provenance};
pub use format::{Format, render};
pub use latex::{KindLookup, LatexFormat, NoLookup, latex_claim_entry, latex_dim_expr};
pub use name::{PolyName, Qualifier};
pub use resolve::{
    ClaimKey, ClaimTracker, Origin, Outstanding, Production, Resolution, ResolutionReport,
    StepReport, collect_claims, resolve_stages,
};
pub use spec::{
    Constraint, ProducedClaim, ProductConstraint, ProductVirtSpec, SpartanSpec, Stage, StageSpec,
    SumcheckSpec,
};
pub use text::TextFormat;
pub use validate::validate_stages;
