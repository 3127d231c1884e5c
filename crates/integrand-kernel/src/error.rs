//! Error types for integrand kernel operations.

/// Structural problems in a stage catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrandError {
    /// Two stages share an index, so replay order is ambiguous.
    #[error("duplicate stage index: {index}")]
    DuplicateStage { index: u32 },

    #[error("stage {stage}: specification with empty name")]
    EmptySpecName { stage: u32 },

    /// A sumcheck binds one fixed point per summed variable.
    #[error("{spec}: opening point has {points} coordinates for {vars} summed variables")]
    OpeningPointArity {
        spec: String,
        vars: usize,
        points: usize,
    },

    #[error("{spec}: group {group} has {rows} constraints but the domain has {domain} points")]
    ConstraintTableOverflow {
        spec: String,
        group: usize,
        rows: usize,
        domain: usize,
    },

    #[error("{spec}: {rows} product constraints over a domain of {domain} points")]
    ProductTableMismatch {
        spec: String,
        rows: usize,
        domain: usize,
    },
}
