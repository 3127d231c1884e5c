//! Structural checks on a stage catalog, run before resolution.

use crate::error::IntegrandError;
use crate::spec::{Stage, StageSpec};
use std::collections::BTreeSet;

pub fn validate_stages(stages: &[Stage]) -> Result<(), IntegrandError> {
    let mut seen = BTreeSet::new();
    for stage in stages {
        if !seen.insert(stage.index) {
            return Err(IntegrandError::DuplicateStage { index: stage.index });
        }
        for spec in &stage.specs {
            validate_spec(stage.index, spec)?;
        }
    }
    Ok(())
}

fn validate_spec(stage: u32, spec: &StageSpec) -> Result<(), IntegrandError> {
    if spec.name().trim().is_empty() {
        return Err(IntegrandError::EmptySpecName { stage });
    }
    match spec {
        StageSpec::Sumcheck(sc) => {
            if sc.opening_point.len() != sc.sum_vars.len() {
                return Err(IntegrandError::OpeningPointArity {
                    spec: sc.name.clone(),
                    vars: sc.sum_vars.len(),
                    points: sc.opening_point.len(),
                });
            }
        }
        StageSpec::Spartan(sp) => {
            let domain = sp.constraint_domain.len();
            if let Some((group, rows)) = sp
                .groups
                .iter()
                .map(Vec::len)
                .enumerate()
                .find(|(_, rows)| *rows > domain)
            {
                return Err(IntegrandError::ConstraintTableOverflow {
                    spec: sp.name.clone(),
                    group,
                    rows,
                    domain,
                });
            }
        }
        StageSpec::ProductVirt(pv) => {
            if pv.constraints.len() != pv.constraint_domain.len() {
                return Err(IntegrandError::ProductTableMismatch {
                    spec: pv.name.clone(),
                    rows: pv.constraints.len(),
                    domain: pv.constraint_domain.len(),
                });
            }
        }
    }
    Ok(())
}
