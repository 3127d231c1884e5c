use crate::support::print_json_or_exit;
use integrand_catalog::stages;
use integrand_kernel::{DegreeCheck, DegreeStatus, StageSpec};
use serde_json::json;
use tracing::warn;

pub fn run(strict: bool, json_output: bool) {
    let checks: Vec<DegreeCheck> = stages()
        .iter()
        .flat_map(|stage| stage.specs.iter().filter_map(StageSpec::degree_check))
        .collect();
    let mismatches: Vec<&DegreeCheck> = checks.iter().filter(|c| c.is_mismatch()).collect();
    for check in &mismatches {
        warn!(
            spec = %check.spec,
            declared = %check.declared,
            inferred = check.inferred,
            "declared degree differs from integrand"
        );
    }

    if json_output {
        let payload = json!({
            "action": "degree-check",
            "checked": checks.len(),
            "mismatches": mismatches.len(),
            "checks": checks,
        });
        print_json_or_exit(&payload);
    } else {
        println!("integrand degree-check");
        for check in &checks {
            let status = match check.status {
                DegreeStatus::Consistent => "ok",
                DegreeStatus::Mismatch => "MISMATCH",
                DegreeStatus::Unchecked => "symbolic",
            };
            println!(
                "  {:<32} declared {:<10} inferred {:<3} {status}",
                check.spec,
                check.declared.to_string(),
                check.inferred
            );
        }
        println!(
            "  Checked: {}\n  Mismatches: {}",
            checks.len(),
            mismatches.len()
        );
    }

    if strict && !mismatches.is_empty() {
        eprintln!("error: {} degree mismatch(es)", mismatches.len());
        std::process::exit(1);
    }
}
