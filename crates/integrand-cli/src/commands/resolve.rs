use crate::support::print_json_or_exit;
use integrand_catalog::stages;
use integrand_kernel::{ResolutionReport, resolve_stages, validate_stages};
use serde_json::json;
use tracing::info;

pub fn run(strict: bool, json_output: bool) {
    let stages = stages();
    validate_stages(&stages).unwrap_or_else(|e| {
        eprintln!("error: invalid stage catalog: {e}");
        std::process::exit(1);
    });
    info!(stages = stages.len(), strict, "replaying claim ledger");
    let report = resolve_stages(&stages);

    if json_output {
        let payload = json!({
            "action": "resolve",
            "reportId": report.report_id,
            "sound": report.is_sound(),
            "kindMismatches": report.kind_mismatches(),
            "steps": report.steps,
            "log": report.log,
            "unresolved": report.unresolved,
            "committed": report.committed,
        });
        print_json_or_exit(&payload);
    } else {
        print_report(&report);
    }

    if strict && !report.is_sound() {
        eprintln!(
            "error: {} derived claim(s) left unresolved",
            report.unresolved.len()
        );
        std::process::exit(1);
    }
}

fn print_report(report: &ResolutionReport) {
    println!("integrand resolve\n  Report: {}", report.report_id);
    for step in &report.steps {
        println!(
            "  S{} {}: consumed {} (resolved {}, committed {}, public {}), produced {}",
            step.stage,
            step.spec,
            step.consumed_count(),
            step.resolved.len(),
            step.committed_refs.len(),
            step.unmatched.len(),
            step.produced.len()
        );
        for resolution in &step.resolved {
            match &resolution.via_family {
                Some(family) => println!(
                    "      {} <- {} (via {family})",
                    resolution.key, resolution.producer
                ),
                None => println!("      {} <- {}", resolution.key, resolution.producer),
            }
        }
    }

    println!(
        "\n  Resolutions: {}\n  Committed productions: {}\n  Defaulted kinds: {}",
        report.log.len(),
        report.committed.len(),
        report.kind_mismatches()
    );
    if report.is_sound() {
        println!("  Unresolved: none");
    } else {
        println!("  Unresolved: {}", report.unresolved.len());
        for outstanding in &report.unresolved {
            println!("    {} from {}", outstanding.key, outstanding.origin);
        }
    }
}
