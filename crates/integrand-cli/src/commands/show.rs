use crate::support::print_json_or_exit;
use integrand_catalog::select_stages;
use integrand_kernel::{Format, FreeVar, ProducedClaim, Stage, StageSpec, TextFormat, render};
use serde_json::{Value, json};

pub fn run(indices: &[u32], json_output: bool) {
    let stages = select_stages(indices);
    if stages.is_empty() {
        eprintln!("error: no stage matches {indices:?}");
        std::process::exit(1);
    }

    if json_output {
        let payload = json!({
            "action": "show",
            "stages": stages.iter().map(stage_json).collect::<Vec<_>>(),
        });
        print_json_or_exit(&payload);
    } else {
        println!("integrand show");
        for stage in &stages {
            print_stage(stage);
        }
    }
}

fn stage_json(stage: &Stage) -> Value {
    let specs: Vec<Value> = stage
        .specs
        .iter()
        .map(|spec| {
            json!({
                "name": spec.name(),
                "shape": spec.shape(),
                "rounds": spec.rounds(),
                "summedVars": summed_vars(spec).iter().map(|v| summed_var_text(v)).collect::<Vec<_>>(),
                "openingPoint": opening_point(spec),
                "degree": spec.degree_check(),
                "inputClaim": spec.input_claim_text(),
                "produces": spec.produces().iter().map(ProducedClaim::to_text).collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({
        "index": stage.index,
        "title": stage.title,
        "specs": specs,
    })
}

fn print_stage(stage: &Stage) {
    println!("\nStage {}: {}", stage.index, stage.title);
    for spec in &stage.specs {
        println!("  {} [{}]", spec.name(), spec.shape());
        println!("    Rounds: {}", spec.rounds());
        let summed: Vec<String> = summed_vars(spec).iter().map(|v| summed_var_text(v)).collect();
        println!("    Summed: {}", summed.join(", "));
        if let Some(point) = opening_point(spec) {
            println!("    Opening point: ({point})");
        }
        if let Some(check) = spec.degree_check() {
            println!("    Degree: {} (inferred {})", check.declared, check.inferred);
        }
        print_body(spec);
        println!("    Input claim: {}", spec.input_claim_text());
        for claim in spec.produces() {
            println!("    Produces: {}", claim.to_text());
        }
    }
}

fn summed_vars(spec: &StageSpec) -> Vec<&FreeVar> {
    match spec {
        StageSpec::Sumcheck(spec) => spec.sum_vars.iter().collect(),
        StageSpec::Spartan(spec) => vec![&spec.cycle_var, &spec.group_var],
        StageSpec::ProductVirt(spec) => vec![&spec.cycle_var],
    }
}

/// `X_t ∈ {0,1}^log2(T)`
fn summed_var_text(var: &FreeVar) -> String {
    format!("{} ∈ {{0,1}}^{}", TextFormat.free_var(var), var.log_size())
}

/// Only single-integrand sumchecks name their opening point explicitly.
fn opening_point(spec: &StageSpec) -> Option<String> {
    match spec {
        StageSpec::Sumcheck(spec) => {
            let coords: Vec<String> = spec
                .opening_point
                .iter()
                .map(|p| TextFormat.fixed_point(p))
                .collect();
            Some(coords.join(", "))
        }
        StageSpec::Spartan(_) | StageSpec::ProductVirt(_) => None,
    }
}

fn print_body(spec: &StageSpec) {
    match spec {
        StageSpec::Sumcheck(spec) => {
            println!("    Integrand: {}", render(&spec.integrand, &TextFormat));
        }
        StageSpec::Spartan(spec) => {
            for (group, rows) in spec.groups.iter().enumerate() {
                println!("    Group {group}:");
                for row in rows {
                    println!(
                        "      [{}] {}",
                        row.label,
                        render(&row.product(), &TextFormat)
                    );
                }
            }
        }
        StageSpec::ProductVirt(spec) => {
            for row in &spec.constraints {
                println!(
                    "    [{}] {} = {}",
                    row.label,
                    render(&row.output, &TextFormat),
                    render(&row.product(), &TextFormat)
                );
            }
        }
    }
}
