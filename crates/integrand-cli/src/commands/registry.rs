use crate::support::{parse_kinds_or_exit, print_json_or_exit};
use integrand_catalog::{ParamDef, PolyDef, Registry};
use integrand_kernel::Provenance;
use serde_json::json;

pub fn run(kinds: &[String], json_output: bool) {
    let kinds = parse_kinds_or_exit(kinds);
    let registry = Registry::standard();
    let polys: Vec<&PolyDef> = registry.filtered(&kinds).collect();
    // Parameters are not polynomials; a kind filter hides them.
    let params: &[ParamDef] = if kinds.is_empty() {
        registry.params()
    } else {
        &[]
    };

    if json_output {
        let payload = json!({
            "action": "registry",
            "kinds": kinds,
            "polys": polys,
            "params": params,
        });
        print_json_or_exit(&payload);
        return;
    }

    println!("integrand registry");
    for kind in Provenance::ALL {
        let group: Vec<&PolyDef> = polys.iter().copied().filter(|p| p.kind == kind).collect();
        if group.is_empty() {
            continue;
        }
        println!("\n{} polynomials ({})", heading(kind), group.len());
        let mut category = "";
        for poly in group {
            if poly.category != category {
                category = &poly.category;
                println!("  [{category}]");
            }
            println!("    {}", poly.name);
            if let Some(domain) = poly.domain_text() {
                println!("      {domain}");
            }
            println!("      {}", poly.description);
        }
    }

    if !params.is_empty() {
        println!("\nParameters ({})", params.len());
        for param in params {
            match &param.code_name {
                Some(code) => println!("  {} ({code})", param.symbol),
                None => println!("  {}", param.symbol),
            }
            println!("      {}", param.description);
            if let Some(formula) = &param.formula {
                println!("      = {formula}");
            }
        }
    }
}

fn heading(kind: Provenance) -> &'static str {
    match kind {
        Provenance::Committed => "Committed",
        Provenance::Derived => "Derived",
        Provenance::Computable => "Computable",
    }
}
