use crate::config::LatexConfig;
use crate::support::write_file_or_exit;
use integrand_catalog::{Registry, select_stages};
use integrand_kernel::{
    Format, KindLookup, LatexFormat, ProducedClaim, Stage, StageSpec, latex_claim_entry,
    latex_dim_expr, render,
};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::info;

pub fn run(indices: &[u32], out: Option<PathBuf>, config: &LatexConfig) {
    let stages = select_stages(indices);
    if stages.is_empty() {
        eprintln!("error: no stage matches {indices:?}");
        std::process::exit(1);
    }

    let fmt = LatexFormat::with_colors(&config.committed_color, &config.derived_color);
    let document = document(&config.title, &stages, &Registry::standard(), &fmt);
    let path = out.unwrap_or_else(|| config.out.clone());
    write_file_or_exit(&path, &document);
    info!(path = %path.display(), stages = stages.len(), "wrote latex document");

    println!(
        "integrand latex\n  Stages: {}\n  Path: {}",
        stages.len(),
        path.display()
    );
}

/// A standalone `.tex` file: one section per stage, one subsection per
/// specification.
pub fn document(
    title: &str,
    stages: &[Stage],
    lookup: &dyn KindLookup,
    fmt: &LatexFormat,
) -> String {
    let mut doc = String::new();
    doc.push_str("\\documentclass[11pt]{article}\n");
    doc.push_str("\\usepackage[margin=1in]{geometry}\n");
    doc.push_str("\\usepackage{amsmath,amssymb}\n");
    doc.push_str("\\usepackage[dvipsnames]{xcolor}\n");
    let _ = writeln!(doc, "\\title{{{}}}", escape_text(title));
    doc.push_str("\\date{}\n\\begin{document}\n\\maketitle\n\n");
    let _ = writeln!(
        doc,
        "\\noindent\\textcolor{{{}}}{{committed}} \\quad \\textcolor{{{}}}{{derived}} \\quad computable\n",
        fmt.committed_color, fmt.derived_color
    );

    for stage in stages {
        let _ = writeln!(
            doc,
            "\\section*{{Stage {}: {}}}\n",
            stage.index,
            escape_text(&stage.title)
        );
        for spec in &stage.specs {
            spec_section(&mut doc, spec, lookup, fmt);
        }
    }

    doc.push_str("\\end{document}\n");
    doc
}

fn spec_section(doc: &mut String, spec: &StageSpec, lookup: &dyn KindLookup, fmt: &LatexFormat) {
    let _ = writeln!(doc, "\\subsection*{{{}}}\n", escape_text(spec.name()));
    let _ = write!(doc, "\\textbf{{Rounds:}} ${}$", latex_dim_expr(&spec.rounds()));
    if let Some(check) = spec.degree_check() {
        let _ = write!(doc, " \\quad \\textbf{{Degree:}} ${}$", check.declared);
    }
    doc.push_str("\n\n");

    match spec {
        StageSpec::Sumcheck(spec) => {
            let body = render(&spec.integrand, fmt);
            let summed = spec
                .sum_vars
                .iter()
                .rev()
                .fold(body, |inner, var| fmt.hypercube_sum(var, &inner));
            let _ = writeln!(
                doc,
                "\\[\n{summed} = {}\n\\]\n",
                render(&spec.input_claim, fmt)
            );
        }
        StageSpec::Spartan(spec) => {
            let _ = writeln!(
                doc,
                "Input claim: $ {} $\n",
                render(&spec.input_claim, fmt)
            );
            for (group, rows) in spec.groups.iter().enumerate() {
                let _ = writeln!(doc, "\\paragraph{{Group {group}}}");
                doc.push_str("\\begin{align*}\n");
                for row in rows {
                    let _ = writeln!(
                        doc,
                        "&\\text{{{}}}: && {} \\\\",
                        escape_text(&row.label),
                        render(&row.product(), fmt)
                    );
                }
                doc.push_str("\\end{align*}\n\n");
            }
        }
        StageSpec::ProductVirt(spec) => {
            doc.push_str("\\begin{align*}\n");
            for row in &spec.constraints {
                let _ = writeln!(
                    doc,
                    "&\\text{{{}}}: && {} = {} \\\\",
                    escape_text(&row.label),
                    render(&row.output, fmt),
                    render(&row.product(), fmt)
                );
            }
            doc.push_str("\\end{align*}\n\n");
        }
    }

    if !spec.produces().is_empty() {
        doc.push_str("\\textbf{Produces:}\n\\begin{itemize}\n");
        for claim in spec.produces() {
            let _ = writeln!(doc, "  \\item ${}$", claim_entry(claim, lookup, fmt));
        }
        doc.push_str("\\end{itemize}\n\n");
    }
}

fn claim_entry(claim: &ProducedClaim, lookup: &dyn KindLookup, fmt: &LatexFormat) -> String {
    latex_claim_entry(
        &claim.name,
        &claim.point,
        claim.quantifier.as_deref(),
        lookup,
        fmt,
    )
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
