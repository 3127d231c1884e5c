//! Display-math rendering for KaTeX, MathJax and `.tex` documents.
//!
//! Underscored names are split so subscripts land in math mode outside
//! `\textsf{}`. Committed and derived leaves are wrapped in `\textcolor`.

use crate::arg::{Arg, FixedPoint, FreeVar};
use crate::expr::{Constant, FanIn, Provenance};
use crate::format::{Format, apply};
use crate::name::{PolyName, Qualifier};
use regex::Regex;
use std::sync::OnceLock;

/// Resolves a polynomial name to its provenance.
///
/// Implementations return `None` for unknown or ambiguous names; the
/// renderer then leaves the name uncoloured.
pub trait KindLookup {
    fn provenance_of(&self, name: &PolyName) -> Option<Provenance>;
}

/// A lookup that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl KindLookup for NoLookup {
    fn provenance_of(&self, _name: &PolyName) -> Option<Provenance> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatexFormat {
    pub committed_color: String,
    pub derived_color: String,
}

impl Default for LatexFormat {
    fn default() -> Self {
        Self {
            committed_color: "ForestGreen".to_string(),
            derived_color: "BurntOrange".to_string(),
        }
    }
}

impl LatexFormat {
    pub fn with_colors(committed: impl Into<String>, derived: impl Into<String>) -> Self {
        Self {
            committed_color: committed.into(),
            derived_color: derived.into(),
        }
    }

    fn color_for(&self, kind: Provenance) -> Option<&str> {
        match kind {
            Provenance::Committed => Some(self.committed_color.as_str()),
            Provenance::Derived => Some(self.derived_color.as_str()),
            Provenance::Computable => None,
        }
    }

    fn colored(&self, kind: Provenance, body: String) -> String {
        match self.color_for(kind) {
            Some(color) => format!("\\textcolor{{{color}}}{{{body}}}"),
            None => body,
        }
    }
}

impl Format for LatexFormat {
    fn free_var(&self, var: &FreeVar) -> String {
        var.name.clone()
    }

    fn fixed_point(&self, point: &FixedPoint) -> String {
        format!(
            "r_{{{}}}^{{({})}}",
            fixed_point_label(point.print_label()),
            point.stage
        )
    }

    fn constant(&self, value: &Constant) -> String {
        match value {
            Constant::Int(n) => n.to_string(),
            Constant::Symbol(s) => symbolic_constant(s),
        }
    }

    fn committed(&self, name: &PolyName, args: &[String]) -> String {
        apply(&self.colored(Provenance::Committed, poly_name(name)), args)
    }

    fn derived(&self, name: &PolyName, args: &[String]) -> String {
        apply(&self.colored(Provenance::Derived, poly_name(name)), args)
    }

    fn computable(&self, name: &PolyName, args: &[String]) -> String {
        apply(&computable_name(name), args)
    }

    fn add(&self, left: &str, right: &str) -> String {
        format!("{left} + {right}")
    }

    fn sub(&self, left: &str, right: &str) -> String {
        format!("{left} - {right}")
    }

    fn mul(&self, left: &str, right: &str) -> String {
        format!("{left} \\cdot {right}")
    }

    fn pow(&self, base: &str, exponent: u32) -> String {
        format!("{base}^{{{exponent}}}")
    }

    fn neg(&self, inner: &str) -> String {
        format!("-{inner}")
    }

    fn hypercube_sum(&self, var: &FreeVar, body: &str) -> String {
        format!(
            "\\sum_{{{} \\in \\{{0,1\\}}^{{{}}}}} {body}",
            var.name,
            latex_dim_expr(&var.log_size())
        )
    }

    fn finite_sum(&self, index: &str, count: &FanIn, body: &str) -> String {
        format!("\\sum_{{{index}=0}}^{{{}}} {body}", count.upper_bound())
    }

    fn finite_product(&self, index: &str, count: &FanIn, body: &str) -> String {
        format!("\\prod_{{{index}=0}}^{{{}}} {body}", count.upper_bound())
    }

    fn parens(&self, s: &str) -> String {
        format!("\\left({s}\\right)")
    }
}

/// `log2(K_ram) + log2(T)` as `\log_2 K_{\text{ram}} + \log_2 T`.
pub fn latex_dim_expr(s: &str) -> String {
    log2_re()
        .replace_all(s, |caps: &regex::Captures<'_>| {
            format!("\\log_2 {}", latex_param(&caps[1]))
        })
        .into_owned()
}

/// `K_ram` as `K_{\text{ram}}`; single-character subscripts stay bare.
pub fn latex_param(s: &str) -> String {
    match param_re().captures(s) {
        Some(caps) if caps[2].len() == 1 => format!("{}_{}", &caps[1], &caps[2]),
        Some(caps) => format!("{}_{{\\text{{{}}}}}", &caps[1], &caps[2]),
        None => s.to_string(),
    }
}

/// One produced claim as display math, coloured through `lookup`.
///
/// `quantifier` is a range clause such as `i=0..d_v-1`, shown after the
/// evaluation as `\text{ for } i=0,\ldots,d_v-1`.
pub fn latex_claim_entry(
    name: &PolyName,
    point: &[Arg],
    quantifier: Option<&str>,
    lookup: &dyn KindLookup,
    fmt: &LatexFormat,
) -> String {
    let head = match lookup.provenance_of(name) {
        Some(kind) => fmt.colored(kind, poly_name(name)),
        None => poly_name(name),
    };
    let args: Vec<String> = point.iter().map(|arg| fmt.arg(arg)).collect();
    let mut entry = format!("{head}({})", args.join(", "));
    if let Some(clause) = quantifier {
        entry.push_str(" \\text{ for } ");
        entry.push_str(&quantifier_clause(clause));
    }
    entry
}

fn quantifier_clause(clause: &str) -> String {
    let dotted = clause.replace("..", ",\\ldots,");
    inline_param_re()
        .replace_all(&dotted, |caps: &regex::Captures<'_>| latex_param(&caps[0]))
        .into_owned()
}

fn poly_name(name: &PolyName) -> String {
    match &name.qualifier {
        None if single_letter_re().is_match(&name.base) => name.base.clone(),
        None => base_name(&name.base),
        Some(qualifier) => format!("{}({})", base_name(&name.base), qualifier_text(qualifier)),
    }
}

fn base_name(base: &str) -> String {
    match trailing_sub_re().captures(base) {
        Some(caps) => format!("\\textsf{{{}}}_{{{}}}", &caps[1], &caps[2]),
        None => format!("\\textsf{{{}}}", base.replace('_', "\\_")),
    }
}

fn qualifier_text(qualifier: &Qualifier) -> String {
    let raw = qualifier.as_str();
    if lower_letter_re().is_match(raw) {
        return raw.to_string();
    }
    match word_sub_re().captures(raw) {
        Some(caps) => format!("\\text{{{}}}_{{{}}}", &caps[1], &caps[2]),
        None => format!("\\text{{{raw}}}"),
    }
}

fn computable_name(name: &PolyName) -> String {
    if name.qualifier.is_none() {
        if name.base == "eq" {
            return "\\widetilde{\\text{eq}}".to_string();
        }
        if let Some(suffix) = name.base.strip_prefix("eq_") {
            return format!("\\widetilde{{\\text{{eq}}}}_{{{suffix}}}");
        }
    }
    if let Some(base) = name.base.strip_suffix("_tilde") {
        let inner = PolyName {
            base: base.to_string(),
            qualifier: name.qualifier.clone(),
        };
        return format!("\\widetilde{{{}}}", poly_name(&inner));
    }
    poly_name(name)
}

fn fixed_point_label(label: &str) -> String {
    let (stem, sup) = match superscript_re().captures(label) {
        Some(caps) => (
            caps.get(1).map_or(label, |m| m.as_str()),
            format!("^{{{}}}", &caps[2]),
        ),
        None => (label, String::new()),
    };

    if let Some(caps) = upper_sub_re().captures(stem) {
        return if caps[2].len() == 1 {
            format!("{}_{}{sup}", &caps[1], &caps[2])
        } else {
            format!("{}_{{\\text{{{}}}}}{sup}", &caps[1], &caps[2])
        };
    }
    if upper_letter_re().is_match(stem) {
        return format!("{stem}{sup}");
    }
    if let Some(caps) = word_sub_re().captures(stem) {
        return format!("\\text{{{}}}_{{{}}}{sup}", &caps[1], &caps[2]);
    }
    format!("\\text{{{stem}}}{sup}")
}

fn symbolic_constant(raw: &str) -> String {
    const SUBSTITUTIONS: [(&str, &str); 6] = [
        ("γ", "\\gamma"),
        ("·", "\\cdot "),
        ("∪", "\\cup "),
        ("∈", "\\in "),
        ("Σ", "\\sum"),
        ("Π", "\\prod"),
    ];
    let replaced = SUBSTITUTIONS
        .iter()
        .fold(raw.to_string(), |acc, (from, to)| acc.replace(from, to));
    long_exponent_re()
        .replace_all(&replaced, "^{${1}}")
        .into_owned()
}

fn log2_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"log2\(([^)]+)\)").expect("log2 regex must compile"))
}

fn param_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z])_([a-z0-9]+)$").expect("param regex must compile"))
}

fn inline_param_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([A-Za-z])_([a-z][a-z0-9]*)").expect("inline param regex must compile")
    })
}

fn single_letter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]_[a-z0-9]+$").expect("single-letter regex must compile"))
}

fn trailing_sub_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+?)_([a-z0-9])$").expect("subscript regex must compile"))
}

fn lower_letter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z]$").expect("letter regex must compile"))
}

fn word_sub_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([a-z]+)_([a-z0-9])$").expect("word regex must compile"))
}

fn superscript_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+)\^(\(.+\))$").expect("superscript regex must compile"))
}

fn upper_sub_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Z])_([a-z][a-z0-9]*)$").expect("upper subscript regex must compile")
    })
}

fn upper_letter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]$").expect("upper letter regex must compile"))
}

fn long_exponent_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\^(\d{2,})").expect("exponent regex must compile"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::Dim;
    use crate::args;
    use crate::expr::*;
    use crate::format::render;

    fn cycle() -> Dim {
        Dim::new("T", "cycle", "cycle/timestep")
    }

    fn x_t() -> FreeVar {
        FreeVar::new("X_t", cycle())
    }

    fn latex(expr: &Expr) -> String {
        render(expr, &LatexFormat::default())
    }

    struct OneCommitted;

    impl KindLookup for OneCommitted {
        fn provenance_of(&self, name: &PolyName) -> Option<Provenance> {
            (name.base == "RdInc").then_some(Provenance::Committed)
        }
    }

    #[test]
    fn leaves_are_coloured_by_provenance() {
        assert_eq!(
            latex(&committed("RdInc", args![x_t()])),
            "\\textcolor{ForestGreen}{\\textsf{RdInc}}(X_t)"
        );
        assert_eq!(
            latex(&derived("RamVal", args![x_t()])),
            "\\textcolor{BurntOrange}{\\textsf{RamVal}}(X_t)"
        );
    }

    #[test]
    fn custom_colours() {
        let fmt = LatexFormat::with_colors("Green", "Orange");
        assert_eq!(
            render(&derived("Rd", Vec::new()), &fmt),
            "\\textcolor{Orange}{\\textsf{Rd}}"
        );
    }

    #[test]
    fn poly_names() {
        assert_eq!(poly_name(&PolyName::new("io_mask")), "\\textsf{io\\_mask}");
        assert_eq!(poly_name(&PolyName::new("Ra_j")), "\\textsf{Ra}_{j}");
        assert_eq!(poly_name(&PolyName::new("T_j")), "T_j");
        assert_eq!(
            poly_name(&PolyName::member("OpFlags", "Load")),
            "\\textsf{OpFlags}(\\text{Load})"
        );
        assert_eq!(
            poly_name(&PolyName::family("InstructionRa", "i")),
            "\\textsf{InstructionRa}(i)"
        );
        assert_eq!(
            poly_name(&PolyName::family("OpFlags", "cf_i")),
            "\\textsf{OpFlags}(\\text{cf}_{i})"
        );
    }

    #[test]
    fn computable_names() {
        let r = FixedPoint::new(1, cycle());
        assert_eq!(
            latex(&eq(&r, &x_t())),
            "\\widetilde{\\text{eq}}(r_{\\text{cycle}}^{(1)}, X_t)"
        );
        assert_eq!(
            computable_name(&PolyName::new("eq_ram")),
            "\\widetilde{\\text{eq}}_{ram}"
        );
        assert_eq!(
            computable_name(&PolyName::new("io_mask_tilde")),
            "\\widetilde{\\textsf{io\\_mask}}"
        );
        assert_eq!(computable_name(&PolyName::new("LT")), "\\textsf{LT}");
    }

    #[test]
    fn fixed_point_labels() {
        assert_eq!(fixed_point_label("cycle"), "\\text{cycle}");
        assert_eq!(fixed_point_label("K_ram"), "K_{\\text{ram}}");
        assert_eq!(fixed_point_label("K_instr^(i)"), "K_{\\text{instr}}^{(i)}");
        assert_eq!(fixed_point_label("N_v"), "N_v");
        assert_eq!(fixed_point_label("K^(j)"), "K^{(j)}");
        assert_eq!(fixed_point_label("addr_j"), "\\text{addr}_{j}");
    }

    #[test]
    fn symbolic_constants() {
        assert_eq!(latex(&symbol("γ")), "\\gamma");
        assert_eq!(latex(&symbol("2^64")), "2^{64}");
        assert_eq!(latex(&symbol("2^6")), "2^6");
        assert_eq!(latex(&int(-3)), "-3");
    }

    #[test]
    fn dimension_expressions() {
        assert_eq!(latex_dim_expr("log2(T)"), "\\log_2 T");
        assert_eq!(
            latex_dim_expr("log2(T) + log2(K_ram)"),
            "\\log_2 T + \\log_2 K_{\\text{ram}}"
        );
        assert_eq!(latex_dim_expr("1"), "1");
        assert_eq!(latex_param("d_v"), "d_v");
    }

    #[test]
    fn claim_entry_uses_injected_lookup() {
        let r = FixedPoint::new(6, cycle());
        let point = args![r];
        let coloured = latex_claim_entry(
            &PolyName::new("RdInc"),
            &point,
            None,
            &OneCommitted,
            &LatexFormat::default(),
        );
        assert_eq!(
            coloured,
            "\\textcolor{ForestGreen}{\\textsf{RdInc}}(r_{\\text{cycle}}^{(6)})"
        );

        let plain = latex_claim_entry(
            &PolyName::family("InstructionRa", "i"),
            &point,
            Some("i=0..d_v-1"),
            &NoLookup,
            &LatexFormat::default(),
        );
        assert_eq!(
            plain,
            "\\textsf{InstructionRa}(i)(r_{\\text{cycle}}^{(6)}) \\text{ for } i=0,\\ldots,d_v-1"
        );
    }

    #[test]
    fn product_snapshot() {
        let r = FixedPoint::new(1, cycle());
        let h = derived("RamHammingWeight", args![x_t()]);
        let tree = hypercube_sum(
            &x_t(),
            mul([eq(&r, &x_t()), sub(pow(h.clone(), 2), [h])]),
        );
        insta::assert_snapshot!(
            latex(&tree),
            @r"\sum_{X_t \in \{0,1\}^{\log_2 T}} \widetilde{\text{eq}}(r_{\text{cycle}}^{(1)}, X_t) \cdot \left(\textcolor{BurntOrange}{\textsf{RamHammingWeight}}(X_t)^{2} - \textcolor{BurntOrange}{\textsf{RamHammingWeight}}(X_t)\right)"
        );
    }
}
