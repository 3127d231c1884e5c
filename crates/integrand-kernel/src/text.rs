//! Plain-text rendering for terminals and logs.
//!
//! Committed and derived leaves carry a `cp:` / `vp:` prefix; computable
//! leaves print bare. This is also the canonical form of fixed points used
//! in claim keys.

use crate::arg::{FixedPoint, FreeVar};
use crate::expr::{Constant, FanIn};
use crate::format::{Format, apply};
use crate::name::PolyName;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormat;

impl Format for TextFormat {
    fn free_var(&self, var: &FreeVar) -> String {
        var.name.clone()
    }

    fn fixed_point(&self, point: &FixedPoint) -> String {
        format!("r_{}^({})", point.print_label(), point.stage)
    }

    fn constant(&self, value: &Constant) -> String {
        value.to_string()
    }

    fn committed(&self, name: &PolyName, args: &[String]) -> String {
        apply(&format!("cp:{name}"), args)
    }

    fn derived(&self, name: &PolyName, args: &[String]) -> String {
        apply(&format!("vp:{name}"), args)
    }

    fn computable(&self, name: &PolyName, args: &[String]) -> String {
        apply(&name.to_string(), args)
    }

    fn add(&self, left: &str, right: &str) -> String {
        format!("{left} + {right}")
    }

    fn sub(&self, left: &str, right: &str) -> String {
        format!("{left} - {right}")
    }

    fn mul(&self, left: &str, right: &str) -> String {
        format!("{left} · {right}")
    }

    fn pow(&self, base: &str, exponent: u32) -> String {
        format!("{base}^{exponent}")
    }

    fn neg(&self, inner: &str) -> String {
        format!("-{inner}")
    }

    fn hypercube_sum(&self, var: &FreeVar, body: &str) -> String {
        format!("Σ_{{{}}} {body}", var.name)
    }

    fn finite_sum(&self, index: &str, count: &FanIn, body: &str) -> String {
        format!("Σ_{{{index}=0}}^{{{}}} {body}", count.upper_bound())
    }

    fn finite_product(&self, index: &str, count: &FanIn, body: &str) -> String {
        format!("Π_{{{index}=0}}^{{{}}} {body}", count.upper_bound())
    }

    fn parens(&self, s: &str) -> String {
        format!("({s})")
    }
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

    fn r1() -> FixedPoint {
        FixedPoint::new(1, cycle())
    }

    fn a() -> Expr {
        derived("A", args![x_t()])
    }

    fn b() -> Expr {
        derived("B", args![x_t()])
    }

    fn c() -> Expr {
        derived("C", args![x_t()])
    }

    fn text(expr: &Expr) -> String {
        render(expr, &TextFormat)
    }

    #[test]
    fn leaves_by_provenance() {
        assert_eq!(text(&committed("RdInc", args![r1()])), "cp:RdInc(r_cycle^(1))");
        assert_eq!(text(&derived("RamVal", args![x_t()])), "vp:RamVal(X_t)");
        assert_eq!(text(&eq(&r1(), &x_t())), "eq(r_cycle^(1), X_t)");
        assert_eq!(text(&computable("L", Vec::new())), "L");
    }

    #[test]
    fn chained_subtraction_has_no_double_sign() {
        let rendered = text(&sub(a(), [b(), c()]));
        assert_eq!(rendered, "vp:A(X_t) - vp:B(X_t) - vp:C(X_t)");
        assert!(!rendered.contains("+ -"));
    }

    #[test]
    fn subtraction_matches_dedicated_callback() {
        let tree = Expr::Add(Box::new(a()), Box::new(neg(b())));
        assert_eq!(text(&tree), TextFormat.sub(&text(&a()), &text(&b())));
    }

    #[test]
    fn additive_subtrahend_is_grouped() {
        assert_eq!(
            text(&sub(a(), [add([b(), c()])])),
            "vp:A(X_t) - (vp:B(X_t) + vp:C(X_t))"
        );
    }

    #[test]
    fn products_group_additive_factors_only() {
        assert_eq!(
            text(&mul([add([a(), b()]), c()])),
            "(vp:A(X_t) + vp:B(X_t)) · vp:C(X_t)"
        );
        assert_eq!(text(&mul([a(), b()])), "vp:A(X_t) · vp:B(X_t)");
        assert_eq!(
            text(&mul([a(), neg(b())])),
            "vp:A(X_t) · (-vp:B(X_t))"
        );
    }

    #[test]
    fn powers_and_negations() {
        assert_eq!(text(&pow(sub(a(), [b()]), 2)), "(vp:A(X_t) - vp:B(X_t))^2");
        assert_eq!(text(&neg(neg(a()))), "-(-vp:A(X_t))");
        assert_eq!(text(&neg(add([a(), b()]))), "-(vp:A(X_t) + vp:B(X_t))");
        assert_eq!(text(&pow(symbol("γ"), 2)), "γ^2");
    }

    #[test]
    fn aggregations() {
        let ra = derived(PolyName::family("InstructionRa", "i"), args![x_t()]);
        assert_eq!(
            text(&finite_product("i", FanIn::Exact(16), ra.clone())),
            "Π_{i=0}^{15} vp:InstructionRa(i)(X_t)"
        );
        assert_eq!(
            text(&finite_sum("j", "N_tables", ra)),
            "Σ_{j=0}^{N_tables-1} vp:InstructionRa(i)(X_t)"
        );
        assert_eq!(
            text(&hypercube_sum(&x_t(), mul([eq(&r1(), &x_t()), a()]))),
            "Σ_{X_t} eq(r_cycle^(1), X_t) · vp:A(X_t)"
        );
    }

    #[test]
    fn labeled_fixed_point() {
        let chunk = FixedPoint::labeled(5, Dim::new("N_v", "N_v", ""), "K_instr^(i)");
        assert_eq!(TextFormat.fixed_point(&chunk), "r_K_instr^(i)^(5)");
    }

    #[test]
    fn rendering_is_deterministic() {
        let tree = mul([
            eq(&r1(), &x_t()),
            sub(pow(a(), 2), [scale("γ", add([b(), c()]))]),
        ]);
        assert_eq!(text(&tree), text(&tree.clone()));
        insta::assert_snapshot!(
            text(&tree),
            @"eq(r_cycle^(1), X_t) · (vp:A(X_t)^2 - γ · (vp:B(X_t) + vp:C(X_t)))"
        );
    }
}
