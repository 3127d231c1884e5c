//! Format-agnostic rendering of expression trees.
//!
//! A [`Format`] decides how each node looks; [`render`] decides when to
//! parenthesize and when an addition is really a subtraction. New output
//! formats implement the trait and never touch precedence.

use crate::arg::{Arg, FixedPoint, FreeVar};
use crate::expr::{Constant, Expr, FanIn, Leaf};
use crate::name::PolyName;

/// One rendering callback per node kind.
pub trait Format {
    fn free_var(&self, var: &FreeVar) -> String;
    fn fixed_point(&self, point: &FixedPoint) -> String;

    fn arg(&self, arg: &Arg) -> String {
        match arg {
            Arg::Free(var) => self.free_var(var),
            Arg::Fixed(point) => self.fixed_point(point),
        }
    }

    fn constant(&self, value: &Constant) -> String;
    fn committed(&self, name: &PolyName, args: &[String]) -> String;
    fn derived(&self, name: &PolyName, args: &[String]) -> String;
    fn computable(&self, name: &PolyName, args: &[String]) -> String;

    fn add(&self, left: &str, right: &str) -> String;
    fn sub(&self, left: &str, right: &str) -> String;
    fn mul(&self, left: &str, right: &str) -> String;
    fn pow(&self, base: &str, exponent: u32) -> String;
    fn neg(&self, inner: &str) -> String;

    fn hypercube_sum(&self, var: &FreeVar, body: &str) -> String;
    fn finite_sum(&self, index: &str, count: &FanIn, body: &str) -> String;
    fn finite_product(&self, index: &str, count: &FanIn, body: &str) -> String;

    fn parens(&self, s: &str) -> String;
}

/// Renders `expr` with `fmt`. Pure: equal inputs give identical output.
pub fn render<F: Format + ?Sized>(expr: &Expr, fmt: &F) -> String {
    match expr {
        Expr::Const(value) => fmt.constant(value),
        Expr::Committed(leaf) => fmt.committed(&leaf.name, &render_args(leaf, fmt)),
        Expr::Derived(leaf) => fmt.derived(&leaf.name, &render_args(leaf, fmt)),
        Expr::Computable(leaf) => fmt.computable(&leaf.name, &render_args(leaf, fmt)),
        Expr::Add(left, right) => match right.as_ref() {
            Expr::Neg(subtrahend) => fmt.sub(&render(left, fmt), &operand(subtrahend, fmt)),
            _ => fmt.add(&render(left, fmt), &render(right, fmt)),
        },
        Expr::Mul(left, right) => fmt.mul(&operand(left, fmt), &operand(right, fmt)),
        Expr::Pow(base, exponent) => fmt.pow(&operand(base, fmt), *exponent),
        Expr::Neg(inner) => fmt.neg(&operand(inner, fmt)),
        Expr::Sum { var, body } => fmt.hypercube_sum(var, &render(body, fmt)),
        Expr::FiniteSum(agg) => fmt.finite_sum(&agg.index, &agg.count, &render(&agg.body, fmt)),
        Expr::FiniteProduct(agg) => {
            fmt.finite_product(&agg.index, &agg.count, &render(&agg.body, fmt))
        }
    }
}

/// Renders a child of a product, power, negation or subtraction, grouping
/// it when it binds looser than its parent.
fn operand<F: Format + ?Sized>(expr: &Expr, fmt: &F) -> String {
    let rendered = render(expr, fmt);
    if expr.is_additive() {
        fmt.parens(&rendered)
    } else {
        rendered
    }
}

fn render_args<F: Format + ?Sized>(leaf: &Leaf, fmt: &F) -> Vec<String> {
    leaf.args.iter().map(|arg| fmt.arg(arg)).collect()
}

/// `head(a, b)`, or bare `head` for a nullary call.
pub fn apply(head: &str, args: &[String]) -> String {
    if args.is_empty() {
        head.to_string()
    } else {
        format!("{head}({})", args.join(", "))
    }
}
