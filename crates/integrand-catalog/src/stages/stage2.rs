//! Stage 2: product virtualization and the first RAM checks.
//!
//! All five specifications consume claims at `r_cycle^(1)` from the Spartan
//! outer sumcheck. The RAM specifications bind the address point
//! `r_K_ram^(2)` that later stages reuse.

use super::{gamma, gamma_pow, instr_flag, op_flag};
use crate::dims;
use integrand_kernel::expr::{add, committed, computable, derived, eq, int, mul, sub};
use integrand_kernel::{
    DeclaredDegree, FixedPoint, FreeVar, PolyName, ProducedClaim, ProductConstraint, ProductVirtSpec,
    SumcheckSpec, args,
};

pub fn product_virtualization() -> ProductVirtSpec {
    let x_t = FreeVar::new("X_t", dims::cycle());
    let v = |name: PolyName| derived(name, args![x_t]);
    let p = |name: &str| v(PolyName::new(name));

    let constraints = vec![
        ProductConstraint::new(
            "Product",
            p("LeftInstructionInput"),
            p("RightInstructionInput"),
            p("Product"),
        ),
        ProductConstraint::new(
            "WriteLookupOutputToRD",
            v(instr_flag("IsRdNotZero")),
            v(op_flag("WriteLookupOutputToRD")),
            p("WriteLookupOutputToRD"),
        ),
        ProductConstraint::new(
            "WritePCtoRD",
            v(instr_flag("IsRdNotZero")),
            v(op_flag("Jump")),
            p("WritePCtoRD"),
        ),
        ProductConstraint::new(
            "ShouldBranch",
            p("LookupOutput"),
            v(instr_flag("Branch")),
            p("ShouldBranch"),
        ),
        ProductConstraint::new(
            "ShouldJump",
            v(op_flag("Jump")),
            sub(int(1), [p("NextIsNoop")]),
            p("ShouldJump"),
        ),
    ];

    let r1 = FixedPoint::new(1, dims::cycle());
    let input_claim = add(
        [
            "Product",
            "WriteLookupOutputToRD",
            "WritePCtoRD",
            "ShouldBranch",
            "ShouldJump",
        ]
        .into_iter()
        .map(|name| derived(name, args![r1])),
    );

    let r2 = FixedPoint::new(2, dims::cycle());
    let factors = [
        PolyName::new("LeftInstructionInput"),
        PolyName::new("RightInstructionInput"),
        instr_flag("IsRdNotZero"),
        op_flag("WriteLookupOutputToRD"),
        op_flag("Jump"),
        PolyName::new("LookupOutput"),
        instr_flag("Branch"),
        PolyName::new("NextIsNoop"),
        op_flag("VirtualInstruction"),
    ];

    ProductVirtSpec {
        name: "SpartanProductVirtualization".to_string(),
        cycle_var: x_t.clone(),
        constraint_domain: (-2..=2).collect(),
        constraints,
        input_claim: Some(input_claim),
        produces: factors
            .into_iter()
            .map(|name| ProducedClaim::new(name, args![r2]))
            .collect(),
    }
}

pub fn ram_read_write() -> SumcheckSpec {
    let x_k = FreeVar::new("X_k", dims::k_ram());
    let x_j = FreeVar::new("X_j", dims::cycle());
    let r1 = FixedPoint::new(1, dims::cycle());

    let ram_val = || derived("RamVal", args![x_k, x_j]);
    let inner = add([
        ram_val(),
        mul([
            gamma(),
            add([ram_val(), committed("RamInc", args![x_j])]),
        ]),
    ]);
    let integrand = mul([
        mul([eq(&r1, &x_j), derived("RamRa", args![x_k, x_j])]),
        inner,
    ]);
    let input_claim = add([
        derived("RamReadValue", args![r1]),
        mul([gamma(), derived("RamWriteValue", args![r1])]),
    ]);

    let r2_k_ram = FixedPoint::new(2, dims::k_ram());
    let r2_cycle = FixedPoint::new(2, dims::cycle());
    SumcheckSpec {
        name: "RamReadWriteChecking".to_string(),
        sum_vars: vec![x_k.clone(), x_j.clone()],
        integrand,
        input_claim,
        opening_point: vec![r2_k_ram.clone(), r2_cycle.clone()],
        rounds: "log2(K_ram) + log2(T)".to_string(),
        degree: DeclaredDegree::Exact(3),
        produces: vec![
            ProducedClaim::new("RamVal", args![r2_k_ram, r2_cycle]),
            ProducedClaim::new("RamRa", args![r2_k_ram, r2_cycle]),
            ProducedClaim::new("RamInc", args![r2_cycle]),
        ],
    }
}

pub fn instruction_claim_reduction() -> SumcheckSpec {
    let x_j = FreeVar::new("X_j", dims::cycle());
    let r1 = FixedPoint::new(1, dims::cycle());

    let batch = add([
        derived("LookupOutput", args![x_j]),
        mul([gamma(), derived("LeftLookupOperand", args![x_j])]),
        mul([gamma_pow(2), derived("RightLookupOperand", args![x_j])]),
    ]);
    let input_claim = add([
        derived("LookupOutput", args![r1]),
        mul([gamma(), derived("LeftLookupOperand", args![r1])]),
        mul([gamma_pow(2), derived("RightLookupOperand", args![r1])]),
    ]);

    let r2 = FixedPoint::new(2, dims::cycle());
    SumcheckSpec {
        name: "InstructionClaimReduction".to_string(),
        sum_vars: vec![x_j.clone()],
        integrand: mul([eq(&r1, &x_j), batch]),
        input_claim,
        opening_point: vec![r2.clone()],
        rounds: "log2(T)".to_string(),
        degree: DeclaredDegree::Exact(2),
        produces: [
            "LookupOutput",
            "LeftLookupOperand",
            "RightLookupOperand",
            "LeftInstructionInput",
            "RightInstructionInput",
        ]
        .into_iter()
        .map(|name| ProducedClaim::new(name, args![r2]))
        .collect(),
    }
}

pub fn ram_raf_evaluation() -> SumcheckSpec {
    let x_k = FreeVar::new("X_k", dims::k_ram());
    let r1 = FixedPoint::new(1, dims::cycle());
    let r2_k_ram = FixedPoint::new(2, dims::k_ram());

    SumcheckSpec {
        name: "RamRafEvaluation".to_string(),
        sum_vars: vec![x_k.clone()],
        integrand: mul([
            derived("RamRa", args![x_k, r1]),
            computable("unmap", args![x_k]),
        ]),
        input_claim: derived("RamAddress", args![r1]),
        opening_point: vec![r2_k_ram.clone()],
        rounds: "log2(K_ram)".to_string(),
        degree: DeclaredDegree::Exact(2),
        produces: vec![ProducedClaim::new("RamRa", args![r2_k_ram, r1])],
    }
}

pub fn ram_output_check() -> SumcheckSpec {
    let x_k = FreeVar::new("X_k", dims::k_ram());
    let r2_k_ram = FixedPoint::new(2, dims::k_ram());

    let integrand = mul([
        mul([eq(&r2_k_ram, &x_k), computable("io_mask", args![x_k])]),
        sub(
            derived("RamValFinal", args![x_k]),
            [computable("ValIO", args![x_k])],
        ),
    ]);

    SumcheckSpec {
        name: "RamOutputCheck".to_string(),
        sum_vars: vec![x_k.clone()],
        integrand,
        input_claim: int(0),
        opening_point: vec![r2_k_ram.clone()],
        rounds: "log2(K_ram)".to_string(),
        // Declared one lower than the tree; reported by the degree check.
        degree: DeclaredDegree::Exact(2),
        produces: vec![ProducedClaim::new("RamValFinal", args![r2_k_ram])],
    }
}
