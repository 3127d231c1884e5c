//! Stage 6: booleanity, bytecode read-RAF, and the RA virtualizations.
//!
//! The virtualization sumchecks reduce a claim about a derived
//! read-address polynomial to claims about its committed one-hot chunks.

use super::{batch, gamma, gamma_pow, instr_flag, op_flag};
use crate::dims;
use integrand_kernel::expr::{
    add, committed, computable, derived, eq, finite_product, finite_sum, int, mul, pow, sub,
    symbol,
};
use integrand_kernel::{
    DeclaredDegree, FixedPoint, FreeVar, PolyName, ProducedClaim, SumcheckSpec, args,
};

pub fn ram_hamming_booleanity() -> SumcheckSpec {
    let x_t = FreeVar::new("X_t", dims::cycle());
    let r1 = FixedPoint::new(1, dims::cycle());
    let weight = || derived("RamHammingWeight", args![x_t]);

    let r6 = FixedPoint::new(6, dims::cycle());
    SumcheckSpec {
        name: "RamHammingBooleanity".to_string(),
        sum_vars: vec![x_t.clone()],
        integrand: mul([eq(&r1, &x_t), sub(pow(weight(), 2), [weight()])]),
        input_claim: int(0),
        opening_point: vec![r6.clone()],
        rounds: "log2(T)".to_string(),
        degree: DeclaredDegree::Exact(3),
        produces: vec![ProducedClaim::new("RamHammingWeight", args![r6])],
    }
}

pub fn inc_claim_reduction() -> SumcheckSpec {
    let x_t = FreeVar::new("X_t", dims::cycle());
    let [r2, r4, r5] = [2, 4, 5].map(|stage| FixedPoint::new(stage, dims::cycle()));

    let integrand = add([
        mul([
            committed("RamInc", args![x_t]),
            add([eq(&r2, &x_t), mul([gamma(), eq(&r4, &x_t)])]),
        ]),
        mul([
            gamma_pow(2),
            mul([
                committed("RdInc", args![x_t]),
                add([eq(&r4, &x_t), mul([gamma(), eq(&r5, &x_t)])]),
            ]),
        ]),
    ]);
    let input_claim = batch(
        "γ",
        [
            committed("RamInc", args![r2]),
            committed("RamInc", args![r4]),
            committed("RdInc", args![r4]),
            committed("RdInc", args![r5]),
        ],
    );

    let r6 = FixedPoint::new(6, dims::cycle());
    SumcheckSpec {
        name: "IncClaimReduction".to_string(),
        sum_vars: vec![x_t.clone()],
        integrand,
        input_claim,
        opening_point: vec![r6.clone()],
        rounds: "log2(T)".to_string(),
        degree: DeclaredDegree::Exact(2),
        produces: vec![
            ProducedClaim::new("RamInc", args![r6]),
            ProducedClaim::new("RdInc", args![r6]),
        ],
    }
}

pub fn bytecode_read_raf() -> SumcheckSpec {
    let x_k = FreeVar::new("X_k", dims::k_bc());
    let x_t = FreeVar::new("X_t", dims::cycle());
    let cycle = |stage: u32| FixedPoint::new(stage, dims::cycle());

    let ra = finite_product(
        "i",
        "d_bc",
        committed(PolyName::family("BytecodeRa", "i"), args![x_k, x_t]),
    );
    let read_values = batch(
        "γ",
        (1..=5).map(|stage| {
            mul([
                eq(cycle(stage), &x_t),
                computable(format!("W_{stage}").as_str(), args![x_k]),
            ])
        }),
    );
    let integrand = mul([ra, read_values]);

    let (r1, r2, r3, r5) = (cycle(1), cycle(2), cycle(3), cycle(5));
    let r4_k_reg = FixedPoint::new(4, dims::k_reg());
    let at = |name: PolyName, point: &FixedPoint| derived(name, args![*point]);

    let rv_1 = add([
        at("UnexpandedPC".into(), &r1),
        mul([symbol("γ_1"), at("Imm".into(), &r1)]),
        finite_sum(
            "i",
            "N_cflags",
            mul([
                symbol("γ_1^{2+i}"),
                at(PolyName::family("OpFlags", "cf_i"), &r1),
            ]),
        ),
    ]);
    let rv_2 = batch(
        "γ_2",
        [
            at(op_flag("Jump"), &r2),
            at(instr_flag("Branch"), &r2),
            at(instr_flag("IsRdNotZero"), &r2),
            at(op_flag("WriteLookupOutputToRD"), &r2),
            at(op_flag("VirtualInstruction"), &r2),
        ],
    );
    let rv_3 = batch(
        "γ_3",
        [
            at("Imm".into(), &r3),
            at("UnexpandedPC".into(), &r3),
            at(instr_flag("LeftOperandIsRs1Value"), &r3),
            at(instr_flag("LeftOperandIsPC"), &r3),
            at(instr_flag("RightOperandIsRs2Value"), &r3),
            at(instr_flag("RightOperandIsImm"), &r3),
            at(instr_flag("IsNoop"), &r3),
            at(op_flag("VirtualInstruction"), &r3),
            at(op_flag("IsFirstInSequence"), &r3),
        ],
    );
    let r4 = cycle(4);
    let rv_4 = batch(
        "γ_4",
        ["RdWa", "Rs1Ra", "Rs2Ra"].map(|name| derived(name, args![r4_k_reg, r4])),
    );
    let rv_5 = add([
        derived("RdWa", args![r4_k_reg, r5]),
        mul([symbol("γ_5"), at("InstructionRafFlag".into(), &r5)]),
        finite_sum(
            "i",
            "N_tables",
            mul([
                symbol("γ_5^{2+i}"),
                at(PolyName::family("TableFlag", "j"), &r5),
            ]),
        ),
    ]);
    let input_claim = batch(
        "γ",
        [
            rv_1,
            rv_2,
            rv_3,
            rv_4,
            rv_5,
            at("PC".into(), &r1),
            at("PC".into(), &r3),
        ],
    );

    let r6 = cycle(6);
    SumcheckSpec {
        name: "BytecodeReadRaf".to_string(),
        sum_vars: vec![x_k.clone(), x_t.clone()],
        integrand,
        input_claim,
        opening_point: vec![FixedPoint::new(6, dims::k_bc()), r6.clone()],
        rounds: "log2(K_bc) + log2(T)".to_string(),
        degree: "d_bc + 1".into(),
        produces: vec![
            ProducedClaim::new(
                PolyName::family("BytecodeRa", "i"),
                args![FixedPoint::labeled(6, dims::addr(), "K_bc^(i)"), r6],
            )
            .for_each("i=0..d_bc-1"),
        ],
    }
}

pub fn instruction_ra_virtualization() -> SumcheckSpec {
    let x_t = FreeVar::new("X_t", dims::cycle());
    let r5 = FixedPoint::new(5, dims::cycle());

    let chunks = finite_product(
        "j",
        "M",
        committed(
            PolyName::member("InstructionRa", "iM+j"),
            args![FixedPoint::labeled(5, dims::addr(), "K^(iM+j)"), x_t],
        ),
    );
    let integrand = mul([
        eq(&r5, &x_t),
        finite_sum("i", "d_v", mul([symbol("γ^i"), chunks])),
    ]);
    let input_claim = finite_sum(
        "i",
        "d_v",
        mul([
            symbol("γ^i"),
            derived(
                PolyName::family("InstructionRa", "i"),
                args![FixedPoint::labeled(5, dims::n_v(), "K_instr^(i)"), r5],
            ),
        ]),
    );

    let r6 = FixedPoint::new(6, dims::cycle());
    SumcheckSpec {
        name: "InstructionRaVirtualization".to_string(),
        sum_vars: vec![x_t.clone()],
        integrand,
        input_claim,
        opening_point: vec![r6.clone()],
        rounds: "log2(T)".to_string(),
        degree: "M + 1".into(),
        produces: vec![
            ProducedClaim::new(
                PolyName::family("InstructionRa", "j"),
                args![FixedPoint::labeled(5, dims::addr(), "K^(j)"), r6],
            )
            .for_each("j=0..d_instr-1"),
        ],
    }
}

pub fn ram_ra_virtualization() -> SumcheckSpec {
    let x_t = FreeVar::new("X_t", dims::cycle());
    let r5 = FixedPoint::new(5, dims::cycle());
    let chunk = FixedPoint::labeled(2, dims::addr(), "K_ram^(i)");

    let chunks = finite_product(
        "i",
        "d_ram",
        committed(PolyName::family("RamRa", "i"), args![chunk, x_t]),
    );

    let r6 = FixedPoint::new(6, dims::cycle());
    SumcheckSpec {
        name: "RamRaVirtualization".to_string(),
        sum_vars: vec![x_t.clone()],
        integrand: mul([eq(&r5, &x_t), chunks]),
        input_claim: derived("RamRa", args![FixedPoint::new(2, dims::k_ram()), r5]),
        opening_point: vec![r6.clone()],
        rounds: "log2(T)".to_string(),
        degree: "d_ram + 1".into(),
        produces: vec![
            ProducedClaim::new(PolyName::family("RamRa", "i"), args![chunk, r6])
                .for_each("i=0..d_ram-1"),
        ],
    }
}

pub fn booleanity() -> SumcheckSpec {
    let x_k = FreeVar::new("X_k", dims::addr());
    let x_t = FreeVar::new("X_t", dims::cycle());
    let r5_addr = FixedPoint::new(5, dims::addr());
    let r5 = FixedPoint::new(5, dims::cycle());
    let ra = || committed("Ra_j", args![x_k, x_t]);

    let integrand = mul([
        computable("eq", args![r5_addr, r5, x_k, x_t]),
        finite_sum(
            "j",
            "d",
            mul([symbol("γ^{2j}"), sub(pow(ra(), 2), [ra()])]),
        ),
    ]);

    let r6_addr = FixedPoint::new(6, dims::addr());
    let r6 = FixedPoint::new(6, dims::cycle());
    SumcheckSpec {
        name: "Booleanity".to_string(),
        sum_vars: vec![x_k.clone(), x_t.clone()],
        integrand,
        input_claim: int(0),
        opening_point: vec![r6_addr.clone(), r6.clone()],
        rounds: "log2(N_instr) + log2(T)".to_string(),
        degree: DeclaredDegree::Exact(3),
        produces: vec![
            ProducedClaim::new("Ra_j", args![r6_addr, r6])
                .for_each("j=0..d-1 (d = d_instr + d_bc + d_ram)"),
        ],
    }
}
