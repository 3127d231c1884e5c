//! Stage 5: instruction read-RAF checking and two claim reductions.

use super::{VIRTUAL_INSTRUCTION_CHUNKS, gamma, gamma_pow};
use crate::dims;
use integrand_kernel::expr::{
    add, committed, computable, derived, eq, finite_product, finite_sum, int, mul, sub,
};
use integrand_kernel::{
    DeclaredDegree, FanIn, FixedPoint, FreeVar, PolyName, ProducedClaim, SumcheckSpec, args,
};

pub fn instruction_read_raf() -> SumcheckSpec {
    let x_k = FreeVar::new("X_k", dims::k_instr());
    let x_t = FreeVar::new("X_t", dims::cycle());
    let r2 = FixedPoint::new(2, dims::cycle());

    let ra = finite_product(
        "i",
        FanIn::Exact(VIRTUAL_INSTRUCTION_CHUNKS),
        derived(PolyName::family("InstructionRa", "i"), args![x_k, x_t]),
    );
    let val = finite_sum(
        "j",
        "N_tables",
        mul([
            computable("T_j", args![x_k]),
            derived(PolyName::family("TableFlag", "j"), args![x_t]),
        ]),
    );
    let raf_flag = || derived("InstructionRafFlag", args![x_t]);
    let raf = add([
        mul([
            sub(int(1), [raf_flag()]),
            add([
                computable("LeftOp", args![x_k]),
                mul([gamma(), computable("RightOp", args![x_k])]),
            ]),
        ]),
        mul([
            raf_flag(),
            mul([gamma(), computable("unmap", args![x_k])]),
        ]),
    ]);
    let integrand = mul([
        mul([eq(&r2, &x_t), ra]),
        add([val, mul([gamma(), raf])]),
    ]);

    let input_claim = add([
        derived("LookupOutput", args![r2]),
        mul([gamma(), derived("LeftLookupOperand", args![r2])]),
        mul([gamma_pow(2), derived("RightLookupOperand", args![r2])]),
    ]);

    let r5 = FixedPoint::new(5, dims::cycle());
    let chunk = FixedPoint::labeled(5, dims::n_v(), "K_instr^(i)");
    SumcheckSpec {
        name: "InstructionReadRaf".to_string(),
        sum_vars: vec![x_k.clone(), x_t.clone()],
        integrand,
        input_claim,
        opening_point: vec![FixedPoint::new(5, dims::k_instr()), r5.clone()],
        rounds: "log2(K_instr) + log2(T)".to_string(),
        degree: DeclaredDegree::Exact(19),
        produces: vec![
            ProducedClaim::new(PolyName::family("InstructionRa", "i"), args![chunk, r5])
                .for_each("i=0..d_v-1"),
            ProducedClaim::new(PolyName::family("TableFlag", "j"), args![r5])
                .for_each("j=0..N_tables-1"),
            ProducedClaim::new("InstructionRafFlag", args![r5]),
        ],
    }
}

pub fn ram_ra_claim_reduction() -> SumcheckSpec {
    let x_t = FreeVar::new("X_t", dims::cycle());
    let r2_k_ram = FixedPoint::new(2, dims::k_ram());
    let cycles = [1, 2, 4].map(|stage| FixedPoint::new(stage, dims::cycle()));
    let [r1, r2, r4] = &cycles;

    let eq_batch = add([
        eq(r1, &x_t),
        mul([gamma(), eq(r2, &x_t)]),
        mul([gamma_pow(2), eq(r4, &x_t)]),
    ]);
    let integrand = mul([eq_batch, derived("RamRa", args![r2_k_ram, x_t])]);
    let input_claim = add([
        derived("RamRa", args![r2_k_ram, *r1]),
        mul([gamma(), derived("RamRa", args![r2_k_ram, *r2])]),
        mul([gamma_pow(2), derived("RamRa", args![r2_k_ram, *r4])]),
    ]);

    let r5 = FixedPoint::new(5, dims::cycle());
    SumcheckSpec {
        name: "RamRaClaimReduction".to_string(),
        sum_vars: vec![x_t.clone()],
        integrand,
        input_claim,
        opening_point: vec![r5.clone()],
        rounds: "log2(T)".to_string(),
        degree: DeclaredDegree::Exact(2),
        produces: vec![ProducedClaim::new("RamRa", args![r2_k_ram, r5])],
    }
}

pub fn registers_val_evaluation() -> SumcheckSpec {
    let x_t = FreeVar::new("X_t", dims::cycle());
    let r4 = FixedPoint::new(4, dims::cycle());
    let r4_k_reg = FixedPoint::new(4, dims::k_reg());

    let integrand = mul([
        mul([
            committed("RdInc", args![x_t]),
            derived("RdWa", args![r4_k_reg, x_t]),
        ]),
        computable("LT_tilde", args![x_t, r4]),
    ]);

    let r5 = FixedPoint::new(5, dims::cycle());
    SumcheckSpec {
        name: "RegistersValEvaluation".to_string(),
        sum_vars: vec![x_t.clone()],
        integrand,
        input_claim: derived("RegistersVal", args![r4_k_reg, r4]),
        opening_point: vec![r5.clone()],
        rounds: "log2(T)".to_string(),
        degree: DeclaredDegree::Exact(3),
        produces: vec![
            ProducedClaim::new("RdInc", args![r5]),
            ProducedClaim::new("RdWa", args![r4_k_reg, r5]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use integrand_kernel::DegreeStatus;

    #[test]
    fn read_raf_degree_counts_every_chunk() {
        let check = instruction_read_raf().degree_check();
        assert_eq!(check.inferred, 19);
        assert_eq!(check.status, DegreeStatus::Consistent);
    }

    #[test]
    fn chunk_claims_are_quantified() {
        let spec = instruction_read_raf();
        let texts: Vec<String> = spec.produces.iter().map(ProducedClaim::to_text).collect();
        assert_eq!(
            texts,
            vec![
                "InstructionRa(i)(r_K_instr^(i)^(5), r_cycle^(5)) for i=0..d_v-1",
                "TableFlag(j)(r_cycle^(5)) for j=0..N_tables-1",
                "InstructionRafFlag(r_cycle^(5))",
            ]
        );
    }

    #[test]
    fn reduction_consumes_three_cycle_points() {
        let spec = ram_ra_claim_reduction();
        let mut points = Vec::new();
        spec.input_claim.visit_leaves(&mut |_, leaf| {
            points.push(leaf.fixed_points().map(|p| p.stage).collect::<Vec<_>>());
        });
        assert_eq!(points, vec![vec![2, 1], vec![2, 2], vec![2, 4]]);
    }
}
