//! Stage 7: one reduction folding the Hamming-weight, booleanity and
//! virtualization claims on every committed RA chunk into a single point.

use crate::dims;
use integrand_kernel::expr::{add, committed, derived, eq, finite_sum, mul, symbol};
use integrand_kernel::{DeclaredDegree, FixedPoint, FreeVar, ProducedClaim, SumcheckSpec, args};

pub fn hamming_weight_claim_reduction() -> SumcheckSpec {
    let x_k = FreeVar::new("X_k", dims::addr());
    let r6_addr = FixedPoint::new(6, dims::addr());
    let r6_addr_j = FixedPoint::labeled(6, dims::addr(), "addr_j");
    let r6 = FixedPoint::new(6, dims::cycle());

    let per_chunk = add([
        symbol("γ^{3j}"),
        mul([symbol("γ^{3j+1}"), eq(&r6_addr, &x_k)]),
        mul([symbol("γ^{3j+2}"), eq(&r6_addr_j, &x_k)]),
    ]);
    let integrand = finite_sum(
        "j",
        "N_ra",
        mul([committed("Ra_j", args![x_k, r6]), per_chunk]),
    );

    // Instruction and bytecode chunks have Hamming weight one; RAM chunks
    // carry the weight proven in stage 6.
    let hamming = add([
        symbol("Σ_{j∈instr∪bc} γ^{3j}"),
        mul([
            symbol("Σ_{j∈ram} γ^{3j}"),
            derived("RamHammingWeight", args![r6]),
        ]),
    ]);
    let booleanity = finite_sum(
        "j",
        "N_ra",
        mul([symbol("γ^{3j+1}"), committed("Ra_j", args![r6_addr, r6])]),
    );
    let virtualization = finite_sum(
        "j",
        "N_ra",
        mul([symbol("γ^{3j+2}"), committed("Ra_j", args![r6_addr_j, r6])]),
    );

    let r7_addr = FixedPoint::new(7, dims::addr());
    SumcheckSpec {
        name: "HammingWeightClaimReduction".to_string(),
        sum_vars: vec![x_k.clone()],
        integrand,
        input_claim: add([hamming, booleanity, virtualization]),
        opening_point: vec![r7_addr.clone()],
        rounds: "log2(N_instr)".to_string(),
        degree: DeclaredDegree::Exact(2),
        produces: vec![
            ProducedClaim::new("Ra_j", args![r7_addr, r6])
                .for_each("j=0..N_ra-1 (N_ra = d_instr + d_bc + d_ram)"),
        ],
    }
}
