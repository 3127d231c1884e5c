//! Stage 4: register read/write checking and the RAM value check.

use super::gamma;
use super::gamma_pow;
use crate::dims;
use integrand_kernel::expr::{add, committed, computable, derived, eq, mul, sub};
use integrand_kernel::{DeclaredDegree, FixedPoint, FreeVar, ProducedClaim, SumcheckSpec, args};

pub fn registers_read_write() -> SumcheckSpec {
    let x_k = FreeVar::new("X_k", dims::k_reg());
    let x_t = FreeVar::new("X_t", dims::cycle());
    let r3 = FixedPoint::new(3, dims::cycle());
    let over = |name: &str| derived(name, args![x_k, x_t]);

    let integrand = mul([
        eq(&r3, &x_t),
        add([
            mul([
                over("RdWa"),
                add([committed("RdInc", args![x_t]), over("RegistersVal")]),
            ]),
            mul([gamma(), mul([over("Rs1Ra"), over("RegistersVal")])]),
            mul([gamma_pow(2), mul([over("Rs2Ra"), over("RegistersVal")])]),
        ]),
    ]);
    let input_claim = add([
        derived("RdWriteValue", args![r3]),
        mul([gamma(), derived("Rs1Value", args![r3])]),
        mul([gamma_pow(2), derived("Rs2Value", args![r3])]),
    ]);

    let r4_k_reg = FixedPoint::new(4, dims::k_reg());
    let r4 = FixedPoint::new(4, dims::cycle());
    let mut produces: Vec<ProducedClaim> = ["RegistersVal", "Rs1Ra", "Rs2Ra", "RdWa"]
        .into_iter()
        .map(|name| ProducedClaim::new(name, args![r4_k_reg, r4]))
        .collect();
    produces.push(ProducedClaim::new("RdInc", args![r4]));

    SumcheckSpec {
        name: "RegistersReadWriteChecking".to_string(),
        sum_vars: vec![x_k.clone(), x_t.clone()],
        integrand,
        input_claim,
        opening_point: vec![r4_k_reg, r4],
        rounds: "log2(K_reg) + log2(T)".to_string(),
        degree: DeclaredDegree::Exact(3),
        produces,
    }
}

pub fn ram_val_check() -> SumcheckSpec {
    let x_t = FreeVar::new("X_t", dims::cycle());
    let r2 = FixedPoint::new(2, dims::cycle());
    let r2_k_ram = FixedPoint::new(2, dims::k_ram());

    let integrand = mul([
        committed("RamInc", args![x_t]),
        mul([
            derived("RamRa", args![r2_k_ram, x_t]),
            add([computable("LT_tilde", args![x_t, r2]), gamma()]),
        ]),
    ]);
    let val_init = || derived("RamValInit", args![r2_k_ram]);
    let input_claim = add([
        sub(derived("RamVal", args![r2_k_ram, r2]), [val_init()]),
        mul([
            gamma(),
            sub(derived("RamValFinal", args![r2_k_ram]), [val_init()]),
        ]),
    ]);

    let r4 = FixedPoint::new(4, dims::cycle());
    SumcheckSpec {
        name: "RamValCheck".to_string(),
        sum_vars: vec![x_t.clone()],
        integrand,
        input_claim,
        opening_point: vec![r4.clone()],
        rounds: "log2(T)".to_string(),
        degree: DeclaredDegree::Exact(3),
        produces: vec![
            ProducedClaim::new("RamInc", args![r4]),
            ProducedClaim::new("RamRa", args![r2_k_ram, r4]),
        ],
    }
}
