//! The seven proving stages, in protocol order.
//!
//! Each submodule builds the specifications that share one batch of
//! challenges. Fixed points carry the index of the stage whose challenges
//! bound them, so `r_cycle^(2)` is the cycle point fixed in stage 2.

mod stage1;
mod stage2;
mod stage3;
mod stage4;
mod stage5;
mod stage6;
mod stage7;

use integrand_kernel::expr::{add, mul, pow, symbol};
use integrand_kernel::{Expr, PolyName, Stage};

pub use stage1::spartan_outer;
pub use stage2::{
    instruction_claim_reduction, product_virtualization, ram_output_check, ram_raf_evaluation,
    ram_read_write,
};
pub use stage3::{instruction_input, registers_claim_reduction, shift};
pub use stage4::{ram_val_check, registers_read_write};
pub use stage5::{instruction_read_raf, ram_ra_claim_reduction, registers_val_evaluation};
pub use stage6::{
    booleanity, bytecode_read_raf, inc_claim_reduction, instruction_ra_virtualization,
    ram_hamming_booleanity, ram_ra_virtualization,
};
pub use stage7::hamming_weight_claim_reduction;

/// Virtual chunks per instruction address; the fan-in of the virtual
/// `InstructionRa` product in stage 5.
pub const VIRTUAL_INSTRUCTION_CHUNKS: u32 = 16;

pub fn stages() -> Vec<Stage> {
    vec![
        Stage::new(1, "Spartan", vec![spartan_outer().into()]),
        Stage::new(
            2,
            "Virtualization & RAM",
            vec![
                product_virtualization().into(),
                ram_read_write().into(),
                instruction_claim_reduction().into(),
                ram_raf_evaluation().into(),
                ram_output_check().into(),
            ],
        ),
        Stage::new(
            3,
            "Shift & Instruction Input",
            vec![
                shift().into(),
                instruction_input().into(),
                registers_claim_reduction().into(),
            ],
        ),
        Stage::new(
            4,
            "Registers & RAM Val",
            vec![registers_read_write().into(), ram_val_check().into()],
        ),
        Stage::new(
            5,
            "Instruction Read RAF & Reductions",
            vec![
                instruction_read_raf().into(),
                ram_ra_claim_reduction().into(),
                registers_val_evaluation().into(),
            ],
        ),
        Stage::new(
            6,
            "Booleanity, Bytecode & Virtualization",
            vec![
                ram_hamming_booleanity().into(),
                inc_claim_reduction().into(),
                bytecode_read_raf().into(),
                instruction_ra_virtualization().into(),
                ram_ra_virtualization().into(),
                booleanity().into(),
            ],
        ),
        Stage::new(
            7,
            "Hamming Weight Claim Reduction",
            vec![hamming_weight_claim_reduction().into()],
        ),
    ]
}

pub(crate) fn op_flag(member: &str) -> PolyName {
    PolyName::member("OpFlags", member)
}

pub(crate) fn instr_flag(member: &str) -> PolyName {
    PolyName::member("InstructionFlags", member)
}

/// The batching challenge `γ`.
pub(crate) fn gamma() -> Expr {
    symbol("γ")
}

pub(crate) fn gamma_pow(exponent: u32) -> Expr {
    pow(gamma(), exponent)
}

/// `t0 + c · t1 + c^2 · t2 + ...` for a batching challenge `c`.
pub(crate) fn batch(challenge: &str, terms: impl IntoIterator<Item = Expr>) -> Expr {
    add(terms.into_iter().enumerate().map(|(k, term)| match k {
        0 => term,
        1 => mul([symbol(challenge), term]),
        _ => mul([pow(symbol(challenge), k as u32), term]),
    }))
}
