//! Stage 3: shift, instruction-input and register claim reductions.

use super::{gamma, gamma_pow, instr_flag, op_flag};
use crate::dims;
use integrand_kernel::expr::{add, computable, derived, eq, int, mul, sub};
use integrand_kernel::{DeclaredDegree, FixedPoint, FreeVar, PolyName, ProducedClaim, SumcheckSpec, args};

pub fn shift() -> SumcheckSpec {
    let x_j = FreeVar::new("X_j", dims::cycle());
    let r1 = FixedPoint::new(1, dims::cycle());
    let r2 = FixedPoint::new(2, dims::cycle());
    let v = |name: PolyName| derived(name, args![x_j]);

    let batch = add([
        v("UnexpandedPC".into()),
        mul([gamma(), v("PC".into())]),
        mul([gamma_pow(2), v(op_flag("VirtualInstruction"))]),
        mul([gamma_pow(3), v(op_flag("IsFirstInSequence"))]),
    ]);
    let not_noop = sub(int(1), [v(instr_flag("IsNoop"))]);
    let integrand = add([
        mul([computable("EqPlusOne_tilde", args![r1, x_j]), batch]),
        mul([
            gamma_pow(4),
            mul([computable("EqPlusOne_tilde", args![r2, x_j]), not_noop]),
        ]),
    ]);

    let input_claim = add([
        derived("NextUnexpandedPC", args![r1]),
        mul([gamma(), derived("NextPC", args![r1])]),
        mul([gamma_pow(2), derived("NextIsVirtual", args![r1])]),
        mul([gamma_pow(3), derived("NextIsFirstInSequence", args![r1])]),
        mul([
            gamma_pow(4),
            sub(int(1), [derived("NextIsNoop", args![r2])]),
        ]),
    ]);

    let r3 = FixedPoint::new(3, dims::cycle());
    SumcheckSpec {
        name: "Shift".to_string(),
        sum_vars: vec![x_j.clone()],
        integrand,
        input_claim,
        opening_point: vec![r3.clone()],
        rounds: "log2(T)".to_string(),
        degree: DeclaredDegree::Exact(2),
        produces: [
            PolyName::new("UnexpandedPC"),
            PolyName::new("PC"),
            op_flag("VirtualInstruction"),
            op_flag("IsFirstInSequence"),
            instr_flag("IsNoop"),
        ]
        .into_iter()
        .map(|name| ProducedClaim::new(name, args![r3]))
        .collect(),
    }
}

pub fn instruction_input() -> SumcheckSpec {
    let x_j = FreeVar::new("X_j", dims::cycle());
    let r1 = FixedPoint::new(1, dims::cycle());
    let r2 = FixedPoint::new(2, dims::cycle());
    let v = |name: PolyName| derived(name, args![x_j]);

    let right_operand = add([
        mul([v(instr_flag("RightOperandIsRs2Value")), v("Rs2Value".into())]),
        mul([v(instr_flag("RightOperandIsImm")), v("Imm".into())]),
    ]);
    let left_operand = add([
        mul([v(instr_flag("LeftOperandIsRs1Value")), v("Rs1Value".into())]),
        mul([v(instr_flag("LeftOperandIsPC")), v("UnexpandedPC".into())]),
    ]);
    let operands = add([right_operand, mul([gamma(), left_operand])]);
    let integrand = mul([
        add([eq(&r1, &x_j), mul([gamma_pow(2), eq(&r2, &x_j)])]),
        operands,
    ]);

    let input_claim = add([
        derived("RightInstructionInput", args![r1]),
        mul([gamma(), derived("LeftInstructionInput", args![r1])]),
        mul([gamma_pow(2), derived("RightInstructionInput", args![r2])]),
        mul([gamma_pow(3), derived("LeftInstructionInput", args![r2])]),
    ]);

    let r3 = FixedPoint::new(3, dims::cycle());
    SumcheckSpec {
        name: "InstructionInput".to_string(),
        sum_vars: vec![x_j.clone()],
        integrand,
        input_claim,
        opening_point: vec![r3.clone()],
        rounds: "log2(T)".to_string(),
        // The operand block is already quadratic, so the tree infers 3.
        degree: DeclaredDegree::Exact(2),
        produces: [
            instr_flag("LeftOperandIsRs1Value"),
            PolyName::new("Rs1Value"),
            instr_flag("LeftOperandIsPC"),
            PolyName::new("UnexpandedPC"),
            instr_flag("RightOperandIsRs2Value"),
            PolyName::new("Rs2Value"),
            instr_flag("RightOperandIsImm"),
            PolyName::new("Imm"),
        ]
        .into_iter()
        .map(|name| ProducedClaim::new(name, args![r3]))
        .collect(),
    }
}

pub fn registers_claim_reduction() -> SumcheckSpec {
    let x_j = FreeVar::new("X_j", dims::cycle());
    let r1 = FixedPoint::new(1, dims::cycle());

    let batch = add([
        derived("RdWriteValue", args![x_j]),
        mul([gamma(), derived("Rs1Value", args![x_j])]),
        mul([gamma_pow(2), derived("Rs2Value", args![x_j])]),
    ]);
    let input_claim = add([
        derived("RdWriteValue", args![r1]),
        mul([gamma(), derived("Rs1Value", args![r1])]),
        mul([gamma_pow(2), derived("Rs2Value", args![r1])]),
    ]);

    let r3 = FixedPoint::new(3, dims::cycle());
    SumcheckSpec {
        name: "RegistersClaimReduction".to_string(),
        sum_vars: vec![x_j.clone()],
        integrand: mul([eq(&r1, &x_j), batch]),
        input_claim,
        opening_point: vec![r3.clone()],
        rounds: "log2(T)".to_string(),
        degree: DeclaredDegree::Exact(2),
        produces: ["RdWriteValue", "Rs1Value", "Rs2Value"]
            .into_iter()
            .map(|name| ProducedClaim::new(name, args![r3]))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use integrand_kernel::{DegreeStatus, TextFormat, render};

    #[test]
    fn shift_input_claim_text() {
        insta::assert_snapshot!(
            render(&shift().input_claim, &TextFormat),
            @"vp:NextUnexpandedPC(r_cycle^(1)) + γ · vp:NextPC(r_cycle^(1)) + γ^2 · vp:NextIsVirtual(r_cycle^(1)) + γ^3 · vp:NextIsFirstInSequence(r_cycle^(1)) + γ^4 · (1 - vp:NextIsNoop(r_cycle^(2)))"
        );
    }

    #[test]
    fn instruction_input_degree_mismatch() {
        let check = instruction_input().degree_check();
        assert_eq!(check.inferred, 3);
        assert!(check.is_mismatch());
        assert_eq!(
            registers_claim_reduction().degree_check().status,
            DegreeStatus::Consistent
        );
        assert_eq!(shift().degree_check().status, DegreeStatus::Consistent);
    }
}
