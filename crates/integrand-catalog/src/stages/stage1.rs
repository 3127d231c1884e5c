//! Stage 1: the outer Spartan sumcheck over the R1CS constraint table.

use super::op_flag;
use crate::dims;
use integrand_kernel::expr::{add, derived, int, neg, scale, sub, symbol};
use integrand_kernel::{
    Constraint, Expr, FixedPoint, FreeVar, PolyName, ProducedClaim, SpartanSpec, args,
};

/// Witness polynomials opened at `r_cycle^(1)`, in column order.
const R1CS_INPUTS: [&str; 23] = [
    "LeftInstructionInput",
    "RightInstructionInput",
    "Product",
    "WriteLookupOutputToRD",
    "WritePCtoRD",
    "ShouldBranch",
    "PC",
    "UnexpandedPC",
    "Imm",
    "RamAddress",
    "Rs1Value",
    "Rs2Value",
    "RdWriteValue",
    "RamReadValue",
    "RamWriteValue",
    "LeftLookupOperand",
    "RightLookupOperand",
    "NextUnexpandedPC",
    "NextPC",
    "NextIsVirtual",
    "NextIsFirstInSequence",
    "LookupOutput",
    "ShouldJump",
];

const R1CS_FLAGS: [&str; 14] = [
    "AddOperands",
    "SubtractOperands",
    "MultiplyOperands",
    "Load",
    "Store",
    "Jump",
    "WriteLookupOutputToRD",
    "VirtualInstruction",
    "Assert",
    "DoNotUpdateUnexpandedPC",
    "Advice",
    "IsCompressed",
    "IsFirstInSequence",
    "IsLastInSequence",
];

pub fn spartan_outer() -> SpartanSpec {
    let x_t = FreeVar::new("X_t", dims::cycle());
    let x_b = FreeVar::new("X_b", dims::group());
    let v = |name: &str| derived(name, args![x_t]);
    let flag = |member: &str| derived(op_flag(member), args![x_t]);
    let one = || int(1);

    let group0 = vec![
        Constraint::new(
            "RamAddrZeroIfNotLoadStore",
            sub(one(), [flag("Load"), flag("Store")]),
            v("RamAddress"),
        ),
        Constraint::new(
            "RamReadEqRamWriteIfLoad",
            flag("Load"),
            sub(v("RamReadValue"), [v("RamWriteValue")]),
        ),
        Constraint::new(
            "RamReadEqRdWriteIfLoad",
            flag("Load"),
            sub(v("RamReadValue"), [v("RdWriteValue")]),
        ),
        Constraint::new(
            "Rs2EqRamWriteIfStore",
            flag("Store"),
            sub(v("Rs2Value"), [v("RamWriteValue")]),
        ),
        Constraint::new(
            "LeftLookupZeroUnlessAddSubMul",
            add([flag("Add"), flag("Sub"), flag("Mul")]),
            v("LeftLookupOperand"),
        ),
        Constraint::new(
            "LeftLookupEqLeftInputOtherwise",
            sub(one(), [flag("Add"), flag("Sub"), flag("Mul")]),
            sub(v("LeftLookupOperand"), [v("LeftInstructionInput")]),
        ),
        Constraint::new(
            "AssertLookupOne",
            flag("Assert"),
            sub(v("LookupOutput"), [one()]),
        ),
        Constraint::new(
            "NextUnexpPCEqLookupIfJump",
            v("ShouldJump"),
            sub(v("NextUnexpandedPC"), [v("LookupOutput")]),
        ),
        Constraint::new(
            "NextPCEqPCPlusOneIfInline",
            sub(flag("VirtualInstruction"), [flag("LastInSeq")]),
            sub(v("NextPC"), [v("PC"), one()]),
        ),
        Constraint::new(
            "MustStartSequenceFromBeginning",
            sub(v("NextIsVirtual"), [v("NextIsFirstInSequence")]),
            sub(one(), [flag("DoNotUpdateUnexpandedPC")]),
        ),
    ];

    let group1 = vec![
        Constraint::new(
            "RamAddrEqRs1PlusImmIfLoadStore",
            add([flag("Load"), flag("Store")]),
            sub(v("RamAddress"), [v("Rs1Value"), v("Imm")]),
        ),
        Constraint::new(
            "RightLookupAdd",
            flag("Add"),
            sub(
                v("RightLookupOperand"),
                [v("LeftInstructionInput"), v("RightInstructionInput")],
            ),
        ),
        Constraint::new(
            "RightLookupSub",
            flag("Sub"),
            add([
                sub(v("RightLookupOperand"), [v("LeftInstructionInput")]),
                v("RightInstructionInput"),
                neg(symbol("2^64")),
            ]),
        ),
        Constraint::new(
            "RightLookupEqProductIfMul",
            flag("Mul"),
            sub(v("RightLookupOperand"), [v("Product")]),
        ),
        Constraint::new(
            "RightLookupEqRightInputOtherwise",
            sub(
                one(),
                [flag("Add"), flag("Sub"), flag("Mul"), flag("Advice")],
            ),
            sub(v("RightLookupOperand"), [v("RightInstructionInput")]),
        ),
        Constraint::new(
            "RdWriteEqLookupIfWriteLookupToRd",
            v("WriteLookupOutputToRD"),
            sub(v("RdWriteValue"), [v("LookupOutput")]),
        ),
        Constraint::new(
            "RdWriteEqPCPlusConstIfWritePCtoRD",
            v("WritePCtoRD"),
            add([
                sub(v("RdWriteValue"), [v("UnexpandedPC"), int(4)]),
                scale(2, flag("IsCompressed")),
            ]),
        ),
        Constraint::new(
            "NextUnexpPCEqPCPlusImmIfBranch",
            v("ShouldBranch"),
            sub(v("NextUnexpandedPC"), [v("UnexpandedPC"), v("Imm")]),
        ),
        Constraint::new(
            "NextUnexpPCUpdateOtherwise",
            sub(one(), [v("ShouldBranch"), flag("Jump")]),
            add([
                sub(v("NextUnexpandedPC"), [v("UnexpandedPC"), int(4)]),
                scale(4, flag("DoNotUpdateUnexpandedPC")),
                scale(2, flag("IsCompressed")),
            ]),
        ),
        Constraint::new("(zero-padded)", int(0), int(0)),
    ];

    let r1 = FixedPoint::new(1, dims::cycle());
    let produces = R1CS_INPUTS
        .iter()
        .map(|name| PolyName::new(*name))
        .chain(R1CS_FLAGS.iter().map(|member| op_flag(member)))
        .map(|name| ProducedClaim::new(name, args![r1]))
        .collect();

    SpartanSpec {
        name: "SpartanOuter".to_string(),
        cycle_var: x_t.clone(),
        group_var: x_b,
        constraint_domain: (-5..=4).collect(),
        groups: vec![group0, group1],
        input_claim: satisfied(),
        produces,
    }
}

/// Az · Bz sums to zero on a satisfied witness.
fn satisfied() -> Expr {
    int(0)
}
