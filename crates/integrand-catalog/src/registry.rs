//! Registry of named polynomials and system parameters.
//!
//! Every polynomial is the multilinear extension of a function
//! `{0,1}^n → F`. The registry records its provenance, domain, and a
//! one-line definition, grouped by category for listings. It also answers
//! provenance queries for the LaTeX printer through [`KindLookup`].

use crate::dims;
use integrand_kernel::{Dim, KindLookup, PolyName, Provenance};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolyDef {
    pub name: PolyName,
    pub kind: Provenance,
    pub domain: Vec<Dim>,
    pub description: String,
    pub category: String,
}

impl PolyDef {
    fn new(
        kind: Provenance,
        name: PolyName,
        domain: Vec<Dim>,
        description: &str,
        category: &str,
    ) -> Self {
        Self {
            name,
            kind,
            domain,
            description: description.to_string(),
            category: category.to_string(),
        }
    }

    /// `{0,1}^log₂(K_ram) × {0,1}^log₂(T) → F   [RAM address × cycle/timestep]`,
    /// or `None` for polynomials without a hypercube domain.
    pub fn domain_text(&self) -> Option<String> {
        if self.domain.is_empty() {
            return None;
        }
        let cubes: Vec<String> = self
            .domain
            .iter()
            .map(|d| format!("{{0,1}}^log₂({})", d.size))
            .collect();
        let labels: Vec<&str> = self
            .domain
            .iter()
            .map(|d| {
                if d.description.is_empty() {
                    d.label.as_str()
                } else {
                    d.description.as_str()
                }
            })
            .collect();
        Some(format!(
            "{} → F   [{}]",
            cubes.join(" × "),
            labels.join(" × ")
        ))
    }
}

/// A system parameter appearing in round counts and fan-ins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDef {
    pub symbol: String,
    /// Name of the parameter in the prover's configuration, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_name: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

impl ParamDef {
    fn new(symbol: &str, code_name: &str, description: &str, formula: Option<&str>) -> Self {
        Self {
            symbol: symbol.to_string(),
            code_name: (!code_name.is_empty()).then(|| code_name.to_string()),
            description: description.to_string(),
            formula: formula.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    polys: Vec<PolyDef>,
    params: Vec<ParamDef>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl Registry {
    /// The full catalog: committed, then derived, then computable.
    pub fn standard() -> Self {
        let mut polys = committed_polys();
        polys.extend(derived_polys());
        polys.extend(computable_polys());
        Self {
            polys,
            params: params(),
        }
    }

    pub fn polys(&self) -> &[PolyDef] {
        &self.polys
    }

    pub fn params(&self) -> &[ParamDef] {
        &self.params
    }

    /// Definitions whose kind is in `kinds`; an empty filter keeps all.
    pub fn filtered<'a>(&'a self, kinds: &'a [Provenance]) -> impl Iterator<Item = &'a PolyDef> {
        self.polys
            .iter()
            .filter(move |p| kinds.is_empty() || kinds.contains(&p.kind))
    }

    /// Every definition registered under exactly `name`.
    pub fn lookup(&self, name: &PolyName) -> Vec<&PolyDef> {
        self.polys.iter().filter(|p| &p.name == name).collect()
    }
}

impl KindLookup for Registry {
    /// Provenance when exactly one definition carries `name`. Names
    /// registered under several kinds (the committed and derived
    /// `InstructionRa(i)`) stay ambiguous.
    fn provenance_of(&self, name: &PolyName) -> Option<Provenance> {
        match self.lookup(name).as_slice() {
            [only] => Some(only.kind),
            _ => None,
        }
    }
}

fn params() -> Vec<ParamDef> {
    vec![
        ParamDef::new(
            "T",
            "trace_length",
            "Number of execution cycles (padded to power of 2)",
            None,
        ),
        ParamDef::new(
            "log_2 N_chunk",
            "log_k_chunk",
            "Committed one-hot chunk bit-size (4 or 8)",
            None,
        ),
        ParamDef::new(
            "N_chunk",
            "k_chunk",
            "Committed one-hot chunk size",
            Some("2^log_k_chunk"),
        ),
        ParamDef::new(
            "log_2 N_virtual",
            "lookups_ra_virtual_log_k_chunk",
            "Virtual RA chunk bit-size",
            Some("LOG_K/8 if log_T < 25 else LOG_K/4"),
        ),
        ParamDef::new(
            "d_instr",
            "instruction_d",
            "Number of committed RA chunks (instruction)",
            Some("ceil(128 / log_2 N_instr)"),
        ),
        ParamDef::new(
            "d_virtual_instr",
            "n_virtual_ra_polys",
            "Number of virtual RA chunks (instruction)",
            Some("128 / log_2 N_v"),
        ),
        ParamDef::new(
            "M",
            "n_committed_per_virtual",
            "Fan-in: committed chunks per virtual chunk",
            Some("d_instr / d_v"),
        ),
        ParamDef::new(
            "K_bc",
            "bytecode_k",
            "Bytecode table size (program-dependent, padded to power of 2)",
            None,
        ),
        ParamDef::new(
            "d_bc",
            "bytecode_d",
            "Number of committed RA chunks (bytecode)",
            Some("ceil(log_2 K_bc / log_2 N_instr)"),
        ),
        ParamDef::new("K_ram", "ram_k", "RAM address-space size", None),
        ParamDef::new(
            "d_ram",
            "ram_d",
            "Number of committed RA chunks (RAM)",
            Some("ceil(log_2 K_ram / log_2 N_instr)"),
        ),
        ParamDef::new(
            "K_reg",
            "",
            "Register file size (32 for RV32, 64 for RV64)",
            None,
        ),
        ParamDef::new("N_tables", "", "Number of lookup tables (42)", None),
    ]
}

fn committed_polys() -> Vec<PolyDef> {
    let c = |name: PolyName, domain: Vec<Dim>, description: &str, category: &str| {
        PolyDef::new(Provenance::Committed, name, domain, description, category)
    };
    vec![
        c(
            PolyName::new("RdInc"),
            vec![dims::cycle()],
            "rd_write_timestamp[t] - rd_write_timestamp[t-1]",
            "Registers",
        ),
        c(
            PolyName::new("RamInc"),
            vec![dims::cycle()],
            "ram_write_timestamp[t] - ram_write_timestamp[t-1]",
            "RAM",
        ),
        c(
            PolyName::family("InstructionRa", "i"),
            vec![dims::addr(), dims::cycle()],
            "one-hot over N_instr values; 1 iff chunk i of instruction address = k at cycle t. i in 0..d_instr-1",
            "Instruction lookup",
        ),
        c(
            PolyName::family("BytecodeRa", "i"),
            vec![dims::addr(), dims::cycle()],
            "one-hot over N_instr values; 1 iff chunk i of bytecode row index = k at cycle t. i in 0..d_bc-1",
            "Bytecode",
        ),
        c(
            PolyName::family("RamRa", "i"),
            vec![dims::addr(), dims::cycle()],
            "one-hot over N_instr values; 1 iff chunk i of RAM address = k at cycle t. i in 0..d_ram-1",
            "RAM",
        ),
        c(
            PolyName::new("TrustedAdvice"),
            Vec::new(),
            "committed before proving; verifier has the commitment",
            "Advice",
        ),
        c(
            PolyName::new("UntrustedAdvice"),
            Vec::new(),
            "committed during proving; commitment included in proof",
            "Advice",
        ),
    ]
}

fn derived_polys() -> Vec<PolyDef> {
    let v = |name: PolyName, domain: Vec<Dim>, description: &str, category: &str| {
        PolyDef::new(Provenance::Derived, name, domain, description, category)
    };
    let per_cycle = |name: PolyName, description: &str, category: &str| {
        PolyDef::new(
            Provenance::Derived,
            name,
            vec![dims::cycle()],
            description,
            category,
        )
    };
    let op_flag = |member: &str, description: &str| {
        per_cycle(PolyName::member("OpFlags", member), description, "Circuit flags")
    };
    let instr_flag = |member: &str, description: &str| {
        per_cycle(
            PolyName::member("InstructionFlags", member),
            description,
            "Instruction flags",
        )
    };

    vec![
        per_cycle(
            PolyName::new("PC"),
            "trace[t].pc (expanded ELF address)",
            "Program counter",
        ),
        per_cycle(
            PolyName::new("UnexpandedPC"),
            "trace[t].unexpanded_pc (raw ELF address)",
            "Program counter",
        ),
        per_cycle(
            PolyName::new("NextPC"),
            "PC(t+1); left-shift of PC by one cycle",
            "Program counter",
        ),
        per_cycle(
            PolyName::new("NextUnexpandedPC"),
            "UnexpandedPC(t+1); left-shift of UnexpandedPC by one cycle",
            "Program counter",
        ),
        per_cycle(
            PolyName::new("LookupOutput"),
            "T_{table(t)}(address(t)); the lookup table output at cycle t",
            "Instruction lookup",
        ),
        per_cycle(
            PolyName::new("LeftLookupOperand"),
            "LeftOp(address(t)) if interleaved, else 0",
            "Instruction lookup",
        ),
        per_cycle(
            PolyName::new("RightLookupOperand"),
            "RightOp(address(t)) if interleaved, else unmap(address(t))",
            "Instruction lookup",
        ),
        per_cycle(
            PolyName::new("LeftInstructionInput"),
            "left operand to the ALU: rs1_val, pc, or imm depending on flags",
            "Instruction lookup",
        ),
        per_cycle(
            PolyName::new("RightInstructionInput"),
            "right operand to the ALU: rs2_val or imm depending on flags",
            "Instruction lookup",
        ),
        v(
            PolyName::family("InstructionRa", "i"),
            vec![dims::n_v(), dims::cycle()],
            "prod_{j=0}^{M-1} cp:InstructionRa(i*M+j)(k_j, t); product of M committed chunks",
            "Instruction lookup",
        ),
        per_cycle(
            PolyName::new("InstructionRafFlag"),
            "OpFlags(Add) + OpFlags(Sub) + OpFlags(Mul); 1 iff single-value range check",
            "Instruction lookup",
        ),
        per_cycle(
            PolyName::family("TableFlag", "j"),
            "1 iff lookup table j is active at cycle t; at most one flag is 1 per cycle",
            "Instruction lookup",
        ),
        per_cycle(
            PolyName::new("Product"),
            "LeftInstructionInput(t) * RightInstructionInput(t)",
            "Product constraints",
        ),
        per_cycle(
            PolyName::new("ShouldJump"),
            "OpFlags(Jump)(t) * (1 - NextIsNoop(t))",
            "Product constraints",
        ),
        per_cycle(
            PolyName::new("ShouldBranch"),
            "LookupOutput(t) * InstructionFlags(Branch)(t)",
            "Product constraints",
        ),
        per_cycle(
            PolyName::new("WritePCtoRD"),
            "InstructionFlags(IsRdNotZero)(t) * OpFlags(Jump)(t)",
            "Product constraints",
        ),
        per_cycle(
            PolyName::new("WriteLookupOutputToRD"),
            "InstructionFlags(IsRdNotZero)(t) * OpFlags(WriteLookupOutputToRD)(t)",
            "Product constraints",
        ),
        per_cycle(
            PolyName::new("Rd"),
            "trace[t].rd; destination register index",
            "Registers",
        ),
        per_cycle(PolyName::new("Imm"), "trace[t].imm; immediate value", "Registers"),
        per_cycle(
            PolyName::new("Rs1Value"),
            "registers[trace[t].rs1] before cycle t",
            "Registers",
        ),
        per_cycle(
            PolyName::new("Rs2Value"),
            "registers[trace[t].rs2] before cycle t",
            "Registers",
        ),
        per_cycle(
            PolyName::new("RdWriteValue"),
            "value written to registers[rd] at cycle t",
            "Registers",
        ),
        v(
            PolyName::new("Rs1Ra"),
            vec![dims::k_reg(), dims::cycle()],
            "one-hot: 1 iff k = trace[t].rs1",
            "Registers",
        ),
        v(
            PolyName::new("Rs2Ra"),
            vec![dims::k_reg(), dims::cycle()],
            "one-hot: 1 iff k = trace[t].rs2",
            "Registers",
        ),
        v(
            PolyName::new("RdWa"),
            vec![dims::k_reg(), dims::cycle()],
            "one-hot: 1 iff k = trace[t].rd",
            "Registers",
        ),
        v(
            PolyName::new("RegistersVal"),
            vec![dims::k_reg(), dims::cycle()],
            "registers[k] right before cycle t",
            "Registers",
        ),
        per_cycle(
            PolyName::new("RamAddress"),
            "trace[t].ram_address (rs1 + imm if load/store, else 0)",
            "RAM",
        ),
        v(
            PolyName::new("RamRa"),
            vec![dims::k_ram(), dims::cycle()],
            "prod_{i=0}^{d_ram-1} cp:RamRa(i)(k_i, t); product of committed chunks",
            "RAM",
        ),
        per_cycle(
            PolyName::new("RamReadValue"),
            "memory[ram_address] before cycle t",
            "RAM",
        ),
        per_cycle(
            PolyName::new("RamWriteValue"),
            "memory[ram_address] after cycle t",
            "RAM",
        ),
        v(
            PolyName::new("RamVal"),
            vec![dims::k_ram(), dims::cycle()],
            "memory[k] right before cycle t",
            "RAM",
        ),
        v(
            PolyName::new("RamValInit"),
            vec![dims::k_ram()],
            "memory[k] at t=0 (initial memory image)",
            "RAM",
        ),
        v(
            PolyName::new("RamValFinal"),
            vec![dims::k_ram()],
            "memory[k] at t=T (final memory image)",
            "RAM",
        ),
        per_cycle(
            PolyName::new("RamHammingWeight"),
            "sum_k RamRa(k, t); number of active RAM chunks at cycle t (0 or 1)",
            "RAM",
        ),
        op_flag("AddOperands", "1 iff instr(t) computes x+y (ADD, ADDI, AUIPC, ...)"),
        op_flag("SubtractOperands", "1 iff instr(t) computes x-y (SUB)"),
        op_flag("MultiplyOperands", "1 iff instr(t) computes x*y (MUL, MULH, ...)"),
        op_flag("Load", "1 iff instr(t) is LB/LH/LW/LBU/LHU/LD/LWU"),
        op_flag("Store", "1 iff instr(t) is SB/SH/SW/SD"),
        op_flag("Jump", "1 iff instr(t) is JAL/JALR"),
        op_flag("WriteLookupOutputToRD", "1 iff lookup output is written to rd"),
        op_flag("VirtualInstruction", "1 iff instr(t) is a virtual instruction"),
        op_flag("Assert", "1 iff instr(t) is an assert (lookup output must be 1)"),
        op_flag(
            "DoNotUpdateUnexpandedPC",
            "1 iff unexpanded PC should not advance (mid-virtual-sequence)",
        ),
        op_flag("Advice", "1 iff instr(t) is a virtual advice instruction"),
        op_flag(
            "IsCompressed",
            "1 iff instr(t) is a 16-bit compressed instruction (PC += 2)",
        ),
        op_flag(
            "IsFirstInSequence",
            "1 iff instr(t) is the first in a virtual instruction sequence",
        ),
        op_flag(
            "IsLastInSequence",
            "1 iff instr(t) is the last in a virtual instruction sequence",
        ),
        instr_flag("LeftOperandIsPC", "1 iff left ALU operand = PC (e.g. AUIPC, JAL)"),
        instr_flag(
            "RightOperandIsImm",
            "1 iff right ALU operand = imm (I-type instructions)",
        ),
        instr_flag("LeftOperandIsRs1Value", "1 iff left ALU operand = rs1_val"),
        instr_flag("RightOperandIsRs2Value", "1 iff right ALU operand = rs2_val"),
        instr_flag("Branch", "1 iff instr(t) is BEQ/BNE/BLT/BGE/BLTU/BGEU"),
        instr_flag("IsNoop", "1 iff cycle t is a padding no-op"),
        instr_flag("IsRdNotZero", "1 iff trace[t].rd != x0"),
        per_cycle(
            PolyName::new("NextIsNoop"),
            "InstructionFlags(IsNoop)(t+1); left-shift by one cycle",
            "Shift-derived",
        ),
        per_cycle(
            PolyName::new("NextIsVirtual"),
            "OpFlags(VirtualInstruction)(t+1); left-shift by one cycle",
            "Shift-derived",
        ),
        per_cycle(
            PolyName::new("NextIsFirstInSequence"),
            "OpFlags(IsFirstInSequence)(t+1); left-shift by one cycle",
            "Shift-derived",
        ),
    ]
}

fn computable_polys() -> Vec<PolyDef> {
    let r = |name: &str, domain: Vec<Dim>, description: &str, category: &str| {
        PolyDef::new(
            Provenance::Computable,
            PolyName::new(name),
            domain,
            description,
            category,
        )
    };
    let pair = |size: &str, a: (&str, &str), b: (&str, &str)| {
        vec![Dim::new(size, a.0, a.1), Dim::new(size, b.0, b.1)]
    };
    vec![
        r("T_i", vec![dims::k_instr()], "MLE of lookup table i", "Lookup tables"),
        r(
            "LeftOp",
            vec![dims::k_instr()],
            "MLE of left operand extraction from interleaved address bits",
            "Operand extraction",
        ),
        r(
            "RightOp",
            vec![dims::k_instr()],
            "MLE of right operand extraction from interleaved address bits",
            "Operand extraction",
        ),
        r(
            "unmap",
            vec![Dim::new("K", "K", "address")],
            "MLE of identity function: {0,1}^n -> {0, ..., 2^n - 1}",
            "Operand extraction",
        ),
        r(
            "LT",
            pair("T", ("a", "point a"), ("b", "point b")),
            "MLE of less-than: 1 iff a < b",
            "Comparison",
        ),
        r(
            "EqPlusOne",
            pair("T", ("a", "point a"), ("b", "point b")),
            "MLE of successor: 1 iff b = a + 1",
            "Comparison",
        ),
        r(
            "eq",
            pair("n", ("r", "point r"), ("x", "hypercube x")),
            "Multilinear Lagrange basis: eq(r,x) = prod_i (r_i*x_i + (1-r_i)(1-x_i))",
            "Lagrange basis",
        ),
        r(
            "L",
            pair("|S|", ("τ", "challenge point"), ("x", "constraint index")),
            "Univariate Lagrange selector over domain S: L(τ,x) = Σ_{s∈S} ℓ_s(τ)·ℓ_s(x). \
             Used in Stage 1 (S={-5,...,4}) and Stage 2 (S={-2,...,2}) for the univariate skip",
            "Lagrange basis",
        ),
    ]
}
