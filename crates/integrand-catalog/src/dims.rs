//! Hypercube factors shared across the catalog.

use integrand_kernel::Dim;

pub fn cycle() -> Dim {
    Dim::new("T", "cycle", "cycle/timestep")
}

pub fn k_ram() -> Dim {
    Dim::new("K_ram", "K_ram", "RAM address")
}

pub fn k_reg() -> Dim {
    Dim::new("K_reg", "K_reg", "register index")
}

/// One committed one-hot chunk of an address.
pub fn addr() -> Dim {
    Dim::new("N_instr", "addr", "one-hot chunk")
}

pub fn k_instr() -> Dim {
    Dim::new("K_instr", "K_instr", "instruction address")
}

pub fn k_bc() -> Dim {
    Dim::new("K_bc", "K_bc", "bytecode address")
}

pub fn n_v() -> Dim {
    Dim::new("N_v", "N_v", "virtual chunk")
}

/// Binary selector between the two constraint groups.
pub fn group() -> Dim {
    Dim::new("2", "group", "constraint group")
}
