//! # Integrand Catalog
//!
//! The concrete seven-stage proof: twenty-one specifications built from
//! the kernel's expression builders, and the registry of polynomials and
//! parameters they mention.
//!
//! ```text
//! dims        ← Shared hypercube factors (cycle, K_ram, addr, ...)
//! registry    ← Named polynomials by provenance; KindLookup for printers
//! stages      ← One module per stage; stages() lists them in order
//! ```

pub mod dims;
pub mod registry;
pub mod stages;

pub use registry::{ParamDef, PolyDef, Registry};
pub use stages::stages;

use integrand_kernel::Stage;

/// The stages whose index is in `indices`; an empty selection keeps all.
pub fn select_stages(indices: &[u32]) -> Vec<Stage> {
    stages()
        .into_iter()
        .filter(|stage| indices.is_empty() || indices.contains(&stage.index))
        .collect()
}
