mod variant;
mod workload;

pub mod prelude {
    pub use crate::variant::{Comparison, InvalidVariantTag, Variant};
    pub use crate::workload::{
        ensure_unique_names, WorkloadSpec, WorkloadSpecBuilder, WorkloadSpecError, DURATION_ENV,
    };
}
