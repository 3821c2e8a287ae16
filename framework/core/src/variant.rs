use std::path::{Path, PathBuf};

use crate::workload::is_single_segment;

/// Returned when a [Variant] tag cannot be used as a directory name.
#[derive(derive_more::Error, derive_more::Display, Debug, Clone, PartialEq, Eq)]
#[display("Variant tag '{tag}' must be a non-empty, single path segment")]
pub struct InvalidVariantTag {
    tag: String,
}

/// One of the builds under test.
///
/// The tag is only a label, used as a path segment when provisioning directories and in logs.
/// The behavioural difference between variants comes from the working directory, which is where
/// the benchmark executable of that build is launched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    tag: String,
    working_dir: PathBuf,
}

impl Variant {
    pub fn new(
        tag: impl Into<String>,
        working_dir: impl Into<PathBuf>,
    ) -> Result<Self, InvalidVariantTag> {
        let tag = tag.into();
        if tag.is_empty() || !is_single_segment(&tag) {
            return Err(InvalidVariantTag { tag });
        }

        Ok(Self {
            tag,
            working_dir: working_dir.into(),
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

/// The pair of builds compared by a sweep.
///
/// Every workload runs against the baseline before any workload runs against the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub baseline: Variant,
    pub candidate: Variant,
}

impl Comparison {
    pub fn new(baseline: Variant, candidate: Variant) -> Self {
        Self {
            baseline,
            candidate,
        }
    }

    /// The variants in the order they are swept.
    pub fn ordered(&self) -> [&Variant; 2] {
        [&self.baseline, &self.candidate]
    }
}
