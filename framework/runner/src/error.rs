use std::path::PathBuf;

use crate::provision::DirectoryRole;

/// A failure that stops a single (workload, variant) run from happening.
///
/// These never stop the sweep, the failed run is recorded and the next run starts.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The directory could not be removed or recreated, the run is not started.
    #[error("Failed to provision {role} directory '{}': {source}", .path.display())]
    Provisioning {
        role: DirectoryRole,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The benchmark executable could not be started at all.
    #[error("Failed to launch '{}': {source}", .program.display())]
    Invocation {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Returned when the [crate::environment::DirectoryRoots] of a sweep can not be used together.
#[derive(Debug, thiserror::Error)]
pub enum RootsError {
    #[error("Failed to resolve the {role} root '{}'", .path.display())]
    Resolve {
        role: DirectoryRole,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Two roots are the same directory, or one is inside the other.
    #[error(
        "The {first} root '{}' and the {second} root '{}' overlap",
        .first_path.display(),
        .second_path.display()
    )]
    Overlap {
        first: DirectoryRole,
        first_path: PathBuf,
        second: DirectoryRole,
        second_path: PathBuf,
    },
}
