use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::RunError;

/// Which of the three per-run directories is being provisioned.
#[derive(derive_more::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRole {
    #[display("database")]
    Database,
    #[display("WAL")]
    Wal,
    #[display("output")]
    Output,
}

/// Guarantee that `<base>/<variant>/<workload>` exists and is empty, returning its absolute path.
///
/// Anything already at the target is removed first, whether that is a directory tree, a file or a
/// symlink. If any step fails then an error is returned and the caller must not start the run,
/// even if the old contents were already removed.
pub fn provision(
    role: DirectoryRole,
    base: &Path,
    variant: &str,
    workload: &str,
) -> Result<PathBuf, RunError> {
    let target = base.join(variant).join(workload);
    let fail = |source: std::io::Error| RunError::Provisioning {
        role,
        path: target.clone(),
        source,
    };

    match fs::symlink_metadata(&target) {
        Ok(metadata) if metadata.is_dir() => {
            log::trace!(
                "Removing previous {role} directory '{}'",
                target.display()
            );
            fs::remove_dir_all(&target).map_err(fail)?;
        }
        Ok(_) => {
            log::warn!(
                "Found a non-directory at the {role} path '{}', removing it",
                target.display()
            );
            fs::remove_file(&target).map_err(fail)?;
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(fail(e)),
    }

    fs::create_dir_all(&target).map_err(fail)?;

    target.canonicalize().map_err(fail)
}
