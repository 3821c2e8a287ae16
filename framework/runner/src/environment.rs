use std::collections::BTreeMap;
use std::path::PathBuf;

use bench_sweep_core::prelude::{Variant, WorkloadSpec, DURATION_ENV};

use crate::context::RunContext;
use crate::error::{RootsError, RunError};
use crate::provision::{provision, DirectoryRole};

pub const NUM_KEYS_ENV: &str = "NUM_KEYS";
pub const CACHE_SIZE_ENV: &str = "CACHE_SIZE";
pub const DB_DIR_ENV: &str = "DB_DIR";
pub const WAL_DIR_ENV: &str = "WAL_DIR";
pub const OUTPUT_DIR_ENV: &str = "OUTPUT_DIR";

pub const DEFAULT_NUM_KEYS: u64 = 900_000_000;
/// 6 GiB
pub const DEFAULT_CACHE_SIZE: u64 = 6 * 1024 * 1024 * 1024;
/// 90 minutes
pub const DEFAULT_DURATION_S: u64 = 5400;

/// Settings that are the same for every workload and variant, so that runs are comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvDefaults {
    /// Total size of the key space.
    pub num_keys: u64,
    /// Block cache budget in bytes.
    pub cache_size: u64,
    /// Wall-clock bound for duration-bounded workloads, in seconds.
    pub duration_s: u64,
}

impl Default for EnvDefaults {
    fn default() -> Self {
        Self {
            num_keys: DEFAULT_NUM_KEYS,
            cache_size: DEFAULT_CACHE_SIZE,
            duration_s: DEFAULT_DURATION_S,
        }
    }
}

/// The base directories under which each run gets its own `<variant>/<workload>` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRoots {
    pub db: PathBuf,
    pub wal: PathBuf,
    pub output: PathBuf,
}

impl Default for DirectoryRoots {
    fn default() -> Self {
        Self {
            db: PathBuf::from("/data/db"),
            wal: PathBuf::from("/data/wal"),
            output: PathBuf::from("/data/out"),
        }
    }
}

impl DirectoryRoots {
    /// Check that no root is the same as, or nested inside, another root.
    ///
    /// Paths are compared after making them absolute, without touching the filesystem, so roots
    /// that do not exist yet can be checked.
    pub fn ensure_disjoint(&self) -> Result<(), RootsError> {
        let roots = [
            (DirectoryRole::Database, &self.db),
            (DirectoryRole::Wal, &self.wal),
            (DirectoryRole::Output, &self.output),
        ]
        .into_iter()
        .map(|(role, path)| {
            std::path::absolute(path)
                .map(|abs| (role, abs))
                .map_err(|source| RootsError::Resolve {
                    role,
                    path: path.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

        for (i, (first, first_path)) in roots.iter().enumerate() {
            for (second, second_path) in &roots[i + 1..] {
                if first_path.starts_with(second_path) || second_path.starts_with(first_path) {
                    return Err(RootsError::Overlap {
                        first: *first,
                        first_path: first_path.clone(),
                        second: *second,
                        second_path: second_path.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Composes the [RunContext] for a run from the fixed defaults, freshly provisioned directories
/// and the workload's own overrides.
#[derive(Debug, Clone)]
pub struct RunEnvironmentBuilder<'a> {
    roots: &'a DirectoryRoots,
    defaults: EnvDefaults,
}

impl<'a> RunEnvironmentBuilder<'a> {
    pub fn new(roots: &'a DirectoryRoots, defaults: EnvDefaults) -> Self {
        Self { roots, defaults }
    }

    /// Provision the run directories and build the environment for `workload` against `variant`.
    ///
    /// `DURATION` is only set for duration-bounded workloads. The workload's environment is laid
    /// over the defaults last, so its values win on conflict.
    pub fn build(&self, workload: &WorkloadSpec, variant: &Variant) -> Result<RunContext, RunError> {
        let name = workload.name();
        let tag = variant.tag();

        let db_dir = provision(DirectoryRole::Database, &self.roots.db, tag, name)?;
        let wal_dir = provision(DirectoryRole::Wal, &self.roots.wal, tag, name)?;
        let output_dir = provision(DirectoryRole::Output, &self.roots.output, tag, name)?;

        let mut env = BTreeMap::new();
        env.insert(NUM_KEYS_ENV.to_string(), self.defaults.num_keys.to_string());
        env.insert(
            CACHE_SIZE_ENV.to_string(),
            self.defaults.cache_size.to_string(),
        );
        env.insert(DB_DIR_ENV.to_string(), path_value(&db_dir));
        env.insert(WAL_DIR_ENV.to_string(), path_value(&wal_dir));
        env.insert(OUTPUT_DIR_ENV.to_string(), path_value(&output_dir));
        if workload.has_duration() {
            env.insert(
                DURATION_ENV.to_string(),
                self.defaults.duration_s.to_string(),
            );
        }
        env.extend(
            workload
                .env()
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );

        log::debug!("Environment for {name}@{tag}: {env:?}");

        Ok(RunContext {
            workload: name.to_string(),
            variant: tag.to_string(),
            db_dir,
            wal_dir,
            output_dir,
            env,
            working_dir: variant.working_dir().to_path_buf(),
        })
    }
}

fn path_value(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn temp_roots() -> (TempDir, DirectoryRoots) {
        let root = tempfile::tempdir().expect("failed to create temp dir");
        let roots = DirectoryRoots {
            db: root.path().join("db"),
            wal: root.path().join("wal"),
            output: root.path().join("out"),
        };
        (root, roots)
    }

    fn variant() -> Variant {
        Variant::new("cst", ".").unwrap()
    }

    #[test]
    fn build_readrandom_environment() {
        let (_root, roots) = temp_roots();
        let workload = WorkloadSpec::builder("readrandom").build().unwrap();

        let ctx = RunEnvironmentBuilder::new(&roots, EnvDefaults::default())
            .build(&workload, &variant())
            .expect("failed to build environment");

        let env = ctx.env();
        assert_eq!(env[NUM_KEYS_ENV], "900000000");
        assert_eq!(env[CACHE_SIZE_ENV], "6442450944");
        assert_eq!(env[DURATION_ENV], "5400");
        assert_eq!(env.len(), 6);

        let dirs = [ctx.db_dir(), ctx.wal_dir(), ctx.output_dir()];
        for (dir, key) in dirs.iter().zip([DB_DIR_ENV, WAL_DIR_ENV, OUTPUT_DIR_ENV]) {
            assert!(dir.ends_with("cst/readrandom"));
            assert_eq!(fs::read_dir(dir).unwrap().count(), 0);
            assert_eq!(env[key], dir.to_string_lossy());
        }
        assert_ne!(ctx.db_dir(), ctx.wal_dir());
        assert_ne!(ctx.wal_dir(), ctx.output_dir());
        assert_eq!(ctx.working_dir(), std::path::Path::new("."));
    }

    #[test]
    fn accept_separate_roots() {
        let (_root, roots) = temp_roots();
        assert!(roots.ensure_disjoint().is_ok());
        assert!(DirectoryRoots::default().ensure_disjoint().is_ok());
    }

    #[test]
    fn reject_shared_or_nested_roots() {
        let (root, roots) = temp_roots();

        let shared = DirectoryRoots {
            wal: roots.db.clone(),
            ..roots.clone()
        };
        assert!(matches!(
            shared.ensure_disjoint(),
            Err(RootsError::Overlap {
                first: DirectoryRole::Database,
                second: DirectoryRole::Wal,
                ..
            })
        ));

        let nested = DirectoryRoots {
            output: roots.wal.join("out"),
            ..roots.clone()
        };
        assert!(matches!(
            nested.ensure_disjoint(),
            Err(RootsError::Overlap {
                first: DirectoryRole::Wal,
                second: DirectoryRole::Output,
                ..
            })
        ));

        let parent = DirectoryRoots {
            db: root.path().to_path_buf(),
            ..roots
        };
        assert!(parent.ensure_disjoint().is_err());
    }

    #[test]
    fn omit_duration_for_run_to_completion_workload() {
        let (_root, roots) = temp_roots();
        let workload = WorkloadSpec::builder("bulkload")
            .run_to_completion()
            .build()
            .unwrap();

        let ctx = RunEnvironmentBuilder::new(&roots, EnvDefaults::default())
            .build(&workload, &variant())
            .unwrap();

        assert!(!ctx.env().contains_key(DURATION_ENV));
    }

    #[test]
    fn workload_overrides_win() {
        let (_root, roots) = temp_roots();
        let workload = WorkloadSpec::builder("readwhilewriting")
            .with_env("MB_WRITE_PER_SEC", "2")
            .with_env(CACHE_SIZE_ENV, "1")
            .build()
            .unwrap();

        let ctx = RunEnvironmentBuilder::new(&roots, EnvDefaults::default())
            .build(&workload, &variant())
            .unwrap();

        assert_eq!(ctx.env()["MB_WRITE_PER_SEC"], "2");
        assert_eq!(ctx.env()[CACHE_SIZE_ENV], "1");
        assert_eq!(ctx.env()[NUM_KEYS_ENV], "900000000");
    }

    #[test]
    fn built_environments_are_independent() {
        let (_root, roots) = temp_roots();
        let builder = RunEnvironmentBuilder::new(&roots, EnvDefaults::default());
        let a = WorkloadSpec::builder("fwdrange")
            .with_env("X", "1")
            .build()
            .unwrap();
        let b = WorkloadSpec::builder("revrange")
            .with_env("X", "1")
            .build()
            .unwrap();

        let b_ctx = builder.build(&b, &variant()).unwrap();
        let b_env_before = b_ctx.env().clone();
        let mut a_ctx = builder.build(&a, &variant()).unwrap();
        a_ctx.env_mut().insert("X".to_string(), "changed".to_string());
        a_ctx.env_mut().remove(NUM_KEYS_ENV);

        assert_eq!(b_ctx.env(), &b_env_before);
        assert_eq!(a.env()["X"], "1");
        assert_eq!(b.env()["X"], "1");

        let a_again = builder.build(&a, &variant()).unwrap();
        assert_eq!(a_again.env()["X"], "1");
        assert!(a_again.env().contains_key(NUM_KEYS_ENV));
    }

    #[test]
    fn use_configured_defaults() {
        let (_root, roots) = temp_roots();
        let defaults = EnvDefaults {
            num_keys: 1000,
            cache_size: 4096,
            duration_s: 30,
        };
        let workload = WorkloadSpec::builder("overwrite").build().unwrap();

        let ctx = RunEnvironmentBuilder::new(&roots, defaults)
            .build(&workload, &variant())
            .unwrap();

        assert_eq!(ctx.env()[NUM_KEYS_ENV], "1000");
        assert_eq!(ctx.env()[CACHE_SIZE_ENV], "4096");
        assert_eq!(ctx.env()[DURATION_ENV], "30");
    }

    #[test]
    fn fail_without_partial_context_when_a_root_is_unusable() {
        let (root, mut roots) = temp_roots();
        let blocker = root.path().join("blocker");
        fs::write(&blocker, b"file").unwrap();
        roots.output = blocker;
        let workload = WorkloadSpec::builder("readrandom").build().unwrap();

        let result = RunEnvironmentBuilder::new(&roots, EnvDefaults::default())
            .build(&workload, &variant());

        assert!(matches!(
            result,
            Err(RunError::Provisioning {
                role: DirectoryRole::Output,
                ..
            })
        ));
    }
}
