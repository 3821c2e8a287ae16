use std::collections::{BTreeMap, HashSet};

/// Name of the environment variable that bounds the wall-clock run time of a workload.
///
/// Only duration-bounded workloads may carry it, see [WorkloadSpec::has_duration].
pub const DURATION_ENV: &str = "DURATION";

/// Returned when a [WorkloadSpec] or a list of them is not valid.
#[derive(derive_more::Error, derive_more::Display, Debug, Clone, PartialEq, Eq)]
pub enum WorkloadSpecError {
    #[display("Workload name must not be empty")]
    EmptyName,
    #[display("Workload name '{name}' must be a single path segment")]
    InvalidName { name: String },
    #[display("Workload '{name}' is defined more than once")]
    DuplicateName { name: String },
    #[display("Workload '{name}' runs to completion but overrides 'DURATION'")]
    DurationOverride { name: String },
    #[display("Workload '{name}' sets the invalid environment variable name {key:?}")]
    InvalidEnvKey { name: String, key: String },
    #[display("Workload '{name}' sets a value containing NUL for environment variable '{key}'")]
    InvalidEnvValue { name: String, key: String },
}

/// An immutable description of one benchmark workload.
///
/// Built with a [WorkloadSpecBuilder]. Once built, none of the fields can change, the spec is a
/// value that is read by every run of the workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadSpec {
    /// The workload name, passed verbatim as the first argument to the benchmark executable.
    ///
    /// Also used as the directory name for the run's database, WAL and output directories.
    name: String,
    /// Whether the run is bounded by a wall-clock duration. Workloads without a duration, such as
    /// a bulk load, run until the benchmark executable decides they are done.
    has_duration: bool,
    /// Extra arguments, in order, passed after the workload name.
    args: Vec<String>,
    /// Environment overrides that apply to this workload only.
    env: BTreeMap<String, String>,
}

impl WorkloadSpec {
    /// Start building a duration-bounded workload with no extra arguments or environment.
    pub fn builder(name: impl Into<String>) -> WorkloadSpecBuilder {
        WorkloadSpecBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_duration(&self) -> bool {
        self.has_duration
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }
}

/// The builder for a [WorkloadSpec].
///
/// Every builder owns its own argument list and environment map, so no two workloads ever share
/// storage for them.
#[derive(Debug, Clone)]
pub struct WorkloadSpecBuilder {
    name: String,
    has_duration: bool,
    args: Vec<String>,
    env: BTreeMap<String, String>,
}

impl WorkloadSpecBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_duration: true,
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    /// Set whether the workload is bounded by a wall-clock duration.
    pub fn with_duration(mut self, has_duration: bool) -> Self {
        self.has_duration = has_duration;
        self
    }

    /// Mark the workload as running to natural completion, for example a one-shot load.
    pub fn run_to_completion(self) -> Self {
        self.with_duration(false)
    }

    /// Append a single argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments, keeping their order.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment override. Setting the same key twice keeps the last value.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<WorkloadSpec, WorkloadSpecError> {
        if self.name.is_empty() {
            return Err(WorkloadSpecError::EmptyName);
        }
        if !is_single_segment(&self.name) {
            return Err(WorkloadSpecError::InvalidName { name: self.name });
        }
        if !self.has_duration && self.env.contains_key(DURATION_ENV) {
            return Err(WorkloadSpecError::DurationOverride { name: self.name });
        }
        for (key, value) in &self.env {
            if key.is_empty() || key.contains(['=', '\0']) {
                return Err(WorkloadSpecError::InvalidEnvKey {
                    name: self.name,
                    key: key.clone(),
                });
            }
            if value.contains('\0') {
                return Err(WorkloadSpecError::InvalidEnvValue {
                    name: self.name,
                    key: key.clone(),
                });
            }
        }

        Ok(WorkloadSpec {
            name: self.name,
            has_duration: self.has_duration,
            args: self.args,
            env: self.env,
        })
    }
}

/// Check that every workload in the list has a distinct name.
pub fn ensure_unique_names(workloads: &[WorkloadSpec]) -> Result<(), WorkloadSpecError> {
    let mut seen = HashSet::with_capacity(workloads.len());
    for workload in workloads {
        if !seen.insert(workload.name()) {
            return Err(WorkloadSpecError::DuplicateName {
                name: workload.name().to_string(),
            });
        }
    }

    Ok(())
}

/// True if `value` can be used as one directory name without escaping its parent.
pub(crate) fn is_single_segment(value: &str) -> bool {
    value != "." && value != ".." && !value.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_duration_bounded_with_empty_args_and_env() {
        let spec = WorkloadSpec::builder("readrandom").build().unwrap();

        assert_eq!(spec.name(), "readrandom");
        assert!(spec.has_duration());
        assert!(spec.args().is_empty());
        assert!(spec.env().is_empty());
    }

    #[test]
    fn reject_empty_name() {
        let result = WorkloadSpec::builder("").build();
        assert_eq!(result.unwrap_err(), WorkloadSpecError::EmptyName);
    }

    #[test]
    fn reject_name_that_is_not_a_single_segment() {
        for name in ["..", ".", "a/b", "a\\b"] {
            let result = WorkloadSpec::builder(name).build();
            assert!(
                matches!(result, Err(WorkloadSpecError::InvalidName { .. })),
                "expected '{name}' to be rejected"
            );
        }
    }

    #[test]
    fn reject_duration_override_on_run_to_completion_workload() {
        let result = WorkloadSpec::builder("bulkload")
            .run_to_completion()
            .with_env(DURATION_ENV, "10")
            .build();

        assert_eq!(
            result.unwrap_err(),
            WorkloadSpecError::DurationOverride {
                name: "bulkload".to_string()
            }
        );
    }

    #[test]
    fn reject_env_keys_the_process_environment_cannot_hold() {
        for key in ["", "A=B", "A\0B"] {
            let result = WorkloadSpec::builder("readrandom").with_env(key, "x").build();
            assert_eq!(
                result.unwrap_err(),
                WorkloadSpecError::InvalidEnvKey {
                    name: "readrandom".to_string(),
                    key: key.to_string()
                }
            );
        }
    }

    #[test]
    fn reject_env_value_with_nul() {
        let result = WorkloadSpec::builder("readrandom")
            .with_env("MB_WRITE_PER_SEC", "2\0")
            .build();

        assert!(matches!(
            result,
            Err(WorkloadSpecError::InvalidEnvValue { key, .. }) if key == "MB_WRITE_PER_SEC"
        ));
    }

    #[test]
    fn keep_argument_order() {
        let spec = WorkloadSpec::builder("multireadrandom")
            .with_arg("--multiread_batched")
            .with_args(["--b", "--a"])
            .build()
            .unwrap();

        assert_eq!(spec.args(), ["--multiread_batched", "--b", "--a"]);
    }

    #[test]
    fn builders_do_not_share_storage() {
        let template = WorkloadSpec::builder("template");
        let first = template
            .clone()
            .with_env("MB_WRITE_PER_SEC", "2")
            .with_arg("--x")
            .build()
            .unwrap();
        let second = template.build().unwrap();

        assert_eq!(first.env().len(), 1);
        assert_eq!(first.args().len(), 1);
        assert!(second.env().is_empty());
        assert!(second.args().is_empty());
    }

    #[test]
    fn detect_duplicate_names() {
        let workloads = vec![
            WorkloadSpec::builder("fwdrange").build().unwrap(),
            WorkloadSpec::builder("revrange").build().unwrap(),
            WorkloadSpec::builder("fwdrange").build().unwrap(),
        ];

        assert_eq!(
            ensure_unique_names(&workloads).unwrap_err(),
            WorkloadSpecError::DuplicateName {
                name: "fwdrange".to_string()
            }
        );
        assert!(ensure_unique_names(&workloads[..2]).is_ok());
    }
}
