use std::path::{Path, PathBuf};
use std::process::Command;

use bench_sweep_core::prelude::{WorkloadSpec, DURATION_ENV};

use crate::context::RunContext;
use crate::error::RunError;

/// The default benchmark executable, relative to each variant's working directory.
pub const DEFAULT_EXECUTABLE: &str = "./tools/benchmark.sh";

/// How the benchmark process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    Success,
    /// Exited with a non-zero code.
    Code(i32),
    /// Ended without an exit code, for example killed by a signal.
    Terminated,
}

impl From<std::process::ExitStatus> for ProcessExit {
    fn from(status: std::process::ExitStatus) -> Self {
        if status.success() {
            return ProcessExit::Success;
        }
        match status.code() {
            Some(code) => ProcessExit::Code(code),
            None => ProcessExit::Terminated,
        }
    }
}

/// Launches a benchmark run and blocks until it has finished.
///
/// An `Err` means the run could not be started. A run that starts and then fails is reported as
/// an `Ok` with a non-success [ProcessExit].
pub trait Invoke {
    fn invoke(
        &mut self,
        ctx: &RunContext,
        workload: &WorkloadSpec,
        extra_args: &[String],
    ) -> Result<ProcessExit, RunError>;
}

/// Runs the benchmark executable as a child process.
///
/// The child inherits this process's environment and standard streams, with the run's environment
/// set on top. `DURATION` is never inherited, it is only present when the run sets it.
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    executable: PathBuf,
}

impl Default for ProcessInvoker {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTABLE)
    }
}

impl ProcessInvoker {
    /// Use `executable`, resolved relative to the run's working directory unless it is absolute.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// The absolute path of the executable for a run launched from `working_dir`.
    pub fn program(&self, working_dir: &Path) -> std::io::Result<PathBuf> {
        std::path::absolute(working_dir.join(&self.executable))
    }

    /// The command for a run: `<executable> <workload> [workload args...] [extra args...]`.
    pub fn command(
        &self,
        ctx: &RunContext,
        workload: &WorkloadSpec,
        extra_args: &[String],
    ) -> Result<Command, RunError> {
        let program = self
            .program(ctx.working_dir())
            .map_err(|source| RunError::Invocation {
                program: self.executable.clone(),
                source,
            })?;

        let mut cmd = Command::new(program);
        cmd.current_dir(ctx.working_dir())
            .arg(workload.name())
            .args(workload.args())
            .args(extra_args)
            .envs(ctx.env());
        // Workloads without a duration must not inherit one from the parent.
        if !ctx.env().contains_key(DURATION_ENV) {
            cmd.env_remove(DURATION_ENV);
        }

        Ok(cmd)
    }
}

impl Invoke for ProcessInvoker {
    fn invoke(
        &mut self,
        ctx: &RunContext,
        workload: &WorkloadSpec,
        extra_args: &[String],
    ) -> Result<ProcessExit, RunError> {
        let mut cmd = self.command(ctx, workload, extra_args)?;
        let program = PathBuf::from(cmd.get_program());

        let mut child = cmd.spawn().map_err(|source| RunError::Invocation {
            program: program.clone(),
            source,
        })?;
        log::debug!(
            "Started '{}' for {}@{} with PID: {}",
            program.display(),
            ctx.workload(),
            ctx.variant(),
            child.id()
        );

        let status = child
            .wait()
            .map_err(|source| RunError::Invocation { program, source })?;
        log::debug!("Benchmark process finished with status: {status}");

        Ok(status.into())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::ffi::OsStr;

    use super::*;

    fn context(working_dir: &Path) -> RunContext {
        let mut env = BTreeMap::new();
        env.insert("NUM_KEYS".to_string(), "10".to_string());
        RunContext {
            workload: "multireadrandom".to_string(),
            variant: "ori".to_string(),
            db_dir: PathBuf::from("/data/db/ori/multireadrandom"),
            wal_dir: PathBuf::from("/data/wal/ori/multireadrandom"),
            output_dir: PathBuf::from("/data/out/ori/multireadrandom"),
            env,
            working_dir: working_dir.to_path_buf(),
        }
    }

    #[test]
    fn build_command_line_in_order() {
        let ctx = context(Path::new("../rocksdb"));
        let workload = WorkloadSpec::builder("multireadrandom")
            .with_arg("--multiread_batched")
            .build()
            .unwrap();

        let cmd = ProcessInvoker::default()
            .command(&ctx, &workload, &["--extra".to_string()])
            .unwrap();

        // `absolute` drops the `./` of the default executable.
        let expected =
            std::path::absolute(Path::new("../rocksdb").join(DEFAULT_EXECUTABLE)).unwrap();
        assert!(expected.ends_with("rocksdb/tools/benchmark.sh"));
        assert_eq!(cmd.get_program(), expected.as_os_str());
        assert_eq!(
            cmd.get_args().collect::<Vec<_>>(),
            ["multireadrandom", "--multiread_batched", "--extra"]
                .map(OsStr::new)
                .to_vec()
        );
        assert_eq!(cmd.get_current_dir(), Some(Path::new("../rocksdb")));
        assert_eq!(
            cmd.get_envs().collect::<Vec<_>>(),
            vec![
                (OsStr::new("DURATION"), None),
                (OsStr::new("NUM_KEYS"), Some(OsStr::new("10")))
            ]
        );
    }

    #[test]
    fn absolute_executable_ignores_working_dir() {
        let ctx = context(Path::new("."));
        let workload = WorkloadSpec::builder("multireadrandom").build().unwrap();

        let cmd = ProcessInvoker::new("/opt/bench/run")
            .command(&ctx, &workload, &[])
            .unwrap();

        assert_eq!(cmd.get_program(), OsStr::new("/opt/bench/run"));
    }

    #[test]
    fn missing_executable_is_an_invocation_error() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let ctx = context(dir.path());
        let workload = WorkloadSpec::builder("multireadrandom").build().unwrap();

        let result = ProcessInvoker::default().invoke(&ctx, &workload, &[]);

        assert!(matches!(result, Err(RunError::Invocation { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn report_exit_code_and_inherit_environment() {
        use std::os::unix::fs::PermissionsExt as _;

        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let script = dir.path().join("bench.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\n[ -n \"$PATH\" ] || exit 9\n[ \"$NUM_KEYS\" = 10 ] || exit 8\n[ \"$1\" = multireadrandom ] || exit 7\nexit 3\n",
        )
        .unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).unwrap();

        let ctx = context(dir.path());
        let workload = WorkloadSpec::builder("multireadrandom").build().unwrap();

        let exit = ProcessInvoker::new("./bench.sh")
            .invoke(&ctx, &workload, &[])
            .expect("failed to launch script");

        assert_eq!(exit, ProcessExit::Code(3));
    }
}
