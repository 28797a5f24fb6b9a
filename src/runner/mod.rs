//! Multi-language code runner: stages source in a scratch directory, invokes
//! the toolchain (interpreter, or compiler followed by the produced binary),
//! captures output, and enforces a wall-clock timeout.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::Result;
use tempfile::TempDir;
use tokio::process::Command;
use tokio::time::timeout;

/// Default wall-clock budget for a single interpreter, compiler, or run step.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fixed stem for the staged source file and the compiled artifact.
const SOURCE_STEM: &str = "temp_code";

/// Closed set of supported languages. Each variant carries its file extension
/// and an execution plan, so metadata cannot drift apart as it could in an
/// open string-keyed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    Javascript,
    Java,
    Cpp,
    C,
    Go,
    Rust,
    Bash,
}

/// How a language gets from source file to observable output.
enum Plan {
    /// Single process launch: `<command...> <file>`. Go rides this path too,
    /// since `go run` folds compile and run into one step.
    Interpreted { command: &'static [&'static str] },
    /// `<compiler> <file> -o <artifact>` then run the artifact.
    CompileThenRun { compiler: &'static str },
    /// `javac <file>` then `java -cp <dir> <stem>`.
    JavaCompileThenRun,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::Python,
        Language::Javascript,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::Go,
        Language::Rust,
        Language::Bash,
    ];

    pub fn parse(s: &str) -> Option<Language> {
        match s.to_ascii_lowercase().as_str() {
            "python" => Some(Language::Python),
            "javascript" => Some(Language::Javascript),
            "java" => Some(Language::Java),
            "cpp" => Some(Language::Cpp),
            "c" => Some(Language::C),
            "go" => Some(Language::Go),
            "rust" => Some(Language::Rust),
            "bash" => Some(Language::Bash),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Bash => "bash",
        }
    }

    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Python => ".py",
            Language::Javascript => ".js",
            Language::Java => ".java",
            Language::Cpp => ".cpp",
            Language::C => ".c",
            Language::Go => ".go",
            Language::Rust => ".rs",
            Language::Bash => ".sh",
        }
    }

    /// Reverse lookup by extension (with or without the dot), used when
    /// detecting the language of a user-supplied file.
    pub fn from_extension(ext: &str) -> Option<Language> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        Language::ALL
            .into_iter()
            .find(|l| &l.extension()[1..] == ext)
    }

    /// Short strategy label for help/usage text.
    pub fn strategy(&self) -> &'static str {
        match self.plan() {
            Plan::Interpreted { .. } => "interpreted",
            Plan::CompileThenRun { .. } | Plan::JavaCompileThenRun => "compiled",
        }
    }

    fn plan(&self) -> Plan {
        match self {
            Language::Python => Plan::Interpreted { command: &["python3"] },
            Language::Javascript => Plan::Interpreted { command: &["node"] },
            Language::Bash => Plan::Interpreted { command: &["bash"] },
            Language::Go => Plan::Interpreted { command: &["go", "run"] },
            Language::Cpp => Plan::CompileThenRun { compiler: "g++" },
            Language::C => Plan::CompileThenRun { compiler: "gcc" },
            Language::Rust => Plan::CompileThenRun { compiler: "rustc" },
            Language::Java => Plan::JavaCompileThenRun,
        }
    }
}

/// Captured outcome of one execution request. Always well-formed: internal
/// failures are folded into `stderr` with exit code 1 as the sentinel.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecutionResult {
    fn error(message: String) -> Self {
        Self { stdout: String::new(), stderr: message, exit_code: 1 }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Failure modes below the runner boundary. All of them are converted into an
/// `ExecutionResult` before `execute` returns.
enum RunError {
    /// The binary could not be spawned (missing toolchain, not executable).
    Launch { program: String, source: std::io::Error },
    /// The process outlived the wall-clock budget and was killed.
    TimedOut(Duration),
    /// I/O failure while waiting on the child.
    Wait(std::io::Error),
}

impl RunError {
    fn message(&self) -> String {
        match self {
            RunError::Launch { program, source } => {
                format!("failed to launch '{}': {}", program, source)
            }
            RunError::TimedOut(budget) => {
                format!(
                    "execution timed out after {} seconds; process killed",
                    budget.as_secs()
                )
            }
            RunError::Wait(e) => format!("failed to collect process output: {}", e),
        }
    }
}

/// Executes code snippets one at a time in a private scratch workspace.
///
/// The workspace lives for the lifetime of the runner; every invocation
/// overwrites the fixed-name source file (and compiled artifact) of the
/// previous one. `execute` takes `&mut self`, so two executions can never
/// race on the shared filenames.
pub struct CodeRunner {
    workspace: TempDir,
    budget: Duration,
}

impl CodeRunner {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(budget: Duration) -> Result<Self> {
        let workspace = TempDir::new()?;
        Ok(Self { workspace, budget })
    }

    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    /// Execute `source` as `language`. Never fails past this boundary: any
    /// internal error (unsupported language, write failure, missing
    /// toolchain, compile failure, timeout) comes back as a result whose
    /// stderr carries a readable message and whose exit code is non-zero.
    pub async fn execute(&mut self, source: &str, language: &str) -> ExecutionResult {
        let Some(lang) = Language::parse(language) else {
            return ExecutionResult::error(format!("Unsupported language: {}", language));
        };

        let source_path = self
            .workspace
            .path()
            .join(format!("{}{}", SOURCE_STEM, lang.extension()));
        if let Err(e) = tokio::fs::write(&source_path, source).await {
            return ExecutionResult::error(format!(
                "failed to write source to {}: {}",
                source_path.display(),
                e
            ));
        }

        let outcome = match lang.plan() {
            Plan::Interpreted { command } => self.run_interpreted(command, &source_path).await,
            Plan::CompileThenRun { compiler } => {
                self.run_compiled(compiler, &source_path).await
            }
            Plan::JavaCompileThenRun => self.run_java(&source_path).await,
        };

        outcome.unwrap_or_else(|e| ExecutionResult::error(e.message()))
    }

    async fn run_interpreted(
        &self,
        command: &'static [&'static str],
        source: &Path,
    ) -> Result<ExecutionResult, RunError> {
        let mut cmd = Command::new(command[0]);
        cmd.args(&command[1..]).arg(source);
        self.capture(cmd, command[0]).await
    }

    async fn run_compiled(
        &self,
        compiler: &'static str,
        source: &Path,
    ) -> Result<ExecutionResult, RunError> {
        let artifact = self.artifact_path();
        let mut compile = Command::new(compiler);
        compile.arg(source).arg("-o").arg(&artifact);
        let compiled = self.capture(compile, compiler).await?;
        if !compiled.success() {
            // Compiler stderr surfaced verbatim; the run step is skipped.
            return Ok(ExecutionResult { stdout: String::new(), ..compiled });
        }

        let program = artifact.display().to_string();
        self.capture(Command::new(&artifact), &program).await
    }

    async fn run_java(&self, source: &Path) -> Result<ExecutionResult, RunError> {
        let mut compile = Command::new("javac");
        compile.arg(source);
        let compiled = self.capture(compile, "javac").await?;
        if !compiled.success() {
            return Ok(ExecutionResult { stdout: String::new(), ..compiled });
        }

        // Class name is the source filename stem.
        let mut run = Command::new("java");
        run.arg("-cp").arg(self.workspace.path()).arg(SOURCE_STEM);
        self.capture(run, "java").await
    }

    fn artifact_path(&self) -> PathBuf {
        self.workspace.path().join(SOURCE_STEM)
    }

    /// Spawn the command, wait for it under the wall-clock budget, and
    /// collect its output. The child leads its own process group; on timeout
    /// the whole group is killed, so neither the process nor anything it
    /// spawned outlives the call.
    async fn capture(
        &self,
        mut cmd: Command,
        program: &str,
    ) -> Result<ExecutionResult, RunError> {
        cmd.current_dir(self.workspace.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|e| RunError::Launch {
            program: program.to_string(),
            source: e,
        })?;
        let pid = child.id();

        match timeout(self.budget, child.wait_with_output()).await {
            Ok(Ok(out)) => Ok(ExecutionResult {
                stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
                // Signal-terminated processes have no code; report the sentinel.
                exit_code: out.status.code().unwrap_or(1),
            }),
            Ok(Err(e)) => Err(RunError::Wait(e)),
            Err(_) => {
                kill_process_group(pid);
                Err(RunError::TimedOut(self.budget))
            }
        }
    }
}

/// SIGKILL the group led by `pid`. The child was spawned with
/// `process_group(0)`, so its pid is the group id; interpreter or compiler
/// grandchildren (e.g. the binary `go run` execs, background jobs in a bash
/// snippet) are in the same group. Errors are ignored: the group may already
/// be gone.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    if let Some(pid) = pid {
        unsafe {
            libc::killpg(pid as libc::pid_t, libc::SIGKILL);
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_and_unknown_identifiers() {
        assert_eq!(Language::parse("python"), Some(Language::Python));
        assert_eq!(Language::parse("RUST"), Some(Language::Rust));
        assert_eq!(Language::parse("cobol"), None);
        assert_eq!(Language::parse(""), None);
    }

    #[test]
    fn extension_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_extension(lang.extension()), Some(lang));
        }
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension(".toml"), None);
    }

    #[test]
    fn strategy_labels() {
        assert_eq!(Language::Python.strategy(), "interpreted");
        assert_eq!(Language::Go.strategy(), "interpreted");
        assert_eq!(Language::C.strategy(), "compiled");
        assert_eq!(Language::Java.strategy(), "compiled");
    }

    #[tokio::test]
    async fn unsupported_language_short_circuits_without_io() {
        let mut runner = CodeRunner::new().unwrap();
        let res = runner.execute("print('hi')", "cobol").await;
        assert_eq!(res.exit_code, 1);
        assert!(res.stdout.is_empty());
        assert!(res.stderr.contains("cobol"), "stderr names the language");

        let staged = std::fs::read_dir(runner.workspace_path())
            .unwrap()
            .count();
        assert_eq!(staged, 0, "no file may be written for an unknown language");
    }
}
