//! End-to-end runner tests against the real toolchains. Each test skips
//! itself when the toolchain binary is not installed on the host.

use std::process::Stdio;
use std::time::{Duration, Instant};

use devbot::runner::CodeRunner;

fn have(tool: &str) -> bool {
    std::process::Command::new(tool)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

#[tokio::test]
async fn python_hello_world() {
    if !have("python3") {
        println!("python3 not installed; skipping");
        return;
    }
    let mut runner = CodeRunner::new().unwrap();
    let res = runner.execute(r#"print("hi")"#, "python").await;
    assert_eq!(res.stdout, "hi\n");
    assert_eq!(res.stderr, "");
    assert_eq!(res.exit_code, 0);
}

#[tokio::test]
async fn python_runtime_failure_surfaces_stderr_and_code() {
    if !have("python3") {
        println!("python3 not installed; skipping");
        return;
    }
    let mut runner = CodeRunner::new().unwrap();
    let res = runner
        .execute("import sys\nsys.stderr.write('bad\\n')\nsys.exit(3)", "python")
        .await;
    assert_eq!(res.exit_code, 3);
    assert!(res.stderr.contains("bad"));
}

#[tokio::test]
async fn c_syntax_error_short_circuits_before_running() {
    if !have("gcc") {
        println!("gcc not installed; skipping");
        return;
    }
    let mut runner = CodeRunner::new().unwrap();
    let res = runner
        .execute("int main() { this is not C }", "c")
        .await;
    assert!(res.stdout.is_empty());
    assert!(!res.stderr.is_empty(), "compiler diagnostic expected");
    assert_ne!(res.exit_code, 0);
    assert!(
        !runner.workspace_path().join("temp_code").exists(),
        "no artifact may be produced on compile failure"
    );
}

#[tokio::test]
async fn c_compile_and_run() {
    if !have("gcc") {
        println!("gcc not installed; skipping");
        return;
    }
    let mut runner = CodeRunner::new().unwrap();
    let res = runner
        .execute(
            "#include <stdio.h>\nint main(void) { printf(\"ok\\n\"); return 0; }",
            "c",
        )
        .await;
    assert_eq!(res.stdout, "ok\n");
    assert_eq!(res.exit_code, 0);
}

#[tokio::test]
async fn timeout_kills_the_process_and_reports_it() {
    if !have("python3") {
        println!("python3 not installed; skipping");
        return;
    }
    let mut runner = CodeRunner::with_timeout(Duration::from_secs(1)).unwrap();
    let started = Instant::now();
    let res = runner
        .execute("import time\ntime.sleep(60)", "python")
        .await;
    let elapsed = started.elapsed();
    assert!(
        elapsed < Duration::from_secs(10),
        "returned in {:?}, expected roughly the 1s budget",
        elapsed
    );
    assert_eq!(res.exit_code, 1);
    assert!(res.stderr.contains("timed out"), "stderr: {}", res.stderr);
}

#[cfg(unix)]
#[tokio::test]
async fn timeout_kills_background_children_too() {
    if !have("bash") {
        println!("bash not installed; skipping");
        return;
    }
    let mut runner = CodeRunner::with_timeout(Duration::from_secs(1)).unwrap();
    // The background sleep inherits the child's process group; its pid lands
    // in the workspace so we can check on it after the group kill.
    let res = runner
        .execute("sleep 60 & echo $! > child_pid\nsleep 60", "bash")
        .await;
    assert!(res.stderr.contains("timed out"), "stderr: {}", res.stderr);

    let pid_text =
        std::fs::read_to_string(runner.workspace_path().join("child_pid")).unwrap();
    let pid: i32 = pid_text.trim().parse().unwrap();

    let mut killed = false;
    for _ in 0..20 {
        // kill(pid, 0) probes for liveness without sending a signal.
        if unsafe { libc::kill(pid, 0) } == -1
            && std::io::Error::last_os_error().raw_os_error() == Some(libc::ESRCH)
        {
            killed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(killed, "background child {} is still alive", pid);
}

#[tokio::test]
async fn sequential_calls_do_not_leak_state() {
    if !have("python3") || !have("bash") {
        println!("python3/bash not installed; skipping");
        return;
    }
    let mut runner = CodeRunner::new().unwrap();
    let first = runner.execute(r#"print("first")"#, "python").await;
    assert_eq!(first.stdout, "first\n");

    let second = runner.execute("echo second", "bash").await;
    assert_eq!(second.stdout, "second\n");
    assert_eq!(second.stderr, "");
    assert_eq!(second.exit_code, 0);
}

#[tokio::test]
async fn java_compiles_and_runs_under_the_fixed_stem() {
    if !have("javac") || !have("java") {
        println!("javac/java not installed; skipping");
        return;
    }
    let mut runner = CodeRunner::new().unwrap();
    // The class name must match the staged filename stem.
    let source = "public class temp_code { \
                  public static void main(String[] a) { System.out.println(\"ok\"); } }";
    let res = runner.execute(source, "java").await;
    assert_eq!(res.stderr, "");
    assert_eq!(res.stdout, "ok\n");
    assert_eq!(res.exit_code, 0);
}

#[tokio::test]
async fn javascript_hello_world() {
    if !have("node") {
        println!("node not installed; skipping");
        return;
    }
    let mut runner = CodeRunner::new().unwrap();
    let res = runner.execute("console.log('hi')", "javascript").await;
    assert_eq!(res.stdout, "hi\n");
    assert_eq!(res.exit_code, 0);
}

#[tokio::test]
async fn missing_toolchain_reports_launch_failure() {
    // "go" is the least commonly installed toolchain; when it is absent the
    // runner must fold the spawn error into the result instead of failing.
    if have("go") {
        println!("go is installed; skipping the launch-failure path");
        return;
    }
    let mut runner = CodeRunner::new().unwrap();
    let res = runner.execute("package main\nfunc main() {}", "go").await;
    assert_eq!(res.exit_code, 1);
    assert!(res.stderr.contains("go"), "stderr: {}", res.stderr);
}
