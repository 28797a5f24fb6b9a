//! /run handler: collect code from a file or interactive entry, execute it,
//! and format the captured result for display.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Result};
use is_terminal::IsTerminal;

use crate::runner::{ExecutionResult, Language};
use crate::session::Session;

pub fn usage() -> String {
    let supported: Vec<&str> = Language::ALL.iter().map(|l| l.id()).collect();
    format!(
        "Usage: /run <language> [file]\nSupported: {}",
        supported.join(", ")
    )
}

/// Handle `/run <language> [file]` from the REPL. Returns the rendered
/// response text; the caller prints and records it.
pub async fn run(session: &mut Session, args: &[String]) -> Result<String> {
    let Some(language) = args.first() else {
        return Ok(usage());
    };
    let language = language.to_lowercase();

    let code = match args.get(1) {
        Some(path) => read_code_file(path)?,
        None => collect_interactive(&language)?,
    };
    if code.trim().is_empty() {
        return Ok("No code provided".to_string());
    }

    println!("Running {} code...", language);
    let result = session.runner.execute(&code, &language).await;
    Ok(format_result(&result, session.config.max_output_lines))
}

/// One-shot `--run <LANG> <FILE>` from the CLI.
pub async fn run_file(session: &mut Session, language: &str, path: &str) -> Result<String> {
    let code = read_code_file(path)?;
    if code.trim().is_empty() {
        bail!("{}: file is empty", path);
    }
    let result = session.runner.execute(&code, &language.to_lowercase()).await;
    Ok(format_result(&result, session.config.max_output_lines))
}

fn read_code_file(path: &str) -> Result<String> {
    if !Path::new(path).exists() {
        bail!("File not found: {}", path);
    }
    Ok(fs::read_to_string(path)?)
}

/// Multi-line code entry: lines until a lone `EOF` or end-of-input.
fn collect_interactive(language: &str) -> Result<String> {
    let interactive = io::stdin().is_terminal();
    if interactive {
        println!(
            "Enter your {} code (type 'EOF' on its own line or press Ctrl-D to finish):",
            language
        );
    }

    let mut lines: Vec<String> = Vec::new();
    let stdin = io::stdin();
    loop {
        if interactive {
            print!("{}", if lines.is_empty() { ">>> " } else { "... " });
            io::stdout().flush().ok();
        }
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim() == "EOF" {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(lines.join("\n"))
}

/// Render an execution result: stdout section, stderr section, return code
/// when non-zero. Display output is capped at `max_lines`; the captured
/// result itself is never truncated by the runner.
pub fn format_result(result: &ExecutionResult, max_lines: usize) -> String {
    let mut sections: Vec<String> = Vec::new();
    if !result.stdout.is_empty() {
        sections.push(format!("Output:\n{}", cap_lines(&result.stdout, max_lines)));
    }
    if !result.stderr.is_empty() {
        sections.push(format!("Error:\n{}", cap_lines(&result.stderr, max_lines)));
    }
    if result.exit_code != 0 {
        sections.push(format!("Return code: {}", result.exit_code));
    }
    if sections.is_empty() {
        return "Code executed successfully (no output)".to_string();
    }
    sections.join("\n\n")
}

fn cap_lines(text: &str, max_lines: usize) -> String {
    let total = text.lines().count();
    if max_lines == 0 || total <= max_lines {
        return text.trim_end_matches('\n').to_string();
    }
    let kept: Vec<&str> = text.lines().take(max_lines).collect();
    format!("{}\n... ({} more lines)", kept.join("\n"), total - max_lines)
}
