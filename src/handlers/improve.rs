//! /improve handler: detect the language of a file and run the responder's
//! rule-based analysis over it.

use std::fs;
use std::path::Path;

use anyhow::{bail, Result};

use crate::runner::Language;
use crate::session::Session;

pub fn usage() -> String {
    "Usage: /improve <file> [language]".to_string()
}

pub fn run(session: &Session, args: &[String]) -> Result<String> {
    let Some(path) = args.first() else {
        return Ok(usage());
    };
    if !Path::new(path).exists() {
        bail!("File not found: {}", path);
    }

    let language = match args.get(1) {
        Some(lang) => lang.to_lowercase(),
        None => detect_language(path),
    };

    let code = fs::read_to_string(path)?;
    let suggestions = session.responder.analyze(&code, &language);
    Ok(format!("**Code analysis for {}**\n\n{}", path, suggestions))
}

/// Language identifier from the file extension, or "unknown".
fn detect_language(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Language::from_extension)
        .map(|l| l.id().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
