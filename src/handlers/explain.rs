//! /explain handler: canned explanation text, a placeholder for a real model.

pub fn usage() -> String {
    "Usage: /explain <code snippet>".to_string()
}

pub fn run(snippet: &str) -> String {
    if snippet.trim().is_empty() {
        return usage();
    }
    "Code explanation:\n\nThis code appears to implement functionality in the given \
     programming language. For a detailed explanation I would analyze the code \
     structure, logic flow, and the purpose of each component.\n\n\
     (Note: connect a real model backend for detailed explanations.)"
        .to_string()
}
