//! Chat responder: canned pattern-matching replies standing in for a real
//! model. Kept behind a trait so a future backend can replace it without
//! touching the runner or the dispatcher.

use crate::runner::Language;

pub trait Responder {
    /// Produce a reply for a free-form chat message.
    fn reply(&self, message: &str) -> String;

    /// Rule-based improvement suggestions for a piece of code.
    fn analyze(&self, code: &str, language: &str) -> String;
}

/// The built-in responder: a fixed set of string-matching rules.
#[derive(Debug, Default)]
pub struct CannedResponder;

/// Language names recognized in free-form chat. Deliberately narrower than
/// the runner's table: substring matching on "c" or "bash" would fire on
/// almost any English sentence.
const CHAT_LANGUAGES: &[&str] = &["python", "javascript", "java", "cpp", "go", "rust"];

impl Responder for CannedResponder {
    fn reply(&self, message: &str) -> String {
        let lower = message.to_lowercase();

        if lower.contains("help") {
            return help_text();
        }
        if lower.contains("run") && lower.contains("code") {
            return "I can help you run code! Use the /run command followed by the language name."
                .to_string();
        }
        if lower.contains("improve") {
            return "I can analyze your code and suggest improvements for performance, \
                    readability, and best practices."
                .to_string();
        }
        if CHAT_LANGUAGES.iter().any(|l| lower.contains(l)) {
            return "Great! I can help you with that programming language. What would you like to do?"
                .to_string();
        }

        "I'm DevBot, your coding assistant! I can help with code execution, improvements, \
         debugging, and general programming questions. How can I assist you today?"
            .to_string()
    }

    fn analyze(&self, code: &str, language: &str) -> String {
        let mut suggestions: Vec<&str> = Vec::new();

        match language {
            "python" => {
                if code.matches("print(").count() > 3 {
                    suggestions.push("Consider using logging instead of multiple print statements");
                }
                if code.contains("for i in range(len(") {
                    suggestions
                        .push("Consider using 'for item in list' instead of index-based iteration");
                }
            }
            "javascript" => {
                if code.contains("var ") {
                    suggestions.push("Consider using 'let' or 'const' instead of 'var'");
                }
                if code.contains("== ") && !code.contains("=== ") {
                    suggestions
                        .push("Consider using strict equality (===) instead of loose equality (==)");
                }
            }
            _ => {}
        }

        if suggestions.is_empty() {
            return format!("* Code looks good! Following {} best practices.", language);
        }
        suggestions
            .iter()
            .map(|s| format!("* {}", s))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn help_text() -> String {
    let mut text = String::from(
        "**DevBot commands**\n\n\
         * `/run <language> [file]` - run code in the given language\n\
         * `/improve <file> [language]` - suggest code improvements\n\
         * `/explain <code>` - explain a code snippet\n\
         * `/history` - show recent commands\n\
         * `/clear` - clear the screen\n\
         * `/exit` - leave the chat\n\
         * anything else - just chat!\n\n\
         **Supported languages**\n\n",
    );
    for lang in Language::ALL {
        text.push_str(&format!(
            "* `{}` ({}, {})\n",
            lang.id(),
            lang.extension(),
            lang.strategy()
        ));
    }
    text
}
