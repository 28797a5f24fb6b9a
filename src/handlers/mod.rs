//! Command dispatcher: parses `/`-prefixed REPL input and routes it to the
//! matching handler.

pub mod explain;
pub mod improve;
pub mod repl;
pub mod run;

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Run(Vec<String>),
    Improve(Vec<String>),
    Explain(String),
    Clear,
    History,
    Exit,
    Unknown(String),
    /// Not a `/`-command at all; goes to the responder.
    Chat(String),
}

pub fn parse(input: &str) -> Command {
    let input = input.trim();
    let Some(rest) = input.strip_prefix('/') else {
        return Command::Chat(input.to_string());
    };

    let mut parts = rest.split_whitespace();
    let command = parts.next().unwrap_or("").to_lowercase();
    let args: Vec<String> = parts.map(str::to_string).collect();

    match command.as_str() {
        "help" => Command::Help,
        "run" => Command::Run(args),
        "improve" => Command::Improve(args),
        "explain" => Command::Explain(args.join(" ")),
        "clear" => Command::Clear,
        "history" => Command::History,
        "exit" | "quit" => Command::Exit,
        other => Command::Unknown(other.to_string()),
    }
}
