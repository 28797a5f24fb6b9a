//! Interactive chat loop: reads lines, dispatches `/`-commands, and falls
//! back to the responder for plain chat.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use is_terminal::IsTerminal;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::handlers::{self, explain, improve, run, Command};
use crate::printer::{print_banner, MarkdownPrinter, TextPrinter};
use crate::session::Session;

pub async fn run_repl(session: &mut Session) -> Result<()> {
    let interactive = io::stdin().is_terminal();
    let assistant = TextPrinter { color: Some("magenta") };
    let markdown = MarkdownPrinter::default();

    if interactive {
        print_banner();
        println!("Type '/help' for commands, '/exit' to quit, or just start chatting!\n");
    }

    let stdin = io::stdin();
    loop {
        if interactive {
            print!("You: ");
            io::stdout().flush().ok();
        }
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            if interactive {
                println!("\nGoodbye! Happy coding!");
            }
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match handlers::parse(input) {
            Command::Exit => {
                println!("Goodbye! Happy coding!");
                break;
            }
            Command::Help => {
                markdown.print(&crate::responder::help_text());
            }
            Command::Run(args) => match run::run(session, &args).await {
                Ok(response) => {
                    println!("\n{}\n", response);
                    session.record(input, &response);
                }
                Err(e) => eprintln!("\n{}\n", e),
            },
            Command::Improve(args) => match improve::run(session, &args) {
                Ok(response) => {
                    markdown.print(&response);
                    session.record(input, &response);
                }
                Err(e) => eprintln!("\n{}\n", e),
            },
            Command::Explain(snippet) => {
                println!("\n{}\n", explain::run(&snippet));
            }
            Command::Clear => {
                // ANSI clear screen + home.
                print!("\x1b[2J\x1b[1;1H");
                io::stdout().flush().ok();
            }
            Command::History => {
                print_history(session);
            }
            Command::Unknown(cmd) => {
                println!("\nUnknown command: {}\nType '/help' for available commands.\n", cmd);
            }
            Command::Chat(message) => {
                let reply = session.responder.reply(&message);
                assistant.print(&format!("\nDevBot: {}\n", reply));
                session.record(&message, &reply);
            }
        }
    }

    Ok(())
}

fn print_history(session: &Session) {
    match session.history().recent(10) {
        Ok(entries) if entries.is_empty() => println!("\nNo history found.\n"),
        Ok(entries) => {
            println!("\nRecent history:");
            for entry in entries {
                println!("[{}] {}", short_timestamp(&entry.timestamp), entry.command);
            }
            println!();
        }
        Err(e) => eprintln!("\ncould not read history: {}\n", e),
    }
}

/// `2026-08-27T12:34:56Z` style timestamps shortened to second precision;
/// anything unparseable is shown as-is.
fn short_timestamp(raw: &str) -> String {
    match OffsetDateTime::parse(raw, &Rfc3339) {
        Ok(ts) => format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            ts.year(),
            ts.month() as u8,
            ts.day(),
            ts.hour(),
            ts.minute(),
            ts.second()
        ),
        Err(_) => raw.to_string(),
    }
}
