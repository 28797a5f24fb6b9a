//! Printers: colored text and markdown (termimad).

use owo_colors::OwoColorize;
use termimad::MadSkin;

pub struct TextPrinter {
    pub color: Option<&'static str>,
}

impl TextPrinter {
    pub fn print(&self, text: &str) {
        if let Some(c) = self.color {
            match c {
                "green" => println!("{}", text.green()),
                "cyan" => println!("{}", text.cyan()),
                "magenta" => println!("{}", text.magenta()),
                "yellow" => println!("{}", text.yellow()),
                "red" => println!("{}", text.red()),
                _ => println!("{}", text),
            }
        } else {
            println!("{}", text);
        }
    }
}

pub struct MarkdownPrinter {
    pub skin: MadSkin,
}

impl Default for MarkdownPrinter {
    fn default() -> Self {
        Self { skin: MadSkin::default() }
    }
}

impl MarkdownPrinter {
    pub fn print(&self, text: &str) {
        self.skin.print_text(text);
        println!();
    }
}

pub fn print_banner() {
    let banner = "\
+---------------------------------------------------------------+
|                          DevBot CLI                           |
|                  AI assistant for developers                  |
|                                                               |
|  * Chat assistance                                            |
|  * Multi-language code execution                              |
|  * Code improvement suggestions                               |
|  * Code explanation                                           |
|                                                               |
|  Type '/help' for commands or just start chatting!            |
+---------------------------------------------------------------+";
    println!("{}", banner.cyan());
}
