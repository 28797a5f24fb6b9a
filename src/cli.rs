use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "devbot", about = "DevBot CLI - assistant for developers", version)]
#[command(group(ArgGroup::new("mode").args(["run", "improve"]).multiple(false)))]
pub struct Cli {
    /// Run a code file directly: --run <LANG> <FILE>.
    #[arg(long, num_args = 2, value_names = ["LANG", "FILE"])]
    pub run: Option<Vec<String>>,

    /// Analyze a code file and suggest improvements.
    #[arg(long, value_name = "FILE")]
    pub improve: Option<String>,

    /// Override the language for --improve (default: detect from extension).
    #[arg(long, requires = "improve")]
    pub language: Option<String>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
