use anyhow::Result;
use devbot::cli::Cli;
use devbot::config::Config;
use devbot::handlers;
use devbot::session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let cfg = Config::load();
    let mut session = Session::new(cfg)?;

    if let Some(run_args) = args.run {
        // clap guarantees exactly two values.
        let (language, file) = (&run_args[0], &run_args[1]);
        let output = handlers::run::run_file(&mut session, language, file).await?;
        println!("{}", output);
        return Ok(());
    }

    if let Some(file) = args.improve {
        let mut improve_args = vec![file];
        if let Some(lang) = args.language {
            improve_args.push(lang);
        }
        let output = handlers::improve::run(&session, &improve_args)?;
        println!("{}", output);
        return Ok(());
    }

    handlers::repl::run_repl(&mut session).await
}
