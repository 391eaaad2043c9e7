use seashell::{Config, Interpreter, Options};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let options: Options = argh::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(options.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut shell = Interpreter::new(Config::from(&options));
    match shell.repl() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("seashell: {e:#}");
            ExitCode::FAILURE
        }
    }
}
