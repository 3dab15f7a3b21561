use clap::Parser;
use sortfolder::cli::{Args, run_cli};
use sortfolder::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    match run_cli(args) {
        Ok(code) => code,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}
