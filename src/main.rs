use anyhow::Result;

use game_discrepancy::cli::{Cli, Command};
use game_discrepancy::{
    handle_completions, handle_process, handle_report, handle_serve, interpret, load_config,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let cli = interpret();
    execute_command(cli)
}

fn execute_command(cli: Cli) -> Result<()> {
    if let Command::Completions { shell } = cli.command {
        return handle_completions(shell);
    }

    let config = load_config(cli.config.as_deref(), cli.input.as_deref())?;
    match cli.command {
        Command::Serve { port } => handle_serve(port, config),
        Command::Process { output } => handle_process(config, output),
        Command::Report { top } => handle_report(config, top),
        Command::Completions { .. } => Ok(()),
    }
}
