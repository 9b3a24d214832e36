use anyhow::Result;

use tennis_ladder::cli::Command;
use tennis_ladder::{
    handle_completions, handle_init, handle_new_period, handle_reset_cycle, handle_serve,
    handle_standings, interpret,
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
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Init => handle_init(),
        Command::Standings { discipline, gender } => handle_standings(*discipline, *gender),
        Command::ResetCycle => handle_reset_cycle(),
        Command::NewPeriod => handle_new_period(),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
