pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod errors;
pub mod ladder;
pub mod services;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use colored::{ColoredString, Colorize};

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::database::DbConn;
use crate::ladder::{ActivityStatus, Discipline, Gender};
use crate::services::ladder::{LadderService, TournamentContext};
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init() -> Result<()> {
    let config = AppConfig::new();
    open_database(&config)?;
    println!(
        "{} {}",
        "Database ready:".green().bold(),
        config.database.path
    );
    Ok(())
}

pub fn handle_standings(discipline: Discipline, gender: Option<Gender>) -> Result<()> {
    let config = AppConfig::new();
    let conn = open_database(&config)?;
    let service = LadderService::new(config);

    match discipline {
        Discipline::Singles => {
            println!("{}", "Singles ladder".bold());
            for player in service.singles_standings(&conn)? {
                println!(
                    "{:>4}  {:<32} {:>4}  {}",
                    player.current_position,
                    player.full_name(),
                    player.activity_index_singles,
                    status_label(player.activity_status)
                );
            }
        }
        Discipline::Doubles => {
            let ctx = TournamentContext::resolve(&conn, Discipline::Doubles)?;
            let mut current_gender = None;
            for team in service.doubles_standings(&conn, ctx, gender)? {
                if current_gender != Some(team.gender) {
                    println!("{}", format!("Doubles ladder ({})", team.gender).bold());
                    current_gender = Some(team.gender);
                }
                println!(
                    "{:>4}  {:<32} {:>4}  {}",
                    team.current_position,
                    team.team_name,
                    team.activity_index,
                    status_label(team.activity_status)
                );
            }
        }
    }

    Ok(())
}

pub fn handle_reset_cycle() -> Result<()> {
    let config = AppConfig::new();
    let mut conn = open_database(&config)?;
    let reset = LadderService::new(config).reset_cycle_activity(&mut conn)?;

    println!(
        "{} cycle {} started at {} ({} players, {} teams reset)",
        "Activity reset:".green().bold(),
        reset.cycle.id,
        reset.cycle.started_at,
        reset.players_reset,
        reset.teams_reset
    );
    Ok(())
}

pub fn handle_new_period() -> Result<()> {
    let config = AppConfig::new();
    let mut conn = open_database(&config)?;
    let updated = LadderService::new(config).start_new_period(&mut conn)?;

    println!(
        "{} {} entities",
        "New ranking period:".green().bold(),
        updated
    );
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

fn open_database(config: &AppConfig) -> Result<DbConn> {
    let settings = &config.database;
    let pool = database::create_pool(&settings.path, settings.max_connections)?;
    let conn = database::get_connection(&pool)?;
    database::setup::init_database(&conn)
        .with_context(|| format!("Failed to initialize {}", settings.path))?;
    Ok(conn)
}

fn status_label(status: ActivityStatus) -> ColoredString {
    match status {
        ActivityStatus::Green => status.as_str().green(),
        ActivityStatus::Yellow => status.as_str().yellow(),
        ActivityStatus::Red => status.as_str().red(),
    }
}
