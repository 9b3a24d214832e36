use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::ladder::{Discipline, Gender};

#[derive(Parser, Debug)]
#[command(author, version, about = "tennis challenge ladder backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema and seed the active tournaments
    Init,
    /// Print the current ladder
    Standings {
        /// Ladder to print
        #[arg(short, long, default_value_t = Discipline::Singles)]
        discipline: Discipline,
        /// Only doubles teams of this gender
        #[arg(short, long)]
        gender: Option<Gender>,
    },
    /// Zero this cycle's rejections and recompute every activity status
    ResetCycle,
    /// Start a new ranking period from the current positions
    NewPeriod,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_standings_filters() {
        let cli = Cli::parse_from([
            "tennis_ladder",
            "standings",
            "--discipline",
            "doubles",
            "--gender",
            "female",
        ]);
        assert_eq!(
            cli.command,
            Command::Standings {
                discipline: Discipline::Doubles,
                gender: Some(Gender::Female)
            }
        );
    }

    #[test]
    fn test_kebab_case_subcommands() {
        let cli = Cli::parse_from(["tennis_ladder", "reset-cycle"]);
        assert_eq!(cli.command, Command::ResetCycle);

        let cli = Cli::parse_from(["tennis_ladder", "serve"]);
        assert_eq!(cli.command, Command::Serve { port: 3000 });
    }
}
