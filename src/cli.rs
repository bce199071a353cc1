use clap::{Parser, Subcommand};

use crate::report::ReportFormat;

/// Terminal dashboard and share server for a freelance business
#[derive(Debug, Parser)]
#[command(name = "freelance-manager", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The dashboard runs when no subcommand is given
    pub fn selected(&self) -> Command {
        self.command.clone().unwrap_or(Command::Dashboard)
    }
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Open the terminal dashboard
    Dashboard,

    /// Serve client share pages and uploaded files
    Serve {
        /// Address to listen on, overrides SHARE_BIND
        #[arg(long)]
        bind: Option<String>,
    },

    /// Write a business report for one account
    Report {
        /// Account to report on; the only account is used when omitted
        #[arg(long)]
        profile: Option<i32>,

        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Output directory, overrides REPORT_DIR
        #[arg(long)]
        output: Option<String>,
    },

    /// Pull the latest commits of a project's repository
    SyncCommits {
        #[arg(long)]
        project: i32,

        /// Token to store on the project before syncing
        #[arg(long)]
        token: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_valid() {
        <Cli as CommandFactory>::command().debug_assert();
    }

    #[test]
    fn defaults_to_dashboard() {
        let cli = Cli::try_parse_from(["freelance-manager"]).unwrap();
        assert_eq!(cli.selected(), Command::Dashboard);
    }

    #[test]
    fn report_flags_parse() {
        let cli = Cli::try_parse_from([
            "freelance-manager",
            "report",
            "--profile",
            "3",
            "--format",
            "csv",
        ])
        .unwrap();
        assert_eq!(
            cli.selected(),
            Command::Report {
                profile: Some(3),
                format: ReportFormat::Csv,
                output: None,
            }
        );
    }

    #[test]
    fn serve_accepts_bind_address() {
        let cli = Cli::try_parse_from(["freelance-manager", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
        assert_eq!(
            cli.selected(),
            Command::Serve {
                bind: Some("0.0.0.0:9000".to_string())
            }
        );
    }
}
