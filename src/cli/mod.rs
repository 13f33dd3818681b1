use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "keystone-api")]
#[command(about = "Keystone API - rental listings and resource management backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Serve the HTTP API (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

impl Cli {
    /// `serve` when no subcommand is given.
    pub fn command(&self) -> Commands {
        match &self.command {
            Some(Commands::Serve { port }) => Commands::Serve { port: *port },
            Some(Commands::Migrate) => Commands::Migrate,
            None => Commands::Serve { port: None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::parse_from(["keystone-api"]);
        assert_eq!(cli.command(), Commands::Serve { port: None });
    }

    #[test]
    fn port_flag_is_parsed() {
        let cli = Cli::parse_from(["keystone-api", "serve", "--port", "4000"]);
        assert_eq!(cli.command(), Commands::Serve { port: Some(4000) });
        let cli = Cli::parse_from(["keystone-api", "migrate"]);
        assert_eq!(cli.command(), Commands::Migrate);
    }
}
