/// CLI argument parsing and command handling

use clap::{Parser, Subcommand};

// Build timestamp injected at compile time
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
pub const VERSION_WITH_BUILD: &str = concat!(env!("CARGO_PKG_VERSION"), " (built: ", env!("BUILD_TIMESTAMP"), ")");

// Get version with timestamp
pub fn get_version() -> &'static str {
    VERSION_WITH_BUILD
}

#[derive(Parser)]
#[command(name = "envwatch")]
#[command(author, version = VERSION_WITH_BUILD, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show latest reading status
    Status,

    /// Health check report for the most recent reading
    Check,

    /// Statistics report over the full reading history
    Report,

    /// Threshold configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Run HTTP dashboard server mode
    #[cfg(feature = "server")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = crate::utils::DEFAULT_PORT)]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = crate::utils::DEFAULT_HOST)]
        host: String,

        /// Enable CORS for cross-origin requests
        #[arg(long)]
        cors: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// View threshold configuration
    View,

    /// Validate threshold configuration
    Validate,

    /// Reset to the built-in default thresholds
    Reset,

    /// Set the directory holding data.csv and range.config
    SetDir { path: String },
}

#[cfg(all(test, feature = "server"))]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["envwatch", "serve"]).unwrap();
        match cli.command {
            Some(Commands::Serve { port, host, cors }) => {
                assert_eq!(port, crate::utils::DEFAULT_PORT);
                assert_eq!(host, crate::utils::DEFAULT_HOST);
                assert!(!cors);
            }
            _ => panic!("expected serve command"),
        }
    }
}
