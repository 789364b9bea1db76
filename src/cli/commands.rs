//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - serve: run the daemon in the foreground
//! - enqueue/dequeue: queue operations
//! - signal/start/stop/reset: signal control
//! - status/explain: inspection

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Junction - a traffic intersection queue daemon
#[derive(Parser, Debug)]
#[command(name = "junction")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the daemon in the foreground
    Serve,

    /// Add a vehicle to a lane queue
    Enqueue {
        /// Vehicle identifier (generated when omitted)
        vehicle: Option<String>,

        /// Lane to join (North, East, South, West)
        #[arg(short, long)]
        lane: Option<String>,
    },

    /// Remove the front vehicle from the active lane
    Dequeue,

    /// Show queues and signal state
    Status,

    /// Manually set the green lane
    Signal {
        /// Lane to make green (North, East, South, West)
        lane: String,
    },

    /// Start the automatic signal cycle
    Start {
        /// Green-phase duration in seconds
        #[arg(short, long)]
        signal_time: Option<i64>,
    },

    /// Stop the automatic signal cycle
    Stop,

    /// Clear all queues and stop the cycle
    Reset,

    /// Describe the service
    Explain,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        // No args should result in None command (status mode)
        let cli = Cli::try_parse_from(["junction"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["junction", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["junction", "-c", "/path/to/junction.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/junction.yml")));
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from(["junction", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    #[test]
    fn test_enqueue_defaults() {
        let cli = Cli::try_parse_from(["junction", "enqueue"]).unwrap();
        match cli.command {
            Some(Commands::Enqueue { vehicle, lane }) => {
                assert!(vehicle.is_none());
                assert!(lane.is_none());
            }
            _ => panic!("Expected enqueue command"),
        }
    }

    #[test]
    fn test_enqueue_with_vehicle_and_lane() {
        let cli = Cli::try_parse_from(["junction", "enqueue", "Car-1", "--lane", "East"]).unwrap();
        match cli.command {
            Some(Commands::Enqueue { vehicle, lane }) => {
                assert_eq!(vehicle, Some("Car-1".to_string()));
                assert_eq!(lane, Some("East".to_string()));
            }
            _ => panic!("Expected enqueue command"),
        }
    }

    #[test]
    fn test_dequeue_command() {
        let cli = Cli::try_parse_from(["junction", "dequeue"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Dequeue)));
    }

    #[test]
    fn test_signal_command() {
        let cli = Cli::try_parse_from(["junction", "signal", "South"]).unwrap();
        match cli.command {
            Some(Commands::Signal { lane }) => assert_eq!(lane, "South"),
            _ => panic!("Expected signal command"),
        }
    }

    #[test]
    fn test_start_command() {
        let cli = Cli::try_parse_from(["junction", "start"]).unwrap();
        match cli.command {
            Some(Commands::Start { signal_time }) => assert!(signal_time.is_none()),
            _ => panic!("Expected start command"),
        }
    }

    #[test]
    fn test_start_with_signal_time() {
        let cli = Cli::try_parse_from(["junction", "start", "-s", "5"]).unwrap();
        match cli.command {
            Some(Commands::Start { signal_time }) => assert_eq!(signal_time, Some(5)),
            _ => panic!("Expected start command"),
        }
    }

    #[test]
    fn test_stop_command() {
        let cli = Cli::try_parse_from(["junction", "stop"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Stop)));
    }

    #[test]
    fn test_reset_command() {
        let cli = Cli::try_parse_from(["junction", "reset"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Reset)));
    }

    #[test]
    fn test_status_command() {
        let cli = Cli::try_parse_from(["junction", "status"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Status)));
    }

    #[test]
    fn test_explain_command() {
        let cli = Cli::try_parse_from(["junction", "explain"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Explain)));
    }

    #[test]
    fn test_help_works() {
        // Verify help doesn't panic
        Cli::command().debug_assert();
    }
}
