use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scrub")]
#[command(about = "Mask stored comment author IP addresses", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite database path (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Replacement address written over author IPs
    #[arg(long, global = true, env = "SCRUB_MASKED_IP")]
    pub masked_ip: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrub every stored comment whose author IP is not yet masked
    Cleanup {
        /// Abort on the first failed comment instead of continuing
        #[arg(long)]
        stop_on_error: bool,
    },

    /// Turn IP scrubbing on
    Enable,

    /// Turn IP scrubbing off
    Disable,

    /// Remove the stored flag entirely
    Delete,

    /// Show the flag, masked address and pending count
    Status,

    /// Initialize the flag on first install
    Activate {
        /// Flag value to write when none is stored (default from config)
        #[arg(long)]
        enabled: Option<bool>,
    },

    /// Deactivate; the stored flag is kept
    Deactivate,

    /// Remove all stored scrub settings
    Uninstall,

    /// Start the admin server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}
