//! Command line argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::discovery::DiscoveryStrategy;
use crate::models::Vendor;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "tvremote")]
#[command(about = "📺 Control Roku and Samsung TVs on your network from the terminal")]
pub struct Cli {
    /// Gateway configuration file (defaults apply when missing)
    #[arg(short, long, global = true, default_value = "tvremote.toml")]
    pub config: PathBuf,

    /// Saved devices file (overrides the configuration)
    #[arg(long, global = true)]
    pub devices_file: Option<PathBuf>,

    /// TV address; defaults to the most recently used saved device
    #[arg(long, global = true)]
    pub ip: Option<String>,

    /// TV vendor: roku, samsung or google
    #[arg(long, global = true)]
    pub vendor: Option<Vendor>,

    /// Samsung pairing token
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease logging verbosity (only errors)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// List saved devices (default)
    Devices,
    /// Find TVs on the local network
    Discover {
        /// ssdp, sweep or combined
        #[arg(short, long, default_value = "ssdp")]
        strategy: DiscoveryStrategy,
        /// Subnet base for the sweep, e.g. 192.168.1
        #[arg(short, long)]
        base: Option<String>,
        /// Save every device found
        #[arg(long)]
        save: bool,
    },
    /// Send a remote key ("Up", "Select", "VolumeMute" or a vendor token)
    Key {
        key: String,
        /// Hold the key down instead of pressing it
        #[arg(long, conflicts_with = "up")]
        down: bool,
        /// Release a held key
        #[arg(long)]
        up: bool,
    },
    /// Launch an app by id, or by name with --name
    Launch {
        app_id: Option<String>,
        /// Case-insensitive part of the app name
        #[arg(short, long, conflicts_with = "app_id")]
        name: Option<String>,
    },
    /// Search on the TV
    Search { keyword: String },
    /// Type text on the TV, one character at a time
    Text { text: String },
    /// List installed apps
    Apps,
    /// Show the TV's device info
    Info,
    /// Save a device by address
    Save {
        ip: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Rename a saved device
    Rename { ip: String, name: String },
    /// Forget a saved device
    Forget { ip: String },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_key_with_global_target() {
        let cli = Cli::parse_from(["tvremote", "key", "VolumeUp", "--ip", "10.0.0.5", "--vendor", "samsung"]);
        assert_eq!(cli.ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(cli.vendor, Some(Vendor::Samsung));
        assert!(matches!(cli.command, Some(Commands::Key { ref key, down: false, up: false }) if key == "VolumeUp"));
    }

    #[test]
    fn test_parse_discover_strategy() {
        let cli = Cli::parse_from(["tvremote", "discover", "--strategy", "combined", "--base", "10.0.1"]);
        match cli.command {
            Some(Commands::Discover { strategy, base, save }) => {
                assert_eq!(strategy, DiscoveryStrategy::Combined);
                assert_eq!(base.as_deref(), Some("10.0.1"));
                assert!(!save);
            }
            _ => panic!("expected discover"),
        }
    }
}
