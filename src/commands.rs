//! CLI command definitions
//!
//! Defines the clap commands for the signaling simulator.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a named scenario against the built-in echo responder
    ///
    /// Prints every message delivered to the counterpart, one JSON object
    /// per line.
    Run {
        /// Scenario name (see `list`)
        scenario: String,

        /// Skip the scripted delays between messages
        #[arg(long)]
        no_delay: bool,

        /// Fail if a reply takes longer than this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// List the named scenarios
    #[command(alias = "ls")]
    List,

    /// Print the entity catalog
    Catalog {
        /// Only entities shareable over this technology (WebRTC or VNC)
        #[arg(long, short)]
        technology: Option<String>,
    },

    /// Execute a test scenario defined in a YAML file
    Test {
        /// Path to the YAML test scenario file
        path: PathBuf,

        /// Verbose output
        #[arg(long, short)]
        verbose: bool,

        /// Skip the scripted delays of named scenarios
        #[arg(long)]
        no_delay: bool,
    },
}
