//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bursar",
    about = "AI-assisted finance analysis for university students",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server
    Serve {
        /// Host to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value_t = 8000)]
        port: u16,

        /// Use the offline mock backend instead of the live model service
        #[arg(long)]
        mock: bool,
    },

    /// Analyze a request file offline with the mock backend
    Analyze {
        /// Path to a JSON file containing a finance request
        file: PathBuf,
    },
}
