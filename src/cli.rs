use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Critic vs. player rating discrepancy analytics")]
pub struct Cli {
    /// JSON config file (optional, every field has a default)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Raw games CSV, overrides the configured input path
    #[arg(long, global = true)]
    pub input: Option<PathBuf>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the query server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Score the dataset and write the processed tables
    Process {
        /// Output directory, overrides the configured one
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a summary of the scored dataset
    Report {
        /// Rows per ranking (optional, defaults to 10)
        #[arg(short, long, default_value_t = 10)]
        top: usize,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}
