use clap::{Parser, Subcommand};
use reliability_dashboard::view::DEFAULT_SEED;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, long_about = None)]
pub struct CliArgs {
    /// Seed for the generated run history and every other random value on the dashboard.
    #[arg(long, env = "DASHBOARD_SEED", default_value_t = DEFAULT_SEED, global = true)]
    pub seed: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the dashboard over HTTP.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "DASHBOARD_BIND", default_value = "127.0.0.1:8501")]
        bind: SocketAddr,
    },
    /// Print the dashboard to the terminal.
    Render {
        /// Pipeline to show details for. Defaults to the first pipeline.
        #[arg(long)]
        pipeline: Option<String>,

        /// Press the re-run button for the selected pipeline.
        #[arg(long, default_value = "false")]
        rerun: bool,
    },
    /// Write the generated run history to a file, one JSON object per line.
    ///
    /// The file must not already exist.
    Export {
        #[arg(long, default_value = "run_history.jsonl")]
        out: PathBuf,
    },
}
