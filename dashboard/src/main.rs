use anyhow::Context;
use chrono::{SubsecRound, Utc};
use clap::Parser;
use reliability_dashboard::generate_history;
use reliability_dashboard::render::render_text;
use reliability_dashboard::view::{render, DashboardConfig, Selection};
use reliability_run_model::{store_run_records, PIPELINES};
use std::fs::File;
use std::io::{BufWriter, Write};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = cli::CliArgs::parse();
    let config = DashboardConfig { seed: args.seed };
    log::debug!("Using seed {}", config.seed);

    match args.command {
        cli::Command::Serve { bind } => {
            reliability_dashboard::server::serve(config, bind).await?;
        }
        cli::Command::Render { pipeline, rerun } => {
            let now = Utc::now().trunc_subsecs(0);
            let selection = Selection {
                pipeline,
                rerun_nonce: rerun.then(|| now.timestamp() as u64),
                ..Default::default()
            };
            let view = render(&config, &selection, now)?;
            print!("{}", render_text(&view));
        }
        cli::Command::Export { out } => {
            let records = generate_history(&PIPELINES, config.seed, Utc::now().trunc_subsecs(0));

            let file = File::create_new(&out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            let mut writer = BufWriter::new(file);
            store_run_records(&records, &mut writer)?;
            writer.flush()?;

            log::info!("Wrote {} runs to {}", records.len(), out.display());
        }
    }

    Ok(())
}
