use chapterfeed::assemble::channel_info;
use chapterfeed::error::{ErrorKind, Result};
use chapterfeed::{Context, Services, assemble};
use chapterfeed_config::Config;
use clap::Parser;
use exn::ResultExt;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Joins audiobook chapter titles to their narration episodes and publishes
/// the newest as a podcast feed.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Prefix for every enclosure URL, used verbatim (include any trailing slash)
    base_url: String,
    /// Where to write the RSS document
    target_path: PathBuf,
    /// Configuration file to read instead of ./chapterfeed.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(err.exit_code())
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let services = Services::discover(&config)?;
    let ctx = Context::prepare(services, &config).await?;
    assemble(&ctx, channel_info(&config.channel), &cli.base_url, &cli.target_path).await?;
    Ok(())
}
