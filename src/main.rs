mod config;
mod scheduler;
mod prober;
mod report;
mod util;

use config::{CliArgs, ClientConfig, OutputFormat};
use scheduler::Scheduler;
use prober::status::attempt;

use anyhow::Context;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Arguments are checked before anything touches the network
    let args = CliArgs::parse(std::env::args().skip(1))?;
    let config = ClientConfig::from_env()?;
    let log_level = config.get_tracing_level()?;

    init_tracing(&config, log_level)?;

    let scheduler = Scheduler::new(args.attempts)?;

    // Resolved once, shared by every attempt
    let candidates = util::resolve(&args.host)
        .await
        .with_context(|| format!("failed to resolve {}", args.host))?;
    info!(host = %args.host, candidates = candidates.len(), attempts = args.attempts, "starting status checks");

    let candidates = &candidates;
    let report = scheduler.run(|| attempt(candidates)).await?;

    info!(
        code = report.code,
        call_no = report.call_no,
        successful = report.successful_attempts,
        elapsed = ?report.elapsed,
        "status checks finished"
    );
    println!("{}", report.render(config.report_format)?);

    Ok(())
}

fn init_tracing(config: &ClientConfig, level: tracing::Level) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("client={}", level.as_str().to_lowercase()).parse()?);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.log_format {
        OutputFormat::Text => builder.init(),
        OutputFormat::Json => builder.json().init(),
    }
    Ok(())
}
