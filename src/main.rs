use clap::Parser;
use macdtrader::cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "macdtrader=debug" } else { "macdtrader=warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    run(cli)
}
