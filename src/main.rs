mod cli;

use qtfaststart::{
    config,
    convert::{self, Outcome},
};

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "qtfaststart=debug".to_string()
        } else {
            "qtfaststart=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_config_or_default(cli.config.as_deref())?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        tracing::debug!("Effective config:\n{}", config::to_toml(&config)?);
    }

    tracing::info!("Processing file: {:?}", cli.input);
    match convert::convert_file(&cli.input, &cli.output, &config)? {
        Outcome::AlreadyFastStart => println!("No conversion necessary"),
        Outcome::Converted(_) => println!("Conversion complete"),
    }

    Ok(())
}
