use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use valcache::cli::commands::CheckOptions;
use valcache::cli::{Cli, Commands};
use valcache::types::config::Config;
use valcache::ValcacheResult;

fn main() -> ValcacheResult<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet)
    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default_config()
    };

    // Determine log level: CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        format!("valcache={}", log_level)
            .parse()
            .unwrap_or_else(|_| "valcache=info".parse().expect("fallback directive is valid")),
    );

    let registry = tracing_subscriber::registry().with(filter);
    if config.general.log_format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    match cli.command {
        Commands::Init { path } => {
            valcache::cli::commands::init(path)?;
        }
        Commands::Check {
            pattern,
            object,
            input,
            no_cache,
            max,
        } => {
            let options = CheckOptions {
                pattern,
                object,
                input,
                no_cache,
                max,
            };
            let summary = valcache::cli::commands::check(&options, &config)?;
            if summary.failed > 0 {
                std::process::exit(1);
            }
        }
        Commands::Config => {
            valcache::cli::commands::config_cmd(&config)?;
        }
        Commands::Version => {
            valcache::cli::commands::version();
        }
    }

    Ok(())
}
