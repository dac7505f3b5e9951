//! Airing tracker CLI application.

use airing_tracker::{render, AiringPipeline};
use anyhow::{Context, Result};
use clap::Parser;
use shared::Config;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// MAL username (overrides the config file)
    #[arg(short, long)]
    username: Option<String>,

    /// Only read the watching list, skipping plan-to-watch
    #[arg(long)]
    watching_only: bool,

    /// Print records as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Write the effective settings (including overrides) back to the config file
    #[arg(long)]
    save: bool,
}

impl Args {
    /// Fold command-line overrides into the loaded configuration
    fn apply(&self, config: &mut Config) {
        if let Some(username) = &self.username {
            config.user.username = username.clone();
        }
        if self.watching_only {
            config.user.include_plan_to_watch = false;
        }
    }

    /// Persist the configuration when `--save` was given
    fn save_if_requested(&self, config: &Config) -> Result<()> {
        if self.save {
            config
                .save(&self.config)
                .with_context(|| format!("Failed to save config to {}", self.config.display()))?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    args.apply(&mut config);

    // Initialize logging
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        shared::logging::parse_level(&config.logging.default_level)
    };

    shared::logging::init(shared::LogConfig {
        log_dir: config.log_dir().to_string_lossy().to_string(),
        default_level: log_level,
        console: config.logging.console,
        file: config.logging.file,
        json_format: config.logging.json_format,
        ..Default::default()
    })?;

    debug!(config_file = %args.config.display(), "Loaded configuration");
    args.save_if_requested(&config)?;

    let pipeline = AiringPipeline::from_config(&config)?;

    info!(
        username = config.username().unwrap_or("<unset>"),
        include_plan_to_watch = config.user.include_plan_to_watch,
        "Refreshing airing list"
    );
    let outcome = pipeline
        .run(&config.user.username, config.user.include_plan_to_watch)
        .await;

    match (&outcome, args.json) {
        (Ok(records), true) => println!("{}", render::render_json(records)?),
        _ => println!(
            "{}",
            render::render_outcome(&outcome, config.user.use_english_title)
        ),
    }

    Ok(())
}
