use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::{json, Value};
use taglog::{attach_logger, setup_logger, Logger, LoggerConfig, ModePolicy, TaglogError};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Prints sample tagged log lines", long_about = None)]
struct Args {
    /// Logger configuration (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Force a rendering mode instead of detecting it per line
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Number of workers to start, each with its own numbered logger
    #[arg(short, long, default_value_t = 2)]
    instances: u64,

    /// Message printed at every severity
    #[arg(long, default_value = "hello from %s")]
    message: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Auto,
    Ansi,
    Styled,
}

impl From<Mode> for ModePolicy {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Auto => ModePolicy::Auto,
            Mode::Ansi => ModePolicy::Ansi,
            Mode::Styled => ModePolicy::Styled,
        }
    }
}

struct Worker {
    logger: Logger,
}

impl Worker {
    fn new(config: &LoggerConfig) -> Result<Self, TaglogError> {
        Ok(Self {
            logger: attach_logger!(Worker).configured(config)?,
        })
    }

    fn shared(config: &LoggerConfig) -> Result<Logger, TaglogError> {
        attach_logger!(Worker, static).configured(config)
    }
}

fn main() -> Result<()> {
    setup_logger();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading logger config from: {}", path);
            LoggerConfig::load(path).with_context(|| format!("Failed to load {}", path))?
        }
        None => LoggerConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }

    let shared = Worker::shared(&config).context("Invalid color in logger config")?;
    print_all(&shared, &args.message);

    let mut workers = Vec::new();
    for _ in 0..args.instances {
        let worker = Worker::new(&config).context("Invalid color in logger config")?;
        print_all(&worker.logger, &args.message);
        workers.push(worker);
    }

    shared.log(&[json!({ "workers": "started", "instances": workers.len() })]);

    Ok(())
}

fn print_all(logger: &Logger, message: &str) {
    let args = [Value::from(message), Value::from(logger.label())];
    logger.log(&args);
    logger.info(&args);
    logger.debug(&args);
    logger.warn(&args);
    logger.error(&args);
}
