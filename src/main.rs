use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use keskonmark::{Config, batch, selection, startup_checks};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Global options that apply to all commands
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watermark a set of images and export them as PNG
    Run {
        /// Watermark text composited onto every image
        #[arg(short, long)]
        text: String,

        /// Image files or directories to process, in order
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Override the configured output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Override the configured font file
        #[arg(long)]
        font: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging first
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Some(Commands::Run {
            text,
            paths,
            output_dir,
            font,
        }) => run_command(cli.config, text, paths, output_dir, font).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

async fn run_command(
    config_path: PathBuf,
    text: String,
    inputs: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    font: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = if config_path.exists() {
        let config_content = std::fs::read_to_string(&config_path)?;
        toml_edit::de::from_str::<Config>(&config_content)?
    } else {
        info!("Config file not found at {:?}, using defaults", config_path);
        Config::default()
    };

    // CLI overrides win over the config file
    if let Some(dir) = output_dir {
        config.output.directory = dir;
    }
    if let Some(font) = font {
        config.watermark.font_path = Some(font);
    }

    info!("Starting {}", config.app.name);
    info!("Output directory: {:?}", config.output.directory);

    if let Err(errors) = startup_checks::perform_startup_checks(&config).await {
        for error in &errors {
            tracing::error!("Startup check failed: {}", error);
        }
        eprintln!("Error: startup checks failed, aborting");
        std::process::exit(1);
    }

    let selected = match selection::collect_image_paths(&inputs) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("{} files selected", selected.len());
    if selected.is_empty() {
        println!("Nothing to do");
        return Ok(());
    }

    println!("WORKING...");
    let outcome = match batch::run_batch(&selected, &text, &config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if outcome.failure_count() > 0 {
        println!(
            "{} invalid images. Check {} for details.",
            outcome.failure_count(),
            config.output.error_log.display()
        );
    }
    println!("ALL DONE");

    Ok(())
}
