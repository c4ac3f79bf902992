use std::path::PathBuf;

use clap::{Parser, Subcommand};
use orm_builder::{build, BuilderEnv, ClientHandle, LoadOptions, RawOptions};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "orm-check")]
#[command(about = "Bootstrap a database client from an options file and inspect it")]
struct Args {
    /// JSON options document (connection, pool, client, version, debug)
    #[arg(short, long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify the server meets the configured minimum version
    Inspect,
    /// Load model definitions and list the registered names
    Models {
        /// Model files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Files or directories to skip
        #[arg(long)]
        except: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orm_builder=info,sqlx=warn".into()),
        )
        .init();

    let args = Args::parse();

    let raw = match RawOptions::from_path(&args.config) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let handle = match build(raw, &BuilderEnv::from_process()).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("bootstrap=failed err={}", e);
            std::process::exit(1);
        }
    };

    let code = match args.command {
        Command::Inspect => inspect(&handle).await,
        Command::Models { paths, except } => models(&handle, paths, except),
    };

    if let Err(e) = handle.close().await {
        error!("pool=close_failed err={}", e);
    }
    std::process::exit(code);
}

async fn inspect(handle: &ClientHandle) -> i32 {
    match handle.inspect_integrity().await {
        Ok(_) => {
            info!("integrity=ok dialect={}", handle.dialect());
            0
        }
        Err(e) => {
            eprintln!("Integrity check failed: {e}");
            1
        }
    }
}

fn models(handle: &ClientHandle, paths: Vec<PathBuf>, except: Vec<PathBuf>) -> i32 {
    match handle.load_models(paths, &LoadOptions { except }) {
        Ok(models) => {
            for (name, model) in &models {
                println!("{name}\t{}", model.table_name());
            }
            0
        }
        Err(e) => {
            eprintln!("Model loading failed: {e}");
            1
        }
    }
}
