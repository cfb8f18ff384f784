mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cryptorun")]
#[command(about = "CryptoRun signal core CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON (§6).
    ConfigHash {
        /// Paths in merge order (base -> env -> local overrides...).
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Run one scan window and write artifacts under `--exports-root` (§4.I, §6).
    Scan {
        /// Layered config paths in merge order.
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Symbols to admit into the window, in priority order.
        #[arg(long, required = true, value_delimiter = ',')]
        symbols: Vec<String>,

        /// Regime tag applied to every candidate in this window.
        #[arg(long, default_value = "normal")]
        regime: String,

        /// Window timestamp, epoch seconds UTC. Defaults to process start time.
        #[arg(long)]
        scan_ts: Option<i64>,

        #[arg(long, default_value = "./exports")]
        exports_root: String,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.cmd {
        Commands::ConfigHash { paths } => commands::config_hash::run(&paths),
        Commands::Scan {
            config_paths,
            symbols,
            regime,
            scan_ts,
            exports_root,
        } => commands::scan::run(commands::scan::ScanArgs {
            config_paths,
            symbols,
            regime,
            scan_ts,
            exports_root,
        })
        .await,
    };

    std::process::exit(exit_code);
}
