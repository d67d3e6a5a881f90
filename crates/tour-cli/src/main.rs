mod cmd;
mod output;

use clap::{Parser, Subcommand};
use tour_core::config::Config;

#[derive(Parser)]
#[command(
    name = "tour-fn",
    about = "Serverless functions for the tour-booking platform",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve every function over HTTP
    Serve {
        /// Address to bind
        #[arg(long, env = "TOUR_FN_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on (0 = OS-assigned)
        #[arg(long, env = "TOUR_FN_PORT", default_value = "8000")]
        port: u16,
    },

    /// Rewrite legacy `complete` order statuses to `completed`
    FixOrderStatus,

    /// Import legacy WooCommerce credentials into the database
    MigrateCredentials,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let config = Config::from_env();

    let result = match cli.command {
        Commands::Serve { host, port } => cmd::serve::run(config, &host, port),
        Commands::FixOrderStatus => cmd::maintenance::fix_order_status(&config),
        Commands::MigrateCredentials => cmd::maintenance::migrate_credentials(&config),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
