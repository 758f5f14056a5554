use botdeck::adapter::inbound::cli::command::{Cli, Commands};
use botdeck::adapter::inbound::cli::output;
use botdeck::adapter::inbound::cli::prompt::TerminalPrompter;
use botdeck::adapter::inbound::cli::session::Session;
use botdeck::error::Result;
use botdeck::infrastructure::bootstrap::{build_dispatcher, build_sink, spawn_sink};
use botdeck::infrastructure::config::registry::load_registry;
use botdeck::infrastructure::config::settings::Config;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    output::configure(&cli.color);

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };

    let _guard = config.init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "botdeck starting");

    let result = match cli.selected() {
        Commands::Console => run_console(&config).await,
        Commands::Sink => run_sink(&config).await,
    };

    if let Err(e) = result {
        error!(error = %e, "Fatal error");
        output::error(&e.to_string());
        std::process::exit(1);
    }

    info!("botdeck stopped");
}

async fn run_console(config: &Config) -> Result<()> {
    let registry = load_registry(&config.registry)?;
    let dispatcher = build_dispatcher(config, registry)?;

    let sink = if config.sink.enabled {
        Some(spawn_sink(build_sink(config).await?))
    } else {
        None
    };

    let mut session = Session::new(TerminalPrompter::new(), dispatcher);
    let result = tokio::select! {
        result = session.run() => result,
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
    };

    if let Some(sink) = sink {
        sink.shutdown().await;
    }
    result
}

async fn run_sink(config: &Config) -> Result<()> {
    let server = build_sink(config).await?;
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Listening", format!("ws://{}", server.local_addr()?));
    output::field("Database", &config.database);
    output::field("Audit log", &config.sink.audit_log);

    let sink = spawn_sink(server);
    signal::ctrl_c().await?;
    info!("Shutdown signal received");
    sink.shutdown().await;
    Ok(())
}
