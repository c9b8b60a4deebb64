mod cli;
mod config;
mod error;
mod logging;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use clap::Parser;
use pymol_mcp::mcp::{McpServer, StdioTransport};
use pymol_mcp::session::Session;
use pymol_mcp_python::PyMolEngine;
use tokio::task;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("PyMOL MCP server v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);
    log_environment();

    let config = config::build_config(&cli)?;

    let launch_args = config.engine.launch_args.clone();
    let session = task::block_in_place(|| {
        Session::start(
            || PyMolEngine::launch(&launch_args),
            &config.engine.startup_settings,
        )
    });
    if let Some(failure) = session.init_failure() {
        warn!(
            "Serving without a working PyMOL session, every tool will report: {}",
            failure.message
        );
        debug!("Initialization failure detail: {}", failure.detail);
    }

    let mut server = McpServer::new(session, &config);
    let mut transport = StdioTransport::stdio();

    let result = tokio::select! {
        served = transport.run(&mut server) => served.map_err(CliError::from),
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down.");
            Ok(())
        }
    };

    task::block_in_place(|| server.shutdown());

    match &result {
        Ok(()) => info!("Server stopped."),
        Err(e) => error!("Server failed: {}", e),
    }
    result
}

fn log_environment() {
    match std::env::current_dir() {
        Ok(dir) => debug!("Working directory: {}", dir.display()),
        Err(e) => warn!("Could not determine working directory: {}", e),
    }
    for var in ["PATH", "PYTHONPATH", "PYMOL_PATH"] {
        match std::env::var(var) {
            Ok(value) => debug!("{}={}", var, value),
            Err(_) => debug!("{} is not set", var),
        }
    }
}
