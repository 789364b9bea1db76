use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

use junction::api::CommandApi;
use junction::cycle::{CycleConfig, CycleController, validate_signal_time};
use junction::domain::Lane;
use junction::ipc::{ApiHandler, DaemonResponse, IpcClient, IpcServer, IpcServerConfig, default_socket_path};
use junction::state::Intersection;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("junction")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("junction.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn socket_path(config: &Config) -> PathBuf {
    config
        .ipc
        .socket_path
        .clone()
        .unwrap_or_else(default_socket_path)
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None | Some(Commands::Status) => handle_status_command(config).await,
        Some(Commands::Serve) => run_serve(config).await,
        Some(Commands::Enqueue { vehicle, lane }) => {
            handle_enqueue_command(vehicle.as_deref(), lane.as_deref(), config).await
        }
        Some(Commands::Dequeue) => handle_dequeue_command(config).await,
        Some(Commands::Signal { lane }) => handle_signal_command(lane, config).await,
        Some(Commands::Start { signal_time }) => handle_start_command(*signal_time, config).await,
        Some(Commands::Stop) => handle_stop_command(config).await,
        Some(Commands::Reset) => handle_reset_command(config).await,
        Some(Commands::Explain) => handle_explain_command(config).await,
    }
}

/// Run the daemon in the foreground until interrupted.
async fn run_serve(config: &Config) -> Result<()> {
    let default_lane: Lane = config
        .cycle
        .default_lane
        .parse()
        .context("Invalid default_lane in config")?;

    let cycle_config = match validate_signal_time(config.cycle.signal_time as i64) {
        Ok(secs) => CycleConfig::new(secs),
        Err(e) => {
            log::warn!("{}, using default signal time", e);
            CycleConfig::default()
        }
    };

    let state = Arc::new(Intersection::new());
    let controller = Arc::new(CycleController::with_config(Arc::clone(&state), cycle_config));
    let api = Arc::new(CommandApi::new(state, controller).with_default_lane(default_lane));

    let socket = socket_path(config);
    let server_config = IpcServerConfig::default().with_socket_path(&socket);
    let mut server = IpcServer::with_config(server_config);

    info!("Daemon listening on {}", socket.display());
    println!("{} {}", "Listening on".cyan(), socket.display());

    server.run(Arc::new(ApiHandler::new(api))).await?;
    Ok(())
}

// Client-side command handlers - each connects, sends one request, prints the
// result.

async fn connect(config: &Config) -> Result<IpcClient> {
    let client = IpcClient::with_socket(socket_path(config));
    client
        .connect()
        .await
        .context("Is the daemon running? Start it with `junction serve`")?;
    Ok(client)
}

fn into_payload(response: DaemonResponse) -> Result<Value> {
    match response.result {
        Some(value) => Ok(value),
        None => {
            let message = response
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| "Empty response from daemon".to_string());
            Err(eyre::eyre!(message))
        }
    }
}

fn print_queue(payload: &Value) {
    if let Some(queue) = payload["queue"].as_array() {
        let items: Vec<&str> = queue.iter().filter_map(Value::as_str).collect();
        println!("{} [{}]", "Queue:".cyan(), items.join(", "));
    }
}

fn print_message_and_queue(payload: &Value) {
    if let Some(message) = payload["message"].as_str() {
        println!("{}", message.green());
    }
    print_queue(payload);
}

async fn handle_enqueue_command(
    vehicle: Option<&str>,
    lane: Option<&str>,
    config: &Config,
) -> Result<()> {
    info!("Enqueue - vehicle: {:?}, lane: {:?}", vehicle, lane);
    let client = connect(config).await?;
    let payload = into_payload(client.enqueue(vehicle, lane).await?)?;
    print_message_and_queue(&payload);
    Ok(())
}

async fn handle_dequeue_command(config: &Config) -> Result<()> {
    info!("Dequeue from active lane");
    let client = connect(config).await?;
    let payload = into_payload(client.dequeue().await?)?;
    print_message_and_queue(&payload);
    Ok(())
}

async fn handle_status_command(config: &Config) -> Result<()> {
    info!("Fetching status");
    let client = connect(config).await?;
    let payload = into_payload(client.status().await?)?;

    let current = payload["current_signal"].as_str().unwrap_or("none");
    let previous = payload["prev_signal"].as_str().unwrap_or("none");
    println!("{} {}", "Current signal:".cyan(), current);
    println!("{} {}", "Previous signal:".cyan(), previous);
    print_queue(&payload);
    Ok(())
}

async fn handle_signal_command(lane: &str, config: &Config) -> Result<()> {
    info!("Changing signal to: {}", lane);
    let client = connect(config).await?;
    let payload = into_payload(client.change_signal(lane).await?)?;
    if let Some(message) = payload["message"].as_str() {
        println!("{}", message.green());
    }
    Ok(())
}

async fn handle_start_command(signal_time: Option<i64>, config: &Config) -> Result<()> {
    info!("Starting auto mode (signal_time: {:?})", signal_time);
    let client = connect(config).await?;
    let payload = into_payload(client.start_auto(signal_time).await?)?;
    if let Some(message) = payload["message"].as_str() {
        println!("{}", message.green());
    }
    Ok(())
}

async fn handle_stop_command(config: &Config) -> Result<()> {
    info!("Stopping auto mode");
    let client = connect(config).await?;
    let payload = into_payload(client.stop_auto().await?)?;
    if let Some(message) = payload["message"].as_str() {
        println!("{}", message.yellow());
    }
    Ok(())
}

async fn handle_reset_command(config: &Config) -> Result<()> {
    info!("Resetting system");
    let client = connect(config).await?;
    let payload = into_payload(client.reset().await?)?;
    print_message_and_queue(&payload);
    Ok(())
}

async fn handle_explain_command(config: &Config) -> Result<()> {
    info!("Fetching service description");
    let client = connect(config).await?;
    let payload = into_payload(client.explain().await?)?;
    if let Some(project) = payload["project"].as_str() {
        println!("{}", project.cyan().bold());
    }
    if let Some(description) = payload["description"].as_str() {
        println!("{}", description);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
