use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use genimate::Provider;
use genimate::api::GatewayClient;
use genimate::core::config::{self, CliOverrides, ResolvedConfig};
use genimate::core::session::Session;
use genimate::core::state::{Phase, SessionState};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger};

#[derive(Parser)]
#[command(
    name = "genimate",
    about = "Turn plain-language descriptions into Manim animations"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Generative provider used by the gateway
    #[arg(short, long, value_enum, global = true)]
    provider: Option<Provider>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP gateway
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:3000
        #[arg(long)]
        bind: Option<String>,
    },
    /// Interactive terminal client (default)
    Ui {
        #[arg(long)]
        gateway_url: Option<String>,
    },
    /// Submit one description and wait for the rendered video
    Generate {
        description: String,
        #[arg(long)]
        gateway_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenv::dotenv().ok();

    let command = cli.command.unwrap_or(Command::Ui { gateway_url: None });
    init_logging(matches!(command, Command::Ui { .. }), cli.verbose);

    let overrides = CliOverrides {
        provider: cli.provider,
        bind: match &command {
            Command::Serve { bind } => bind.as_deref(),
            _ => None,
        },
        gateway_url: match &command {
            Command::Ui { gateway_url } | Command::Generate { gateway_url, .. } => {
                gateway_url.as_deref()
            }
            Command::Serve { .. } => None,
        },
    };
    let resolved = match config::load_config().and_then(|c| config::resolve(&c, overrides)) {
        Ok(resolved) => resolved,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            eprintln!("genimate: {e}");
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Serve { .. } => match genimate::gateway::serve(&resolved).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("Gateway stopped: {}", e);
                eprintln!("genimate: {e}");
                ExitCode::FAILURE
            }
        },
        Command::Ui { .. } => {
            let Some(session) = open_session(&resolved) else {
                return ExitCode::FAILURE;
            };
            log::info!("Genimate UI starting against {}", resolved.gateway_url);
            match genimate::tui::run(session) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("genimate: terminal error: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Generate { description, .. } => {
            let Some(mut session) = open_session(&resolved) else {
                return ExitCode::FAILURE;
            };
            report(session.run(&description).await)
        }
    }
}

fn init_logging(to_file: bool, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    // The TUI owns the terminal, so it logs to a file instead
    if to_file {
        if let Ok(log_file) = File::create("genimate.log") {
            let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
        }
    } else {
        let _ = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto);
    }
}

fn open_session(config: &ResolvedConfig) -> Option<Session> {
    match GatewayClient::new(&config.gateway_url) {
        Ok(client) => Some(Session::new(Arc::new(client), config.poll)),
        Err(e) => {
            eprintln!("genimate: {e}");
            None
        }
    }
}

/// Prints the outcome of a headless run.
fn report(state: &SessionState) -> ExitCode {
    if state.phase != Phase::Completed {
        let reason = state
            .error
            .as_deref()
            .unwrap_or(state.status_message.as_str());
        eprintln!("Error: {reason}");
        return ExitCode::FAILURE;
    }

    if let Some(path) = &state.video_path {
        eprintln!("Video: {path}");
    }
    if let Some(secs) = state.render_duration_seconds {
        eprintln!("Backend rendering time: {secs:.2} seconds.");
    }
    if let Some(secs) = state.total_duration_seconds {
        eprintln!("Total time to display: {secs:.2} seconds.");
    }
    println!("{}", state.code);
    ExitCode::SUCCESS
}
