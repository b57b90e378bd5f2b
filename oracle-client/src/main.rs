use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use oracle_client::{
    create_narrator, ClientConfig, ConsoleStatus, DisplaySurface, HtmlPageSurface, OracleClient,
    OutputFormat, PageOptions, PresentationContext, QueryController, Status, StatusChannel,
    StreamSurface,
};
use oracle_common::logging::init_logging_with_exclusions;
use oracle_common::{Config, Validate};

/// Oracle Bíblico - ask the analysis service and read its answer.
#[derive(Parser, Debug)]
#[command(name = "oracle")]
#[command(version)]
#[command(about = "Terminal front end for the Oracle Bíblico analysis service", long_about = None)]
struct Cli {
    /// Analysis service base URL (overrides config)
    #[arg(long, global = true, env = "ORACLE_ENDPOINT")]
    endpoint: Option<String>,

    /// Config file (default: ~/.oracle/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit a biblical question for analysis
    Ask {
        /// The question
        query: String,

        #[command(flatten)]
        output: OutputArgs,

        /// Read the sections aloud through the configured narrator
        #[arg(long)]
        narrate: bool,
    },

    /// Render a saved analysis response without contacting the service
    Render {
        /// JSON file, or `-` for stdin
        file: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Render the last analysis stored by the service
    Results {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Check that the analysis service is up
    Health,
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Output format on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write a standalone HTML page instead of printing
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl OutputArgs {
    fn surface(&self, query: Option<&str>) -> Box<dyn DisplaySurface> {
        match &self.output {
            Some(path) => Box::new(HtmlPageSurface::new(
                path,
                PageOptions {
                    query: query.map(str::to_string),
                    status: None,
                    interactive: false,
                },
            )),
            None => Box::new(StreamSurface::stdout(self.format)),
        }
    }

    fn announce(&self) {
        if let Some(path) = &self.output {
            eprintln!("{} {}", style("Página gerada:").dim(), path.display());
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::load_with_env(cli.config.as_deref())?;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint.clone_from(endpoint);
    }
    if cli.timeout.is_some() {
        config.timeout_secs = cli.timeout;
    }
    config.validate().map_err(oracle_common::Error::from)?;

    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );

    let client = OracleClient::with_config(ClientConfig::from(&config))?;
    tracing::debug!(endpoint = client.endpoint(), "Client ready");

    match cli.command {
        Commands::Ask {
            query,
            output,
            narrate,
        } => {
            let mut context = PresentationContext {
                surface: output.surface(Some(&query)),
                status: Box::new(ConsoleStatus),
                narrator: None,
            };
            if narrate || config.narration.enabled {
                let narrator = create_narrator(&config.narration)?;
                context = context.with_narrator(Arc::from(narrator));
            }

            let mut controller = QueryController::new(client, context);
            match controller.submit(&query).await {
                Ok(_) => {
                    output.announce();
                    Ok(ExitCode::SUCCESS)
                }
                Err(_) => Ok(ExitCode::FAILURE),
            }
        }

        Commands::Render { file, output } => {
            let body = read_input(&file)?;
            let view = oracle_render::render_text(&body);
            output.surface(None).show_results(&view)?;
            output.announce();
            Ok(ExitCode::SUCCESS)
        }

        Commands::Results { output } => {
            let mut surface = output.surface(None);
            let mut status = ConsoleStatus;
            status.set_status(Status::Processing);
            match client.last_results().await {
                Ok(results) => {
                    surface.show_results(&oracle_render::render(&results))?;
                    status.set_status(Status::Done);
                    output.announce();
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    surface.show_error(&err.escaped_message())?;
                    status.set_status(Status::Failed);
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Commands::Health => match client.health().await {
            Ok(health) => {
                println!(
                    "{} {} {}",
                    style("✔").green(),
                    health.service.as_deref().unwrap_or("oracle"),
                    style(&health.status).bold()
                );
                if let Some(version) = &health.version {
                    println!("  version: {version}");
                }
                println!("  endpoint: {}", client.endpoint());
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                eprintln!("{} {} ({})", style("✘").red(), err, client.endpoint());
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read response from stdin")?;
        Ok(body)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {file}"))
    }
}
