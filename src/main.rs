//! cubejs CLI entrypoint
//! Parses command-line arguments and dispatches to the create and generate use cases.
#![deny(unsafe_code)]

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cubejs_cli::application::{
    CreateAppRequest, CreateAppUseCase, ErrorReporter, EventProperties, GenerateSchemaRequest,
    GenerateSchemaUseCase, Services,
};
use cubejs_cli::core::config::CliConfig;
use cubejs_cli::infrastructure::console::clap_styles;
use cubejs_cli::infrastructure::telemetry::NoopTelemetry;
use cubejs_cli::infrastructure::{StdConsole, build_services};

#[derive(Parser)]
#[command(name = "cubejs")]
#[command(version, about, long_about = None, styles = clap_styles())]
#[command(after_help = "Use cubejs <command> --help for more information about a command.")]
struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Create new Cube.js app
    #[command(after_help = "Examples:\n\n  $ cubejs create hello-world -d postgres")]
    Create {
        /// Name of the app and of the directory it is created in
        name: Option<String>,
        /// Preconfigure for selected database. Options: postgres, mysql, athena
        #[arg(short = 'd', long)]
        db_type: Option<String>,
        /// App template. Options: express (default), serverless.
        #[arg(short = 't', long)]
        template: Option<String>,
    },
    /// Generate Cube.js schema from DB tables schema
    #[command(after_help = "Examples:\n\n  $ cubejs generate -t orders,customers")]
    Generate {
        /// Comma delimited list of tables to generate schema from
        #[arg(short = 't', long, value_delimiter = ',')]
        tables: Option<Vec<String>>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so they never mix with npm's or the CLI's own output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let cwd = std::env::current_dir().context("Failed to resolve the current directory")?;
    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            ErrorReporter::new(Arc::new(NoopTelemetry), Arc::new(StdConsole))
                .report(&e, EventProperties::new())
                .await;
            return Ok(ExitCode::FAILURE);
        }
    };
    debug!(?config, "Resolved configuration");
    let services = build_services(&config);

    let succeeded = match command {
        Commands::Create {
            name,
            db_type,
            template,
        } => {
            create_app(
                services,
                CreateAppRequest {
                    project_name: name,
                    db_type,
                    template,
                    base_dir: cwd,
                },
            )
            .await
        }
        Commands::Generate { tables } => {
            generate_schema(services, GenerateSchemaRequest::new(tables, cwd)).await
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Run `create`, reporting any failure; returns whether it succeeded
async fn create_app(services: Services, request: CreateAppRequest) -> bool {
    let context = request.telemetry_properties();
    let reporter = reporter(&services);
    match CreateAppUseCase::new(services).execute(request).await {
        Ok(response) => {
            info!(
                project_dir = %response.project_dir.display(),
                files = response.written_files.len(),
                "App created"
            );
            true
        }
        Err(e) => {
            reporter.report(&e, context).await;
            false
        }
    }
}

/// Run `generate`, reporting any failure; returns whether it succeeded
async fn generate_schema(services: Services, request: GenerateSchemaRequest) -> bool {
    let context = request.telemetry_properties();
    let reporter = reporter(&services);
    match GenerateSchemaUseCase::new(services).execute(request).await {
        Ok(response) => {
            info!(files = response.written_files.len(), "Schema generated");
            true
        }
        Err(e) => {
            reporter.report(&e, context).await;
            false
        }
    }
}

fn reporter(services: &Services) -> ErrorReporter {
    ErrorReporter::new(services.telemetry.clone(), services.console.clone())
}
