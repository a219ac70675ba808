use std::io::{self, Write};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jira_stories::form::{ConnectionForm, FormField, SubmitOutcome};
use jira_stories::jira::TrackerClient;
use jira_stories::remote::BridgeClient;
use jira_stories::{api, bootstrap, render};

#[derive(Parser)]
#[command(name = "jira-stories")]
#[command(about = "Browse Jira stories and their acceptance criteria")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Connect a running server to Jira (prompts for missing fields)
    Connect {
        #[command(flatten)]
        server: ServerArgs,

        /// Jira site URL, e.g. https://your-domain.atlassian.net
        #[arg(long)]
        base_url: Option<String>,

        /// Account email
        #[arg(long)]
        email: Option<String>,

        /// API token
        #[arg(long)]
        api_token: Option<String>,
    },
    /// List stories, newest first
    Stories {
        #[command(flatten)]
        server: ServerArgs,
    },
    /// Show one story with its acceptance criteria
    Story {
        /// Issue key, e.g. PROJ-123
        key: String,

        #[command(flatten)]
        server: ServerArgs,
    },
}

#[derive(Args)]
struct ServerArgs {
    /// Bridge API URL (defaults to JIRA_BRIDGE_URL or http://127.0.0.1:3000/api/jira)
    #[arg(long)]
    server: Option<String>,
}

impl ServerArgs {
    fn client(&self) -> BridgeClient {
        match &self.server {
            Some(url) => BridgeClient::new(url.clone()),
            None => BridgeClient::from_env(),
        }
    }
}

/// Initialize tracing. CLI commands log to stderr so stdout stays clean for output.
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "jira_stories=debug,tower_http=debug".into()),
    );

    if use_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(host: &str, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting Jira story bridge on port {}", port);

    let client = TrackerClient::from_env();
    // Validation runs in the background; its outcome is only logged.
    let _ = bootstrap::auto_configure(&client);

    let app = api::create_router(client);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Jira story bridge listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn prompt(field: FormField) -> anyhow::Result<String> {
    match field.placeholder() {
        Some(hint) => print!("{} ({}): ", field.label(), hint),
        None => print!("{}: ", field.label()),
    }
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn connect(
    client: BridgeClient,
    values: [(FormField, Option<String>); 3],
) -> anyhow::Result<()> {
    let mut form = ConnectionForm::new();
    for (field, value) in values {
        let value = match value {
            Some(v) => v,
            None => prompt(field)?,
        };
        form.set(field, value);
    }

    println!("{}...", form.submit_label());
    match form.submit(&client).await {
        SubmitOutcome::Connected => {
            println!("Connected to Jira via {}", client.base_url());
            Ok(())
        }
        SubmitOutcome::Busy => anyhow::bail!("A connection attempt is already in progress"),
        SubmitOutcome::Failed(_) | SubmitOutcome::Incomplete(_) => {
            anyhow::bail!("{}", form.error().unwrap_or("Failed to connect to Jira"))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    match cli.command {
        Some(Commands::Serve { port, host }) => serve(&host, port).await?,
        Some(Commands::Connect {
            server,
            base_url,
            email,
            api_token,
        }) => {
            connect(
                server.client(),
                [
                    (FormField::BaseUrl, base_url),
                    (FormField::Email, email),
                    (FormField::ApiToken, api_token),
                ],
            )
            .await?
        }
        Some(Commands::Stories { server }) => {
            let stories = server.client().list_stories().await?;
            if stories.is_empty() {
                println!("No stories found");
            } else {
                print!("{}", render::render_story_list(&stories));
            }
        }
        Some(Commands::Story { key, server }) => {
            let story = server.client().get_story(&key).await?;
            print!("{}", render::render_story_details(&story));
        }
        None => serve("127.0.0.1", 3000).await?,
    }

    Ok(())
}
