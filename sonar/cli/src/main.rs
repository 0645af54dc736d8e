//! Sonar CLI - talk to a search cluster from the terminal

use std::io::{self, Read};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use sonar_lib::endpoints::{
    CatIndices, CatNodeattrs, ClusterDeleteVotingConfigExclusions, ClusterHealth,
    ClusterPostVotingConfigExclusions, Delete, Get, Index, Info, Ping, Search,
};
use sonar_lib::{ApiError, Client, Response, TracingInstrumentation, TransportConfig};
use tracing::{info, warn};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sonar")]
#[command(about = "Typed client for search cluster REST APIs", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Cluster base URL [default: http://localhost:9200]
    #[arg(long, env = "SONAR_URL", global = true)]
    url: Option<String>,

    /// Basic auth user name
    #[arg(long, env = "SONAR_USERNAME", global = true)]
    username: Option<String>,

    /// Basic auth password
    #[arg(long, env = "SONAR_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Encoded API key; wins over a bearer token and basic auth
    #[arg(long, env = "SONAR_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Bearer token; wins over basic auth
    #[arg(long, env = "SONAR_BEARER_TOKEN", hide_env_values = true, global = true)]
    bearer_token: Option<String>,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "SONAR_TIMEOUT_SECS", global = true)]
    timeout: Option<u64>,

    /// Ask the server to pretty-print JSON responses
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show cluster name and version
    Info,

    /// Check that the cluster answers; exits non-zero if it does not
    Ping,

    /// Show cluster health
    Health {
        /// Limit the report to these indices
        #[arg(value_name = "INDEX")]
        index: Vec<String>,

        /// Wait until the cluster reaches this status (green, yellow, red)
        #[arg(long, value_name = "STATUS")]
        wait_for_status: Option<String>,
    },

    /// List custom node attributes
    Nodeattrs {
        /// Column names to show (repeatable: -H node -H attr)
        #[arg(short = 'H', long = "column", value_name = "COLUMN")]
        columns: Vec<String>,
    },

    /// List indices
    Indices {
        /// Glob patterns or index names
        #[arg(value_name = "INDEX")]
        index: Vec<String>,

        /// Only show indices with this health
        #[arg(long, value_name = "HEALTH")]
        health: Option<String>,
    },

    /// Fetch a document by ID
    Get {
        #[arg(value_name = "INDEX")]
        index: String,

        #[arg(value_name = "ID")]
        id: String,
    },

    /// Store a document; the server assigns an ID when none is given
    Put {
        #[arg(value_name = "INDEX")]
        index: String,

        #[arg(value_name = "ID")]
        id: Option<String>,

        /// JSON document, or "-" to read it from stdin
        #[arg(long, value_name = "JSON")]
        body: String,

        /// Refresh policy: true, false or wait_for
        #[arg(long, value_name = "POLICY")]
        refresh: Option<String>,
    },

    /// Delete a document by ID
    Delete {
        #[arg(value_name = "INDEX")]
        index: String,

        #[arg(value_name = "ID")]
        id: String,
    },

    /// Search one or more indices
    Search {
        /// Indices to search; all when omitted
        #[arg(value_name = "INDEX")]
        index: Vec<String>,

        /// Lucene query string
        #[arg(short, long, value_name = "QUERY")]
        q: Option<String>,

        /// Query DSL body, or "-" to read it from stdin
        #[arg(long, value_name = "JSON")]
        body: Option<String>,

        /// Number of hits to return
        #[arg(long, value_name = "N")]
        size: Option<i64>,
    },

    /// Exclude master-eligible nodes from the voting configuration
    Exclude {
        /// Node names to exclude
        #[arg(long, value_name = "NAME", required = true)]
        node_names: Vec<String>,

        /// Seconds to wait for the exclusions to apply
        #[arg(long, value_name = "SECS")]
        wait_secs: Option<u64>,
    },

    /// Clear all voting configuration exclusions
    ClearExclusions {
        /// Clear without waiting for excluded nodes to leave
        #[arg(long)]
        no_wait: bool,
    },
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            // Default: status line and warnings only
            0 => "warn,sonar=info".to_string(),
            1 => "info,sonar_lib=info".to_string(),
            2 => "info,sonar_lib=debug".to_string(),
            _ => "debug,sonar_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(verbose >= 1)
                    .with_level(true)
                    .with_thread_ids(false)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

impl Cli {
    /// Resolves the transport settings the same way the library does, with
    /// command line flags taking the place of their environment variables.
    fn transport_config(&self) -> Result<TransportConfig, ApiError> {
        TransportConfig::from_lookup(|key| {
            let flag = match key {
                "SONAR_URL" => self.url.clone(),
                "SONAR_USERNAME" => self.username.clone(),
                "SONAR_PASSWORD" => self.password.clone(),
                "SONAR_API_KEY" => self.api_key.clone(),
                "SONAR_BEARER_TOKEN" => self.bearer_token.clone(),
                "SONAR_TIMEOUT_SECS" => self.timeout.map(|secs| secs.to_string()),
                _ => None,
            };
            flag.or_else(|| std::env::var(key).ok())
        })
    }
}

/// Parses a JSON argument; "-" reads it from stdin.
fn read_json(arg: &str) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let raw = if arg == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        arg.to_string()
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Writes the body to stdout and the status line to the log.
fn report(response: &Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    for warning in response.warnings() {
        warn!(%warning, "server warning");
    }
    if response.is_error() {
        warn!(status = response.status_code, "request failed");
    } else {
        info!(status = response.status_code, "ok");
    }

    if !response.body.is_empty() {
        println!("{}", response.text()?);
    }

    Ok(if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let client = Client::from_config(cli.transport_config()?)?
        .with_instrumentation(Arc::new(TracingInstrumentation::new()));
    let pretty = cli.pretty;

    // Applies the global flags every endpoint shares, then sends.
    macro_rules! send {
        ($request:expr) => {{
            let request = $request;
            send!(request)
        }};
    }

    let response = match cli.command {
        Commands::Info => send!(Info::new()),
        Commands::Ping => send!(Ping::new()),
        Commands::Health {
            index,
            wait_for_status,
        } => {
            let mut request = ClusterHealth::new().index(index);
            if let Some(status) = wait_for_status {
                request = request.wait_for_status(status);
            }
            send!(request)
        }
        Commands::Nodeattrs { columns } => send!(CatNodeattrs::new().h(columns).v(true)),
        Commands::Indices { index, health } => {
            let mut request = CatIndices::new().index(index).v(true);
            if let Some(health) = health {
                request = request.health(health);
            }
            send!(request)
        }
        Commands::Get { index, id } => send!(Get::new(index, id)),
        Commands::Put {
            index,
            id,
            body,
            refresh,
        } => {
            let mut request = Index::new(index, read_json(&body)?);
            if let Some(id) = id {
                request = request.id(id);
            }
            if let Some(refresh) = refresh {
                request = request.refresh(refresh);
            }
            send!(request)
        }
        Commands::Delete { index, id } => send!(Delete::new(index, id)),
        Commands::Search {
            index,
            q,
            body,
            size,
        } => {
            let mut request = Search::new().index(index);
            if let Some(q) = q {
                request = request.q(q);
            }
            if let Some(body) = body {
                request = request.body(read_json(&body)?);
            }
            if let Some(size) = size {
                request = request.size(size);
            }
            send!(request)
        }
        Commands::Exclude {
            node_names,
            wait_secs,
        } => {
            let mut request = ClusterPostVotingConfigExclusions::new().node_names(node_names);
            if let Some(secs) = wait_secs {
                request = request.timeout(Duration::from_secs(secs));
            }
            send!(request)
        }
        Commands::ClearExclusions { no_wait } => {
            send!(ClusterDeleteVotingConfigExclusions::new().wait_for_removal(!no_wait))
        }
    };

    report(&response)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.json);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
