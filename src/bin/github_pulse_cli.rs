use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use github_pulse::formatter::{
    TimezoneOffset, issue_nodes_result_markdown, project_status_fields_markdown,
    search_result_markdown,
};
use github_pulse::github::{ClientConfig, GitHubClient};
use github_pulse::services::{IssueNodeClient, ProjectFieldDiscoveryClient, SearchClient, Settings};
use github_pulse::types::{PartialIssue, ProjectUrl, SearchQuery};

/// Parse timezone if provided, otherwise use local timezone
fn parse_timezone_or_default(timezone: Option<String>) -> TimezoneOffset {
    timezone
        .and_then(|tz| TimezoneOffset::parse(&tz))
        .unwrap_or_else(TimezoneOffset::from_local)
}

#[derive(Parser)]
#[command(name = "github-pulse-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "GitHub Pulse CLI - search issues, discover Project V2 status fields and refresh issues by node id over the GitHub GraphQL API"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Output format for results - markdown for reading, json for programmatic use
    #[arg(long, global = true, default_value = "markdown")]
    format: OutputFormat,
    /// GitHub access token (overrides GITHUB_PULSE_GITHUB_TOKEN, GITHUB_TOKEN and the settings file)
    #[arg(long, global = true)]
    github_token: Option<String>,
    /// API host, e.g. "api.github.com" or a GitHub Enterprise host name
    #[arg(long, global = true)]
    host: Option<String>,
    /// Use plain http instead of https
    #[arg(long, global = true)]
    insecure_http: bool,
    /// GitHub Enterprise version such as "3.9.0" (required for enterprise hosts)
    #[arg(long, global = true)]
    ghe_version: Option<String>,
    /// Request timeout in seconds (default: 30 seconds)
    #[arg(long, global = true)]
    request_timeout: Option<u64>,
    /// Settings file (default: <config dir>/github-pulse/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Timezone for datetime formatting in markdown output (e.g., "JST", "+09:00", "UTC")
    #[arg(long, global = true)]
    timezone: Option<String>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Search issues and pull requests with GitHub search syntax (returns the last 100 matches)
    Search {
        /// GitHub search query, e.g. "repo:owner/name is:open label:bug"
        query: String,
    },
    /// Show the iteration field and status options of a Project V2 board
    ProjectFields {
        /// Project URL, e.g. https://github.com/orgs/acme/projects/3
        project_url: String,
    },
    /// Refresh issues and pull requests by GraphQL node id
    Issues {
        /// Node ids such as I_kwDO... or PR_kwDO...
        #[arg(required = true)]
        node_ids: Vec<String>,
    },
}

/// Merges settings file, environment and command line flags, in increasing priority.
fn resolve_client_config(cli: &Cli) -> Result<ClientConfig> {
    let mut settings = Settings::load_or_default(cli.config.as_deref())?.apply_env();

    let github = &mut settings.github;
    if let Some(token) = &cli.github_token {
        github.access_token = Some(token.clone());
    }
    if let Some(host) = &cli.host {
        github.host = host.clone();
    }
    if cli.insecure_http {
        github.https = false;
    }
    if let Some(version) = &cli.ghe_version {
        github.ghe_version = Some(version.clone());
    }
    if let Some(timeout) = cli.request_timeout {
        github.request_timeout_secs = timeout;
    }

    settings.client_config()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("github_pulse=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = GitHubClient::new(resolve_client_config(&cli)?)?;
    let timezone = parse_timezone_or_default(cli.timezone.clone());

    match cli.command {
        Commands::Search { query } => {
            let result = SearchClient::new(&client)
                .search(SearchQuery::new(query))
                .await?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Markdown => {
                    println!("{}", search_result_markdown(&result, Some(&timezone)))
                }
            }
        }
        Commands::ProjectFields { project_url } => {
            let project_url = ProjectUrl(project_url);
            let fields = ProjectFieldDiscoveryClient::new(&client)
                .get_project_status_field_names(&project_url)
                .await?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&fields)?),
                OutputFormat::Markdown => {
                    println!("{}", project_status_fields_markdown(&project_url, &fields))
                }
            }
        }
        Commands::Issues { node_ids } => {
            let requests: Vec<PartialIssue> = node_ids
                .into_iter()
                .map(|node_id| PartialIssue::new(node_id, String::new()))
                .collect();
            let result = IssueNodeClient::new(&client)
                .fetch_issues_by_node_ids(&requests)
                .await?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Markdown => {
                    println!("{}", issue_nodes_result_markdown(&result, Some(&timezone)))
                }
            }
        }
    }

    Ok(())
}
