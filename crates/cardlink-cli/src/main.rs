//! Cardlink CLI - fetch a URL into a card block, or parse one back

use cardlink::{extract, fetch_page, is_url, CodecError, FetchOptions, HttpProber};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

/// Output format for the fetch subcommand
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// The fenced cardlink block
    #[default]
    Block,
    /// JSON record
    Json,
}

/// Cardlink - link-preview card pipeline
#[derive(Parser, Debug)]
#[command(name = "cardlink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a URL and print its card block
    Fetch {
        /// URL to fetch
        url: String,

        /// Output format
        #[arg(long, short, default_value = "block")]
        output: OutputFormat,

        /// Custom User-Agent
        #[arg(long)]
        user_agent: Option<String>,
    },
    /// Parse a card block from stdin and print the record as JSON
    Parse,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            url,
            output,
            user_agent,
        } => {
            run_fetch(&url, output, user_agent).await;
        }
        Commands::Parse => {
            run_parse();
        }
    }
}

async fn run_fetch(url: &str, output: OutputFormat, user_agent: Option<String>) {
    if !is_url(url) {
        eprintln!("Error: `{url}` does not look like an absolute URL");
        std::process::exit(1);
    }

    let options = FetchOptions { user_agent };
    let html = match fetch_page(url, &options).await {
        Ok(html) => html,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let prober = HttpProber::new();
    let Some(metadata) = extract(url, &html, &prober).await else {
        eprintln!("Error: page has no derivable title");
        std::process::exit(1);
    };

    match output {
        OutputFormat::Block => writeln_safe(&cardlink::codec::serialize(&metadata)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&metadata).unwrap_or_else(|e| {
                eprintln!("Error serializing record: {e}");
                std::process::exit(1);
            });
            writeln_safe(&json);
        }
    }
}

fn run_parse() {
    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        eprintln!("Error reading stdin: {e}");
        std::process::exit(1);
    }

    match cardlink::codec::parse(&input) {
        Ok(metadata) => {
            let json = serde_json::to_string_pretty(&metadata).unwrap_or_else(|e| {
                eprintln!("Error serializing record: {e}");
                std::process::exit(1);
            });
            writeln_safe(&json);
        }
        Err(e @ CodecError::YamlParse(_)) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
