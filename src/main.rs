use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use proxy_latency::{
    pipeline, Config, LatencyProbe, PingProber, ProxyEntry, ProxyFetcher, ProxySelector,
    ProxyStore,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Fetch a public proxy list and keep the lowest-latency hosts
#[derive(Parser)]
#[command(name = "proxy-latency")]
#[command(about = "Fetch a public proxy list and keep the lowest-latency hosts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    options: Options,

    /// Log probe details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct Options {
    /// URL serving the newline-separated proxy list
    #[arg(long, env = "PROXY_SOURCE_URL", default_value = proxy_latency::proxy::fetcher::DEFAULT_SOURCE_URL)]
    url: String,

    /// Number of proxies to keep
    #[arg(short = 'n', long, env = "PROXY_COUNT", default_value_t = proxy_latency::proxy::selector::DEFAULT_FILTERED_COUNT)]
    count: usize,

    /// Output file for the full fetched list
    #[arg(long, default_value = proxy_latency::proxy::fetcher::DEFAULT_PROXIES_PATH)]
    proxies_file: PathBuf,

    /// Output file for the selected proxies
    #[arg(long, default_value = proxy_latency::proxy::selector::DEFAULT_FILTERED_PATH)]
    filtered_file: PathBuf,

    /// Timeout in seconds for each ping
    #[arg(long, default_value = "5")]
    probe_timeout: u64,

    /// Timeout in seconds for the list download (none by default)
    #[arg(long)]
    fetch_timeout: Option<u64>,

    /// Ping executable
    #[arg(long, default_value = "ping")]
    ping: PathBuf,
}

impl Options {
    fn into_config(self) -> Config {
        Config {
            source_url: self.url,
            filtered_count: self.count,
            proxies_path: self.proxies_file,
            filtered_path: self.filtered_file,
            probe_timeout: Duration::from_secs(self.probe_timeout),
            ping_program: self.ping,
            fetch_timeout: self.fetch_timeout.map(Duration::from_secs),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, probe and save the fastest proxies (default)
    Run,
    /// Fetch the proxy list and save it without probing
    Fetch,
    /// Rank an existing proxy list file
    Filter {
        /// Input file containing proxies (defaults to the proxies file)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Ping individual entries and print their latency
    Probe {
        /// Entries in host:port form
        #[arg(required = true)]
        entries: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "proxy_latency=debug"
    } else {
        "proxy_latency=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.options.into_config();
    let prober = PingProber::with_config(config.prober_config());

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let fetcher = ProxyFetcher::with_config(config.fetcher_config())?;
            let selector = ProxySelector::with_config(config.selector_config(), prober);
            pipeline::run(&fetcher, &selector, &mut io::stdout())
                .await
                .with_context(|| format!("Run against {} failed", config.source_url))?;
        }
        Commands::Fetch => {
            let fetcher = ProxyFetcher::with_config(config.fetcher_config())?;
            println!("Fetching proxies...");
            let outcome = fetcher
                .fetch()
                .await
                .with_context(|| format!("Failed to fetch {}", config.source_url))?;
            pipeline::report_fetch(&outcome, &mut io::stdout())?;
        }
        Commands::Filter { input } => {
            let input = input.unwrap_or_else(|| config.proxies_path.clone());
            let proxies = ProxyStore::load(&input)?;
            println!("Loaded {} proxies from {:?}", proxies.len(), input);

            if proxies.is_empty() {
                println!("No proxies were processed.");
                return Ok(());
            }

            println!("Testing proxy latency...");
            let selector = ProxySelector::with_config(config.selector_config(), prober);
            let selected = selector.select(&proxies).await?;
            println!(
                "{} filtered proxies saved to '{}'",
                selected.len(),
                config.filtered_path.display()
            );
            for ranked in &selected {
                println!("  {} ({})", ranked.entry, ranked.latency);
            }
        }
        Commands::Probe { entries } => {
            for raw in entries {
                let entry = ProxyEntry::new(raw);
                let latency = prober.probe(&entry).await;
                println!("{} {}", entry, latency);
            }
        }
    }

    Ok(())
}
