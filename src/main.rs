use anyhow::{ Context, Result };
use clap::Parser;
use spamscreener::cache::SpamTokenCache;
use spamscreener::logger::{ self, LogTag };
use spamscreener::networks;

/// Query spam token lists across supported networks
#[derive(Parser, Debug)]
#[command(name = "spamscreener", version, about)]
struct Args {
    /// Query a single network by its public chain id (e.g. 1, 56, 137)
    #[arg(long)]
    chain: Option<String>,

    /// Query the globally most recent spam tokens instead of the default mix
    #[arg(long)]
    recent: bool,

    /// Show debug log lines
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init(args.debug);

    logger::info(LogTag::System, "🚀 SpamScreener starting up...");
    logger::info(
        LogTag::System,
        &format!("{} networks in catalog", networks::all().len()),
    );

    match run(args).await {
        Ok(()) => {
            logger::info(LogTag::System, "✅ Done");
        }
        Err(e) => {
            logger::error(LogTag::System, &format!("❌ Query failed: {}", e));
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let cache = SpamTokenCache::with_defaults().context("Failed to build spam token cache")?;

    let response = if let Some(chain_id) = args.chain.as_deref() {
        cache.query_by_network(chain_id).await
    } else if args.recent {
        cache.query_recent().await
    } else {
        cache.query_default().await
    };

    logger::info(
        LogTag::Query,
        &format!("{} tokens (source: {})", response.tokens.len(), response.source),
    );

    let rendered =
        serde_json::to_string_pretty(&response).context("Failed to serialize response")?;
    println!("{}", rendered);

    let stats = cache.raw_stats();
    logger::debug(
        LogTag::Cache,
        &format!(
            "raw cache: {} entries, {} hits, {} misses",
            stats.entries, stats.hits, stats.misses
        ),
    );

    Ok(())
}
