use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chromium_client::DeviceProfile;
use trendwire_common::Config;
use trendwire_scraper::scrape::{run, ScrapeRequest};

/// Scrape top tweets for a trending topic on X.
#[derive(Parser, Debug)]
#[command(name = "trendwire-scraper", version, about)]
struct Cli {
    /// Trend name or hashtag to search for
    trend: String,

    /// Treat the trend as a hashtag
    #[arg(long)]
    hashtag: bool,

    /// Show the browser window instead of running headless
    #[arg(long)]
    headed: bool,

    /// Device profile to emulate (desktop|tablet)
    #[arg(long, default_value = "desktop")]
    device: DeviceProfile,

    /// Maximum scroll iterations
    #[arg(long, default_value_t = 10)]
    scroll_count: u32,

    /// Base pause between scrolls, in seconds
    #[arg(long, default_value_t = 2.0)]
    scroll_delay: f64,

    /// Stop once this many tweets have been collected
    #[arg(long, default_value_t = 50)]
    max_tweets: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("trendwire_scraper=info".parse()?)
                .add_directive("chromium_client=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let mut request = ScrapeRequest::new(cli.trend);
    request.is_hashtag = cli.hashtag;
    request.headless = !cli.headed;
    request.device = cli.device;
    request.scroll_count = cli.scroll_count;
    request.scroll_delay = cli.scroll_delay;
    request.max_tweets = cli.max_tweets;

    let payload = run(&request, &config).await;
    println!("{payload}");
    Ok(())
}
