mod config;
mod controller;
mod error;
mod fetcher;
mod model;
mod parser;
mod stats;
mod store;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use config::Config;
use fetcher::{HttpFetcher, SpiderFetcher};
use store::FsBlobStore;

#[derive(Parser)]
#[command(name = "antler_scraper", about = "Antler portfolio directory scraper")]
struct Cli {
    /// JSON config file (camelCase keys); flags override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Root directory for persisted JSON
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the directory page by page and persist every company found
    Run {
        /// Directory root URL
        #[arg(long)]
        base_url: Option<String>,
        /// Hard page ceiling (inclusive)
        #[arg(short = 'n', long)]
        max_pages: Option<u32>,
        /// Milliseconds to wait between pages
        #[arg(short, long)]
        delay: Option<u64>,
        /// How pages are fetched
        #[arg(short, long, value_enum, default_value_t = FetcherKind::Http)]
        fetcher: FetcherKind,
    },
    /// Show sector / location / founded-year distributions
    Stats {
        /// Rows per table
        #[arg(short = 'n', long, default_value = "15")]
        limit: usize,
    },
    /// Companies overview table
    Overview {
        /// Filter by sector (case-insensitive substring)
        #[arg(short, long)]
        sector: Option<String>,
        /// Filter by location (case-insensitive substring)
        #[arg(short, long)]
        location: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FetcherKind {
    /// Plain HTTP, static HTML only
    Http,
    /// spider.cloud rendering (needs SPIDER_API_KEY)
    Spider,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    let store = FsBlobStore::new(&config.output_dir);

    let result = match cli.command {
        Commands::Run {
            base_url,
            max_pages,
            delay,
            fetcher,
        } => {
            if let Some(url) = base_url {
                config.base_url = url;
            }
            if let Some(n) = max_pages {
                config.max_pages = n;
            }
            if let Some(ms) = delay {
                config.delay_ms = ms;
            }

            println!(
                "Extracting from {} (up to {} pages) into {}",
                config.base_url,
                config.max_pages,
                store.root().display()
            );
            let state = match fetcher {
                FetcherKind::Http => controller::run(&config, &HttpFetcher::new()?, &store).await?,
                FetcherKind::Spider => {
                    controller::run(&config, &SpiderFetcher::from_env()?, &store).await?
                }
            };

            let progress = &state.progress;
            println!(
                "Saved {} companies (last page {}).",
                progress.processed_count, progress.current_page
            );
            if progress.errors.is_empty() {
                Ok(())
            } else {
                println!("\n--- Errors ---");
                for e in &progress.errors {
                    println!("  {}", e);
                }
                Err(anyhow::anyhow!(
                    "extraction stopped with {} error(s); partial data kept in {}",
                    progress.errors.len(),
                    store.root().display()
                ))
            }
        }
        Commands::Stats { limit } => {
            let s = match store::load_stats(&store) {
                Some(s) => s,
                None => {
                    let companies = store::load_companies(&store);
                    if companies.is_empty() {
                        println!("No companies saved yet. Run 'run' first.");
                        return Ok(());
                    }
                    stats::compute(&companies, chrono::Utc::now())
                }
            };

            println!("Companies: {}", s.total_companies);
            println!("Updated:   {}", s.last_updated.format("%Y-%m-%d %H:%M:%S UTC"));
            print_table("Sector", &stats::ranked(&s.by_sector), limit);
            print_table("Location", &stats::ranked(&s.by_location), limit);
            let years: Vec<(String, usize)> = stats::ranked(&s.by_founded_year)
                .into_iter()
                .map(|(y, n)| (if y == 0 { "unknown".to_string() } else { y.to_string() }, n))
                .collect();
            print_table("Founded", &years, limit);
            Ok(())
        }
        Commands::Overview {
            sector,
            location,
            limit,
        } => {
            let matches = |value: &str, filter: &Option<String>| {
                filter
                    .as_ref()
                    .map_or(true, |f| value.to_lowercase().contains(&f.to_lowercase()))
            };
            let rows: Vec<_> = store::load_companies(&store)
                .into_iter()
                .filter(|c| matches(&c.sector, &sector) && matches(&c.location, &location))
                .collect();
            if rows.is_empty() {
                println!("No companies found.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<24} | {:<18} | {:<16} | {:>4} | {:<30}",
                "#", "Company", "Sector", "Location", "Year", "Website"
            );
            println!("{}", "-".repeat(110));

            for (i, c) in rows.iter().take(limit).enumerate() {
                let year = if c.founded_year == 0 {
                    "-".to_string()
                } else {
                    c.founded_year.to_string()
                };
                println!(
                    "{:>3} | {:<24} | {:<18} | {:<16} | {:>4} | {:<30}",
                    i + 1,
                    truncate(&c.name, 24),
                    truncate(&c.sector, 18),
                    truncate(&c.location, 16),
                    year,
                    truncate(&c.website, 30)
                );
            }

            println!(
                "\n{} of {} companies | file: companies/<slug>.json",
                rows.len().min(limit),
                rows.len()
            );
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_table<K: std::fmt::Display>(title: &str, rows: &[(K, usize)], limit: usize) {
    println!("\n--- {} ---", title);
    for (key, count) in rows.iter().take(limit) {
        println!("  {:<28} {:>5}", truncate(&key.to_string(), 28), count);
    }
    if rows.len() > limit {
        println!("  ... {} more", rows.len() - limit);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
