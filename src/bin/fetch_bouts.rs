use std::time::Instant;

use anyhow::{Context, Result};

use flostats::config::ProviderConfig;
use flostats::fetch::{CancelToken, fetch_all_bouts};
use flostats::model::PersonIdentityId;
use flostats::resolve::IncludedIndex;
use flostats::transport::HttpSource;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Stderr)
        .init();

    let athlete = std::env::args()
        .nth(1)
        .map(|arg| PersonIdentityId::new(arg.trim()))
        .context("usage: fetch_bouts <identity-person-id>")?;

    let config = ProviderConfig::from_env();
    let source = HttpSource::new(&config)?;
    let started = Instant::now();
    let bouts = fetch_all_bouts(&source, &config, &athlete, &CancelToken::new(), &|pct: f64| {
        eprintln!("{pct:5.1}%");
    })?;

    let index = IncludedIndex::new(&bouts.included);
    println!("Athlete: {athlete}");
    println!("Bouts: {}", bouts.data.len());
    if let Some(total) = bouts.total {
        println!("Declared total: {total}");
    }
    println!("Side-loaded records: {}", bouts.included.len());
    println!("Distinct wrestler records: {}", index.wrestler_count());
    println!("Elapsed: {:.2}s", started.elapsed().as_secs_f64());
    Ok(())
}
