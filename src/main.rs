use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};

use flostats::comparison::compare_athletes;
use flostats::config::ProviderConfig;
use flostats::fetch::CancelToken;
use flostats::model::PersonIdentityId;
use flostats::progress::LogSink;
use flostats::report::render_text;
use flostats::transport::HttpSource;

struct Args {
    athlete1: PersonIdentityId,
    athlete2: PersonIdentityId,
    json: bool,
}

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = parse_args().context("usage: flostats <athlete1-id> <athlete2-id> [--json]")?;
    let config = ProviderConfig::from_env();
    let source = HttpSource::new(&config)?;
    let sink = Arc::new(LogSink {
        label: "compare".to_string(),
    });

    let (comparison, first, second) = compare_athletes(
        &source,
        &config,
        &args.athlete1,
        &args.athlete2,
        sink,
        &CancelToken::new(),
    )?;

    if args.json {
        let json = serde_json::to_string_pretty(&comparison).context("serialize comparison")?;
        println!("{json}");
    } else {
        print!("{}", render_text(&comparison, &first, &second));
    }
    Ok(())
}

fn parse_args() -> Option<Args> {
    let mut json = false;
    let mut ids = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
            continue;
        }
        let trimmed = arg.trim();
        if !trimmed.is_empty() {
            ids.push(PersonIdentityId::new(trimmed));
        }
    }
    if ids.len() != 2 {
        return None;
    }
    let athlete2 = ids.pop()?;
    let athlete1 = ids.pop()?;
    Some(Args {
        athlete1,
        athlete2,
        json,
    })
}
