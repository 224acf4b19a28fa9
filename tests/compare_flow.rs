use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;

use flostats::comparison::compare_athletes;
use flostats::config::ProviderConfig;
use flostats::error::FetchError;
use flostats::fetch::{CancelToken, bouts_url, roster_url};
use flostats::model::PersonIdentityId;
use flostats::progress::{ChannelSink, ProgressEvent};
use flostats::report::render_text;
use flostats::transport::PageSource;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

struct FixtureSource {
    pages: HashMap<String, String>,
}

impl PageSource for FixtureSource {
    fn get(&self, url: &str, on_progress: &dyn Fn(f64)) -> Result<String, FetchError> {
        let body = self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })?;
        on_progress(100.0);
        Ok(body)
    }
}

fn setup(with_second_roster: bool) -> (FixtureSource, ProviderConfig, PersonIdentityId, PersonIdentityId) {
    let config = ProviderConfig {
        api_base: "http://provider.test".to_string(),
        fetch_parallelism: 2,
        progress_interval: std::time::Duration::ZERO,
        ..ProviderConfig::default()
    };
    let a = PersonIdentityId::from("person-a");
    let b = PersonIdentityId::from("person-b");

    let mut pages = HashMap::new();
    pages.insert(bouts_url(&config, &a, 0), read_fixture("bouts_athlete_a.json"));
    pages.insert(bouts_url(&config, &b, 0), read_fixture("bouts_athlete_b.json"));
    pages.insert(roster_url(&config, &a, 0), read_fixture("roster_athlete_a.json"));
    if with_second_roster {
        pages.insert(roster_url(&config, &b, 0), read_fixture("roster_athlete_b.json"));
    }
    (FixtureSource { pages }, config, a, b)
}

#[test]
fn compares_two_athletes_end_to_end() {
    let (source, config, a, b) = setup(true);
    let (tx, rx) = mpsc::channel();

    let (comparison, first, second) = compare_athletes(
        &source,
        &config,
        &a,
        &b,
        Arc::new(ChannelSink::new(tx)),
        &CancelToken::new(),
    )
    .expect("comparison should succeed");

    assert_eq!(comparison.common_opponents.len(), 1);
    assert_eq!(comparison.head_to_head.len(), 1);
    assert_eq!(comparison.summary.athlete2_total_wins, 2);

    let events: Vec<ProgressEvent> = rx.try_iter().collect();
    assert_eq!(events.first(), Some(&ProgressEvent::Started));
    assert_eq!(events.last(), Some(&ProgressEvent::Progress(100.0)));
    let values: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::Progress(p) => Some(*p),
            ProgressEvent::Started => None,
        })
        .collect();
    assert!(values.windows(2).all(|w| w[0] <= w[1]), "{values:?}");

    let text = render_text(&comparison, &first, &second);
    assert!(text.starts_with("Alex Able vs Blake Baker"));
    assert!(text.contains("Xavier Cross (4 bouts)"));
    assert!(text.contains("Winter Duals"));
    assert!(text.contains("132 lbs"));
}

#[test]
fn one_failed_fetch_fails_the_comparison_but_still_completes_progress() {
    let (source, config, a, b) = setup(false);
    let (tx, rx) = mpsc::channel();

    let err = compare_athletes(
        &source,
        &config,
        &a,
        &b,
        Arc::new(ChannelSink::new(tx)),
        &CancelToken::new(),
    )
    .expect_err("missing roster page must fail");

    let root = err
        .downcast_ref::<FetchError>()
        .expect("fetch error is preserved");
    assert!(matches!(root, FetchError::Status { status: 404, .. }));
    assert_eq!(
        rx.try_iter().last(),
        Some(ProgressEvent::Progress(100.0))
    );
}
