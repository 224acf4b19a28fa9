use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://floarena-api.flowrestling.org";
pub const DEFAULT_PAGE_SIZE: usize = 40;

pub const BOUT_INCLUDES: &[&str] = &[
    "bottomWrestler.team",
    "topWrestler.team",
    "weightClass",
    "topWrestler.division",
    "bottomWrestler.division",
    "event",
    "roundName",
];

pub const ROSTER_INCLUDES: &[&str] = &[
    "bracketPlacements.weightClass",
    "division",
    "event",
    "weightClass",
    "team",
];

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_base: String,
    pub page_size: usize,
    pub roster_page_size: usize,
    pub http_timeout: Duration,
    pub progress_interval: Duration,
    pub fetch_parallelism: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            roster_page_size: DEFAULT_PAGE_SIZE,
            http_timeout: Duration::from_secs(20),
            progress_interval: Duration::from_millis(16),
            fetch_parallelism: 4,
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_base = env::var("FLO_API_BASE")
            .ok()
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or(defaults.api_base);
        Self {
            api_base,
            page_size: env_usize("FLO_PAGE_SIZE")
                .unwrap_or(defaults.page_size)
                .clamp(1, 200),
            roster_page_size: env_usize("FLO_ROSTER_PAGE_SIZE")
                .unwrap_or(defaults.roster_page_size)
                .clamp(1, 200),
            http_timeout: Duration::from_secs(
                env_u64("HTTP_TIMEOUT_SECS").unwrap_or(20).clamp(1, 300),
            ),
            progress_interval: Duration::from_millis(
                env_u64("PROGRESS_INTERVAL_MS").unwrap_or(16).min(5_000),
            ),
            fetch_parallelism: env_usize("FETCH_PARALLELISM")
                .unwrap_or(defaults.fetch_parallelism)
                .clamp(1, 16),
        }
    }
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|val| val.trim().parse::<usize>().ok())
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|val| val.trim().parse::<u64>().ok())
}
