use std::cell::Cell;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::de::DeserializeOwned;

use crate::config::{BOUT_INCLUDES, ProviderConfig, ROSTER_INCLUDES};
use crate::error::FetchError;
use crate::model::{BoutsResponse, CompoundResponse, Page, PersonIdentityId, RosterResponse};
use crate::transport::PageSource;

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn bouts_url(config: &ProviderConfig, athlete: &PersonIdentityId, offset: usize) -> String {
    format!(
        "{}/bouts/?identityPersonId={}&page[size]={}&page[offset]={}&hasResult=true{}",
        config.api_base,
        athlete,
        config.page_size,
        offset,
        include_param(BOUT_INCLUDES)
    )
}

pub fn roster_url(config: &ProviderConfig, athlete: &PersonIdentityId, offset: usize) -> String {
    format!(
        "{}/wrestlers/?identityPersonId={}&orderBy=eventEndDateTime&orderDirection=desc&page[size]={}&page[offset]={}{}",
        config.api_base,
        athlete,
        config.roster_page_size,
        offset,
        include_param(ROSTER_INCLUDES)
    )
}

fn include_param(include: &[&str]) -> String {
    if include.is_empty() {
        String::new()
    } else {
        format!("&include={}", include.join(","))
    }
}

pub fn fetch_all_bouts(
    source: &dyn PageSource,
    config: &ProviderConfig,
    athlete: &PersonIdentityId,
    cancel: &CancelToken,
    on_progress: &dyn Fn(f64),
) -> Result<BoutsResponse, FetchError> {
    let url = bouts_url(config, athlete, 0);
    let merged = fetch_all_pages(source, &url, config.page_size, cancel, on_progress)?;
    log::info!(
        "fetched {} bouts for {athlete} ({} side-loaded records)",
        merged.data.len(),
        merged.included.len()
    );
    Ok(merged)
}

pub fn fetch_roster(
    source: &dyn PageSource,
    config: &ProviderConfig,
    athlete: &PersonIdentityId,
    cancel: &CancelToken,
    on_progress: &dyn Fn(f64),
) -> Result<RosterResponse, FetchError> {
    let url = roster_url(config, athlete, 0);
    let merged = fetch_all_pages(source, &url, config.roster_page_size, cancel, on_progress)?;
    log::info!(
        "fetched {} roster entries for {athlete}",
        merged.data.len()
    );
    Ok(merged)
}

/// Follows `links.next` from `first_url` until the provider stops handing
/// out a new link, merging pages in order.
///
/// A next link equal to the one just fetched ends the listing. A next link
/// equal to any earlier page is a provider loop and fails the fetch.
pub fn fetch_all_pages<T: DeserializeOwned>(
    source: &dyn PageSource,
    first_url: &str,
    page_size: usize,
    cancel: &CancelToken,
    on_progress: &dyn Fn(f64),
) -> Result<CompoundResponse<T>, FetchError> {
    let reporter = MonotonicReporter::new(on_progress);

    let first = fetch_page::<T>(source, first_url, cancel, &|_: f64| {})?;
    let mut merged = CompoundResponse::from(first);
    // Without a declared total, the first page is assumed to be everything.
    let total = merged
        .total
        .map(|total| total as usize)
        .unwrap_or(merged.data.len());
    reporter.report(percent(merged.data.len(), total));

    let mut seen: HashSet<String> = HashSet::from([first_url.to_string()]);
    let mut current = first_url.to_string();
    while let Some(next) = merged.next.clone() {
        if next == current {
            break;
        }
        if !seen.insert(next.clone()) {
            return Err(FetchError::PaginationLoop { url: next });
        }

        let base = percent(merged.data.len(), total);
        let per_page = percent(page_size, total);
        let page = fetch_page::<T>(source, &next, cancel, &|page_pct: f64| {
            reporter.report((base + page_pct / 100.0 * per_page).min(100.0));
        })?;

        let items = page.data.unwrap_or_default();
        log::debug!("page {next}: {} items", items.len());
        merged.data.extend(items);
        merged.included.extend(page.included);
        reporter.report(percent(merged.data.len(), total));

        current = next;
        merged.next = page.links.next;
    }

    reporter.report(100.0);
    Ok(merged)
}

fn fetch_page<T: DeserializeOwned>(
    source: &dyn PageSource,
    url: &str,
    cancel: &CancelToken,
    on_progress: &dyn Fn(f64),
) -> Result<Page<T>, FetchError> {
    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }
    let body = source.get(url, on_progress)?;
    let page: Page<T> = serde_json::from_str(body.trim()).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })?;
    if page.data.is_none() {
        // No list at all is ambiguous upstream state; never treat it as "done".
        return Err(FetchError::MalformedPage {
            url: url.to_string(),
        });
    }
    Ok(page)
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (part as f64 * 100.0 / total as f64).min(100.0)
}

struct MonotonicReporter<'a> {
    sink: &'a dyn Fn(f64),
    last: Cell<f64>,
}

impl<'a> MonotonicReporter<'a> {
    fn new(sink: &'a dyn Fn(f64)) -> Self {
        Self {
            sink,
            last: Cell::new(0.0),
        }
    }

    fn report(&self, pct: f64) {
        if pct > self.last.get() {
            self.last.set(pct);
            (self.sink)(pct);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_never_divides_by_zero() {
        assert_eq!(percent(0, 0), 100.0);
        assert_eq!(percent(20, 40), 50.0);
        assert_eq!(percent(50, 40), 100.0);
    }

    #[test]
    fn urls_carry_paging_and_includes() {
        let config = ProviderConfig::default();
        let url = bouts_url(&config, &PersonIdentityId::from("p-1"), 0);
        assert!(url.starts_with("https://floarena-api.flowrestling.org/bouts/?identityPersonId=p-1"));
        assert!(url.contains("page[size]=40&page[offset]=0&hasResult=true"));
        assert!(url.contains("&include=bottomWrestler.team,topWrestler.team"));

        let roster = roster_url(&config, &PersonIdentityId::from("p-1"), 0);
        assert!(roster.contains("/wrestlers/?identityPersonId=p-1&orderBy=eventEndDateTime"));
    }
}
