use std::io::Read;

use anyhow::Result;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;

use crate::config::ProviderConfig;
use crate::error::FetchError;
use crate::http_client::http_client;

const READ_CHUNK: usize = 16 * 1024;

/// Something that can GET a provider URL and hand back the raw body.
///
/// `on_progress` receives the download fraction of this one request in
/// 0..=100. It is only called when the size is known up front, and always
/// once with 100 on success.
pub trait PageSource: Send + Sync {
    fn get(&self, url: &str, on_progress: &dyn Fn(f64)) -> Result<String, FetchError>;
}

pub struct HttpSource {
    client: &'static Client,
}

impl HttpSource {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.http_timeout)?,
        })
    }
}

impl PageSource for HttpSource {
    fn get(&self, url: &str, on_progress: &dyn Fn(f64)) -> Result<String, FetchError> {
        let mut resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total = resp.content_length().filter(|len| *len > 0);
        let mut body = Vec::with_capacity(total.unwrap_or(0).min(8 * 1024 * 1024) as usize);
        let mut chunk = vec![0u8; READ_CHUNK];
        let mut last = 0.0;
        loop {
            let read = resp.read(&mut chunk).map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            })?;
            if read == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..read]);
            if let Some(total) = total {
                let pct = (body.len() as f64 / total as f64 * 100.0).min(100.0);
                if pct > last {
                    last = pct;
                    on_progress(pct);
                }
            }
        }
        on_progress(100.0);

        String::from_utf8(body).map_err(|err| FetchError::Body {
            url: url.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, err),
        })
    }
}
