//! Network defaults and the listings page source.

use log::debug;
use reqwest::Url;
use reqwest::blocking::Client;
use std::time::Duration;

use crate::error::StockError;
use crate::result::Result;

/// First listings page crawled by discovery.
pub const DEFAULT_SEED_URL: &str =
    "http://www.nasdaq.com/screening/companies-by-industry.aspx?exchange=NASDAQrender=download";
/// Base URL of the quote provider.
pub const DEFAULT_PROVIDER_URL: &str = "https://api.iextrading.com/1.0";
/// Per-request timeout.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("stock_driver/", env!("CARGO_PKG_VERSION"));

/// Builds the blocking HTTP client used for pages and quotes.
pub fn http_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Source of listings page bodies.
pub trait PageSource {
    /// Fetches the body of the page at `url`.
    fn fetch_page(&self, url: &str) -> Result<String>;
}

/// `PageSource` backed by HTTP GET requests.
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    /// Wraps an HTTP client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PageSource for HttpPageSource {
    fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(StockError::PageStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text()?)
    }
}

/// Resolves an `href` found on the page at `base` to an absolute URL.
///
/// The link is HTML-unescaped first, so `&amp;` separators in query strings survive.
pub fn resolve_link(base: &str, href: &str) -> Result<String> {
    let href = href.replace("&amp;", "&");
    let base_url = Url::parse(base).map_err(|e| StockError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })?;
    let resolved = base_url.join(&href).map_err(|e| StockError::InvalidUrl {
        url: href.clone(),
        reason: e.to_string(),
    })?;
    Ok(resolved.into())
}
