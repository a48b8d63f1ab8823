//! CORS-proxy fallback fetching.
//!
//! Some feeds reject direct requests; all providers share the same policy:
//! try the URL directly first, then retry once through a public CORS proxy
//! that returns the raw upstream body.

use log::debug;
use reqwest::Client;

use crate::errors::MarketDataError;

const PROXY_BASE: &str = "https://api.allorigins.win/raw?url=";

/// Wrap a feed URL in the CORS proxy.
pub fn proxy_url(feed_url: &str) -> String {
    format!("{}{}", PROXY_BASE, urlencoding::encode(feed_url))
}

/// Fetch a URL as text, falling back to the proxy when the direct request
/// fails or returns a non-success status.
pub async fn fetch_text_with_fallback(
    client: &Client,
    url: &str,
    provider: &str,
) -> Result<String, MarketDataError> {
    match client.get(url).send().await {
        Ok(response) if response.status().is_success() => {
            return response.text().await.map_err(MarketDataError::from);
        }
        Ok(response) => {
            debug!(
                "{}: direct fetch returned {}, retrying via proxy",
                provider,
                response.status()
            );
        }
        Err(err) => {
            debug!("{}: direct fetch failed ({}), retrying via proxy", provider, err);
        }
    }

    let proxied = client.get(proxy_url(url)).send().await?;
    if !proxied.status().is_success() {
        return Err(MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("HTTP error: {}", proxied.status()),
        });
    }
    proxied.text().await.map_err(MarketDataError::from)
}

/// Fetch a URL as JSON, falling back to the proxy. The proxied body is
/// parsed from text because the proxy does not forward content types.
pub async fn fetch_json_with_fallback(
    client: &Client,
    url: &str,
    provider: &str,
) -> Result<serde_json::Value, MarketDataError> {
    let text = fetch_text_with_fallback(client, url, provider).await?;
    serde_json::from_str(&text).map_err(|err| MarketDataError::ProviderError {
        provider: provider.to_string(),
        message: format!("invalid JSON payload: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_url_encodes_feed() {
        let url = proxy_url("https://stooq.com/q/d/l/?s=spy.us&i=d");
        assert!(url.starts_with("https://api.allorigins.win/raw?url="));
        assert!(url.contains("stooq.com%2Fq%2Fd%2Fl"));
        assert!(!url.contains("?s=spy"));
    }
}
