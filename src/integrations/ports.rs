// src/integrations/ports.rs
//
// Network and browser ports.
//
// The scraping logic drives these abstractions; concrete transports live
// behind them. The crate ships an HTTP implementation for server-rendered
// sources. Browser automation is an external capability: no engine ships
// here, only the contract the client-rendered scraper drives.
//
// RULES:
// - fetch() returns raw HTML as a String; parsing happens synchronously at
//   the call site, so parsed documents never cross await points
// - wait_for() reports a timeout as Ok(false), never as an error
// - A session must be closed on every exit path of the pipeline that
//   opened it

use async_trait::async_trait;
use std::time::Duration;

use crate::error::AppResult;

/// Fetches server-rendered documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch a URL with query parameters, returning the response body.
    /// Connection failures and timeouts surface as AppError::Transport.
    async fn fetch(&self, url: &str, params: &[(String, String)]) -> AppResult<String>;
}

/// A DOM element handle inside an interactive page.
pub trait ElementNode: Send {
    /// Visible text content, whitespace as rendered.
    fn text(&self) -> String;

    fn attr(&self, name: &str) -> Option<String>;

    /// First descendant matching the selector.
    fn find(&self, selector: &str) -> Option<Box<dyn ElementNode>>;

    /// All descendants matching the selector, in document order.
    fn find_all(&self, selector: &str) -> Vec<Box<dyn ElementNode>>;
}

/// One live browser tab/session. Never shared across concurrent pipelines.
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str) -> AppResult<()>;

    /// Wait until an element matching the selector appears.
    /// Ok(false) means the timeout elapsed - a negative result, not an error.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> AppResult<bool>;

    /// All elements currently matching the selector, in document order.
    async fn query(&mut self, selector: &str) -> AppResult<Vec<Box<dyn ElementNode>>>;

    /// Scroll to the bottom of the page to trigger lazy loading.
    async fn scroll_to_bottom(&mut self) -> AppResult<()>;

    /// Current rendered page height, used to detect that lazy loading
    /// stopped producing content.
    async fn page_height(&mut self) -> AppResult<u64>;

    async fn page_title(&mut self) -> AppResult<String>;

    /// Release the underlying browser resources.
    async fn close(&mut self) -> AppResult<()>;
}

/// Opens browser sessions. Implemented by an external automation layer.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn open_session(&self) -> AppResult<Box<dyn BrowserSession>>;
}
