//! Browser capability boundary.
//!
//! The primary channel only needs "navigate, wait, evaluate" from a
//! browser. These traits keep the retrieval logic testable with a fake
//! session and keep chromiumoxide behind a single module.

pub mod chromium;

use crate::error::RetrievalError;
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of a navigation.
///
/// `status` is `None` when no response was observed for the navigation
/// (the endpoint never answered, or the engine produced no network
/// event for the document).
#[derive(Debug, Clone, Copy)]
pub struct PageResponse {
    pub status: Option<u16>,
}

/// Launches one stealth browser instance per call.
///
/// Launching is part of the retrieval attempt: a launch failure is a
/// `RetrievalError` for the channel, never a process-level crash.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn StealthBrowser>, RetrievalError>;
}

/// A launched browser that can open isolated sessions.
#[async_trait]
pub trait StealthBrowser: Send + Sync {
    /// Open a fresh page/tab.
    async fn new_session(&self) -> Result<Box<dyn BrowserSession>, RetrievalError>;

    /// Tear the browser down. Called on every exit path of a retrieval
    /// attempt; errors during teardown are swallowed.
    async fn shutdown(self: Box<Self>);
}

/// One page inside a stealth browser.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate to `url` and wait for the document response, bounded by
    /// `timeout`.
    async fn navigate(
        &mut self,
        url: &str,
        timeout: Duration,
    ) -> Result<PageResponse, RetrievalError>;

    /// Evaluate a script in the page and return its string result.
    async fn evaluate(&self, script: &str) -> Result<String, RetrievalError>;

    /// Close the page. Errors during teardown are swallowed.
    async fn close(self: Box<Self>);
}
