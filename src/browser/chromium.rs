//! Chromium-backed stealth session using chromiumoxide.

use super::{BrowserLauncher, BrowserSession, PageResponse, StealthBrowser};
use crate::error::RetrievalError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventResponseReceived, ResourceType,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. TGVMAX_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("TGVMAX_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.tgvmax/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".tgvmax/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".tgvmax/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".tgvmax/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".tgvmax/chromium/chrome-linux64/chrome"),
                home.join(".tgvmax/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 4. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Launches a fresh headless Chromium per retrieval attempt.
pub struct ChromiumLauncher;

impl ChromiumLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChromiumLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn StealthBrowser>, RetrievalError> {
        let browser = ChromiumBrowser::launch().await?;
        Ok(Box::new(browser))
    }
}

/// A launched headless Chromium instance.
pub struct ChromiumBrowser {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl ChromiumBrowser {
    /// Launch headless Chromium with automation markers suppressed.
    pub async fn launch() -> Result<Self, RetrievalError> {
        let chrome_path = find_chromium().ok_or_else(|| {
            RetrievalError::Browser(
                "Chromium not found; set TGVMAX_CHROMIUM_PATH or install google-chrome"
                    .to_string(),
            )
        })?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg("--disable-blink-features=AutomationControlled")
            .build()
            .map_err(|e| RetrievalError::Browser(format!("browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RetrievalError::Browser(format!("launch failed: {e}")))?;

        // Drive the CDP message loop for the lifetime of the browser.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }
}

#[async_trait]
impl StealthBrowser for ChromiumBrowser {
    async fn new_session(&self) -> Result<Box<dyn BrowserSession>, RetrievalError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| RetrievalError::Browser(format!("failed to open page: {e}")))?;

        // Network events carry the document status codes we need.
        page.execute(EnableParams::default())
            .await
            .map_err(|e| RetrievalError::Browser(format!("network tracking: {e}")))?;

        Ok(Box::new(ChromiumSession { page }))
    }

    async fn shutdown(self: Box<Self>) {
        let Self {
            mut browser,
            handler_task,
        } = *self;
        let _ = browser.close().await;
        let _ = browser.wait().await;
        handler_task.abort();
    }
}

/// A single Chromium page.
pub struct ChromiumSession {
    page: Page,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(
        &mut self,
        url: &str,
        timeout: Duration,
    ) -> Result<PageResponse, RetrievalError> {
        let mut responses = self
            .page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| RetrievalError::Browser(format!("response listener: {e}")))?;

        let nav = tokio::time::timeout(timeout, async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        })
        .await;

        match nav {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(RetrievalError::Navigation(format!("{e}"))),
            Err(_) => {
                return Err(RetrievalError::Navigation(format!(
                    "timed out after {}ms",
                    timeout.as_millis()
                )))
            }
        }

        // The document response is normally queued by the time the load
        // settles; drain the event stream briefly and keep the last
        // document status (redirect chains emit several).
        let mut status = None;
        let deadline = tokio::time::Instant::now() + Duration::from_millis(1000);
        while let Ok(Some(event)) = tokio::time::timeout_at(deadline, responses.next()).await {
            if event.r#type == ResourceType::Document {
                status = Some(event.response.status as u16);
            }
        }

        Ok(PageResponse { status })
    }

    async fn evaluate(&self, script: &str) -> Result<String, RetrievalError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| RetrievalError::Browser(format!("evaluation failed: {e}")))?;

        result
            .into_value::<String>()
            .map_err(|e| RetrievalError::Browser(format!("non-string evaluation result: {e}")))
    }

    async fn close(self: Box<Self>) {
        let _ = self.page.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn navigate_and_evaluate_on_data_url() {
        let browser = Box::new(ChromiumBrowser::launch().await.expect("launch failed"));
        let mut session = browser
            .new_session()
            .await
            .expect("failed to open session");

        session
            .navigate(
                "data:text/html,<body>{\"proposals\":[]}</body>",
                Duration::from_secs(10),
            )
            .await
            .expect("navigation failed");

        let body = session
            .evaluate("document.body.innerText")
            .await
            .expect("evaluation failed");
        assert!(body.contains("proposals"));

        session.close().await;
        browser.shutdown().await;
    }
}
