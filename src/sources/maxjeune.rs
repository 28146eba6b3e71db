//! Primary channel: the TGV Max free-places API behind bot detection.
//!
//! The API rejects plain HTTP clients. It expects the cookies and
//! fingerprint of a browser session that visited the public site first,
//! so the channel lands on the site, pauses for the session bootstrap,
//! then drives the same session to the JSON endpoint and reads the
//! rendered body.

use crate::browser::{BrowserLauncher, BrowserSession, StealthBrowser};
use crate::error::RetrievalError;
use crate::model::{Query, RawProposal, Source, TrainAvailability};
use crate::sources::Retriever;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const SITE_URL: &str = "https://www.maxjeune-tgvinoui.sncf/";
const API_BASE: &str =
    "https://www.maxjeune-tgvinoui.sncf/api/public/refdata/search-freeplaces-proposals";

const LANDING_TIMEOUT: Duration = Duration::from_secs(25);
const API_TIMEOUT: Duration = Duration::from_secs(15);
/// Fixed pause after landing so the session bootstrap (cookies,
/// fingerprint scripts) finishes before the API call.
const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Stealth-browser retriever for the TGV Max API.
pub struct MaxjeuneRetriever {
    launcher: Box<dyn BrowserLauncher>,
}

impl MaxjeuneRetriever {
    pub fn new(launcher: Box<dyn BrowserLauncher>) -> Self {
        Self { launcher }
    }

    async fn drive(
        &self,
        browser: &dyn StealthBrowser,
        query: &Query,
    ) -> Result<Vec<TrainAvailability>, RetrievalError> {
        let mut session = browser.new_session().await?;
        let outcome = run_session(session.as_mut(), query).await;
        session.close().await;
        outcome
    }
}

#[async_trait]
impl Retriever for MaxjeuneRetriever {
    fn source(&self) -> Source {
        Source::Camoufox
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<TrainAvailability>, RetrievalError> {
        let browser = self.launcher.launch().await?;
        let outcome = self.drive(browser.as_ref(), query).await;
        // Torn down on every exit path before the orchestrator can fall
        // through to the next channel.
        browser.shutdown().await;
        outcome
    }
}

async fn run_session(
    session: &mut dyn BrowserSession,
    query: &Query,
) -> Result<Vec<TrainAvailability>, RetrievalError> {
    debug!("landing on {SITE_URL}");
    session.navigate(SITE_URL, LANDING_TIMEOUT).await?;
    tokio::time::sleep(SETTLE_DELAY).await;

    let url = format!(
        "{API_BASE}?origin={}&destination={}&departureDateTime={}T01:00:00.000Z",
        query.origin, query.destination, query.date
    );
    debug!("fetching {url}");
    let response = session.navigate(&url, API_TIMEOUT).await?;
    match response.status {
        Some(200) => {}
        Some(code) => return Err(RetrievalError::Status(code.to_string())),
        None => return Err(RetrievalError::Status("no response".to_string())),
    }

    let body = session.evaluate("document.body.innerText").await?;
    let data: Value = serde_json::from_str(&body)?;
    let proposals = extract_proposals(data)?;
    Ok(proposals.iter().map(|p| p.normalize(query)).collect())
}

/// The payload is usually `{"proposals": [...]}` but has been observed
/// as a bare array as well.
fn extract_proposals(data: Value) -> Result<Vec<RawProposal>, RetrievalError> {
    let list = match data {
        Value::Object(mut map) => map
            .remove("proposals")
            .unwrap_or_else(|| Value::Array(Vec::new())),
        other => other,
    };
    serde_json::from_value(list).map_err(RetrievalError::from)
}
