//! Fallback channel: the SNCF Open Data `tgvmax` dataset.
//!
//! Public and unauthenticated, but lower fidelity: the dataset only
//! knows whether a TGV Max seat exists ("OUI"/"NON"), never how many,
//! so normalized records carry the `-1` availability sentinel instead
//! of a count.

use crate::error::RetrievalError;
use crate::model::{Query, RawRecord, Source, TrainAvailability};
use crate::sources::Retriever;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DATASET_BASE: &str =
    "https://data.sncf.com/api/explore/v2.1/catalog/datasets/tgvmax/records";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const RESULT_LIMIT: u32 = 50;

/// Response envelope of the Explore v2.1 records API.
#[derive(Debug, Deserialize)]
struct RecordsEnvelope {
    #[serde(default)]
    results: Vec<RawRecord>,
}

/// Direct-HTTP retriever for the Open Data dataset.
pub struct OpendataRetriever {
    client: reqwest::Client,
    base_url: String,
}

impl OpendataRetriever {
    pub fn new() -> Self {
        Self::with_base_url(DATASET_BASE)
    }

    /// Point the retriever at a different records endpoint (tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl Default for OpendataRetriever {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Retriever for OpendataRetriever {
    fn source(&self) -> Source {
        Source::Opendata
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<TrainAvailability>, RetrievalError> {
        let filter = format!(
            "date=date'{}' AND origine_iata='{}' AND destination_iata='{}'",
            query.date, query.origin, query.destination
        );
        debug!("querying open data: {filter}");

        let limit = RESULT_LIMIT.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("where", filter.as_str()), ("limit", limit.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status(status.as_u16().to_string()));
        }

        let body = response.text().await?;
        let envelope: RecordsEnvelope = serde_json::from_str(&body)?;
        Ok(envelope
            .results
            .iter()
            .map(|r| r.normalize(query))
            .collect())
    }
}
