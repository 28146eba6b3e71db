//! Retrieval channels.
//!
//! Two independent upstreams feed the same canonical schema: the TGV
//! Max proposals API behind a stealth browser ([`maxjeune`]) and the
//! SNCF Open Data dataset over plain HTTP ([`opendata`]).

pub mod maxjeune;
pub mod opendata;

use crate::error::RetrievalError;
use crate::model::{Query, Source, TrainAvailability};
use async_trait::async_trait;

/// One retrieval channel. Each channel is attempted at most once per
/// invocation; resilience comes from channel fallback, not retries.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Tag stamped on the result when this channel succeeds.
    fn source(&self) -> Source;

    /// Fetch and normalize availability for one query.
    async fn fetch(&self, query: &Query) -> Result<Vec<TrainAvailability>, RetrievalError>;
}
