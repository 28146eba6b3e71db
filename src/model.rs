//! Canonical and raw data types for seat-availability records.
//!
//! Both upstream sources emit loosely shaped JSON — fields come and go
//! between responses. Raw records therefore model every field as an
//! `Option` and normalization substitutes a default per field, instead
//! of trusting any upstream shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One origin/destination/date triple, supplied once per invocation and
/// never mutated.
#[derive(Debug, Clone)]
pub struct Query {
    /// Origin station code (e.g. "FRPAR").
    pub origin: String,
    /// Destination station code (e.g. "FRRST").
    pub destination: String,
    /// Travel date, `YYYY-MM-DD`.
    pub date: String,
}

/// Which channel produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Stealth-browser channel against the TGV Max proposals API.
    Camoufox,
    /// SNCF Open Data fallback.
    Opendata,
}

/// Canonical availability record, common to both channels.
///
/// `seats_available` is three-valued: a non-negative count when the
/// source reports one, `-1` for "bookable, quantity unknown" (the
/// fallback only knows yes/no), and `0` for "known unavailable".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainAvailability {
    pub train_number: String,
    pub train_type: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub seats_available: i64,
    pub origin: String,
    pub destination: String,
}

/// Final output, serialized once to stdout and discarded.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub source: Source,
    pub trains: Vec<TrainAvailability>,
}

/// Raw proposal from the TGV Max API. No field is guaranteed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProposal {
    /// Train number; the API emits both strings and bare numbers here.
    pub num: Option<Value>,
    #[serde(rename = "type")]
    pub train_type: Option<String>,
    pub dep: Option<String>,
    pub arr: Option<String>,
    pub count: Option<i64>,
    pub orig: Option<String>,
    pub dest: Option<String>,
}

impl RawProposal {
    /// Normalize into the canonical record, substituting a default for
    /// every missing field. Pure: same input, same output.
    pub fn normalize(&self, query: &Query) -> TrainAvailability {
        TrainAvailability {
            train_number: match &self.num {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => "?".to_string(),
                Some(other) => other.to_string(),
            },
            train_type: self
                .train_type
                .clone()
                .unwrap_or_else(|| "TGV".to_string()),
            departure_time: self.dep.clone().unwrap_or_default(),
            arrival_time: self.arr.clone().unwrap_or_default(),
            seats_available: self.count.unwrap_or(0),
            origin: self.orig.clone().unwrap_or_else(|| query.origin.clone()),
            destination: self
                .dest
                .clone()
                .unwrap_or_else(|| query.destination.clone()),
        }
    }
}

/// Raw record from the Open Data `tgvmax` dataset. Carries no seat
/// count — only the "OUI"/"NON" availability flag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    pub date: Option<String>,
    pub heure_depart: Option<String>,
    pub heure_arrivee: Option<String>,
    pub od_happy_card: Option<String>,
    pub train_no: Option<String>,
}

impl RawRecord {
    /// Normalize into the canonical record.
    ///
    /// Origin and destination are echoed from the query, not read from
    /// the record: the dataset's own station fields are not guaranteed
    /// to match the IATA codes the caller asked for.
    pub fn normalize(&self, query: &Query) -> TrainAvailability {
        let date = self.date.as_deref().unwrap_or("");
        let available = self.od_happy_card.as_deref() == Some("OUI");
        TrainAvailability {
            train_number: self.train_no.clone().unwrap_or_else(|| "?".to_string()),
            train_type: "TGV".to_string(),
            departure_time: format!("{date}T{}", self.heure_depart.as_deref().unwrap_or("")),
            arrival_time: format!("{date}T{}", self.heure_arrivee.as_deref().unwrap_or("")),
            seats_available: if available { -1 } else { 0 },
            origin: query.origin.clone(),
            destination: query.destination.clone(),
        }
    }
}
