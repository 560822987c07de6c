//! slurp-schemas: EDDN message types
//!
//! Typed records for the two EDDN schema families slurp consumes
//! (`commodity/3` and `journal/1`) plus decoding of raw relay frames
//! (zlib-compressed JSON) into them.

use std::io::Read;

use chrono::{DateTime, SecondsFormat, Utc};
use flate2::read::ZlibDecoder;
use serde::{Deserialize, Serialize};

pub mod commodity;
pub mod error;
pub mod journal;

pub use commodity::{Bracket, CommodityObservation, CommodityV3, Economy, MarketMessage};
pub use error::DecodeError;
pub use journal::{JournalMessage, JournalV1};

pub const COMMODITY_V3: &str = "https://eddn.edcd.io/schemas/commodity/3";
pub const JOURNAL_V1: &str = "https://eddn.edcd.io/schemas/journal/1";

/// Uploader metadata attached to every EDDN message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(rename = "uploaderID")]
    pub uploader_id: String,
    #[serde(rename = "softwareName")]
    pub software_name: String,
    #[serde(rename = "softwareVersion")]
    pub software_version: String,
    #[serde(rename = "gatewayTimestamp", default)]
    pub gateway_timestamp: Option<DateTime<Utc>>,
}

/// A decoded relay frame, dispatched on `$schemaRef`.
#[derive(Debug, Clone)]
pub enum FeedMessage {
    Commodity(CommodityV3),
    Journal(JournalV1),
    /// Any schema slurp does not act on (outfitting, shipyard, test schemas...)
    Other { schema_ref: String },
}

impl FeedMessage {
    pub fn schema_ref(&self) -> &str {
        match self {
            FeedMessage::Commodity(_) => COMMODITY_V3,
            FeedMessage::Journal(_) => JOURNAL_V1,
            FeedMessage::Other { schema_ref } => schema_ref,
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "$schemaRef")]
    schema_ref: String,
}

/// Inflate a raw relay frame and decode it.
pub fn decode(raw: &[u8]) -> Result<FeedMessage, DecodeError> {
    let mut json = Vec::with_capacity(raw.len() * 4);
    ZlibDecoder::new(raw)
        .read_to_end(&mut json)
        .map_err(DecodeError::Inflate)?;
    decode_json(&json)
}

/// Decode an already-inflated JSON payload.
pub fn decode_json(json: &[u8]) -> Result<FeedMessage, DecodeError> {
    let envelope: Envelope = serde_json::from_slice(json).map_err(DecodeError::Envelope)?;

    match envelope.schema_ref.as_str() {
        COMMODITY_V3 => serde_json::from_slice(json)
            .map(FeedMessage::Commodity)
            .map_err(|source| DecodeError::Schema {
                schema: COMMODITY_V3,
                source,
            }),
        JOURNAL_V1 => serde_json::from_slice(json)
            .map(FeedMessage::Journal)
            .map_err(|source| DecodeError::Schema {
                schema: JOURNAL_V1,
                source,
            }),
        _ => Ok(FeedMessage::Other {
            schema_ref: envelope.schema_ref,
        }),
    }
}

/// Render a feed timestamp the way it is stored in the summaries
/// (RFC 3339, `Z` suffix, so the strings sort lexically).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
