//! Soroban RPC client — polls `getEvents` and decodes GiftChain events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//!
//! ## Payloads
//!
//! Requests ask for `xdrFormat: "json"`, so topics and data arrive as JSON
//! renderings of `ScVal` (`topicJson`, `valueJson`). They are flattened into
//! plain JSON before the fields of interest are read. Nodes that ignore the
//! format option send base64 XDR instead; for those only the `Symbol` and
//! `Bytes` topics are decoded, which is enough to classify the event.
//!
//! ## Ids
//!
//! Gift ids, creator hashes and campaign ids are `BytesN<32>` on chain. The RPC
//! may render them as hex or base64; both are normalised to lower-case hex.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, GiftChainEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// `ScValType` discriminants of the topic shapes GiftChain publishes.
const SCV_BYTES: u32 = 13;
const SCV_SYMBOL: u32 = 15;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Topics as base64 XDR, sent when the JSON rendering is not.
    #[serde(default)]
    pub topic: Vec<String>,
    /// Event data as base64 XDR.
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "topicJson", default)]
    pub topic_json: Vec<Value>,
    #[serde(rename = "valueJson", default)]
    pub value_json: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

/// One page of `getEvents` output.
#[derive(Debug)]
pub struct EventsPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger` — the ledger sequence to scan from (inclusive).
/// * `cursor`       — optional opaque pagination cursor from a previous response.
/// * `limit`        — maximum number of events to return.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventsPage> {
    let mut backoff = INITIAL_BACKOFF_SECS;
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getEvents",
        "params": build_params(contract_id, start_ledger, cursor, limit),
    });

    loop {
        let resp = match client.post(rpc_url).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                backoff = sleep_and_grow(backoff).await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC (will retry in {backoff}s)");
            backoff = sleep_and_grow(backoff).await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            // Invalid request / unknown method will never succeed on retry.
            if err.code == -32600 || err.code == -32601 {
                return Err(IndexerError::EventParse(format!(
                    "RPC hard error {}: {}",
                    err.code, err.message
                )));
            }
            warn!(
                "RPC soft error (will retry in {backoff}s): {} {}",
                err.code, err.message
            );
            backoff = sleep_and_grow(backoff).await;
            continue;
        }

        let result = body
            .result
            .ok_or_else(|| IndexerError::EventParse("Empty result from getEvents".to_string()))?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok(EventsPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

async fn sleep_and_grow(backoff: u64) -> u64 {
    tokio::time::sleep(Duration::from_secs(backoff)).await;
    (backoff * 2).min(MAX_BACKOFF_SECS)
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`GiftChainEvent`] structs.
///
/// Events from failed contract calls are dropped; the host rolled their
/// effects back.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<GiftChainEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call != Some(false))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<GiftChainEvent> {
    let topics: Vec<Value> = if raw.topic_json.is_empty() {
        raw.topic.iter().map(|t| legacy_topic(t)).collect()
    } else {
        raw.topic_json.iter().map(plain).collect()
    };
    let kind = EventKind::from_topic(topics.first()?.as_str()?);

    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let subject_id = topics.get(1).and_then(scalar).map(|t| normalize_id(&t));
    let value = if raw.value_json.is_null() {
        plain(&raw.value)
    } else {
        plain(&raw.value_json)
    };
    let data = decode_data(&value, kind);

    Some(GiftChainEvent {
        event_type: kind.as_str().to_string(),
        subject_kind: kind.subject().as_str().to_string(),
        subject_id,
        related_id: data.related_id,
        actor: data.actor,
        amount: data.amount,
        ledger: raw.ledger.unwrap_or(0) as i64,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

#[derive(Debug, Default, PartialEq)]
struct DecodedData {
    actor: Option<String>,
    amount: Option<String>,
    related_id: Option<String>,
}

/// Pull apart the JSON `value` blob that Soroban returns for event data.
fn decode_data(value: &Value, kind: EventKind) -> DecodedData {
    let amount = || extract_field(value, &["amount"]);
    match kind {
        EventKind::GiftCreated => DecodedData {
            actor: extract_field(value, &["creator"]).map(|c| normalize_id(&c)),
            amount: amount(),
            related_id: None,
        },
        EventKind::GiftClaimed => DecodedData {
            actor: extract_field(value, &["recipient"]),
            amount: amount(),
            related_id: None,
        },
        EventKind::GiftReclaimed | EventKind::ContributionWithdrawn => DecodedData {
            actor: extract_field(value, &["creator"]),
            amount: amount(),
            related_id: None,
        },
        EventKind::ContributionAdded | EventKind::ContributionRemoved => DecodedData {
            actor: extract_field(value, &["contributor"]),
            amount: amount(),
            related_id: None,
        },
        EventKind::PoolDrawn => DecodedData {
            actor: None,
            amount: amount(),
            related_id: extract_field(value, &["gift_id"]).map(|g| normalize_id(&g)),
        },
        EventKind::CampaignCreated => DecodedData {
            actor: extract_field(value, &["creator"]),
            amount: extract_field(value, &["goal"]),
            related_id: None,
        },
        EventKind::DonationReceived => DecodedData {
            actor: extract_field(value, &["donor"]),
            amount: amount(),
            related_id: None,
        },
        EventKind::Unknown => DecodedData::default(),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key).or_else(|| find_nested(value, key)))
        .find_map(scalar)
}

fn find_nested<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    if let Value::Object(map) = value {
        for (k, v) in map {
            if k == key {
                return Some(v);
            }
            if let Some(found) = find_nested(v, key) {
                return Some(found);
            }
        }
    }
    None
}

/// A string or number, possibly wrapped as `{"type": …, "value": …}`.
fn scalar(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("value").and_then(scalar),
        _ => None,
    }
}

/// Flatten a JSON-rendered `ScVal` (`{"symbol": "created"}`,
/// `{"map": [{"key": .., "val": ..}]}`, `{"i128": "5"}`, ...) into plain JSON.
/// Numbers become strings so that 128-bit amounts survive. Values already in
/// plain form, or wrapped as `{"type": .., "value": ..}`, pass through.
fn plain(v: &Value) -> Value {
    let Value::Object(map) = v else {
        return match v {
            Value::String(s) if s == "void" => Value::Null,
            other => other.clone(),
        };
    };
    if map.contains_key("type") {
        if let Some(inner) = map.get("value") {
            return plain(inner);
        }
    }
    if map.len() == 1 {
        if let Some((tag, inner)) = map.iter().next() {
            if let Some(flat) = plain_tagged(tag, inner) {
                return flat;
            }
        }
    }
    Value::Object(map.iter().map(|(k, v)| (k.clone(), plain(v))).collect())
}

fn plain_tagged(tag: &str, inner: &Value) -> Option<Value> {
    match (tag, inner) {
        ("map", Value::Array(entries)) => Some(Value::Object(
            entries
                .iter()
                .filter_map(|entry| {
                    let key = scalar(&plain(entry.get("key")?))?;
                    Some((key, plain(entry.get("val")?)))
                })
                .collect(),
        )),
        ("vec", Value::Array(items)) => Some(Value::Array(items.iter().map(plain).collect())),
        ("bool", Value::Bool(b)) => Some(Value::Bool(*b)),
        ("i128" | "u128", Value::Object(parts)) => int128_parts(parts).map(Value::String),
        (
            "symbol" | "string" | "bytes" | "address" | "u32" | "i32" | "u64" | "i64" | "i128"
            | "u128" | "u256" | "i256" | "timepoint" | "duration",
            scalar_value,
        ) => scalar(scalar_value).map(Value::String),
        _ => None,
    }
}

/// 128-bit integers rendered as `{"hi": .., "lo": ..}`.
fn int128_parts(parts: &Map<String, Value>) -> Option<String> {
    let lo = parts.get("lo")?.as_u64()?;
    let hi = parts.get("hi")?;
    match hi.as_i64() {
        Some(hi) if hi < 0 => Some((((hi as i128) << 64) | lo as i128).to_string()),
        _ => Some((((hi.as_u64()? as u128) << 64) | lo as u128).to_string()),
    }
}

/// A topic from the `topic` field: a JSON `ScVal`, base64 XDR, or a bare string.
fn legacy_topic(raw: &str) -> Value {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if v.is_object() {
            return plain(&v);
        }
    }
    topic_from_xdr(raw).unwrap_or_else(|| Value::String(raw.to_string()))
}

/// Decode a base64 XDR `ScVal` holding a `Symbol` or `Bytes`.
fn topic_from_xdr(raw: &str) -> Option<Value> {
    let xdr = STANDARD.decode(raw).ok()?;
    let tag = u32::from_be_bytes(xdr.get(0..4)?.try_into().ok()?);
    let len = u32::from_be_bytes(xdr.get(4..8)?.try_into().ok()?) as usize;
    let body = xdr.get(8..8 + len)?;
    match tag {
        SCV_SYMBOL => std::str::from_utf8(body)
            .ok()
            .map(|s| Value::String(s.to_string())),
        SCV_BYTES => Some(Value::String(hex::encode(body))),
        _ => None,
    }
}

/// Hex ids are lower-cased, base64 ids of 32 bytes are re-encoded as hex,
/// anything else is returned unchanged.
pub fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim_start_matches("0x");
    if let Some(hex_id) = parse_hex_id(trimmed) {
        return hex_id;
    }
    match STANDARD.decode(trimmed) {
        Ok(bytes) if bytes.len() == 32 => hex::encode(bytes),
        _ => raw.to_string(),
    }
}

/// `Some(lower-case hex)` when `s` is exactly 32 bytes of hex.
pub fn parse_hex_id(s: &str) -> Option<String> {
    if s.len() != 64 {
        return None;
    }
    hex::decode(s).ok().map(hex::encode)
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
