//! Response envelopes of the MailSync endpoints.
//!
//! The list, update, search and insight endpoints wrap their payloads differently,
//! so each gets its own parser rather than one shared shape.

use reqwest::StatusCode;
use serde_json::Value;

use super::{ApiError, UpdateOutcome};
use crate::core::insight::Insights;
use crate::core::raw::RawTaskRecord;

/// `{status: bool, message: [record]}` from `/api/allmessages`.
pub fn parse_list_envelope(status: StatusCode, body: &str) -> Result<Vec<RawTaskRecord>, ApiError> {
    let json = checked_json(status, body)?;
    if !flag(&json) {
        return Err(ApiError::InvalidFormat("status flag is false".to_string()));
    }
    json.get("message")
        .and_then(Value::as_array)
        .map(|records| RawTaskRecord::from_values(records))
        .ok_or_else(|| ApiError::InvalidFormat("missing message list".to_string()))
}

/// `/api/update_mail` has been seen answering both `{status}` and `{status, message: [...]}`.
pub fn parse_update_envelope(status: StatusCode, body: &str) -> Result<UpdateOutcome, ApiError> {
    let json = checked_json(status, body)?;
    if !flag(&json) {
        return Err(ApiError::InvalidFormat("status flag is false".to_string()));
    }
    Ok(match json.get("message").and_then(Value::as_array) {
        Some(records) => UpdateOutcome::Tasks(RawTaskRecord::from_values(records)),
        None => UpdateOutcome::Acknowledged,
    })
}

/// `{data: {status: bool, mail: [record]}}` from `/api/search`.
///
/// A false flag at either level, or a `mail` that is not a list, means no results.
pub fn parse_search_envelope(status: StatusCode, body: &str) -> Result<Vec<RawTaskRecord>, ApiError> {
    let json = checked_json(status, body)?;
    let Some(data) = json.get("data") else {
        return Ok(Vec::new());
    };
    if !flag(data) {
        return Ok(Vec::new());
    }
    Ok(data
        .get("mail")
        .and_then(Value::as_array)
        .map(|records| RawTaskRecord::from_values(records))
        .unwrap_or_default())
}

/// `{status: bool, data: {meetingcount, taskcompleted, totalemail, categorylist, sentimentallist}}`.
pub fn parse_insight_envelope(status: StatusCode, body: &str) -> Result<Insights, ApiError> {
    let json = checked_json(status, body)?;
    if !flag(&json) {
        return Err(ApiError::InvalidFormat("status flag is false".to_string()));
    }
    json.get("data")
        .filter(|d| d.is_object())
        .map(Insights::from_value)
        .ok_or_else(|| ApiError::InvalidFormat("missing insight data".to_string()))
}

fn checked_json(status: StatusCode, body: &str) -> Result<Value, ApiError> {
    if !status.is_success() {
        return Err(ApiError::Http {
            status: status.as_u16(),
        });
    }
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

fn flag(value: &Value) -> bool {
    value.get("status").and_then(Value::as_bool).unwrap_or(false)
}
