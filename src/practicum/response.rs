use serde_json::Value;

use crate::error::BotError;
use crate::practicum::statuses;

/// Structural checks on the decoded API payload. Returns the homework list
/// unmodified on success; validation of individual records is `parse_status`'s
/// job.
pub fn check_response(response: &Value) -> Result<&[Value], BotError> {
    if is_empty_value(response) {
        return Err(BotError::EmptyResponse);
    }
    let map = response.as_object().ok_or(BotError::NotAMapping)?;
    let homeworks = map
        .get("homeworks")
        .ok_or(BotError::MissingKey("homeworks"))?;
    if !map.contains_key("current_date") {
        return Err(BotError::MissingKey("current_date"));
    }
    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or(BotError::NotASequence)
}

/// Server-reported timestamp used to advance the poll cursor. `None` when the
/// field is absent or not an integer; the caller keeps the previous cursor.
pub fn current_date(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(Value::as_i64)
}

/// Renders the notification text for one homework record. The template is
/// fixed; downstream dedup compares rendered strings byte for byte.
pub fn parse_status(record: &Value) -> Result<String, BotError> {
    let homework_name = record
        .get("homework_name")
        .and_then(Value::as_str)
        .ok_or(BotError::MissingField("homework_name"))?;
    let status = record
        .get("status")
        .and_then(Value::as_str)
        .ok_or(BotError::MissingField("status"))?;
    let verdict = statuses::verdict(status)
        .ok_or_else(|| BotError::UnknownStatus(status.to_string()))?;
    Ok(format!(
        "Изменился статус проверки работы \"{homework_name}\". {verdict}"
    ))
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}
