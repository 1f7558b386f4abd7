//! Best-effort extraction of the JSON object embedded in oracle text.

use serde_json::Value;

/// Parse the span from the first `{` to the last `}` of `text`.
///
/// Judges are asked for bare JSON but routinely wrap it in prose or markdown
/// fences. Returns `None` when there is no such span or it does not parse.
pub fn extract_payload(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("embedded payload does not parse: {e}");
            None
        }
    }
}
