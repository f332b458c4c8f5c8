use crate::entity::FeedError;
use crate::xrpl::models::MemoWrapper;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::debug;

const MEMO_SEPARATOR: &str = "\n";

/// Decode a raw `MemoData` field, hex first and base64 second.
///
/// A decoding only counts when it yields readable UTF-8 text; otherwise
/// `FeedError::DecodeAmbiguous` is returned.
pub fn decode_memo_data(raw: &str) -> Result<String, FeedError> {
    let raw = raw.trim();

    if looks_like_hex(raw) {
        if let Some(text) = hex::decode(raw).ok().and_then(readable_text) {
            return Ok(text);
        }
    }

    STANDARD
        .decode(raw)
        .ok()
        .and_then(readable_text)
        .ok_or(FeedError::DecodeAmbiguous)
}

/// Best-effort variant of [`decode_memo_data`]: undecodable memos become `None`.
pub fn decode(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    match decode_memo_data(raw) {
        Ok(text) => Some(text),
        Err(e) => {
            debug!("Dropping memo {:?}: {}", raw, e);
            None
        }
    }
}

/// Decoded text of all memos of a transaction joined with newlines, plus the
/// number of memo payloads that could not be decoded.
pub fn extract_memos(memos: &[MemoWrapper]) -> (Option<String>, usize) {
    let mut decoded = Vec::new();
    let mut omitted = 0;

    for wrapper in memos {
        let Some(data) = wrapper.memo.memo_data.as_deref() else {
            continue;
        };

        match decode(Some(data)) {
            Some(text) => decoded.push(text),
            None => omitted += 1,
        }
    }

    if decoded.is_empty() {
        (None, omitted)
    } else {
        (Some(decoded.join(MEMO_SEPARATOR)), omitted)
    }
}

fn looks_like_hex(raw: &str) -> bool {
    !raw.is_empty() && raw.len() % 2 == 0 && raw.bytes().all(|b| b.is_ascii_hexdigit())
}

// Trailing NUL padding is stripped; control characters other than whitespace reject the text.
fn readable_text(mut bytes: Vec<u8>) -> Option<String> {
    while bytes.last() == Some(&0) {
        bytes.pop();
    }

    let text = String::from_utf8(bytes).ok()?;
    if text.is_empty() {
        return None;
    }

    let readable = text
        .chars()
        .all(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'));

    readable.then_some(text)
}
