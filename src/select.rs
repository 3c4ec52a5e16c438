use crate::archive::Conversation;
use crate::renderer::CHAT_URL_PREFIX;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use eyre::{Result, eyre};

/// Which conversations of the archive to convert.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    All,
    ById(String),
    UpdatedAfter(DateTime<Utc>),
}

/// Accept either a bare conversation id or its `https://chatgpt.com/c/<id>` URL.
pub fn conversation_id_from_input(id_or_url: &str) -> &str {
    id_or_url
        .strip_prefix(CHAT_URL_PREFIX)
        .unwrap_or(id_or_url)
}

/// Parse the `--after` argument.
///
/// RFC 3339 keeps its offset. Values without an offset are read as UTC; a bare
/// date means midnight.
pub fn parse_after(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());
    }

    Err(eyre!(
        "Could not parse date {:?}. Use YYYY-MM-DD, YYYY-MM-DD HH:MM[:SS] or RFC 3339.",
        input
    ))
}

/// Narrow the archive down to the conversations to convert, in archive order.
pub fn select(conversations: Vec<Conversation>, selection: &Selection) -> Result<Vec<Conversation>> {
    match selection {
        Selection::All => Ok(conversations),
        Selection::ById(id) => conversations
            .into_iter()
            .find(|c| &c.id == id)
            .map(|c| vec![c])
            .ok_or_else(|| eyre!("{}: conversation not found", id)),
        Selection::UpdatedAfter(after) => {
            let after_seconds = after.timestamp_millis() as f64 / 1000.0;
            Ok(conversations
                .into_iter()
                .filter(|c| c.update_time > after_seconds)
                .collect())
        }
    }
}
