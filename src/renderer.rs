use crate::archive::Conversation;
use crate::walker;
use chrono::{DateTime, Utc};
use eyre::{Result, eyre};

/// Every conversation is reachable under this prefix followed by its id.
pub const CHAT_URL_PREFIX: &str = "https://chatgpt.com/c/";

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Emit a `---` block with the `created` date ahead of the link.
    pub frontmatter: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { frontmatter: true }
    }
}

/// Render one conversation as a Markdown document.
///
/// Layout: optional frontmatter, the conversation URL, a blank line, then the
/// transcript with each message separated by a newline.
pub fn render(conversation: &Conversation, options: &RenderOptions) -> Result<String> {
    let mut doc = String::new();

    if options.frontmatter {
        let created = epoch_seconds_to_utc(conversation.create_time).ok_or_else(|| {
            eyre!(
                "Conversation {}: create_time {} is not a valid timestamp",
                conversation.id,
                conversation.create_time
            )
        })?;
        doc.push_str("---\n");
        doc.push_str(&format!("created: {}\n", created.format("%Y-%m-%d")));
        doc.push_str("---\n");
    }

    doc.push_str(CHAT_URL_PREFIX);
    doc.push_str(&conversation.id);
    doc.push_str("\n\n");

    let messages = walker::walk(conversation)?;
    doc.push_str(messages.join("\n").trim_end());

    Ok(doc)
}

/// Fractional epoch seconds to a UTC instant, truncated to the millisecond.
pub fn epoch_seconds_to_utc(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).trunc();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}
