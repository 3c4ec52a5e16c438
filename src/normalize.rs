use regex::Regex;
use std::sync::LazyLock;

/// Header line of the Obsidian callout that wraps human prompts.
pub const PROMPT_CALLOUT: &str = "> [!note] Prompt";

// Private-use code points the model emits around citations and entity references.
static CITATION_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{e200}.*?\u{e201}").expect("valid citation regex"));
static STRAY_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[\u{e203}\u{e204}\u{e206}]").expect("valid marker regex"));

/// Normalize one message part.
///
/// Model output loses its control markers; human text becomes a quoted callout.
/// The result is either empty or ends in exactly one `\n`.
pub fn normalize(text: &str, is_model_response: bool) -> String {
    let text = if is_model_response {
        let stripped = CITATION_SPAN.replace_all(text, "");
        STRAY_MARKERS.replace_all(&stripped, "").into_owned()
    } else {
        let quoted = text
            .split('\n')
            .map(|line| format!("> {line}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{PROMPT_CALLOUT}\n{quoted}")
    };

    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}
