use crate::archive::{Conversation, Message, Role};
use crate::normalize::normalize;
use eyre::{Result, eyre};

/// Collect the rendered text of every message on the active branch, oldest first.
///
/// Walks parent links from `current_node` up to the root. System messages and
/// messages without parts are skipped; nodes without a message are passed through.
pub fn walk(conversation: &Conversation) -> Result<Vec<String>> {
    let mapping = &conversation.mapping;
    let mut messages = Vec::new();
    let mut next = Some(conversation.current_node.as_str());
    let mut steps = 0usize;

    while let Some(id) = next {
        let node = mapping.get(id).ok_or_else(|| {
            eyre!(
                "Conversation {}: node {:?} is missing from the mapping",
                conversation.id,
                id
            )
        })?;

        steps += 1;
        if steps > mapping.len() {
            return Err(eyre!(
                "Conversation {}: parent chain loops back on itself",
                conversation.id
            ));
        }

        if let Some(text) = node.message.as_ref().and_then(message_text) {
            messages.push(text);
        }

        next = node.parent.as_deref();
    }

    messages.reverse();
    Ok(messages)
}

fn message_text(message: &Message) -> Option<String> {
    let parts = message.content.parts.as_deref().filter(|p| !p.is_empty())?;
    if message.author.role == Role::System || !message.content.is_text() {
        return None;
    }

    let is_model = message.author.role.is_model();
    let text: String = parts
        .iter()
        .filter_map(|part| part.text())
        .map(|raw| normalize(raw, is_model))
        .collect();

    (!text.is_empty()).then_some(text)
}
