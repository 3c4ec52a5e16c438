//! Type definitions for the ChatGPT data export (`conversations.json`).
//!
//! The export is a single JSON array. Each entry is one conversation whose messages
//! form a tree: every node points at its parent, and `current_node` names the leaf of
//! the branch that was active when the export was taken.
//!
//! ```json
//! [{
//!   "id": "6650c5f1-...",
//!   "title": "Note: Something.",
//!   "create_time": 1700000000.123,
//!   "update_time": 1700000500.0,
//!   "current_node": "c3",
//!   "mapping": {
//!     "root": { "parent": null, "message": null },
//!     "c1":   { "parent": "root", "message": { "author": { "role": "user" }, ... } }
//!   }
//! }]
//! ```
//!
//! Only the fields the renderer needs are modelled; everything else is ignored.
use std::{collections::HashMap, fs, path::PathBuf};

use eyre::{Context, Result};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Seconds since the Unix epoch, fractional.
    pub create_time: f64,
    /// Seconds since the Unix epoch, fractional.
    pub update_time: f64,
    pub current_node: String,
    #[serde(default)]
    pub mapping: HashMap<String, Node>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub message: Option<Message>,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub author: Author,
    pub content: Content,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub role: Role,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
    #[serde(other)]
    Other,
}

impl Role {
    /// Text written by the model (or by a tool on its behalf) rather than by the human.
    pub fn is_model(self) -> bool {
        matches!(self, Role::Assistant | Role::Tool)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    pub content_type: String,
    /// Absent for content types such as `code` or `execution_output`.
    #[serde(default)]
    pub parts: Option<Vec<Part>>,
}

impl Content {
    pub fn is_text(&self) -> bool {
        matches!(self.content_type.as_str(), "text" | "multimodal_text")
    }
}

/// One entry of `content.parts`.
///
/// Plain text arrives as a bare string. Multimodal messages mix in objects
/// (image pointers, audio assets, transcriptions) discriminated by `content_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text(String),
    Object(PartObject),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartObject {
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub text: Option<serde_json::Value>,
}

impl Part {
    /// The text this part contributes, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Part::Text(s) if !s.is_empty() => Some(s.as_str()),
            Part::Object(obj) if obj.content_type.as_deref() == Some("audio_transcription") => {
                obj.text.as_ref().and_then(|t| t.as_str()).filter(|t| !t.is_empty())
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Source of conversation records.
pub trait ArchiveLoader {
    fn load(&self) -> Result<Vec<Conversation>>;
}

/// Reads `conversations.json` from disk.
pub struct JsonFileLoader {
    pub path: PathBuf,
}

impl JsonFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArchiveLoader for JsonFileLoader {
    fn load(&self) -> Result<Vec<Conversation>> {
        let bytes = fs::read(&self.path)
            .wrap_err_with(|| format!("Failed to read archive: {}", self.path.display()))?;
        serde_json::from_slice(&bytes)
            .wrap_err_with(|| format!("Failed to parse archive: {}", self.path.display()))
    }
}

#[cfg(test)]
impl ArchiveLoader for Vec<Conversation> {
    fn load(&self) -> Result<Vec<Conversation>> {
        Ok(self.clone())
    }
}
