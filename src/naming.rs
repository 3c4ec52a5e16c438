use crate::storage::Storage;
use eyre::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const UNTITLED: &str = "Untitled";

static LABEL_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\S): ").expect("valid label regex"));

/// Derive a readable, filesystem-safe file stem from a conversation title.
///
/// `"Note: Something."` becomes `"Note - Something"`. Path separators are swapped
/// for the look-alike U+29F8 / U+29F9 so titles keep their shape.
pub fn file_stem(title: Option<&str>) -> String {
    let title = match title {
        Some(t) if !t.is_empty() => t,
        _ => return UNTITLED.to_string(),
    };

    let title = title.strip_suffix('.').unwrap_or(title);
    LABEL_COLON
        .replace(title, "$1 - ")
        .replace(':', "-")
        .replace('/', "\u{29f8}")
        .replace('\\', "\u{29f9}")
}

/// First free `<stem>.md`, `<stem> (2).md`, `<stem> (3).md`, ... inside `dir`.
///
/// The existence check and the later write are separate steps, so two processes
/// writing into the same directory can still collide.
pub fn allocate_path<S: Storage + ?Sized>(storage: &S, dir: &Path, stem: &str) -> Result<PathBuf> {
    let mut path = dir.join(format!("{stem}.md"));
    let mut n = 1u32;
    while storage.exists(&path)? {
        n += 1;
        path = dir.join(format!("{stem} ({n}).md"));
    }
    Ok(path)
}
