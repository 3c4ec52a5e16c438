//! # chatgpt-md
//!
//! A CLI tool that converts a ChatGPT data export (`conversations.json`) into Markdown
//! files, one per conversation, ready to drop into an Obsidian vault or any other
//! notes archive.
//!
//! ## What it does
//!
//! Each conversation in the export is a tree of messages: regenerating a reply or
//! editing a prompt creates a sibling branch. This tool follows the branch that was
//! active when the export was taken (from `current_node` back to the root) and
//! writes it out as a linear transcript. Prompts are rendered as `[!note]` callouts
//! so they stand apart from the answers; citation markers the model leaves in its
//! replies are stripped.
//!
//! Files are named after the conversation title and get their modification time set
//! to the conversation's last update, so sorting by date in a file browser matches
//! ChatGPT's sidebar. The export file is only ever read.
//!
//! ## Usage
//!
//! ```sh
//! # Convert everything into a directory
//! chatgpt-md conversations.json --out ~/notes/chatgpt
//!
//! # Only conversations touched since the last import
//! chatgpt-md conversations.json --out ~/notes/chatgpt --after 2024-06-01
//!
//! # Print a single conversation (id or full URL) to stdout
//! chatgpt-md conversations.json https://chatgpt.com/c/6650c5f1-...
//! ```
//!
//! Preferences can be persisted in `~/.config/chatgpt-md/config.toml`.
//!
//! To get the JSON file, export your data:
//! <https://help.openai.com/en/articles/7260999-how-do-i-export-my-chatgpt-history-and-data>
pub mod archive;
pub mod naming;
pub mod normalize;
pub mod process;
pub mod renderer;
pub mod select;
pub mod storage;
pub mod utils;
pub mod walker;
