use crate::archive::{ArchiveLoader, Conversation};
use crate::naming;
use crate::renderer;
use crate::select;
use crate::storage::Storage;
use crate::utils::{ExportConfig, ProcessResult};
use eyre::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub printed: usize,
    pub created: usize,
    pub timestamp_failures: usize,
}

/// Entry point for the conversion: load, select, then render each conversation in order.
///
/// The first fatal error stops the run; files already written stay in place.
pub fn run<L, S, W>(
    config: &ExportConfig,
    loader: &L,
    storage: &S,
    stdout: &mut W,
) -> Result<Summary>
where
    L: ArchiveLoader + ?Sized,
    S: Storage + ?Sized,
    W: Write + ?Sized,
{
    let archive = loader.load()?;
    info!(count = archive.len(), "Loaded archive");

    let selected = select::select(archive, &config.selection)?;
    info!(count = selected.len(), "Selected conversations");

    if let Some(out_dir) = &config.out_dir {
        fs::create_dir_all(out_dir).wrap_err_with(|| {
            format!("Failed to create output directory: {}", out_dir.display())
        })?;
    }

    let pb = progress_bar(config, selected.len() as u64)?;
    let mut summary = Summary::default();

    for conversation in &selected {
        let result = match &config.out_dir {
            None => print_conversation(conversation, config, stdout)?,
            Some(out_dir) => {
                write_conversation(conversation, config, out_dir, storage, &pb, &mut summary)?
            }
        };
        match result {
            ProcessResult::Printed => summary.printed += 1,
            ProcessResult::Created => summary.created += 1,
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    if config.out_dir.is_some() && !config.quiet {
        let mut line = format!("Done. {} written.", summary.created);
        if summary.timestamp_failures > 0 {
            line.push_str(&format!(
                " {} file time(s) could not be set.",
                summary.timestamp_failures
            ));
        }
        eprintln!("{}", line);
    }

    Ok(summary)
}

fn progress_bar(config: &ExportConfig, total: u64) -> Result<ProgressBar> {
    if config.quiet || config.out_dir.is_none() {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)",
        )
        .wrap_err("Invalid progress bar template")?
        .progress_chars("=>-"),
    );
    Ok(bar)
}

fn print_conversation<W: Write + ?Sized>(
    conversation: &Conversation,
    config: &ExportConfig,
    stdout: &mut W,
) -> Result<ProcessResult> {
    let content = renderer::render(conversation, &config.render)?;
    writeln!(stdout, "{}", content).wrap_err("Failed to write to stdout")?;
    Ok(ProcessResult::Printed)
}

fn write_conversation<S: Storage + ?Sized>(
    conversation: &Conversation,
    config: &ExportConfig,
    out_dir: &Path,
    storage: &S,
    pb: &ProgressBar,
    summary: &mut Summary,
) -> Result<ProcessResult> {
    let content = renderer::render(conversation, &config.render)?;
    let stem = naming::file_stem(conversation.title.as_deref());
    let path = naming::allocate_path(storage, out_dir, &stem)?;

    storage.write(&path, &content)?;
    debug!(id = %conversation.id, path = %path.display(), "Wrote conversation");

    // The document is already on disk; a stale mtime only costs sort order.
    if let Err(e) = storage.set_modified_time(&path, conversation.update_time) {
        summary.timestamp_failures += 1;
        warn!(path = %path.display(), "Could not set file time: {:#}", e);
    }

    if config.verbose {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let line = format!("Created:  {}", name);
        // A hidden bar (quiet, or stderr not a terminal) swallows println.
        if pb.is_hidden() {
            eprintln!("{}", line);
        } else {
            pb.println(line);
        }
    }

    Ok(ProcessResult::Created)
}
