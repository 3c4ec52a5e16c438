use chatgpt_md::archive::JsonFileLoader;
use chatgpt_md::renderer::RenderOptions;
use chatgpt_md::select::{self, Selection};
use chatgpt_md::storage::FsStorage;
use chatgpt_md::{process, utils};
use chrono::{DateTime, Utc};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use eyre::Result;
use std::io;
use std::path::PathBuf;

/// Convert ChatGPT conversations.json to Markdown files.
///
/// If CHAT_ID is provided, only that conversation is converted.
/// The full conversation URL works too.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The conversations.json file from a ChatGPT data export.
    #[arg(value_name = "JSON_FILE")]
    archive: PathBuf,

    /// Conversation id or https://chatgpt.com/c/<id> URL.
    #[arg(value_name = "CHAT_ID", conflicts_with = "after")]
    chat: Option<String>,

    /// Write Markdown files in this directory instead of printing to stdout.
    #[arg(long, value_name = "OUT_DIR")]
    out: Option<PathBuf>,

    /// Only convert conversations updated after this time (e.g. 2024-06-01).
    #[arg(long, value_name = "DATE", value_parser = parse_after_arg)]
    after: Option<DateTime<Utc>>,

    /// Don't emit frontmatter (with "created" property).
    #[arg(long)]
    no_frontmatter: bool,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/chatgpt-md/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print each file written.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress progress and summary output.
    #[arg(short, long)]
    quiet: bool,
}

fn parse_after_arg(input: &str) -> Result<DateTime<Utc>, String> {
    select::parse_after(input).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::init_tracing(cli.verbose)?;

    // 1. Load config file (CLI path > default path)
    let file_cfg = utils::load_file_config(cli.config.as_deref())?;

    // 2. Resolve out_dir (CLI > Config > stdout)
    let out_dir = cli.out.or(file_cfg.out_dir);

    if cli.chat.is_none() && out_dir.is_none() {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "must provide either CHAT_ID or --out",
            )
            .exit();
    }

    // 3. Resolve frontmatter (CLI flag > Config > on)
    let frontmatter = !cli.no_frontmatter && file_cfg.frontmatter.unwrap_or(true);

    let selection = match (cli.chat.as_deref(), cli.after) {
        (Some(id_or_url), _) => {
            Selection::ById(select::conversation_id_from_input(id_or_url).to_string())
        }
        (None, Some(after)) => Selection::UpdatedAfter(after),
        (None, None) => Selection::All,
    };

    // 4. Build the Export Config
    let config = utils::ExportConfig {
        archive_path: cli.archive,
        selection,
        out_dir,
        render: RenderOptions { frontmatter },
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    // 5. Run the Business Logic
    let loader = JsonFileLoader::new(config.archive_path.clone());
    let mut stdout = io::stdout().lock();
    process::run(&config, &loader, &FsStorage, &mut stdout)?;
    Ok(())
}
