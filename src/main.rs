//! Adfless - convert between ADF, Markdown and terminal read views.
//!
//! # Usage
//!
//! ```bash
//! adfless to-markdown page.json
//! adfless to-adf notes.md
//! adfless view page.json --find release
//! adfless cache put 12345 page.json
//! ```

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use adfless::adf::Document;
use adfless::cache::ArtifactCache;
use adfless::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};
use adfless::convert::Converter;
use adfless::ids::UuidIds;
use adfless::perf;
use adfless::ui::{self, style::Theme, terminal};

/// Convert between Atlassian documents, Markdown and terminal read views
#[derive(Parser, Debug)]
#[command(name = "adfless", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Color theme for styled output (light or dark)
    #[arg(long, value_enum, global = true)]
    theme: Option<ThemeMode>,

    /// Log conversion timings
    #[arg(long, global = true)]
    perf: bool,

    /// Directory for cached pages
    #[arg(long, value_name = "DIR", global = true)]
    cache_dir: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults
    #[arg(long, global = true)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the Markdown for an ADF JSON document
    ToMarkdown {
        #[arg(value_name = "FILE.json")]
        file: PathBuf,
    },
    /// Print ADF JSON for a Markdown file
    ToAdf {
        #[arg(value_name = "FILE.md")]
        file: PathBuf,
    },
    /// Print the read view of an ADF JSON or Markdown file
    View {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print plain text without styling
        #[arg(long)]
        no_color: bool,

        /// Print only the lines containing QUERY, with their line numbers
        #[arg(long, value_name = "QUERY")]
        find: Option<String>,
    },
    /// Store or show cached pages
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Cache an ADF document and its Markdown under a page id
    Put {
        #[arg(value_name = "PAGE_ID")]
        page_id: String,
        #[arg(value_name = "FILE.json")]
        file: PathBuf,
    },
    /// Print a cached page as Markdown
    Show {
        #[arg(value_name = "PAGE_ID")]
        page_id: String,
    },
}

fn read_source(path: &Path) -> Result<String> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_document(path: &Path) -> Result<Document> {
    let json = read_source(path)?;
    Document::from_json(&json)
        .with_context(|| format!("{} is not an ADF document", path.display()))
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn view(
    converter: &Converter,
    file: &Path,
    find: Option<&str>,
    color: bool,
    theme: &Theme,
) -> Result<()> {
    let doc = if is_json_path(file) {
        read_document(file)?
    } else {
        converter.from_markdown(&read_source(file)?, &mut UuidIds)
    };
    let lines = converter.display_lines(&doc);
    let styled = match find {
        Some(query) => ui::match_listing(&lines, query, theme),
        None => ui::document_lines(&lines, theme),
    };

    let mut out = std::io::stdout().lock();
    if color {
        terminal::write_styled(&mut out, &styled)
    } else {
        terminal::write_plain(&mut out, &styled)
    }
    .context("Failed to write to stdout")
}

fn run(command: Command, converter: &Converter, effective: &ConfigFlags) -> Result<()> {
    match command {
        Command::ToMarkdown { file } => {
            let doc = read_document(&file)?;
            print!("{}", converter.to_markdown(&doc));
        }
        Command::ToAdf { file } => {
            let doc = converter.from_markdown(&read_source(&file)?, &mut UuidIds);
            let json = doc.to_json_pretty().context("Failed to encode ADF document")?;
            println!("{json}");
        }
        Command::View { file, find, .. } => {
            let color = !effective.no_color && std::io::stdout().is_terminal();
            let theme = Theme::for_mode(effective.theme);
            view(converter, &file, find.as_deref(), color, &theme)?;
        }
        Command::Cache { action } => {
            let cache = ArtifactCache::new(
                effective
                    .cache_dir
                    .clone()
                    .unwrap_or_else(ArtifactCache::default_dir),
            );
            match action {
                CacheAction::Put { page_id, file } => {
                    let doc = read_document(&file)?;
                    let markdown = converter.to_markdown(&doc);
                    cache.store(&page_id, &doc, &markdown)?;
                    println!("cached {page_id} in {}", cache.dir().display());
                }
                CacheAction::Show { page_id } => match cache.load_document(&page_id) {
                    Some(doc) => print!("{}", converter.to_markdown(&doc)),
                    None => println!("nothing cached for {page_id}"),
                },
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        no_color: matches!(
            cli.command,
            Some(Command::View { no_color: true, .. })
        ),
        perf: cli.perf,
        theme: cli.theme,
        cache_dir: cli.cache_dir.clone(),
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    // Initialize logging
    let mut filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    if effective.perf {
        filter = filter.add_directive("adfless::perf=info".parse()?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    perf::set_enabled(effective.perf);

    let Some(command) = cli.command else {
        if cli.save || cli.clear {
            return Ok(());
        }
        anyhow::bail!("No command given; see `adfless --help`");
    };

    let converter = Converter::new();
    run(command, &converter, &effective)
}
