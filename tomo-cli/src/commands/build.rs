//! Build command implementation

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tomo_core::{
    book_title, chapter_range_label, AssemblerConfig, CancellationFlag, Chapter, ChapterWindow,
    EpubAssembler,
};

/// Arguments of `tomo build`
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// JSON file with a list of `{"title", "content"}` chapters
    pub chapters: PathBuf,

    /// Book title
    #[arg(short, long)]
    pub title: String,

    /// Directory the EPUB is written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Root directory for the temporary working directory
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Cover image URL (http, https, file:// or a local path)
    #[arg(long)]
    pub cover_url: Option<String>,

    /// Chapter range shown on the cover; derived from chapter titles when omitted
    #[arg(long)]
    pub range_label: Option<String>,

    /// First chapter to include (1-based)
    #[arg(long, value_parser = crate::parse_positive)]
    pub from: Option<usize>,

    /// Number of chapters to include
    #[arg(long, value_parser = crate::parse_positive)]
    pub amount: Option<usize>,

    /// Publication language (BCP 47 tag)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Keep the table of contents out of the reading order
    #[arg(long)]
    pub no_toc: bool,

    /// Title the book as `UPPER TITLE__<range label>`
    #[arg(long)]
    pub compose_title: bool,
}

impl BuildArgs {
    fn assembler_config(&self) -> Result<AssemblerConfig> {
        let mut config = match &self.config {
            Some(path) => AssemblerConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => AssemblerConfig::default(),
        };
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir);
        }
        if let Some(dir) = &self.scratch_dir {
            config = config.with_scratch_dir(dir);
        }
        if let Some(language) = &self.language {
            config = config.with_language(language);
        }
        if self.no_toc {
            config = config.with_toc(false);
        }
        Ok(config)
    }

    fn window(&self, available: usize) -> Result<Option<ChapterWindow>> {
        if self.from.is_none() && self.amount.is_none() {
            return Ok(None);
        }
        let from = self.from.unwrap_or(1);
        let amount = self.amount.unwrap_or_else(|| available.max(1));
        Ok(Some(ChapterWindow::new(from, amount)?))
    }
}

fn read_chapters(path: &Path) -> Result<Vec<Chapter>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to open chapters file: {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse chapters file: {}", path.display()))
}

/// Assemble an EPUB from a chapters file
pub async fn build(args: BuildArgs) -> Result<()> {
    let config = args.assembler_config()?;
    let chapters = read_chapters(&args.chapters)?;

    let selected = match args.window(chapters.len())? {
        Some(window) => {
            let range = window.range(chapters.len());
            tracing::debug!(
                "Selecting up to {} chapters from {}: got {}..{}",
                window.amount(),
                window.first(),
                range.start + 1,
                range.end
            );
            window.select(&chapters).to_vec()
        }
        None => chapters,
    };

    let range_label = args
        .range_label
        .clone()
        .or_else(|| chapter_range_label(&selected));
    let title = if args.compose_title {
        book_title(&args.title, range_label.as_deref())
    } else {
        args.title.clone()
    };
    let cover_url = args.cover_url.clone();

    tracing::info!("Building '{}' from {} chapters", title, selected.len());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Assembling '{}'...", title));

    let assembler = EpubAssembler::new(config);
    let cancel = CancellationFlag::new();
    let task_cancel = cancel.clone();
    let mut task = tokio::task::spawn_blocking(move || {
        assembler.generate_with_cancel(
            &title,
            &selected,
            range_label.as_deref(),
            cover_url.as_deref(),
            &task_cancel,
        )
    });

    let joined = tokio::select! {
        joined = &mut task => joined,
        _ = tokio::signal::ctrl_c() => {
            pb.set_message("Cancelling...");
            cancel.cancel();
            task.await
        }
    };

    let result = joined.context("Build task failed to complete")?;
    let path = match result {
        Ok(path) => path,
        Err(e) => {
            pb.abandon_with_message("Build failed");
            return Err(e).context("Failed to build EPUB");
        }
    };

    pb.finish_and_clear();
    println!("{}", path.display());
    Ok(())
}
