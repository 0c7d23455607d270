//! CLI binary for edgequake-papersum.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `SummarizerConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_papersum::{
    inspect, process, DocumentSource, Engine, Level, ProgressCallback, ProviderConfig, Stage,
    SummarizerConfig, SummaryProgressCallback, SummaryRequest, Table,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a single spinner whose message follows the
/// pipeline stage, with log lines for fallback chunks and retries.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Self::with_bar(bar)
    }

    fn with_bar(bar: ProgressBar) -> Arc<Self> {
        Arc::new(Self { bar })
    }

    /// Extract-only runs never reach a model, so they report what was read.
    fn finish_extraction(&self, text_len: usize, table_count: usize) {
        self.bar.finish_and_clear();
        eprintln!("{} {}", green("✔"), extraction_message(text_len, table_count));
    }

    /// Clear the spinner so the error report starts on a clean line.
    fn fail(&self) {
        self.bar.finish_and_clear();
    }
}

fn extraction_message(text_len: usize, table_count: usize) -> String {
    format!(
        "Extraction complete  {}",
        dim(&format!("{text_len} chars, {table_count} tables"))
    )
}

impl SummaryProgressCallback for CliProgressCallback {
    fn on_stage(&self, stage: Stage) {
        let (prefix, msg) = match stage {
            Stage::Resolving => ("Fetching", "Opening PDF…"),
            Stage::Extracting => ("Extracting", "Reading text and tables…"),
            Stage::Summarizing => ("Summarising", "Waiting for the model…"),
        };
        self.bar.set_prefix(prefix);
        self.bar.set_message(msg);
    }

    fn on_chunk_complete(&self, index: usize, total: usize) {
        self.bar.set_message(format!("chunk {index}/{total}"));
        if index == 1 {
            self.bar.println(format!(
                "  {} Input too large; summarising {total} chunks",
                cyan("⚠")
            ));
        }
    }

    fn on_retry(&self, attempt: u32, max_attempts: u32, delay: Duration) {
        self.bar.println(format!(
            "  {} Rate limited (attempt {attempt}/{max_attempts}); retrying in {}s",
            cyan("⚠"),
            delay.as_secs()
        ));
    }

    fn on_complete(&self, summary_len: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} Summary ready  {}",
            green("✔"),
            dim(&format!("{summary_len} chars"))
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # One-sentence TL;DR with Groq (default)
  papersum paper.pdf

  # Medium summary of an arXiv paper with OpenAI
  papersum --level medium --engine openai https://arxiv.org/pdf/1706.03762

  # Extract text and tables only (no API key needed)
  papersum --extract-only paper.pdf

  # JSON output
  papersum --json --level long paper.pdf > summary.json

ENGINES:
  groq     llama-3.3-70b-versatile   chunked fallback when the input is too large
  openai   gpt-3.5-turbo             retries with backoff when rate limited

ENVIRONMENT VARIABLES:
  GROQ_API_KEY       Groq API key
  OPENAI_API_KEY     OpenAI API key
  PDFIUM_LIB_PATH    Path to libpdfium
  RUST_LOG           Log filter (overrides --verbose / --quiet)
"#;

/// Summarise academic PDFs with Groq or OpenAI.
#[derive(Parser, Debug)]
#[command(
    name = "papersum",
    version,
    about = "Summarise academic PDFs and extract their tables",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Summary length: short, medium, long.
    #[arg(short, long, env = "PAPERSUM_LEVEL", value_enum, default_value = "short")]
    level: LevelArg,

    /// Backend: groq, openai.
    #[arg(short, long, env = "PAPERSUM_ENGINE", value_enum, default_value = "groq")]
    engine: EngineArg,

    /// Groq API key.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    groq_api_key: Option<String>,

    /// OpenAI API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Groq model ID.
    #[arg(long, env = "PAPERSUM_GROQ_MODEL")]
    groq_model: Option<String>,

    /// OpenAI model ID.
    #[arg(long, env = "PAPERSUM_OPENAI_MODEL")]
    openai_model: Option<String>,

    /// Groq API base URL.
    #[arg(long, env = "PAPERSUM_GROQ_BASE_URL")]
    groq_base_url: Option<String>,

    /// OpenAI API base URL.
    #[arg(long, env = "PAPERSUM_OPENAI_BASE_URL")]
    openai_base_url: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PAPERSUM_TEMPERATURE", default_value_t = 0.3)]
    temperature: f32,

    /// Max output tokens per completion.
    #[arg(long, env = "PAPERSUM_MAX_TOKENS", default_value_t = 140)]
    max_tokens: u32,

    /// Output the result as JSON.
    #[arg(long, env = "PAPERSUM_JSON")]
    json: bool,

    /// Print extracted text and tables only, no summary.
    #[arg(long)]
    extract_only: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "PAPERSUM_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PAPERSUM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PAPERSUM_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PAPERSUM_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Per-completion API timeout in seconds.
    #[arg(long, env = "PAPERSUM_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LevelArg {
    Short,
    Medium,
    Long,
}

impl From<LevelArg> for Level {
    fn from(v: LevelArg) -> Self {
        match v {
            LevelArg::Short => Level::Short,
            LevelArg::Medium => Level::Medium,
            LevelArg::Long => Level::Long,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum EngineArg {
    Groq,
    #[value(name = "openai")]
    OpenAi,
}

impl From<EngineArg> for Engine {
    fn from(v: EngineArg) -> Self {
        match v {
            EngineArg::Groq => Engine::Groq,
            EngineArg::OpenAi => Engine::OpenAi,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner provides the feedback that matters; keep INFO logs out of
    // its way unless --verbose is given.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let spinner = show_progress.then(CliProgressCallback::new);
    let progress_cb: Option<ProgressCallback> = spinner
        .clone()
        .map(|cb| cb as Arc<dyn SummaryProgressCallback>);
    let abandon_spinner = || {
        if let Some(cb) = &spinner {
            cb.fail();
        }
    };

    let config = build_config(&cli, progress_cb).inspect_err(|_| abandon_spinner())?;
    let source = DocumentSource::from_input(&cli.input);

    // ── Extract-only mode ────────────────────────────────────────────────
    if cli.extract_only {
        let content = inspect(source, &config)
            .await
            .inspect_err(|_| abandon_spinner())
            .context("Failed to extract PDF")?;
        if let Some(cb) = &spinner {
            cb.finish_extraction(content.text.len(), content.tables.len());
        }

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&content).context("Failed to serialise content")?
            );
        } else {
            println!("{}", content.text);
            print_tables(&content.tables);
        }
        return Ok(());
    }

    // ── Summarise ────────────────────────────────────────────────────────
    let request = SummaryRequest::new(source)
        .with_level(cli.level.into())
        .with_engine(cli.engine.into());

    let result = process(request, &config)
        .await
        .inspect_err(|_| abandon_spinner())
        .context("Summarisation failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialise result")?
        );
    } else {
        println!("{}", result.summary);
        print_tables(&result.tables);
    }

    Ok(())
}

/// Print tables as pipe-separated rows, empty cells left blank.
fn print_tables(tables: &[Table]) {
    for (idx, table) in tables.iter().enumerate() {
        println!();
        println!(
            "{}",
            bold(&format!(
                "Table {} ({}×{})",
                idx + 1,
                table.row_count(),
                table.column_count()
            ))
        );
        for row in &table.rows {
            let cells: Vec<&str> = row.iter().map(|c| c.as_deref().unwrap_or("")).collect();
            println!("| {} |", cells.join(" | "));
        }
    }
}

/// Map CLI args to `SummarizerConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SummarizerConfig> {
    let mut builder = SummarizerConfig::builder()
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .download_timeout_secs(cli.download_timeout)
        .api_timeout_secs(cli.api_timeout);

    if let Some(key) = &cli.groq_api_key {
        builder = builder.groq(provider(
            ProviderConfig::groq(key.as_str()),
            &cli.groq_model,
            &cli.groq_base_url,
        ));
    }
    if let Some(key) = &cli.openai_api_key {
        builder = builder.openai(provider(
            ProviderConfig::openai(key.as_str()),
            &cli.openai_model,
            &cli.openai_base_url,
        ));
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn provider(
    mut config: ProviderConfig,
    model: &Option<String>,
    base_url: &Option<String>,
) -> ProviderConfig {
    if let Some(m) = model {
        config = config.with_model(m.as_str());
    }
    if let Some(url) = base_url {
        config = config.with_base_url(url.as_str());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_clears_spinner() {
        let cb = CliProgressCallback::with_bar(ProgressBar::hidden());
        cb.on_stage(Stage::Extracting);
        assert!(!cb.bar.is_finished());
        cb.fail();
        assert!(cb.bar.is_finished());
    }

    #[test]
    fn extraction_finish_does_not_claim_a_summary() {
        let cb = CliProgressCallback::with_bar(ProgressBar::hidden());
        cb.finish_extraction(1_234, 2);
        assert!(cb.bar.is_finished());

        let msg = extraction_message(1_234, 2);
        assert!(msg.starts_with("Extraction complete"));
        assert!(msg.contains("1234 chars, 2 tables"));
        assert!(!msg.contains("Summary"));
    }
}
