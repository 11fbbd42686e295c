//! CLI binary for edgequake-rewrite.
//!
//! A thin shim over the library crate: flags map to `TransformConfig` and a
//! `TransformRequest`, results are printed. `--interactive` opens a REPL that
//! owns one `Session` for its whole lifetime.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_rewrite::{
    extract_file, transform, write_outputs, ProgressCallback, RewriteStyle, Session,
    SessionState, SummaryLength, TextStats, TransformConfig, TransformProgressCallback,
    TransformRequest, TransformationRun,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner shown while the model is working.
///
/// A fresh bar is created for every transform action so the same callback
/// can serve every `run` in an interactive session.
struct CliProgressCallback {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(None),
        })
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(ref bar) = *guard {
                f(bar);
            }
        }
    }
}

impl TransformProgressCallback for CliProgressCallback {
    fn on_transform_start(&self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {pos}/{len}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Transforming");
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_output_start(&self, _index: usize, _total: usize, label: &str) {
        let label = label.to_string();
        self.with_bar(|bar| bar.set_message(label));
    }

    fn on_output_complete(&self, index: usize, total: usize, text_len: usize) {
        self.with_bar(|bar| {
            bar.println(format!(
                "  {} Output {}/{}  {}",
                green("✓"),
                index,
                total,
                dim(&format!("{text_len} chars"))
            ));
            bar.inc(1);
        });
    }

    fn on_output_error(&self, index: usize, total: usize, error: &str) {
        let first_line = error.lines().next().unwrap_or(error).to_string();
        self.with_bar(|bar| {
            bar.println(format!(
                "  {} Output {}/{}  {}",
                red("✗"),
                index,
                total,
                red(&first_line)
            ));
        });
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }

    fn on_transform_complete(&self, _total: usize) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Rewrite text formally (default style)
  rewrite "hey, can u send me the report by friday?"

  # Several styles at once, plus a custom instruction
  rewrite --style formal --style poetic --custom "Explain it to a 10 year old" "..."

  # Summarise a document
  rewrite --file report.pdf --summarize --length short

  # Pipe text in and export each output as output_<style>.txt
  cat notes.txt | rewrite --style casual -o out/

  # Interactive session with undo history
  rewrite --interactive

  # Use another edgequake-llm provider (--model is required)
  rewrite --provider openai --model gpt-4.1-nano "..."

STYLES:
  formal, casual, professional, poetic, simplified

CREDENTIALS:
  GOOGLE_API_KEY is read from the first of
    ./.edgequake/secrets.toml
    <config dir>/edgequake-rewrite/secrets.toml
  (a top-level `GOOGLE_API_KEY = "..."` entry) and then from the environment.
  Named providers read their own key (OPENAI_API_KEY, ANTHROPIC_API_KEY, ...).
"#;

/// Rewrite or summarise text with a hosted generative model.
#[derive(Parser, Debug)]
#[command(
    name = "rewrite",
    version,
    about = "Rewrite or summarise text with a hosted generative model",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Text to transform. Read from stdin when omitted (and no --file).
    text: Option<String>,

    /// Read the input from a PDF or DOCX document.
    #[arg(short, long, env = "REWRITE_FILE")]
    file: Option<PathBuf>,

    /// Declared MIME type of --file. Inferred from the extension if omitted.
    #[arg(long, env = "REWRITE_MIME")]
    mime: Option<String>,

    /// Summarise instead of rewriting.
    #[arg(long, env = "REWRITE_SUMMARIZE")]
    summarize: bool,

    /// Summary length: short, medium, long.
    #[arg(long, env = "REWRITE_LENGTH", default_value = "short")]
    length: String,

    /// Rewrite style (repeatable): formal, casual, professional, poetic, simplified.
    #[arg(short, long = "style", env = "REWRITE_STYLES", value_delimiter = ',')]
    styles: Vec<String>,

    /// Free-text rewrite instruction, produced before any styles.
    #[arg(long, env = "REWRITE_CUSTOM")]
    custom: Option<String>,

    /// Export every output as <DIR>/output_<style>.txt.
    #[arg(short, long, env = "REWRITE_OUTPUT_DIR")]
    output: Option<PathBuf>,

    /// Print the run as JSON instead of text.
    #[arg(long, env = "REWRITE_JSON")]
    json: bool,

    /// Start an interactive session.
    #[arg(short, long)]
    interactive: bool,

    /// Model ID. Default: gemini-2.0-flash; required with --provider.
    #[arg(long, env = "REWRITE_MODEL")]
    model: Option<String>,

    /// edgequake-llm provider (openai, anthropic, gemini, ollama, ...).
    /// When unset Gemini is used with GOOGLE_API_KEY.
    #[arg(long, env = "REWRITE_PROVIDER")]
    provider: Option<String>,

    /// Secrets file holding GOOGLE_API_KEY.
    #[arg(long, env = "REWRITE_SECRETS")]
    secrets: Option<PathBuf>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "REWRITE_TEMPERATURE")]
    temperature: Option<f32>,

    /// Maximum output tokens per model call.
    #[arg(long, env = "REWRITE_MAX_OUTPUT_TOKENS")]
    max_output_tokens: Option<u32>,

    /// Disable the spinner.
    #[arg(long, env = "REWRITE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "REWRITE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and results.
    #[arg(short, long, env = "REWRITE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else if cli.interactive || show_progress {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn TransformProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    if cli.interactive {
        return run_interactive(&cli, &config).await;
    }

    // ── One-shot mode ────────────────────────────────────────────────────
    let request = build_request(&cli)?;
    let input = read_input(&cli).await?;

    let mut session = Session::new();
    let run = transform(&mut session, &input, &request, &config)
        .await
        .context("Transformation failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(run).context("Failed to serialise run")?
        );
    } else {
        print_run(run).context("Failed to write to stdout")?;
    }

    if let Some(ref dir) = cli.output {
        let paths = write_outputs(dir, &run.outputs)
            .await
            .context("Failed to export outputs")?;
        if !cli.quiet {
            for path in paths {
                eprintln!("{} {}", green("✔"), bold(&path.display().to_string()));
            }
        }
    }

    Ok(())
}

/// Map CLI args to `TransformConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<TransformConfig> {
    let mut builder = TransformConfig::builder();
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref path) = cli.secrets {
        builder = builder.secrets_path(path.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(t) = cli.temperature {
        builder = builder.temperature(t);
    }
    if let Some(n) = cli.max_output_tokens {
        builder = builder.max_output_tokens(n);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}

/// Map mode flags to a `TransformRequest`.
fn build_request(cli: &Cli) -> Result<TransformRequest> {
    if cli.summarize {
        return TransformRequest::summarize_str(&cli.length).context("Invalid --length");
    }

    let mut styles = parse_styles(&cli.styles)?;
    if styles.is_empty() && cli.custom.is_none() {
        styles.push(RewriteStyle::Formal);
    }
    let request = TransformRequest::Rewrite {
        styles,
        custom: cli.custom.clone(),
    };
    request.validate().context("Invalid request")?;
    Ok(request)
}

fn parse_styles<S: AsRef<str>>(raw: &[S]) -> Result<Vec<RewriteStyle>> {
    let mut styles = Vec::new();
    for s in raw.iter().map(AsRef::as_ref).filter(|s| !s.trim().is_empty()) {
        let style = RewriteStyle::from_str(s)?;
        if !styles.contains(&style) {
            styles.push(style);
        }
    }
    Ok(styles)
}

/// Input precedence: `--file`, then the positional text, then stdin.
async fn read_input(cli: &Cli) -> Result<String> {
    if let Some(ref path) = cli.file {
        let text = extract_file(path, cli.mime.as_deref())
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?;
        if !cli.quiet {
            print_stats(&text);
        }
        return Ok(text);
    }
    if let Some(ref text) = cli.text {
        return Ok(text.clone());
    }
    if io::stdin().is_terminal() {
        anyhow::bail!("No input: pass TEXT, --file, or pipe text on stdin (see --help)");
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

fn print_run(run: &TransformationRun) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for (i, output) in run.outputs.iter().enumerate() {
        if i > 0 {
            writeln!(handle)?;
        }
        writeln!(handle, "## {}", output.style)?;
        writeln!(handle)?;
        writeln!(handle, "{}", output.text)?;
    }
    Ok(())
}

fn print_stats(text: &str) {
    let stats = TextStats::of(text);
    eprintln!(
        "{} Loaded {} words, {} characters",
        cyan("◆"),
        bold(&stats.words.to_string()),
        stats.characters
    );
}

// ── Interactive session ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Rewrite,
    Summarize,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Input(String),
    Load { path: PathBuf, mime: Option<String> },
    Mode(Mode),
    Styles(Vec<RewriteStyle>),
    Custom(Option<String>),
    Length(SummaryLength),
    Run,
    Undo,
    Clear,
    Show,
    History,
    Save(PathBuf),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };

        let cmd = match word.to_lowercase().as_str() {
            "input" => {
                if rest.is_empty() {
                    anyhow::bail!("usage: input <text>");
                }
                Command::Input(rest.to_string())
            }
            "load" => {
                let mut parts = rest.split_whitespace();
                let path = parts
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("usage: load <path> [mime]"))?;
                Command::Load {
                    path: PathBuf::from(path),
                    mime: parts.next().map(str::to_string),
                }
            }
            "mode" => match rest.to_lowercase().as_str() {
                "rewrite" => Command::Mode(Mode::Rewrite),
                "summarize" | "summarise" => Command::Mode(Mode::Summarize),
                _ => anyhow::bail!("usage: mode rewrite|summarize"),
            },
            "styles" => {
                let raw: Vec<&str> = rest.split(',').collect();
                Command::Styles(parse_styles(&raw)?)
            }
            "custom" => Command::Custom(if rest.is_empty() {
                None
            } else {
                Some(rest.to_string())
            }),
            "length" => Command::Length(rest.parse()?),
            "run" => Command::Run,
            "undo" => Command::Undo,
            "clear" => Command::Clear,
            "show" => Command::Show,
            "history" => Command::History,
            "save" => {
                if rest.is_empty() {
                    anyhow::bail!("usage: save <dir>");
                }
                Command::Save(PathBuf::from(rest))
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => anyhow::bail!("unknown command '{other}' (type 'help')"),
        };
        Ok(cmd)
    }
}

const REPL_HELP: &str = "\
  input <text>          set the input text
  load <path> [mime]    load a PDF or DOCX document as input
  mode rewrite|summarize
  styles a,b,...        formal, casual, professional, poetic, simplified
  custom <instruction>  add a custom rewrite instruction (bare 'custom' clears it)
  length short|medium|long
  run                   transform the current input
  undo                  drop the latest run (the first run is kept)
  clear                 clear the input text
  show                  show the input and the latest outputs
  history               list recorded runs
  save <dir>            export the latest outputs as .txt files
  quit";

/// REPL state: the session plus the current mode selection.
struct Repl {
    session: Session,
    mode: Mode,
    styles: Vec<RewriteStyle>,
    custom: Option<String>,
    length: SummaryLength,
}

impl Repl {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let mut session = Session::new();
        if let Some(ref text) = cli.text {
            session.set_input(text.clone());
        }
        let styles = parse_styles(&cli.styles)?;
        Ok(Self {
            session,
            mode: if cli.summarize { Mode::Summarize } else { Mode::Rewrite },
            styles: if styles.is_empty() { vec![RewriteStyle::Formal] } else { styles },
            custom: cli.custom.clone(),
            length: cli.length.parse()?,
        })
    }

    fn request(&self) -> TransformRequest {
        match self.mode {
            Mode::Rewrite => TransformRequest::Rewrite {
                styles: self.styles.clone(),
                custom: self.custom.clone(),
            },
            Mode::Summarize => TransformRequest::summarize(self.length),
        }
    }

    /// Apply one command. Returns `false` when the session should end.
    async fn execute(&mut self, cmd: Command, config: &TransformConfig) -> Result<bool> {
        match cmd {
            Command::Input(text) => self.session.set_input(text),
            Command::Load { path, mime } => {
                let text = extract_file(&path, mime.as_deref()).await?;
                print_stats(&text);
                self.session.set_input(text);
            }
            Command::Mode(mode) => self.mode = mode,
            Command::Styles(styles) => self.styles = styles,
            Command::Custom(custom) => self.custom = custom,
            Command::Length(length) => self.length = length,
            Command::Run => {
                let input = self.session.input().to_string();
                let request = self.request();
                let run = transform(&mut self.session, &input, &request, config).await?;
                print_run(run)?;
            }
            Command::Undo => {
                if self.session.undo() {
                    eprintln!("{} Reverted to run {}", green("✔"), self.session.len());
                    self.print_latest()?;
                } else {
                    eprintln!("{}", dim("Nothing to undo"));
                }
            }
            Command::Clear => self.session.clear_input(),
            Command::Show => {
                println!("{}", bold("Input:"));
                println!("{}", self.session.input());
                self.print_latest()?;
            }
            Command::History => {
                for (i, run) in self.session.runs().iter().enumerate() {
                    let styles: Vec<&str> = run.outputs.iter().map(|o| o.style.as_str()).collect();
                    println!("{:>3}. [{}] {}", i + 1, styles.join(", "), preview(&run.input, 60));
                }
                if self.session.is_empty() {
                    eprintln!("{}", dim("No runs yet"));
                }
            }
            Command::Save(dir) => {
                let Some(outputs) = self.session.latest_outputs() else {
                    anyhow::bail!("no outputs to save yet");
                };
                for path in write_outputs(&dir, outputs).await? {
                    eprintln!("{} {}", green("✔"), path.display());
                }
            }
            Command::Help => println!("{REPL_HELP}"),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn print_latest(&self) -> io::Result<()> {
        match self.session.state() {
            SessionState::Empty => {
                eprintln!("{}", dim("No outputs yet"));
                Ok(())
            }
            SessionState::HasHistory => match self.session.latest() {
                Some(run) => print_run(run),
                None => Ok(()),
            },
        }
    }
}

async fn run_interactive(cli: &Cli, config: &TransformConfig) -> Result<()> {
    let mut repl = Repl::from_cli(cli)?;
    eprintln!(
        "{} {}  {}",
        cyan("◆"),
        bold("edgequake-rewrite interactive session"),
        dim("(type 'help' for commands)")
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("{} ", cyan(">"));
        io::stderr().flush().ok();

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let cmd = match line.parse::<Command>() {
            Ok(cmd) => cmd,
            Err(e) => {
                eprintln!("{} {e}", red("✗"));
                continue;
            }
        };
        match repl.execute(cmd, config).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("{} {e:#}", red("✗")),
        }
    }
    Ok(())
}

/// First line of `text`, cut to `max` characters.
fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > max {
        let cut: String = line.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}\u{2026}")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_commands() {
        assert_eq!("run".parse::<Command>().unwrap(), Command::Run);
        assert_eq!("  UNDO ".parse::<Command>().unwrap(), Command::Undo);
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn input_keeps_text_verbatim() {
        assert_eq!(
            "input  Hello,   world {text}".parse::<Command>().unwrap(),
            Command::Input("Hello,   world {text}".into())
        );
        assert!("input".parse::<Command>().is_err());
    }

    #[test]
    fn parses_style_lists() {
        assert_eq!(
            "styles formal, Poetic,formal".parse::<Command>().unwrap(),
            Command::Styles(vec![RewriteStyle::Formal, RewriteStyle::Poetic])
        );
        assert!("styles formal,snarky".parse::<Command>().is_err());
    }

    #[test]
    fn bare_custom_clears_instruction() {
        assert_eq!("custom".parse::<Command>().unwrap(), Command::Custom(None));
        assert_eq!(
            "custom Like a pirate".parse::<Command>().unwrap(),
            Command::Custom(Some("Like a pirate".into()))
        );
    }

    #[test]
    fn length_must_be_known() {
        assert_eq!(
            "length long".parse::<Command>().unwrap(),
            Command::Length(SummaryLength::Long)
        );
        assert!("length tiny".parse::<Command>().is_err());
    }

    #[test]
    fn load_with_optional_mime() {
        assert_eq!(
            "load report.pdf".parse::<Command>().unwrap(),
            Command::Load {
                path: PathBuf::from("report.pdf"),
                mime: None
            }
        );
        assert_eq!(
            "load notes application/pdf".parse::<Command>().unwrap(),
            Command::Load {
                path: PathBuf::from("notes"),
                mime: Some("application/pdf".into())
            }
        );
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!("dance".parse::<Command>().is_err());
        assert!("mode sideways".parse::<Command>().is_err());
    }

    #[test]
    fn default_request_is_formal_rewrite() {
        let cli = Cli::parse_from(["rewrite", "some text"]);
        assert_eq!(build_request(&cli).unwrap(), TransformRequest::rewrite([RewriteStyle::Formal]));
    }

    #[test]
    fn custom_only_request_has_no_styles() {
        let cli = Cli::parse_from(["rewrite", "--custom", "Shorter", "x"]);
        assert_eq!(build_request(&cli).unwrap(), TransformRequest::custom("Shorter"));
    }

    #[test]
    fn summarize_rejects_bad_length() {
        let cli = Cli::parse_from(["rewrite", "--summarize", "--length", "epic", "x"]);
        assert!(build_request(&cli).is_err());
    }

    #[test]
    fn provider_without_model_is_rejected() {
        let cli = Cli::parse_from(["rewrite", "--provider", "openai", "x"]);
        let err = build_config(&cli, None).unwrap_err();
        assert!(format!("{err:#}").contains("--model"), "got {err:#}");

        let cli = Cli::parse_from(["rewrite", "--provider", "openai", "--model", "gpt-4.1-nano", "x"]);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.model_id(), "gpt-4.1-nano");
    }

    #[test]
    fn preview_truncates_first_line() {
        assert_eq!(preview("short\nsecond", 60), "short");
        assert_eq!(preview("abcdefghij", 5), "abcd\u{2026}");
    }
}
