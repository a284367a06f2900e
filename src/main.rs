//! CLI entry point for `emlShell`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use emlshell::config::{self, Config};
use emlshell::export::attachment::{download_all, DiskHost};
use emlshell::i18n;
use emlshell::model::mail::MessageDate;
use emlshell::page::{read_source, DropZone};
use emlshell::viewer::present::{present, to_plain_text};
use emlshell::viewer::{MessageViewer, ViewState};

/// How long non-interactive commands wait for a parse.
const PARSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Render width used when stdout is not a terminal.
const DEFAULT_WIDTH: usize = 100;

#[derive(Parser)]
#[command(name = "emlshell", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// .eml file to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Language (en, es). Defaults to system locale.
    #[arg(long, value_name = "LANG", global = true)]
    lang: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a file in the TUI
    Open { path: PathBuf },
    /// Print the rendered message
    Show {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print the raw message source
    Source { path: PathBuf },
    /// Download every attachment
    Attachments {
        path: PathBuf,
        /// Output directory (defaults to the configured download directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

/// Detect language early from --lang arg or system env, before clap processes --help.
fn detect_lang_early() -> i18n::Lang {
    let args: Vec<String> = std::env::args().collect();
    for (i, arg) in args.iter().enumerate() {
        if arg == "--lang" {
            if let Some(lang) = args.get(i + 1).and_then(|c| i18n::Lang::from_code(c)) {
                return lang;
            }
        }
        if let Some(lang) = arg.strip_prefix("--lang=").and_then(i18n::Lang::from_code) {
            return lang;
        }
    }
    i18n::detect_system_lang()
}

/// Build a localized clap Command using i18n strings.
fn build_localized_command() -> clap::Command {
    let mut cmd = Cli::command()
        .about(i18n::app_about())
        .long_about(i18n::app_long_about())
        .after_help(i18n::app_after_help());

    for (name, about) in [
        ("open", i18n::help_cmd_open()),
        ("show", i18n::help_cmd_show()),
        ("source", i18n::help_cmd_source()),
        ("attachments", i18n::help_cmd_attachments()),
        ("completions", i18n::help_cmd_completions()),
        ("manpage", i18n::help_cmd_manpage()),
    ] {
        cmd = cmd.mut_subcommand(name, |sub| sub.about(about));
    }
    cmd
}

fn main() -> anyhow::Result<()> {
    // Detect language BEFORE clap parsing so --help is localized
    i18n::set_lang(detect_lang_early());

    let matches = build_localized_command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let config = config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let interactive = matches!(cli.command, None | Some(Commands::Open { .. }));
    setup_logging(log_level, &config, !interactive);

    match cli.command {
        Some(Commands::Open { path }) => cmd_open(Some(path), &config),
        None => cmd_open(cli.file, &config),
        Some(Commands::Show { path, json }) => cmd_show(&path, json, &config),
        Some(Commands::Source { path }) => cmd_source(&path),
        Some(Commands::Attachments { path, output }) => {
            cmd_attachments(&path, output.as_deref(), &config)
        }
        Some(Commands::Completions { shell }) => cmd_completions(shell),
        Some(Commands::Manpage) => cmd_manpage(),
    }
}

/// Set up tracing with a log file and, outside the TUI, stderr output.
fn setup_logging(level: &str, config: &Config, to_stderr: bool) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer =
        to_stderr.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let log_dir = config::cache_dir(config);
    let file_layer = std::fs::create_dir_all(&log_dir).is_ok().then(|| {
        let file_appender = tracing_appender::rolling::never(&log_dir, "emlshell.log");
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "emlshell", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

fn cmd_open(path: Option<PathBuf>, config: &Config) -> anyhow::Result<()> {
    if let Some(path) = &path {
        check_input(path)?;
    }
    emlshell::tui::run_tui(config.clone(), path)
}

/// Refuse files the drop zone would reject.
fn check_input(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("{}: {}", i18n::err_file_not_found(), path.display());
    }
    if !DropZone::eml().accepts(path) {
        anyhow::bail!("{}: {}", i18n::err_not_eml(), path.display());
    }
    Ok(())
}

/// Read and parse a file, waiting for the viewer to settle.
fn load_viewer(path: &Path, config: &Config) -> anyhow::Result<MessageViewer> {
    check_input(path)?;
    let source = read_source(path)?;
    let width = crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(DEFAULT_WIDTH);
    let mut viewer = MessageViewer::new(source, config.viewer_options(width));
    if !viewer.wait(PARSE_TIMEOUT) {
        anyhow::bail!("Timed out parsing {}", path.display());
    }
    Ok(viewer)
}

/// Print the rendered message, or a JSON summary of it.
fn cmd_show(path: &Path, json: bool, config: &Config) -> anyhow::Result<()> {
    let viewer = load_viewer(path, config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&message_json(&viewer))?);
    } else {
        print!("{}", to_plain_text(&present(&viewer, chrono::Utc::now())));
    }
    Ok(())
}

fn message_json(viewer: &MessageViewer) -> serde_json::Value {
    let loaded = match viewer.state() {
        ViewState::Loaded(loaded) => loaded,
        _ => {
            return serde_json::json!({
                "error": i18n::error_unparsed(),
                "source": viewer.source().as_str(),
            })
        }
    };
    let msg = &loaded.message;
    let date = match &msg.date {
        MessageDate::Valid(dt) => Some(dt.to_rfc3339()),
        MessageDate::Missing | MessageDate::Invalid(_) => None,
    };
    let attachments: Vec<serde_json::Value> = msg
        .attachments
        .iter()
        .map(|a| {
            serde_json::json!({
                "name": a.display_name(),
                "content_type": a.content_type,
                "size": a.size(),
                "viewable": a.is_viewable(),
            })
        })
        .collect();
    serde_json::json!({
        "subject": msg.subject,
        "from": msg.from,
        "to": msg.to,
        "cc": msg.cc,
        "date": date,
        "text": msg.text,
        "html": loaded.rendered_html.as_ref().map(|h| h.sanitized.as_str()),
        "attachments": attachments,
    })
}

/// Print the raw source.
fn cmd_source(path: &Path) -> anyhow::Result<()> {
    check_input(path)?;
    print!("{}", read_source(path)?.as_str());
    Ok(())
}

/// Download every attachment of a message.
fn cmd_attachments(path: &Path, output: Option<&Path>, config: &Config) -> anyhow::Result<()> {
    let viewer = load_viewer(path, config)?;
    let Some(loaded) = viewer.loaded() else {
        anyhow::bail!("{}", i18n::error_unparsed());
    };
    let count = loaded.message.attachments.len();
    if count == 0 {
        println!("  {}", i18n::cli_no_attachments());
        return Ok(());
    }

    let dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config::download_dir(config));
    let mut host = DiskHost::new(&dir);

    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} {} [{{bar:40.cyan/blue}}] {{pos}}/{{len}}",
                i18n::cli_downloading()
            ))?
            .progress_chars("#>-"),
    );

    let paths = download_all(&viewer, &mut host, &|current, _total| {
        pb.set_position(current as u64);
    });

    pb.finish_and_clear();
    println!(
        "  {} {} {} {}",
        i18n::cli_downloaded(),
        paths.len(),
        i18n::cli_attachments_to(),
        dir.display()
    );
    Ok(())
}
