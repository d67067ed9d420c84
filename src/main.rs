use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use stype::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    reference::{Passage, ReferenceText},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    SessionConfig,
};
use tracing::info;

/// minimal terminal typing test with live wpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a reference passage and watch time, words per minute, accuracy and per-character feedback update as you go."
)]
pub struct Cli {
    /// custom prompt to type
    #[clap(short = 'p', long, conflicts_with_all = ["text", "file"])]
    prompt: Option<String>,

    /// bundled passage to type (see --list-texts); random when omitted
    #[clap(short = 't', long, conflicts_with = "file")]
    text: Option<String>,

    /// read the text to type from a file
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// list the bundled passages and exit
    #[clap(long)]
    list_texts: bool,

    /// seconds the completion notice stays up before the test resets
    #[clap(short = 'r', long)]
    reset_delay: Option<u64>,

    /// level for the log file: error, warn, info, debug or trace
    #[clap(long)]
    log_level: Option<String>,

    /// print the last completed result (or the unfinished test) as JSON on exit
    #[clap(long)]
    json: bool,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum TextSource {
    Prompt(String),
    File(PathBuf),
    Bundled(String),
    Random,
}

impl TextSource {
    fn load(&self) -> stype::Result<ReferenceText> {
        match self {
            TextSource::Prompt(prompt) => ReferenceText::non_empty(prompt),
            TextSource::File(path) => ReferenceText::from_file(path),
            TextSource::Bundled(name) => Passage::bundled(name)?.reference(),
            TextSource::Random => Passage::random()?.reference(),
        }
    }
}

impl Cli {
    /// Command line flags win over stored config.
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(text) = &self.text {
            config.text = Some(text.clone());
        }
        if let Some(delay) = self.reset_delay {
            config.reset_delay_secs = delay;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config
    }

    fn text_source(&self, config: &Config) -> TextSource {
        if let Some(prompt) = &self.prompt {
            return TextSource::Prompt(prompt.clone());
        }
        if let Some(path) = &self.file {
            return TextSource::File(path.clone());
        }
        match &config.text {
            Some(name) => TextSource::Bundled(name.clone()),
            None => TextSource::Random,
        }
    }
}

fn list_texts() -> Result<(), Box<dyn Error>> {
    for name in Passage::names() {
        let passage = Passage::bundled(&name)?;
        println!("{:<12} {}", passage.name, passage.source);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.list_texts {
        return list_texts();
    }

    let store = FileConfigStore::new();
    let config = cli.apply_to(store.load());
    if cli.save_config {
        store.save(&config)?;
    }

    if let Some(path) = AppDirs::log_path() {
        if let Err(err) = logging::init(&config.log_level, &path) {
            eprintln!("stype: logging disabled: {err}");
        }
    }

    let reference = cli.text_source(&config).load()?;

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    info!(chars = reference.len(), "starting typing test");

    let session_config = SessionConfig {
        reset_delay: Duration::from_secs(config.reset_delay_secs),
    };
    let mut app = App::new(reference, session_config, Instant::now());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, config.tick_rate());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&app.session.final_snapshot())?);
    }

    Ok(())
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(tick_rate));

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                app.on_tick(Instant::now());
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key, Instant::now()) == Control::Quit {
                    break;
                }
            }
        }
        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["stype"]);

        assert_eq!(cli.prompt, None);
        assert_eq!(cli.text, None);
        assert_eq!(cli.file, None);
        assert_eq!(cli.reset_delay, None);
        assert!(!cli.list_texts);
        assert!(!cli.json);
        assert!(!cli.save_config);
    }

    #[test]
    fn test_cli_custom_prompt() {
        let cli = Cli::parse_from(["stype", "-p", "hello world"]);
        assert_eq!(cli.prompt, Some("hello world".to_string()));

        let cli = Cli::parse_from(["stype", "--prompt", "custom text"]);
        assert_eq!(cli.prompt, Some("custom text".to_string()));
    }

    #[test]
    fn test_cli_prompt_conflicts_with_text() {
        let result = Cli::try_parse_from(["stype", "-p", "hi", "-t", "default"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["stype", "-t", "default", "-f", "x.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_reset_delay() {
        let cli = Cli::parse_from(["stype", "-r", "2"]);
        assert_eq!(cli.reset_delay, Some(2));

        let cli = Cli::parse_from(["stype", "--reset-delay", "10"]);
        assert_eq!(cli.reset_delay, Some(10));
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "stype",
            "-t",
            "pangrams",
            "-r",
            "1",
            "--log-level",
            "debug",
        ]);
        let config = cli.apply_to(Config::default());

        assert_eq!(config.text, Some("pangrams".to_string()));
        assert_eq!(config.reset_delay_secs, 1);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_config_kept_without_flags() {
        let stored = Config {
            text: Some("terminal".into()),
            reset_delay_secs: 7,
            tick_rate_ms: 50,
            log_level: "warn".into(),
        };
        let cli = Cli::parse_from(["stype"]);
        assert_eq!(cli.apply_to(stored.clone()), stored);
    }

    #[test]
    fn test_text_source_precedence() {
        let config = Config {
            text: Some("terminal".into()),
            ..Config::default()
        };

        let cli = Cli::parse_from(["stype", "-p", "typed"]);
        assert_eq!(
            cli.text_source(&config),
            TextSource::Prompt("typed".into())
        );

        let cli = Cli::parse_from(["stype", "-f", "passage.txt"]);
        assert_eq!(
            cli.text_source(&config),
            TextSource::File(PathBuf::from("passage.txt"))
        );

        let cli = Cli::parse_from(["stype"]);
        assert_eq!(
            cli.text_source(&config),
            TextSource::Bundled("terminal".into())
        );
        assert_eq!(cli.text_source(&Config::default()), TextSource::Random);
    }

    #[test]
    fn test_text_source_load() {
        let reference = TextSource::Prompt("  hi there ".into()).load().unwrap();
        assert_eq!(reference.as_str(), "hi there");

        assert!(TextSource::Prompt("   ".into()).load().is_err());
        assert!(TextSource::Bundled("default".into()).load().is_ok());
        assert!(TextSource::Bundled("missing".into()).load().is_err());
        assert!(!TextSource::Random.load().unwrap().is_empty());
    }
}
