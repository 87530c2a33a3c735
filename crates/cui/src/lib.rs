mod actions;
mod app;
mod input;
mod view;

use anyhow::{Context, Result};
use app::{App, UiLocale};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use forcedeck_core::Preset;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fs::File;
use std::io::{self, stdout, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "forcedeck-cui", about = "Terminal card force")]
pub struct LaunchOptions {
    /// UI language (en_US or pt_BR).
    #[arg(long, short = 'l', env = "FORCEDECK_LANG")]
    pub locale: Option<String>,
    /// Timing preset: classic, settle or dramatic.
    #[arg(long, default_value = "classic", value_parser = parse_preset)]
    pub preset: Preset,
    /// Fixed shuffle seed for rehearsals.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write logs to this file (the terminal is busy drawing).
    #[arg(long, env = "FORCEDECK_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

fn parse_preset(value: &str) -> Result<Preset, String> {
    Preset::from_name(value).ok_or_else(|| format!("unknown preset {value:?}"))
}

pub fn run(options: LaunchOptions) -> Result<()> {
    if let Some(path) = options.log_file.as_ref() {
        init_file_logging(path)?;
    }

    let locale = UiLocale::from_opt(options.locale.as_deref());
    let mut app = App::bootstrap(locale, options.preset, options.seed)?;

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    stdout
        .execute(EnableMouseCapture)
        .context("enable mouse capture")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = LaunchOptions::try_parse_from(args)?;
    run(options)
}

fn init_file_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env("FORCEDECK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("install log subscriber")
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Reveal gaps are as short as 38ms, so poll well under that.
    let tick_rate = Duration::from_millis(8);
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        if event::poll(tick_rate)? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    actions::dispatch(app, input::map_key(key));
                }
                CEvent::Mouse(mouse) => {
                    if let Some(action) = input::map_mouse(mouse) {
                        actions::dispatch_pointer(app, action);
                    }
                }
                _ => {}
            }
        }
        let now = app.now();
        app.on_tick(now);
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "forcedeck-cui requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}
