use anyhow::{Context, Result};
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use unistate::{LoggingMiddleware, Store, TaskFailure, TaskScope};
use unistate_config::AppConfig;

mod actions;
mod logger;
mod middleware;
mod reducers;
mod side_effects;
mod state;
mod views;

use actions::Action;
use middleware::{KeyboardMiddleware, QuitGuardMiddleware};
use state::AppState;

fn main() -> Result<()> {
    let (config, config_error) = AppConfig::load_or_default();
    let (level, level_error) = match config.log_level_filter() {
        Ok(level) => (level, None),
        Err(e) => (None, Some(e)),
    };
    let log_file = logger::init(level)?;

    log::info!("Starting unistate-counter, logging to {}", log_file.display());
    if let Some(e) = config_error {
        log::warn!("Using default app config: {}", e);
    }
    if let Some(e) = level_error {
        log::warn!("Ignoring log_level: {}", e);
    }
    log::debug!("Config: {:?}", config);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let scope = TaskScope::with_handle(runtime.handle().clone(), config.store_name.clone());
    let mut failures = scope.supervise();

    let store = Store::builder(reducers::app_reducer(), scope.clone())
        .name(config.store_name.clone())
        .middleware(
            LoggingMiddleware::new().skip_when(|a: &Action| matches!(a, Action::KeyPressed(_))),
        )
        .middleware(KeyboardMiddleware)
        .middleware(QuitGuardMiddleware)
        .middleware(side_effects::lucky_side_effects(
            Duration::from_millis(config.lucky_delay_ms),
            config.lucky_step,
        ))
        .build();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    let result = run_app(&mut terminal, &store, &mut failures, tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    scope.cancel();
    runtime.shutdown_timeout(Duration::from_secs(1));

    if let Err(err) = &result {
        log::error!("Exiting with error: {:#}", err);
    }
    log::info!("Exiting unistate-counter");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    store: &Store<AppState, Action>,
    failures: &mut UnboundedReceiver<TaskFailure>,
    tick_rate: Duration,
) -> Result<()> {
    let dispatcher = store.dispatcher();
    let mut running = store.select(|state: &AppState| state.status.running);

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            views::render(&store.state(), area, frame);
        })?;

        running.refresh();
        if !*running.get() {
            return Ok(());
        }

        while let Ok(failure) = failures.try_recv() {
            log::warn!("Background task failed: {}", failure);
        }
        if store.scope().is_cancelled() {
            anyhow::bail!("store `{}` stopped unexpectedly", store.name());
        }

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    dispatcher.dispatch(Action::KeyPressed(key));
                }
            }
        }
    }
}
