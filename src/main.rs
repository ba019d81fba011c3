mod app;
mod config;
mod logging;
mod router;
mod store;
mod ui;
mod views;

use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::state::AppState;
use crate::store::{FileStorage, MemoryStorage, PersistConfig, Storage, Store};
use anyhow::Result;
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // Load config
    let cfg = config::load_config()?;
    logging::init(&cfg.logging)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, cfg).await;

    // Restore terminal
    restore_terminal()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "Exited with error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

fn open_storage(cfg: &config::AppConfig) -> Arc<dyn Storage> {
    if cfg.storage.enabled {
        let dir = cfg.storage.resolved_dir();
        tracing::info!(dir = %dir.display(), "Using file storage");
        Arc::new(FileStorage::new(dir))
    } else {
        tracing::info!("Storage disabled, state will not survive restart");
        Arc::new(MemoryStorage::new())
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let store = Store::new(store::root_reducer(), open_storage(&cfg), PersistConfig::root());
    let mut state = AppState::new(cfg.clone())?;
    tracing::info!(
        slices = store.state().len(),
        routes = state.router.table().routes().len(),
        path = %state.router.current_path(),
        "Mounted"
    );

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            match reader.next().await {
                Some(Ok(event)) => {
                    if term_tx.send(AppEvent::Terminal(event)).is_err() {
                        break;
                    }
                }
                Some(Err(_)) => break,
                None => break,
            }
        }
    });

    // Spawn tick task
    let tick_tx = event_tx.clone();
    let tick_rate = std::time::Duration::from_millis(cfg.ui.tick_rate_ms.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_rate);
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    drive(terminal, &mut state, store, event_rx).await
}

/// Run the event loop, then flush the store whether the loop ended cleanly
/// or with an error.
async fn drive<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    mut store: Store<Action>,
    events: mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let result = event_loop(terminal, state, &mut store, events).await;
    store.flush().await;
    match &result {
        Ok(()) => tracing::info!("Shut down"),
        Err(e) => tracing::warn!(error = %e, "Event loop failed, store flushed"),
    }
    result
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    store: &mut Store<Action>,
    mut events: mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    // Mount: watchers see their initial values
    state.sync_effects();
    terminal.draw(|f| ui::render(f, state))?;

    // Main event loop
    while let Some(event) = events.recv().await {
        let actions = handler::handle_event(state, event);

        for action in actions {
            tracing::debug!(?action, "Dispatch");
            store.dispatch(&action);
            handler::apply_action(state, action);
        }

        state.sync_effects();

        if state.should_quit {
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            terminal.draw(|f| ui::render(f, state))?;
            state.dirty = false;
        }
    }
    Ok(())
}
