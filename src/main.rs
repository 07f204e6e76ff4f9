mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::Mutex;

use config::AppConfig;
use controller::AppController;
use model::{AccountsModel, AppModel, LocalCatalog, PreferenceStore, SubscribedChannels, VideosApi, demo_catalog};
use view::{AppView, FrameState};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== vidtabs starting ===");

    let config = AppConfig::from_env()?;

    let accounts = Arc::new(AccountsModel::load(&config.accounts_path)?);
    tracing::info!(
        accounts = accounts.accounts().len(),
        current = accounts.current_id().as_deref().unwrap_or("-"),
        "Accounts loaded"
    );

    let preferences = Arc::new(PreferenceStore::load(&config.preferences_path)?);

    let api: Arc<dyn VideosApi> = match &config.catalog_path {
        Some(path) => Arc::new(LocalCatalog::load(path)?),
        None => {
            tracing::info!("No catalog configured, using built-in demo catalog");
            Arc::new(LocalCatalog::new(demo_catalog()))
        }
    };

    let subscriptions = SubscribedChannels::new(&config.subscriptions_path);
    if let Err(e) = subscriptions.load_from_disk().await {
        tracing::warn!(error = %e, "Could not load subscriptions cache");
    }
    subscriptions.set_account(accounts.current_id()).await;

    // Persist preferences whenever they change
    let store = preferences.clone();
    let mut preference_changes = preferences.subscribe();
    tokio::spawn(async move {
        while preference_changes.changed().await.is_ok() {
            if let Err(e) = store.save() {
                tracing::warn!(error = %e, path = %store.path().display(), "Could not save preferences");
            }
        }
    });

    let app_model = AppModel::new(config, accounts, preferences, api, subscriptions);
    let model = Arc::new(Mutex::new(app_model));
    let controller = AppController::new(model.clone());
    controller.refresh_tabs().await;

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("vidtabs shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        let (state, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;
            model_guard.resolve_tabs().await;
            model_guard.appear_selected_tab().await;

            let state = FrameState {
                tabs: model_guard.get_tab_view().await,
                overlays: model_guard.get_overlay_views().await,
                player: model_guard.get_player_state().await,
                ui_state: model_guard.get_ui_state().await,
                preferences: model_guard.preferences.get(),
            };
            (state, model_guard.should_quit().await)
        };

        terminal.draw(|f| {
            AppView::render(f, &state);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::error!(error = %e, "Key handling failed");
                }
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
