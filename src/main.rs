use gpui::*;
use log::{debug, error, info, warn};
use std::sync::Arc;

mod app;
mod config;
mod error;
mod settings;
mod state;
mod theme;
mod weather;
mod widget;

use app::{CloseWidget, WeatherWidget, WIDGET_HEIGHT, WIDGET_WIDTH};
use config::Config;
use settings::SettingsStore;
use state::Labels;
use weather::WeatherClient;
use widget::WidgetController;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // The API key usually lives in a .env file next to the widget
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!("Failed to load .env file: {e}"),
    }

    // Load configuration
    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration, using defaults: {e:#}");
            Config::default()
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {e}");
        error!("Please check your config file at: ~/.config/weather-widget/config.toml");
        std::process::exit(1);
    }

    // No weather without credentials, so bail before any window exists
    let client = match WeatherClient::from_env(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let store = SettingsStore::open();
    info!("Settings file: {}", store.path().display());
    let controller = WidgetController::new(store, Labels::for_language(&config.language));
    let origin = controller.position();

    Application::new().run(move |cx| {
        cx.bind_keys([
            KeyBinding::new("cmd-q", CloseWidget, None),
            KeyBinding::new("ctrl-q", CloseWidget, None),
        ]);

        let bounds = Bounds::new(
            point(px(origin.x as f32), px(origin.y as f32)),
            size(px(WIDGET_WIDTH), px(WIDGET_HEIGHT)),
        );

        // Frameless, translucent, floating above other windows
        cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                titlebar: None,
                window_decorations: Some(WindowDecorations::Client),
                window_background: WindowBackgroundAppearance::Transparent,
                kind: WindowKind::PopUp,
                is_movable: true,
                is_resizable: false,
                focus: true,
                show: true,
                app_id: Some("weather-widget".to_string()),
                ..Default::default()
            },
            |window, cx| cx.new(|cx| WeatherWidget::new(controller, client, window, cx)),
        )
        .expect("Failed to open window");
    });
}
