use std::sync::Arc;

use tauri::{AppHandle, Manager, RunEvent, WindowEvent, Wry};
use tauri_plugin_log::{Target, TargetKind};

mod media_keys;
mod playback;
mod settings;
mod utils;
mod window_manager;


use media_keys::{SessionBus, ShortcutCoordinator, TauriShortcuts};
use settings::Settings;
use window_manager::{HostedPage, MAIN_WINDOW};

pub type AppCoordinator = ShortcutCoordinator<HostedPage, SessionBus, TauriShortcuts<Wry>>;

/// Application state - managed by Tauri
pub struct AppState {
    pub coordinator: Arc<AppCoordinator>,
    pub settings: Settings,
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() -> tauri::Result<()> {
    let app = tauri::Builder::default()
        // Must come first so a second launch exits before grabbing anything
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            log::info!("Second instance launched, reusing this one");
            if !window_manager::focus_main_window(app) {
                activate(app);
            }
        }))
        .plugin(
            tauri_plugin_log::Builder::new()
                .clear_targets()
                .targets([
                    Target::new(TargetKind::Stdout),
                    Target::new(TargetKind::LogDir { file_name: None }),
                ])
                .level(if cfg!(debug_assertions) {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                })
                .level_for("zbus", log::LevelFilter::Warn)
                .level_for("tao", log::LevelFilter::Warn)
                .with_colors(tauri_plugin_log::fern::colors::ColoredLevelConfig::default())
                .build(),
        )
        .plugin(tauri_plugin_store::Builder::new().build())
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .setup(|app| {
            let settings = settings::load_settings(app.handle());
            let app_id = app.config().identifier.clone();

            let coordinator = ShortcutCoordinator::new(
                app_id,
                SessionBus::new(),
                TauriShortcuts::new(app.handle().clone()),
                settings.selectors.clone(),
            );

            app.manage(AppState {
                coordinator: Arc::new(coordinator),
                settings,
            });

            Ok(())
        })
        .build(tauri::generate_context!())?;

    app.run(|app, event| match event {
        RunEvent::Ready => activate(app),
        // Dock icon clicked with every window closed
        #[cfg(target_os = "macos")]
        RunEvent::Reopen {
            has_visible_windows: false,
            ..
        } => activate(app),
        RunEvent::WindowEvent {
            label,
            event: WindowEvent::Destroyed,
            ..
        } if label == MAIN_WINDOW => {
            if let Some(state) = app.try_state::<AppState>() {
                state.coordinator.detach_page();
            }
        }
        // Stay alive without windows on macOS until the user quits
        #[cfg(target_os = "macos")]
        RunEvent::ExitRequested { code: None, api, .. } => api.prevent_exit(),
        _ => {}
    });

    Ok(())
}

/// Open (or reuse) the main window, hand it to the coordinator and
/// (re)acquire media keys.
fn activate(app: &AppHandle) {
    let Some(state) = app.try_state::<AppState>() else {
        log::warn!("Activation before AppState initialized");
        return;
    };

    match window_manager::open_main_window(app, &state.settings) {
        Ok(window) => state.coordinator.attach_page(HostedPage::new(window)),
        Err(e) => {
            log::error!("Failed to open main window: {}", e);
            return;
        }
    }

    let coordinator = state.coordinator.clone();
    tauri::async_runtime::spawn(async move {
        let report = coordinator.activate().await;
        log::debug!("Media key registration: {:?}", report);
    });
}
