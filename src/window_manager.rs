use tauri::{AppHandle, Manager, Runtime, WebviewUrl, WebviewWindow, WebviewWindowBuilder, Wry};

use crate::playback::{PageAction, PageError, PlaybackPage};
use crate::settings::Settings;

pub const MAIN_WINDOW: &str = "main";

const WINDOW_TITLE: &str = "Amazon Music";

/// The web player hosted in the main window.
#[derive(Clone)]
pub struct HostedPage<R: Runtime = Wry> {
    window: WebviewWindow<R>,
}

impl<R: Runtime> HostedPage<R> {
    pub fn new(window: WebviewWindow<R>) -> Self {
        Self { window }
    }
}

impl<R: Runtime> PlaybackPage for HostedPage<R> {
    fn perform(&self, action: &PageAction) -> Result<(), PageError> {
        self.window
            .eval(&action.to_script())
            .map_err(|e| PageError::Script(e.to_string()))
    }
}

/// Bring the main window to the front. Returns false if it does not exist.
pub fn focus_main_window<R: Runtime>(app: &AppHandle<R>) -> bool {
    let Some(window) = app.get_webview_window(MAIN_WINDOW) else {
        return false;
    };

    let _ = window.unminimize();
    let _ = window.show();
    let _ = window.set_focus();
    true
}

/// Open the main window on the configured player, or return the one that is
/// already open.
pub fn open_main_window<R: Runtime>(
    app: &AppHandle<R>,
    settings: &Settings,
) -> Result<WebviewWindow<R>, String> {
    if let Some(existing) = app.get_webview_window(MAIN_WINDOW) {
        log::debug!("Main window already open");
        existing.show().map_err(|e| e.to_string())?;
        return Ok(existing);
    }

    let url = match settings.page_url() {
        Ok(url) => url,
        Err(e) => {
            log::warn!("{}, falling back to the default player", e);
            Settings::default().page_url().map_err(|e| e.to_string())?
        }
    };

    log::info!("Opening main window on {}", url);

    let window = WebviewWindowBuilder::new(app, MAIN_WINDOW, WebviewUrl::External(url))
        .title(WINDOW_TITLE)
        .inner_size(settings.window_width, settings.window_height)
        .user_agent(&settings.user_agent)
        .build()
        .map_err(|e| e.to_string())?;

    #[cfg(debug_assertions)]
    if settings.open_devtools {
        open_devtools_keeping_focus(&window);
    }

    Ok(window)
}

#[cfg(debug_assertions)]
trait InspectableWindow {
    fn open_devtools(&self);
    fn set_focus(&self) -> Result<(), String>;
}

#[cfg(debug_assertions)]
impl<R: Runtime> InspectableWindow for WebviewWindow<R> {
    fn open_devtools(&self) {
        WebviewWindow::open_devtools(self);
    }

    fn set_focus(&self) -> Result<(), String> {
        WebviewWindow::set_focus(self).map_err(|e| e.to_string())
    }
}

/// DevTools takes focus from the player when it opens; hand it back.
#[cfg(debug_assertions)]
fn open_devtools_keeping_focus(window: &impl InspectableWindow) {
    window.open_devtools();
    if let Err(e) = window.set_focus() {
        log::warn!("Failed to refocus main window after opening DevTools: {}", e);
    }
}

#[cfg(all(test, debug_assertions))]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingWindow {
        calls: RefCell<Vec<&'static str>>,
        focus_fails: bool,
    }

    impl InspectableWindow for RecordingWindow {
        fn open_devtools(&self) {
            self.calls.borrow_mut().push("open_devtools");
        }

        fn set_focus(&self) -> Result<(), String> {
            self.calls.borrow_mut().push("set_focus");
            if self.focus_fails {
                Err("window hidden".to_string())
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_focus_returns_to_player_after_devtools_open() {
        let window = RecordingWindow::default();

        open_devtools_keeping_focus(&window);

        assert_eq!(*window.calls.borrow(), vec!["open_devtools", "set_focus"]);
    }

    #[test]
    fn test_refocus_failure_is_not_fatal() {
        let window = RecordingWindow {
            focus_fails: true,
            ..RecordingWindow::default()
        };

        open_devtools_keeping_focus(&window);

        assert_eq!(window.calls.borrow().len(), 2);
    }
}
