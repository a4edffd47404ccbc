use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to run script in hosted page: {0}")]
    Script(String),
}

/// The hosted player, reduced to the one thing playback control needs.
pub trait PlaybackPage: Send + Sync + 'static {
    fn perform(&self, action: &PageAction) -> Result<(), PageError>;
}

/// CSS selectors for the hosted player's transport controls.
///
/// `playing_marker` is matched against the play/pause control (or any of its
/// descendants) and is only present while audio is playing. It is tied to the
/// player's current markup and stops matching silently if that changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageSelectors {
    pub next: String,
    pub previous: String,
    pub play_pause: String,
    pub playing_marker: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            next: ".playbackControlsView .nextButton".to_string(),
            previous: ".playbackControlsView .previousButton".to_string(),
            play_pause: ".playbackControlsView .playButton".to_string(),
            playing_marker: ".playerIconPause".to_string(),
        }
    }
}

/// A single interaction with the hosted player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    Click { selector: String },
    /// Click only if `playing_marker` matches, so repeating it never resumes
    /// playback.
    ClickIfPlaying {
        selector: String,
        playing_marker: String,
    },
}

const DISPATCH_CLICK: &str =
    "el.dispatchEvent(new MouseEvent('click', { bubbles: true, cancelable: false, view: window }));";

impl PageAction {
    /// Render as a self-contained script for the webview. A missing element
    /// makes the script a no-op.
    pub fn to_script(&self) -> String {
        let guard = match self {
            Self::Click { selector } => {
                format!("var el = document.querySelector({}); if (!el) return;", js_string(selector))
            }
            Self::ClickIfPlaying {
                selector,
                playing_marker,
            } => {
                let marker = js_string(playing_marker);
                format!(
                    "var el = document.querySelector({}); if (!el) return; \
                     if (!(el.matches({marker}) || el.querySelector({marker}))) return;",
                    js_string(selector)
                )
            }
        };
        format!("(function () {{ {guard} {DISPATCH_CLICK} }})();")
    }
}

fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// Shared slot for the page that is currently hosted, if any.
///
/// Cloning shares the slot. Holding the lock while performing an action is
/// what serializes dispatch.
pub struct PageHandle<P> {
    slot: Arc<Mutex<Option<P>>>,
}

impl<P> Clone for PageHandle<P> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<P> Default for PageHandle<P> {
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }
}

impl<P> PageHandle<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the hosted page, returning the previous one.
    pub fn attach(&self, page: P) -> Option<P> {
        self.lock().replace(page)
    }

    pub fn detach(&self) -> Option<P> {
        self.lock().take()
    }

    pub fn is_attached(&self) -> bool {
        self.lock().is_some()
    }

    /// Run `f` against the page while it stays attached.
    pub fn with_page<T>(&self, f: impl FnOnce(&P) -> T) -> Option<T> {
        self.lock().as_ref().map(f)
    }

    fn lock(&self) -> MutexGuard<'_, Option<P>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
