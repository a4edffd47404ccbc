use std::fmt;

use tauri::{AppHandle, Runtime};
use tauri_plugin_global_shortcut::{Code, GlobalShortcutExt, Shortcut, ShortcutState};

use super::error::MediaKeyError;
use super::event::{KeySink, MediaKeyEvent};

/// The four media keys claimed as OS-level global shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaShortcut {
    NextTrack,
    PreviousTrack,
    Stop,
    PlayPause,
}

impl MediaShortcut {
    pub const ALL: [Self; 4] = [Self::NextTrack, Self::PreviousTrack, Self::Stop, Self::PlayPause];

    pub fn identifier(self) -> &'static str {
        match self {
            Self::NextTrack => "MediaNextTrack",
            Self::PreviousTrack => "MediaPreviousTrack",
            Self::Stop => "MediaStop",
            Self::PlayPause => "MediaPlayPause",
        }
    }

    pub fn code(self) -> Code {
        match self {
            Self::NextTrack => Code::MediaTrackNext,
            Self::PreviousTrack => Code::MediaTrackPrevious,
            Self::Stop => Code::MediaStop,
            Self::PlayPause => Code::MediaPlayPause,
        }
    }

    pub fn shortcut(self) -> Shortcut {
        Shortcut::new(None, self.code())
    }

    /// The key event this shortcut synthesizes when pressed.
    pub fn event(self) -> MediaKeyEvent {
        match self {
            Self::NextTrack => MediaKeyEvent::Next,
            Self::PreviousTrack => MediaKeyEvent::Previous,
            Self::Stop => MediaKeyEvent::Stop,
            Self::PlayPause => MediaKeyEvent::Play,
        }
    }
}

impl fmt::Display for MediaShortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[derive(Debug)]
pub enum ShortcutOutcome {
    Registered,
    /// Left over from an earlier activation; the existing handler stays.
    AlreadyRegistered,
    Conflict(MediaKeyError),
}

/// OS-level hotkey registration.
pub trait ShortcutRegistry: Send + Sync {
    fn is_registered(&self, key: MediaShortcut) -> bool;

    fn register(&self, key: MediaShortcut, sink: KeySink) -> Result<(), MediaKeyError>;
}

/// [`ShortcutRegistry`] on top of `tauri-plugin-global-shortcut`.
pub struct TauriShortcuts<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> TauriShortcuts<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> ShortcutRegistry for TauriShortcuts<R> {
    fn is_registered(&self, key: MediaShortcut) -> bool {
        self.app.global_shortcut().is_registered(key.shortcut())
    }

    fn register(&self, key: MediaShortcut, sink: KeySink) -> Result<(), MediaKeyError> {
        self.app
            .global_shortcut()
            .on_shortcut(key.shortcut(), move |_app, _shortcut, event| {
                if event.state() == ShortcutState::Pressed {
                    log::debug!("Global shortcut {} pressed", key);
                    sink(key.event());
                }
            })
            .map_err(|e| MediaKeyError::ShortcutConflict {
                key,
                reason: e.to_string(),
            })
    }
}

/// Register every media shortcut, continuing past individual failures.
pub fn register_media_shortcuts<S: ShortcutRegistry + ?Sized>(
    registry: &S,
    sink: &KeySink,
) -> Vec<(MediaShortcut, ShortcutOutcome)> {
    MediaShortcut::ALL
        .into_iter()
        .map(|key| {
            let outcome = if registry.is_registered(key) {
                log::debug!("Global shortcut {} already registered", key);
                ShortcutOutcome::AlreadyRegistered
            } else {
                match registry.register(key, sink.clone()) {
                    Ok(()) => {
                        log::info!("Registered global shortcut: {}", key);
                        ShortcutOutcome::Registered
                    }
                    Err(e) => {
                        log::warn!("Failed to register {}: {}", key, e);
                        ShortcutOutcome::Conflict(e)
                    }
                }
            };
            (key, outcome)
        })
        .collect()
}
