use thiserror::Error;

use super::profiles::DesktopEnvironment;
use super::shortcuts::MediaShortcut;

#[derive(Debug, Error)]
pub enum MediaKeyError {
    #[error("session bus unavailable: {0}")]
    BusUnavailable(#[source] zbus::Error),
    #[error("{environment} media key service not found: {source}")]
    ServiceNotFound {
        environment: DesktopEnvironment,
        #[source]
        source: zbus::Error,
    },
    #[error("global shortcut {key} could not be registered: {reason}")]
    ShortcutConflict { key: MediaShortcut, reason: String },
}
