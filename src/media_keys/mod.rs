//! Media key acquisition.
//!
//! Keys arrive from two independent sources:
//! - the desktop environment's settings daemon on the session bus (`bus`)
//! - OS-level global shortcuts (`shortcuts`), always registered
//!
//! A single physical press may therefore be delivered twice. Both sources
//! feed the same [`KeySink`].

mod bus;
mod coordinator;
mod error;
mod event;
mod profiles;
mod shortcuts;

pub use bus::{MediaKeyBus, SessionBus};
pub use coordinator::{BindOutcome, RegistrationReport, ShortcutCoordinator};
pub use error::MediaKeyError;
pub use event::{KeySink, MediaKeyEvent, PlaybackCommand};
pub use profiles::{DesktopEnvironment, DesktopProfile, DESKTOP_PROFILES};
pub use shortcuts::{MediaShortcut, ShortcutOutcome, ShortcutRegistry, TauriShortcuts};
