//! Media key grabbing through a desktop settings daemon on the session bus.
//!
//! GNOME and MATE both expose the same `MediaKeys` interface under their own
//! names: a client calls `GrabMediaPlayerKeys` and then receives
//! `MediaPlayerKeyPressed(application, key)` for as long as its connection
//! stays open. Which daemon exists is only known at runtime, so every profile
//! is tried and each failure comes back as a value.

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::OnceCell;
use zbus::proxy::SignalStream;
use zbus::{Connection, Proxy};

use super::error::MediaKeyError;
use super::event::{KeySink, MediaKeyEvent};
use super::profiles::{DesktopEnvironment, DesktopProfile};

const KEY_PRESSED_SIGNAL: &str = "MediaPlayerKeyPressed";
/// Grabs are keyed by the application identifier rather than our bus name,
/// and presses are filtered on the same identifier.
const GRAB_METHOD: &str = "GrabMediaPlayerKeys";

/// Timestamp passed with the grab. Zero lets the daemon order grabs by
/// arrival.
const GRAB_TIME: u32 = 0;

/// A source of media key presses keyed by desktop profile.
#[async_trait]
pub trait MediaKeyBus: Send + Sync {
    /// Whatever must stay alive for key presses to keep flowing.
    type Binding: Send + Sync + 'static;

    /// Subscribe to the profile's key signal, then grab the keys for
    /// `app_id`. Every press is forwarded to `sink`.
    async fn bind(
        &self,
        profile: &'static DesktopProfile,
        app_id: &str,
        sink: KeySink,
    ) -> Result<Self::Binding, MediaKeyError>;
}

/// Live grant on one desktop environment's media keys.
///
/// The daemon drops the grab when our connection closes, so there is nothing
/// to release explicitly.
pub struct BindingHandle {
    environment: DesktopEnvironment,
    _proxy: Proxy<'static>,
    listener: tauri::async_runtime::JoinHandle<()>,
}

impl Drop for BindingHandle {
    fn drop(&mut self) {
        log::debug!("Releasing {} media key binding", self.environment);
        self.listener.abort();
    }
}

/// [`MediaKeyBus`] backed by the user's D-Bus session bus.
#[derive(Default)]
pub struct SessionBus {
    connection: OnceCell<Connection>,
}

impl SessionBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect on first use. A failed attempt is not cached, so the next
    /// activation tries again.
    async fn connection(&self) -> Result<&Connection, MediaKeyError> {
        self.connection
            .get_or_try_init(|| async {
                Connection::session()
                    .await
                    .map_err(MediaKeyError::BusUnavailable)
            })
            .await
    }
}

/// Use an already open connection instead of the session bus.
impl From<Connection> for SessionBus {
    fn from(connection: Connection) -> Self {
        Self {
            connection: OnceCell::from(connection),
        }
    }
}

#[async_trait]
impl MediaKeyBus for SessionBus {
    type Binding = BindingHandle;

    async fn bind(
        &self,
        profile: &'static DesktopProfile,
        app_id: &str,
        sink: KeySink,
    ) -> Result<BindingHandle, MediaKeyError> {
        let connection = self.connection().await?;
        let not_found = |source: zbus::Error| MediaKeyError::ServiceNotFound {
            environment: profile.environment,
            source,
        };

        let proxy = Proxy::new(connection, profile.service, profile.path, profile.interface)
            .await
            .map_err(not_found)?;

        // Subscribe before grabbing so no press between the two is lost.
        let signals = proxy
            .receive_signal(KEY_PRESSED_SIGNAL)
            .await
            .map_err(not_found)?;

        proxy
            .call::<_, _, ()>(GRAB_METHOD, &(app_id, GRAB_TIME))
            .await
            .map_err(not_found)?;

        log::info!(
            "Grabbed media keys from {} ({}) as '{}'",
            profile.environment,
            profile.service,
            app_id
        );

        let listener = tauri::async_runtime::spawn(forward_key_presses(
            profile.environment,
            app_id.to_owned(),
            signals,
            sink,
        ));

        Ok(BindingHandle {
            environment: profile.environment,
            _proxy: proxy,
            listener,
        })
    }
}

async fn forward_key_presses(
    environment: DesktopEnvironment,
    app_id: String,
    mut signals: SignalStream<'static>,
    sink: KeySink,
) {
    while let Some(message) = signals.next().await {
        let body = message.body();
        let (application, key) = match body.deserialize::<(String, String)>() {
            Ok(args) => args,
            Err(e) => {
                log::warn!("Malformed {} signal from {}: {}", KEY_PRESSED_SIGNAL, environment, e);
                continue;
            }
        };

        if let Some(event) = key_press_for(&app_id, &application, &key) {
            log::debug!("{} media key: {}", environment, event);
            sink(event);
        }
    }

    log::debug!("{} media key stream closed", environment);
}

/// Decode one `MediaPlayerKeyPressed` payload.
///
/// The daemon broadcasts to every subscriber, so presses addressed to another
/// grabber are ignored.
fn key_press_for(app_id: &str, application: &str, key: &str) -> Option<MediaKeyEvent> {
    if application != app_id {
        log::debug!("Ignoring media key '{}' addressed to '{}'", key, application);
        return None;
    }

    let event = MediaKeyEvent::from_key_name(key);
    if event.is_none() {
        log::debug!("Ignoring unsupported media key '{}'", key);
    }
    event
}
