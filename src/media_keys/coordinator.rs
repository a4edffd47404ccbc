use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use futures_util::future::join_all;

use crate::playback::{Dispatcher, PageHandle, PageSelectors, PlaybackPage};
use crate::utils::logger::{log_operation_complete, log_operation_failed, log_operation_start};

use super::bus::MediaKeyBus;
use super::error::MediaKeyError;
use super::event::KeySink;
use super::profiles::{DesktopEnvironment, DesktopProfile, DESKTOP_PROFILES};
use super::shortcuts::{register_media_shortcuts, MediaShortcut, ShortcutOutcome, ShortcutRegistry};

#[derive(Debug)]
pub enum BindOutcome {
    Bound,
    /// Held since an earlier activation.
    AlreadyBound,
    /// An earlier activation is still waiting on this daemon.
    Pending,
    /// Recovered locally; keys for this environment come from the fallback
    /// shortcuts only.
    Unavailable(MediaKeyError),
}

/// What one activation managed to set up.
#[derive(Debug, Default)]
pub struct RegistrationReport {
    pub bus: Vec<(DesktopEnvironment, BindOutcome)>,
    pub shortcuts: Vec<(MediaShortcut, ShortcutOutcome)>,
}

impl RegistrationReport {
    /// Environments currently delivering keys over the bus.
    pub fn bus_bound(&self) -> Vec<DesktopEnvironment> {
        self.bus
            .iter()
            .filter(|(_, outcome)| matches!(outcome, BindOutcome::Bound | BindOutcome::AlreadyBound))
            .map(|(environment, _)| *environment)
            .collect()
    }

    pub fn fallback_only(&self) -> bool {
        self.bus_bound().is_empty()
    }

    pub fn shortcuts_active(&self) -> usize {
        self.shortcuts
            .iter()
            .filter(|(_, outcome)| !matches!(outcome, ShortcutOutcome::Conflict(_)))
            .count()
    }
}

struct Bindings<T> {
    held: Vec<T>,
    environments: HashSet<DesktopEnvironment>,
    pending: HashSet<DesktopEnvironment>,
}

/// Marks an environment as being bound; cleared when the attempt finishes
/// or its future is dropped.
struct PendingBind<'a, T> {
    bindings: &'a Mutex<Bindings<T>>,
    environment: DesktopEnvironment,
}

impl<T> Drop for PendingBind<'_, T> {
    fn drop(&mut self) {
        self.bindings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .remove(&self.environment);
    }
}

/// Acquires media keys and routes them to the hosted page.
///
/// Owns the page handle: the host attaches the page when its window is
/// created and detaches it when the window is destroyed. `activate` runs on
/// every ready/reactivation and only adds what is still missing.
pub struct ShortcutCoordinator<P, B: MediaKeyBus, S> {
    app_id: String,
    profiles: &'static [DesktopProfile],
    bus: B,
    shortcuts: S,
    page: PageHandle<P>,
    dispatcher: Dispatcher<P>,
    bindings: Mutex<Bindings<B::Binding>>,
}

impl<P, B, S> ShortcutCoordinator<P, B, S>
where
    P: PlaybackPage,
    B: MediaKeyBus,
    S: ShortcutRegistry,
{
    pub fn new(app_id: impl Into<String>, bus: B, shortcuts: S, selectors: PageSelectors) -> Self {
        let page = PageHandle::new();
        let dispatcher = Dispatcher::new(page.clone(), selectors);
        Self {
            app_id: app_id.into(),
            profiles: DESKTOP_PROFILES,
            bus,
            shortcuts,
            page,
            dispatcher,
            bindings: Mutex::new(Bindings {
                held: Vec::new(),
                environments: HashSet::new(),
                pending: HashSet::new(),
            }),
        }
    }

    pub fn with_profiles(mut self, profiles: &'static [DesktopProfile]) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn page(&self) -> &PageHandle<P> {
        &self.page
    }

    pub fn dispatcher(&self) -> &Dispatcher<P> {
        &self.dispatcher
    }

    pub fn attach_page(&self, page: P) {
        if self.page.attach(page).is_some() {
            log::debug!("Replaced hosted page");
        }
    }

    /// Called when the hosted window goes away; later key presses are dropped.
    pub fn detach_page(&self) {
        if self.page.detach().is_some() {
            log::info!("Hosted page closed, media keys idle until it reopens");
        }
    }

    fn sink(&self) -> KeySink {
        let dispatcher = self.dispatcher.clone();
        Arc::new(move |event| {
            dispatcher.dispatch(event);
        })
    }

    fn lock_bindings(&self) -> MutexGuard<'_, Bindings<B::Binding>> {
        self.bindings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn bind_profile(&self, profile: &'static DesktopProfile, sink: KeySink) -> BindOutcome {
        let environment = profile.environment;
        let _pending = {
            let mut bindings = self.lock_bindings();
            if bindings.environments.contains(&environment) {
                return BindOutcome::AlreadyBound;
            }
            if !bindings.pending.insert(environment) {
                return BindOutcome::Pending;
            }
            PendingBind {
                bindings: &self.bindings,
                environment,
            }
        };

        match self.bus.bind(profile, &self.app_id, sink).await {
            Ok(binding) => {
                let mut bindings = self.lock_bindings();
                bindings.held.push(binding);
                bindings.environments.insert(environment);
                BindOutcome::Bound
            }
            Err(e) => {
                log::debug!("No {} media key binding: {}", environment, e);
                BindOutcome::Unavailable(e)
            }
        }
    }

    /// Register the fallback shortcuts, then bind every desktop profile.
    ///
    /// Never fails: every problem is recovered locally and shows up in the
    /// report. The shortcuts are in place before the first bus call, and
    /// profiles are bound concurrently, so a daemon that never answers holds
    /// up neither the fallback nor the other profiles. Only the returned
    /// report waits for it.
    pub async fn activate(&self) -> RegistrationReport {
        const OPERATION: &str = "Media key registration";
        let started = Instant::now();
        log_operation_start(OPERATION, &[("app_id", self.app_id.clone())]);

        let sink = self.sink();
        let mut report = RegistrationReport {
            shortcuts: register_media_shortcuts(&self.shortcuts, &sink),
            ..RegistrationReport::default()
        };

        let outcomes = join_all(
            self.profiles
                .iter()
                .map(|profile| self.bind_profile(profile, sink.clone())),
        )
        .await;
        report.bus = self
            .profiles
            .iter()
            .map(|profile| profile.environment)
            .zip(outcomes)
            .collect();

        if report.fallback_only() {
            log::info!("No desktop media key service bound, relying on global shortcuts");
        }

        let summary = [
            ("bus_bound", format!("{:?}", report.bus_bound())),
            ("shortcuts", format!("{}/{}", report.shortcuts_active(), MediaShortcut::ALL.len())),
        ];
        if report.fallback_only() && report.shortcuts_active() == 0 {
            log_operation_failed(OPERATION, "no media key source available", &summary);
        } else {
            log_operation_complete(OPERATION, started.elapsed().as_millis() as u64, &summary);
        }

        report
    }
}
