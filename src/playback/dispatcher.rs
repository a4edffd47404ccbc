use std::sync::Arc;

use crate::media_keys::{MediaKeyEvent, PlaybackCommand};

use super::page::{PageAction, PageHandle, PageSelectors, PlaybackPage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The action was handed to the page. Whether the page ran it
    /// successfully is not observed.
    Dispatched(PageAction),
    /// No page was hosted; the key press is discarded.
    Dropped,
}

/// Turns media key presses into actions on the hosted page.
pub struct Dispatcher<P> {
    page: PageHandle<P>,
    selectors: Arc<PageSelectors>,
}

impl<P> Clone for Dispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            page: self.page.clone(),
            selectors: self.selectors.clone(),
        }
    }
}

impl<P: PlaybackPage> Dispatcher<P> {
    pub fn new(page: PageHandle<P>, selectors: PageSelectors) -> Self {
        Self {
            page,
            selectors: Arc::new(selectors),
        }
    }

    pub fn action_for(&self, command: PlaybackCommand) -> PageAction {
        let selectors = &self.selectors;
        match command {
            PlaybackCommand::Next => PageAction::Click {
                selector: selectors.next.clone(),
            },
            PlaybackCommand::Previous => PageAction::Click {
                selector: selectors.previous.clone(),
            },
            PlaybackCommand::TogglePlayPause => PageAction::Click {
                selector: selectors.play_pause.clone(),
            },
            PlaybackCommand::Stop => PageAction::ClickIfPlaying {
                selector: selectors.play_pause.clone(),
                playing_marker: selectors.playing_marker.clone(),
            },
        }
    }

    /// Perform exactly one action for `event`, or nothing if no page is
    /// hosted. Page failures are logged and swallowed.
    pub fn dispatch(&self, event: MediaKeyEvent) -> DispatchOutcome {
        let action = self.action_for(event.command());

        let performed = self.page.with_page(|page| {
            if let Err(e) = page.perform(&action) {
                log::warn!("Media key {} not applied: {}", event, e);
            }
        });

        match performed {
            Some(()) => {
                log::debug!("Media key {} -> {:?}", event, action);
                DispatchOutcome::Dispatched(action)
            }
            None => {
                log::debug!("Media key {} dropped: no hosted page", event);
                DispatchOutcome::Dropped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fakes::FakePage;

    fn dispatcher_with(page: Option<FakePage>) -> Dispatcher<FakePage> {
        let handle = PageHandle::new();
        if let Some(page) = page {
            handle.attach(page);
        }
        Dispatcher::new(handle, PageSelectors::default())
    }

    #[test]
    fn test_stop_while_paused_clicks_nothing() {
        let page = FakePage::paused();
        let dispatcher = dispatcher_with(Some(page.clone()));

        let outcome = dispatcher.dispatch(MediaKeyEvent::Stop);

        assert!(matches!(outcome, DispatchOutcome::Dispatched(PageAction::ClickIfPlaying { .. })));
        assert!(page.clicks().is_empty());
        assert!(!page.is_playing());
    }

    #[test]
    fn test_stop_while_playing_clicks_play_pause_once() {
        let page = FakePage::playing();
        let dispatcher = dispatcher_with(Some(page.clone()));

        dispatcher.dispatch(MediaKeyEvent::Stop);

        assert_eq!(page.clicks(), vec![PageSelectors::default().play_pause]);
        assert!(!page.is_playing());
    }

    #[test]
    fn test_repeated_stop_is_idempotent() {
        let page = FakePage::playing();
        let dispatcher = dispatcher_with(Some(page.clone()));

        for _ in 0..3 {
            dispatcher.dispatch(MediaKeyEvent::Stop);
        }

        assert_eq!(page.clicks().len(), 1);
        assert!(!page.is_playing());
    }

    #[test]
    fn test_play_toggles_regardless_of_state() {
        let page = FakePage::paused();
        let dispatcher = dispatcher_with(Some(page.clone()));

        dispatcher.dispatch(MediaKeyEvent::Play);
        assert!(page.is_playing());
        dispatcher.dispatch(MediaKeyEvent::Play);
        assert!(!page.is_playing());

        assert_eq!(page.clicks().len(), 2);
    }

    #[test]
    fn test_next_and_previous_click_their_controls() {
        let page = FakePage::playing();
        let dispatcher = dispatcher_with(Some(page.clone()));
        let selectors = PageSelectors::default();

        dispatcher.dispatch(MediaKeyEvent::Next);
        dispatcher.dispatch(MediaKeyEvent::Previous);

        assert_eq!(page.clicks(), vec![selectors.next, selectors.previous]);
        assert!(page.is_playing());
    }

    #[test]
    fn test_next_without_page_is_dropped() {
        let dispatcher = dispatcher_with(None);
        assert_eq!(dispatcher.dispatch(MediaKeyEvent::Next), DispatchOutcome::Dropped);
    }

    #[test]
    fn test_page_failure_is_swallowed() {
        let page = FakePage::failing();
        let dispatcher = dispatcher_with(Some(page.clone()));

        let outcome = dispatcher.dispatch(MediaKeyEvent::Next);

        assert!(matches!(outcome, DispatchOutcome::Dispatched(_)));
        assert!(page.clicks().is_empty());
    }

    #[test]
    fn test_custom_selectors_are_used() {
        let selectors = PageSelectors {
            next: "#skip-forward".to_string(),
            ..PageSelectors::default()
        };
        let dispatcher: Dispatcher<FakePage> = Dispatcher::new(PageHandle::new(), selectors);

        assert_eq!(
            dispatcher.action_for(PlaybackCommand::Next),
            PageAction::Click {
                selector: "#skip-forward".to_string()
            }
        );
    }
}
