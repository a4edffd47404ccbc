//! Playback control of the hosted web player.

mod dispatcher;
mod page;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use page::{PageAction, PageError, PageHandle, PageSelectors, PlaybackPage};
