use std::fmt;
use std::sync::Arc;

/// A media key press, normalized regardless of whether it arrived over the
/// session bus or through a global shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKeyEvent {
    Next,
    Previous,
    Play,
    Stop,
}

impl MediaKeyEvent {
    /// Parse a key name as broadcast by a desktop settings daemon.
    ///
    /// Matching is exact and case-sensitive. Names outside the supported set
    /// (e.g. "Pause", "Rewind") yield `None` and the signal is discarded.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "Next" => Some(Self::Next),
            "Previous" => Some(Self::Previous),
            "Play" => Some(Self::Play),
            "Stop" => Some(Self::Stop),
            _ => None,
        }
    }

    pub fn key_name(self) -> &'static str {
        match self {
            Self::Next => "Next",
            Self::Previous => "Previous",
            Self::Play => "Play",
            Self::Stop => "Stop",
        }
    }

    pub fn command(self) -> PlaybackCommand {
        match self {
            Self::Next => PlaybackCommand::Next,
            Self::Previous => PlaybackCommand::Previous,
            Self::Play => PlaybackCommand::TogglePlayPause,
            Self::Stop => PlaybackCommand::Stop,
        }
    }
}

impl fmt::Display for MediaKeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_name())
    }
}

/// What the hosted player should do in response to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Next,
    Previous,
    TogglePlayPause,
    /// Pause only if currently playing.
    Stop,
}

/// Receiver of key presses from either provider.
pub type KeySink = Arc<dyn Fn(MediaKeyEvent) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_key_names_map_to_one_command_each() {
        let cases = [
            ("Next", PlaybackCommand::Next),
            ("Previous", PlaybackCommand::Previous),
            ("Play", PlaybackCommand::TogglePlayPause),
            ("Stop", PlaybackCommand::Stop),
        ];

        for (name, expected) in cases {
            let event = MediaKeyEvent::from_key_name(name)
                .unwrap_or_else(|| panic!("{name} should be recognized"));
            assert_eq!(event.command(), expected);
            assert_eq!(event.key_name(), name);
        }
    }

    #[test]
    fn test_unknown_key_names_are_dropped() {
        for name in ["Pause", "next", "STOP", "", " Play", "Rewind", "FastForward"] {
            assert_eq!(MediaKeyEvent::from_key_name(name), None, "{name:?}");
        }
    }

    #[test]
    fn test_display_uses_bus_key_name() {
        assert_eq!(MediaKeyEvent::Previous.to_string(), "Previous");
    }
}
