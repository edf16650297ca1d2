#![forbid(unsafe_code)]

//! Lifecycle states and the transition events between them.
//!
//! # Design
//!
//! States form a strict order:
//!
//! ```text
//! Destroyed < Initialized < Created < Started < Resumed
//! ```
//!
//! Every [`LifecycleEvent`] moves exactly one step along that order. Moving
//! "up" emits `Create`, `Start`, `Resume`; moving "down" emits `Pause`,
//! `Stop`, `Destroy`. The intermediate states are observable through
//! [`LifecycleOwner::current_state`](crate::LifecycleOwner::current_state),
//! but only the down events can trigger disposal, which is why
//! [`DisposeEvent`] is a separate, narrower enum.

use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// LifecycleState
// ---------------------------------------------------------------------------

/// Current state of a lifecycle owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    /// Terminal state. No further events are dispatched.
    Destroyed,
    /// Constructed but not yet created.
    Initialized,
    Created,
    Started,
    Resumed,
}

impl LifecycleState {
    /// Returns true if this state is at least `other` in lifecycle order.
    #[must_use]
    pub fn is_at_least(self, other: Self) -> bool {
        self >= other
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Destroyed => "destroyed",
            Self::Initialized => "initialized",
            Self::Created => "created",
            Self::Started => "started",
            Self::Resumed => "resumed",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

/// A single-step transition between two adjacent [`LifecycleState`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Create,
    Start,
    Resume,
    Pause,
    Stop,
    Destroy,
}

impl LifecycleEvent {
    /// The state an owner is in right after this event.
    #[must_use]
    pub const fn target_state(self) -> LifecycleState {
        match self {
            Self::Create | Self::Stop => LifecycleState::Created,
            Self::Start | Self::Pause => LifecycleState::Started,
            Self::Resume => LifecycleState::Resumed,
            Self::Destroy => LifecycleState::Destroyed,
        }
    }

    /// The event that moves one step up from `state`, if any.
    #[must_use]
    pub const fn up_from(state: LifecycleState) -> Option<Self> {
        match state {
            LifecycleState::Initialized => Some(Self::Create),
            LifecycleState::Created => Some(Self::Start),
            LifecycleState::Started => Some(Self::Resume),
            LifecycleState::Resumed | LifecycleState::Destroyed => None,
        }
    }

    /// The event that moves one step down from `state`, if any.
    ///
    /// `Initialized` has no down event: an owner that was never created goes
    /// straight to `Destroyed` without notifying anyone.
    #[must_use]
    pub const fn down_from(state: LifecycleState) -> Option<Self> {
        match state {
            LifecycleState::Resumed => Some(Self::Pause),
            LifecycleState::Started => Some(Self::Stop),
            LifecycleState::Created => Some(Self::Destroy),
            LifecycleState::Initialized | LifecycleState::Destroyed => None,
        }
    }

    /// Returns true for `Pause`, `Stop`, and `Destroy`.
    #[must_use]
    pub const fn is_down(self) -> bool {
        matches!(self, Self::Pause | Self::Stop | Self::Destroy)
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Start => "start",
            Self::Resume => "resume",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Destroy => "destroy",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// DisposeEvent
// ---------------------------------------------------------------------------

/// The lifecycle events a bag or attachment can dispose on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisposeEvent {
    Pause,
    Stop,
    #[default]
    Destroy,
}

impl DisposeEvent {
    /// All variants, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Pause, Self::Stop, Self::Destroy];

    /// The lifecycle event this maps to.
    #[must_use]
    pub const fn lifecycle_event(self) -> LifecycleEvent {
        match self {
            Self::Pause => LifecycleEvent::Pause,
            Self::Stop => LifecycleEvent::Stop,
            Self::Destroy => LifecycleEvent::Destroy,
        }
    }

    /// Returns true if `event` is the event this value stands for.
    #[inline]
    #[must_use]
    pub fn matches(self, event: LifecycleEvent) -> bool {
        Self::try_from(event) == Ok(self)
    }
}

impl From<DisposeEvent> for LifecycleEvent {
    fn from(event: DisposeEvent) -> Self {
        event.lifecycle_event()
    }
}

impl TryFrom<LifecycleEvent> for DisposeEvent {
    type Error = LifecycleEvent;

    fn try_from(event: LifecycleEvent) -> Result<Self, Self::Error> {
        match event {
            LifecycleEvent::Pause => Ok(Self::Pause),
            LifecycleEvent::Stop => Ok(Self::Stop),
            LifecycleEvent::Destroy => Ok(Self::Destroy),
            other => Err(other),
        }
    }
}

impl fmt::Display for DisposeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.lifecycle_event(), f)
    }
}

/// Error returned when a string does not name a [`DisposeEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDisposeEventError(pub String);

impl fmt::Display for ParseDisposeEventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown dispose event '{}' (expected pause, stop, or destroy)",
            self.0
        )
    }
}

impl std::error::Error for ParseDisposeEventError {}

impl FromStr for DisposeEvent {
    type Err = ParseDisposeEventError;

    /// Accepts `pause`, `stop`, `destroy`, case-insensitive, with an
    /// optional `on_` prefix (`ON_DESTROY`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower.strip_prefix("on_").unwrap_or(&lower);
        match name {
            "pause" => Ok(Self::Pause),
            "stop" => Ok(Self::Stop),
            "destroy" => Ok(Self::Destroy),
            _ => Err(ParseDisposeEventError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_order() {
        assert!(LifecycleState::Destroyed < LifecycleState::Initialized);
        assert!(LifecycleState::Initialized < LifecycleState::Created);
        assert!(LifecycleState::Created < LifecycleState::Started);
        assert!(LifecycleState::Started < LifecycleState::Resumed);
        assert!(LifecycleState::Resumed.is_at_least(LifecycleState::Started));
        assert!(!LifecycleState::Created.is_at_least(LifecycleState::Started));
    }

    #[test]
    fn up_events_walk_to_resumed() {
        let mut state = LifecycleState::Initialized;
        let mut seen = Vec::new();
        while let Some(event) = LifecycleEvent::up_from(state) {
            seen.push(event);
            state = event.target_state();
        }
        assert_eq!(
            seen,
            vec![
                LifecycleEvent::Create,
                LifecycleEvent::Start,
                LifecycleEvent::Resume
            ]
        );
        assert_eq!(state, LifecycleState::Resumed);
    }

    #[test]
    fn down_events_walk_to_destroyed() {
        let mut state = LifecycleState::Resumed;
        let mut seen = Vec::new();
        while let Some(event) = LifecycleEvent::down_from(state) {
            assert!(event.is_down());
            seen.push(event);
            state = event.target_state();
        }
        assert_eq!(
            seen,
            vec![
                LifecycleEvent::Pause,
                LifecycleEvent::Stop,
                LifecycleEvent::Destroy
            ]
        );
        assert_eq!(state, LifecycleState::Destroyed);
    }

    #[test]
    fn initialized_has_no_down_event() {
        assert_eq!(LifecycleEvent::down_from(LifecycleState::Initialized), None);
        assert_eq!(LifecycleEvent::up_from(LifecycleState::Destroyed), None);
    }

    #[test]
    fn dispose_event_default_is_destroy() {
        assert_eq!(DisposeEvent::default(), DisposeEvent::Destroy);
    }

    #[test]
    fn dispose_event_matches_only_its_event() {
        for target in DisposeEvent::ALL {
            let hits: Vec<_> = [
                LifecycleEvent::Create,
                LifecycleEvent::Start,
                LifecycleEvent::Resume,
                LifecycleEvent::Pause,
                LifecycleEvent::Stop,
                LifecycleEvent::Destroy,
            ]
            .into_iter()
            .filter(|e| target.matches(*e))
            .collect();
            assert_eq!(hits, vec![target.lifecycle_event()]);
        }
    }

    #[test]
    fn try_from_rejects_up_events() {
        assert_eq!(
            DisposeEvent::try_from(LifecycleEvent::Stop),
            Ok(DisposeEvent::Stop)
        );
        assert_eq!(
            DisposeEvent::try_from(LifecycleEvent::Start),
            Err(LifecycleEvent::Start)
        );
    }

    #[test]
    fn parse_accepts_prefix_and_case() {
        assert_eq!("pause".parse::<DisposeEvent>(), Ok(DisposeEvent::Pause));
        assert_eq!("ON_STOP".parse::<DisposeEvent>(), Ok(DisposeEvent::Stop));
        assert_eq!(" On_Destroy ".parse::<DisposeEvent>(), Ok(DisposeEvent::Destroy));
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "resume".parse::<DisposeEvent>().unwrap_err();
        assert_eq!(err, ParseDisposeEventError("resume".to_string()));
        assert!(err.to_string().contains("resume"));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for event in DisposeEvent::ALL {
            assert_eq!(event.to_string().parse::<DisposeEvent>(), Ok(event));
        }
    }
}
