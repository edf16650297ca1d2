#![forbid(unsafe_code)]

//! Process-wide default dispose event.
//!
//! Bags and direct attachments built without an explicit event read this
//! value once, at construction. Changing it later does not affect anything
//! already built: it is a configuration knob, not a live setting.
//!
//! The initial value comes from the `DISPOSEBAG_DEFAULT_EVENT` environment
//! variable (`pause`, `stop`, `destroy`, optionally `on_`-prefixed), read on
//! first access. Unset or invalid values fall back to
//! [`DisposeEvent::Destroy`].

use std::sync::{LazyLock, RwLock};

use disposebag_core::DisposeEvent;
use tracing::warn;

/// Environment variable holding the initial default event.
pub const DEFAULT_EVENT_ENV: &str = "DISPOSEBAG_DEFAULT_EVENT";

static DEFAULT_DISPOSE_EVENT: LazyLock<RwLock<DisposeEvent>> =
    LazyLock::new(|| RwLock::new(default_event_from_env()));

/// The event new bags and attachments dispose on when none is given.
#[must_use]
pub fn default_dispose_event() -> DisposeEvent {
    DEFAULT_DISPOSE_EVENT
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

/// Replace the default event for bags and attachments built from now on.
pub fn set_default_dispose_event(event: DisposeEvent) {
    if let Ok(mut guard) = DEFAULT_DISPOSE_EVENT.write() {
        *guard = event;
    }
}

/// Restore the built-in default, [`DisposeEvent::Destroy`].
///
/// This ignores `DISPOSEBAG_DEFAULT_EVENT`.
pub fn reset_default_dispose_event() {
    set_default_dispose_event(DisposeEvent::Destroy);
}

fn default_event_from_env() -> DisposeEvent {
    default_event_from_env_impl(|key| std::env::var(key).ok())
}

fn default_event_from_env_impl<F>(get_env: F) -> DisposeEvent
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = get_env(DEFAULT_EVENT_ENV) else {
        return DisposeEvent::default();
    };
    match raw.parse() {
        Ok(event) => event,
        Err(err) => {
            warn!(env = DEFAULT_EVENT_ENV, %err, "ignoring invalid default dispose event");
            DisposeEvent::default()
        }
    }
}
