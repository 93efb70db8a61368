//! Runtime playback: virtual clock, sink sync and notifications.

pub(crate) mod clock;
pub(crate) mod drift;
pub(crate) mod events;
pub(crate) mod player;
pub(crate) mod registry;
pub(crate) mod schedule;
pub(crate) mod sink;
