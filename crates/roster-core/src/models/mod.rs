//! Roster models.
//!
//! - [`Member`] - participant with [`Attendance`] and item [`Assignment`]s
//! - [`Category`] - named slot holding [`Item`]s
//! - [`EventLabels`] - presentational metadata for the tracked event slots

mod attendance;
mod category;
mod event;
mod member;

pub use attendance::{Attendance, ATTENDANCE_THRESHOLD, EVENT_COUNT};
pub use category::{Category, Item};
pub use event::EventLabels;
pub use member::{Assignment, Member};
