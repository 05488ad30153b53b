//! Roster Core - attendance tracking and item eligibility
//!
//! Models a group roster: members attend a fixed set of tracked events,
//! categories (equipment slots) hold items, and members pick the items they
//! want. The eligibility engine answers which members may receive a dropped
//! item.
//!
//! # Architecture
//!
//! - **Models**: [`Member`], [`Category`], [`Item`], [`Attendance`]
//! - **Roster**: the persisted document and its mutations
//! - **Selector**: a single category or a fixed group of parallel categories
//! - **Eligibility**: pure evaluation over a roster snapshot
//!
//! # Example
//!
//! ```
//! use roster_core::{evaluate, Attendance, CategorySelector, Roster};
//!
//! let mut roster = Roster::default();
//! let ring1 = roster.add_category("Ring 1").unwrap();
//! let ring2 = roster.add_category("Ring 2").unwrap();
//! let signet1 = roster.add_item(&ring1.id, "Signet").unwrap();
//! let signet2 = roster.add_item(&ring2.id, "Signet").unwrap();
//!
//! let alice = roster.add_member("Alice").unwrap();
//! roster.set_attendance(&alice.id, Attendance::filled(true)).unwrap();
//! roster.assign_item(&alice.id, &ring2.id, &signet2.id).unwrap();
//!
//! let eligible = evaluate(&roster, &CategorySelector::parse("ring"), &signet1.id);
//! assert_eq!(eligible[0].name, "Alice");
//! ```

pub mod eligibility;
pub mod error;
pub mod ids;
pub mod models;
pub mod roster;
pub mod selector;

pub use eligibility::{evaluate, MatchScope};
pub use error::{Error, Result};
pub use models::{
    Assignment, Attendance, Category, EventLabels, Item, Member, ATTENDANCE_THRESHOLD, EVENT_COUNT,
};
pub use roster::{ResolvedAssignment, Roster};
pub use selector::{CategoryGroup, CategorySelector};
