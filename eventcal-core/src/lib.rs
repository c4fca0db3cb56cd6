//! Event calendar core.
//!
//! This crate holds everything behind a multi-view event calendar:
//! - `event` / `record`: the item model and raw store rows
//! - `utils`: month and week grids, pixel positioning, formatting
//! - `filter`: the multi-criteria filter engine
//! - `view`: month, week, day, employee and mobile layouts
//! - `calendar`: the orchestrator tying state, store and views together
//! - `wizard`: the event and meeting creation forms
//! - `store`: the seam to the backing store and its change stream

pub mod calendar;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod record;
pub mod store;
pub mod tooltip;
pub mod utils;
pub mod view;
pub mod wizard;

pub use calendar::{Calendar, Direction, ViewState};
pub use error::{CalendarError, CalendarResult};
pub use event::*;
pub use filter::{FilterAction, FilterSet, apply_filters};
pub use view::{ViewLayout, ViewMode};
