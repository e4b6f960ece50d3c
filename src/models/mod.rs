//! Data models for the schedule board application.
//!
//! Wire format is camelCase JSON; weekday and activity codes keep the
//! Portuguese values the board was built around.

mod activity_kind;
mod assignment;
mod grid;
mod professional;
mod time_slot;

pub use activity_kind::*;
pub use assignment::*;
pub use grid::*;
pub use professional::*;
pub use time_slot::*;
