//! Scheduling engine for plancal.
//!
//! This crate holds everything the server and CLI share:
//! - `event` types and the `EventLike` trait
//! - calendar arithmetic in `date`
//! - recurrence expansion, overlap detection, notifications and filtering
//! - the public holidays shown on the month grid
//! - form validation and the global config
//! - `protocol` bodies for the HTTP API

pub mod clock;
pub mod config;
pub mod date;
pub mod error;
pub mod event;
pub mod filter;
pub mod holiday;
pub mod notification;
pub mod overlap;
pub mod protocol;
pub mod recurrence;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use self::config::PlanCalConfig;
pub use date::{Direction, View};
pub use error::{PlanCalError, PlanCalResult};
pub use event::*;
pub use holiday::holidays_for_month;
pub use notification::{Notification, NotificationCenter, Poller};
pub use overlap::OverlapPolicy;
pub use validation::FormError;
