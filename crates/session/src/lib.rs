//! Session: the owned context tying UI actions to the builder and viewer.
//!
//! # Invariants
//! - Every front end drives the session through [`Action`]s; none of them
//!   touch the viewer or builder directly.
//! - At most one generation is in flight; a newer request or a prebuilt
//!   selection cancels it.
//! - Time is injected, never read from a global clock inside the session.

pub mod action;
pub mod generation;
pub mod notify;
pub mod session;

pub use action::Action;
pub use generation::{Generator, PendingGeneration, Ticket};
pub use notify::{Level, Notification, Notifications};
pub use session::{FrameOutcome, Session, SessionConfig, SessionError};

pub fn crate_info() -> &'static str {
    "eduverse-session v0.1.0"
}
