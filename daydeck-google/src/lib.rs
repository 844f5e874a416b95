//! Google Calendar integration for daydeck.
//!
//! Handles the OAuth consent flow (loopback redirect), session persistence
//! with token refresh, and a read-only listing of today's events. The CLI
//! calls this in-process; there is no separate provider binary.

pub mod app_config;
pub mod auth;
pub mod events;
pub mod session;

pub use events::{CalendarEvent, EventWhen, list_today};
pub use session::{NeedsReauth, Session};
