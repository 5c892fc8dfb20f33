//! Purpose: Network-facing surface: HTTP client, session config, and pagination helpers.
//! Exports: `FanboxClient`, `query_pairs`, session resolution, and the utility walks.
//! Role: Everything that touches the network or the filesystem lives here; `core`,
//! `model`, and `render` stay pure.
//! Invariants: Calls are blocking and sequential; no retries or rate limiting.

mod client;
pub mod session;
pub mod utility;

pub use client::{API_BASE, FanboxClient, SESSION_COOKIE, WEB_ORIGIN, query_pairs};
pub use session::{Cookie, CookieFile, SessionSource, default_cookie_path, resolve_session};
pub use utility::{browsable_posts, paid_in_month, supporting_creators, unrestricted_posts};
