//! Purpose: Schema-tolerant client library for the pixivFANBOX JSON API.
//! Exports: `core` (decoding, coercion, union resolution, errors), `model` (typed nodes),
//! `render` (post body to markdown), `api` (HTTP client, session, helpers), `notice`.
//! Role: Library backing the `fanbox` CLI and tests.
//! Invariants: Decoding never drops unknown keys; they land in each node's `extra`.
//! Invariants: `core`, `model`, and `render` perform no I/O.
pub mod api;
pub mod core;
pub mod model;
pub mod notice;
pub mod render;

pub use crate::core::decode::{Decode, Decoded, decode, decode_str};
pub use crate::core::diag::{Diagnostic, DiagnosticKind, Diagnostics};
pub use crate::core::encode::{Encode, encode};
pub use crate::core::error::{Error, ErrorKind, to_exit_code};
pub use crate::core::field::Field;
pub use crate::render::{render_markdown, render_markdown_with};
