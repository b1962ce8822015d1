//! Terminal chat transcript view
//!
//! The [`transcript::Transcript`] widget renders a caller-owned list of
//! [`chatpane_core::ChatMessage`]s plus loading/thinking indicators, and
//! keeps the view scrolled to the bottom whenever those inputs change. The
//! remaining modules host it in a small viewer binary.

pub mod anchor;
pub mod app;
pub mod config;
pub mod handler;
pub mod logging;
pub mod markdown;
pub mod math;
pub mod sample;
pub mod transcript;
pub mod tui;
pub mod ui;
mod wrap;

pub use anchor::{ScrollAnchor, ScrollBehavior};
pub use transcript::{Row, RowKind, Transcript, TranscriptState};
