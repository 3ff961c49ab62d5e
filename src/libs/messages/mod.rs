//! User-facing text for castline.
//!
//! Every string shown to a user or written to the log is a [`Message`]
//! variant; [`display`] turns variants into text and [`macros`] routes the
//! text to the console or to `tracing`.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
