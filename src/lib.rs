//! Core of a personal wellness journal.
//!
//! - [`enhance`]: polish an entry through a remote language model, with an
//!   offline formatter when the model is unavailable
//! - [`journal`], [`storage`]: entries and their file attachments
//! - [`mood`], [`stats`]: mood vocabulary, session streaks, and scores
//! - [`greeting`]: localized time-of-day greetings
//! - [`auth`]: PIN/biometric lock in front of the journal
//! - [`state`], [`config`]: persisted state and runtime configuration
pub mod auth;
pub mod completion;
pub mod config;
pub mod enhance;
pub mod greeting;
pub mod journal;
pub mod mood;
pub mod state;
pub mod stats;
pub mod storage;
pub mod util;
