//! # BlockR Architecture
//!
//! BlockR is the local persistence core of a call/message-blocking app. It owns
//! the on-disk representation of three things: the contact list (with its
//! blacklist state), the time-based schedule rules and the user preferences.
//! Screens and the bundled CLI hold disposable in-memory copies and write back
//! through explicit save calls.
//!
//! Nothing here intercepts calls or enforces schedules. Blocking is bookkeeping.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints tables, sets the exit code      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Absorbs failures into bool / empty / default results     │
//! │  - Serializes writers with one async lock per collection    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Upsert by id, stamp-once blocking, whole-collection I/O  │
//! │  - Fallible: returns Result<T, BlockrError>                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Async KeyValueStore trait                                │
//! │  - FileStore (production), MemoryStore (testing)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Contract
//!
//! Below the API layer errors propagate with `?`. At the API boundary they
//! stop: a storage failure must never take the UI down with it. Every absorbed
//! failure is logged through `tracing`, and undecodable data additionally
//! produces a one-time [`api::StorageWarning`].
//!
//! ## Module Overview
//!
//! - [`api`]: The facade every consumer goes through
//! - [`commands`]: Record-level logic per collection
//! - [`store`]: Key-value abstraction and implementations
//! - [`model`]: Record types (`Contact`, `ScheduleRule`, `UserPreferences`)
//! - [`config`]: Data directory and `config.json` handling
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
