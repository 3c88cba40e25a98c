//! # Core Application Logic
//!
//! The client side of Genimate: session state, the reducer that moves it
//! between phases, and the driver that performs the I/O it asks for.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (session data) │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Session (driver)     │
//!                    └───────────┬─────────────┘
//!                                │
//!                   ┌────────────┴────────────┐
//!                   ▼                         ▼
//!            ┌────────────┐            ┌────────────┐
//!            │    TUI     │            │  Headless  │
//!            │  Adapter   │            │    CLI     │
//!            │ (ratatui)  │            │ (generate) │
//!            └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `SessionState` and its `Phase`
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`session`]: the `Session` driver that spawns and cancels tasks
//! - [`poll`]: bounded job polling
//! - [`config`]: layered configuration
//! - [`gallery`]: quick-start example prompts

pub mod action;
pub mod config;
pub mod gallery;
pub mod poll;
pub mod session;
pub mod state;
