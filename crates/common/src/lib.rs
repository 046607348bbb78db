//! Common utilities and shared types for filmgraph.
//!
//! This crate provides foundational components used across all filmgraph crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Identifiers**: Id aliases for the external entities and [`EntityKind`]
//!
//! # Example
//!
//! ```no_run
//! use filmgraph_common::{AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     println!("Feed limit cap: {}", config.feed.max_limit);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::{EntityKind, EventId, FilmId, GenreId, ReviewId, UserId};
