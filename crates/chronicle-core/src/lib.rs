//! # Chronicle Core Library
//!
//! Temporal engine of a personal calendar: recurring events, calendar views
//! and per-label time statistics under per-user timezones.
//!
//! ## Features
//!
//! - **Recurrence Expansion**: Daily, weekly, monthly and yearly rules with
//!   intervals, expanded in the event's authoring timezone
//! - **Materialization**: Elapsed occurrences are solidified into persisted
//!   events exactly once, updating label time buckets in the same transaction
//! - **Virtual Projection**: Future occurrences are shown but never written
//! - **Calendar Views**: Day and Monday-start week views in the user's zone
//! - **Badge Statistics**: Day/week/month/all-time minutes per set of labels,
//!   with ISO-8601 week-year rollover
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures
//! - [`repository`]: Storage traits and the SQLite implementation
//! - [`clock`]: Per-user "now" resolution
//! - [`recurrence`]: Recurrence expansion
//! - [`materialization`]: Solidifying elapsed occurrences
//! - [`projection`]: Virtual occurrences
//! - [`view`]: Day and week composition
//! - [`buckets`]: Statistical bucket keys
//! - [`stats`]: Badge statistics
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chronicle_core::{
//!     clock::{SystemClockProvider, UserContext},
//!     config::EngineConfig,
//!     db,
//!     repository::SqliteRepository,
//!     view::ViewComposer,
//! };
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::establish_connection("chronicle.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!
//!     let user_id = Uuid::now_v7();
//!     let clocks = SystemClockProvider::new(repo.clone(), chrono_tz::Tz::UTC);
//!     let ctx = UserContext::resolve(&clocks, user_id).await?;
//!
//!     let composer = ViewComposer::new(&repo, EngineConfig::default().expander());
//!     let today = composer.generate_day_view(&ctx, ctx.clock.today()).await?;
//!     println!("{} entries today", today.entries.len());
//!
//!     Ok(())
//! }
//! ```

pub mod buckets;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod materialization;
pub mod models;
pub mod projection;
pub mod recurrence;
pub mod repository;
pub mod stats;
pub mod timezone;
pub mod view;
pub mod window;
