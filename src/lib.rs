//! worldcup-dashboard - An interactive FIFA World Cup finals dashboard
//!
//! Loads a CSV of World Cup finals, counts wins per country and serves a
//! page with a choropleth map and two dropdown-driven lookups.
//!
//! # Features
//!
//! - Load and validate the finals CSV, folding "West Germany" into "Germany"
//! - Count wins per country
//! - Build a plotly.js choropleth of wins
//! - Serve the dashboard over HTTP, or export it as a static page
//!
//! # Example
//!
//! ```no_run
//! use worldcup_dashboard::{callbacks, context::AppContext};
//!
//! let ctx = AppContext::load("fifa_world_cup_finals.csv".as_ref()).unwrap();
//!
//! println!("{}", callbacks::update_wins(&ctx, "Brazil"));
//! println!("{}", callbacks::update_year(&ctx, 2022));
//! ```

pub mod aggregate;
pub mod callbacks;
pub mod context;
pub mod data;
pub mod error;
pub mod figure;
pub mod html;
pub mod server;

pub use error::{DataLoadError, Error, LookupMiss, Result};
