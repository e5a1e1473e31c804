//! Core library for the `weather` lookup client.
//!
//! This crate defines:
//! - Configuration of the weather service endpoint
//! - The HTTP client behind the [`LookupClient`] seam
//! - The lookup form state machine and its effect runner
//! - Shared domain models and their text projection
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod model;
pub mod render;
pub mod runtime;

pub use client::{LookupClient, client_from_config, http::HttpLookupClient};
pub use config::{Config, ServiceConfig};
pub use error::{FormError, LookupError};
pub use form::{Effect, Generation, LookupForm, LookupOutcome, Msg, ViewState, update};
pub use model::{Astro, CreatedRecord, Location, LookupResult, Scalar, Weather, WeatherRequest};
pub use render::{Projection, project, render, render_state};
