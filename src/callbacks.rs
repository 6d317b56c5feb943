//! Selection handlers and the callback dispatcher
//!
//! Each dropdown on the page is wired to exactly one output region. A
//! change event arrives as an [`UpdateRequest`] naming the dropdown and its
//! new value; the [`Dispatcher`] finds the subscribed handler, runs it
//! against the shared [`AppContext`] and returns the text for the output
//! region.
//!
//! Handlers are plain functions, so they can be tested without a server.

use crate::context::AppContext;
use crate::error::{Error, LookupMiss, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Country selector id
pub const COUNTRY_DROPDOWN: &str = "country_dropdown";
/// Output region for the country selector
pub const WIN_OUTPUT: &str = "win_output";
/// Year selector id
pub const YEAR_DROPDOWN: &str = "year_dropdown";
/// Output region for the year selector
pub const YEAR_OUTPUT: &str = "year_output";

/// Text for a country's win count
pub fn country_wins(ctx: &AppContext, country: &str) -> std::result::Result<String, LookupMiss> {
    ctx.wins()
        .get(country)
        .map(|wins| format!("{} has won {} World Cups.", country, wins))
        .ok_or_else(|| LookupMiss::Country(country.to_string()))
}

/// Text for the final played in a given year
pub fn final_result(ctx: &AppContext, year: i32) -> std::result::Result<String, LookupMiss> {
    ctx.dataset()
        .find_by_year(year)
        .map(|record| {
            format!(
                "In {}, {} won the World Cup, defeating {}.",
                year, record.winner, record.runner_up
            )
        })
        .ok_or_else(|| LookupMiss::Year(year.to_string()))
}

/// Country selection handler; a miss becomes its "no data" text
pub fn update_wins(ctx: &AppContext, country: &str) -> String {
    country_wins(ctx, country).unwrap_or_else(absorb)
}

/// Year selection handler; a miss becomes its "no data" text
pub fn update_year(ctx: &AppContext, year: i32) -> String {
    final_result(ctx, year).unwrap_or_else(absorb)
}

fn absorb(miss: LookupMiss) -> String {
    warn!("Lookup miss: {}", miss);
    miss.to_string()
}

/// A selection change sent by the page
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UpdateRequest {
    /// Id of the control that changed
    pub input: String,
    /// New value of the control
    pub value: Value,
}

/// New content for one output region
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UpdateResponse {
    /// Id of the output region to replace
    pub output: String,
    /// Replacement text
    pub children: String,
}

type Handler = fn(&AppContext, &Value) -> String;

/// One subscription: changes to `input` recompute `output`
#[derive(Clone)]
pub struct Callback {
    pub input: &'static str,
    pub output: &'static str,
    handler: Handler,
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("input", &self.input)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl Callback {
    pub fn call(&self, ctx: &AppContext, value: &Value) -> String {
        (self.handler)(ctx, value)
    }
}

/// Routes selection changes to their handlers
#[derive(Debug, Clone)]
pub struct Dispatcher {
    callbacks: Vec<Callback>,
}

impl Default for Dispatcher {
    /// The dashboard's two subscriptions
    fn default() -> Self {
        Self::new()
            .subscribe(COUNTRY_DROPDOWN, WIN_OUTPUT, on_country)
            .subscribe(YEAR_DROPDOWN, YEAR_OUTPUT, on_year)
    }
}

impl Dispatcher {
    /// Dispatcher with no subscriptions
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    /// Subscribe `handler` to changes of `input`, writing to `output`
    pub fn subscribe(
        mut self,
        input: &'static str,
        output: &'static str,
        handler: Handler,
    ) -> Self {
        self.callbacks.push(Callback {
            input,
            output,
            handler,
        });
        self
    }

    pub fn callbacks(&self) -> &[Callback] {
        &self.callbacks
    }

    /// Run the handler subscribed to `request.input`
    pub fn dispatch(&self, ctx: &AppContext, request: &UpdateRequest) -> Result<UpdateResponse> {
        let callback = self
            .callbacks
            .iter()
            .find(|c| c.input == request.input)
            .ok_or_else(|| Error::UnknownInput(request.input.clone()))?;

        debug!("Dispatching {} = {}", callback.input, request.value);

        Ok(UpdateResponse {
            output: callback.output.to_string(),
            children: callback.call(ctx, &request.value),
        })
    }
}

fn on_country(ctx: &AppContext, value: &Value) -> String {
    match value.as_str() {
        Some(country) => update_wins(ctx, country),
        None => absorb(LookupMiss::Country(raw_text(value))),
    }
}

fn on_year(ctx: &AppContext, value: &Value) -> String {
    match parse_year(value) {
        Some(year) => update_year(ctx, year),
        None => absorb(LookupMiss::Year(raw_text(value))),
    }
}

/// Years arrive as numbers from the page, or as strings from hand-written requests
fn parse_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
