//! Choropleth figure of wins per country
//!
//! The figure is a plotly.js figure description (`data` + `layout`),
//! serialized to JSON and handed to `Plotly.newPlot` in the page.

use crate::aggregate::WinCount;
use serde::Serialize;

/// Title shown above the map
pub const MAP_TITLE: &str = "FIFA World Cup Winners by Country";

/// Continuous colour scale used for win counts
pub const COLOR_SCALE: &str = "Blues";

/// Complete figure: one choropleth trace plus layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<ChoroplethTrace>,
    pub layout: Layout,
}

/// A choropleth trace, one location per country
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethTrace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    pub locations: Vec<String>,
    #[serde(rename = "locationmode")]
    pub location_mode: &'static str,
    /// Win count per location, same order as `locations`
    pub z: Vec<u32>,
    #[serde(rename = "colorscale")]
    pub color_scale: &'static str,
    #[serde(rename = "reversescale")]
    pub reverse_scale: bool,
    #[serde(rename = "hovertemplate")]
    pub hover_template: &'static str,
    #[serde(rename = "colorbar")]
    pub color_bar: ColorBar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub geo: Geo,
    pub margin: Margin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geo {
    #[serde(rename = "showframe")]
    pub show_frame: bool,
    #[serde(rename = "showcoastlines")]
    pub show_coastlines: bool,
    pub projection: Projection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    #[serde(rename = "type")]
    pub projection_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

/// Build the map from a win-count snapshot.
///
/// Locations are emitted in lexical order so the JSON is stable between
/// runs; plotly does not care about the order.
pub fn build_figure(wins: &WinCount) -> Figure {
    let countries = wins.countries_sorted();
    let z = countries
        .iter()
        .map(|country| wins.get(country).unwrap_or_default())
        .collect();

    Figure {
        data: vec![ChoroplethTrace {
            trace_type: "choropleth",
            locations: countries.iter().map(|c| c.to_string()).collect(),
            location_mode: "country names",
            z,
            color_scale: COLOR_SCALE,
            // plotly's named "Blues" runs dark to light; flip so more wins is darker
            reverse_scale: true,
            hover_template: "<b>%{location}</b><br>Wins=%{z}<extra></extra>",
            color_bar: ColorBar {
                title: Title {
                    text: "Wins".to_string(),
                },
            },
        }],
        layout: Layout {
            title: Title {
                text: MAP_TITLE.to_string(),
            },
            geo: Geo {
                show_frame: false,
                show_coastlines: true,
                projection: Projection {
                    projection_type: "natural earth",
                },
            },
            margin: Margin {
                l: 0,
                r: 0,
                t: 48,
                b: 0,
            },
        },
    }
}
