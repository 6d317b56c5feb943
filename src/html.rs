//! HTML dashboard page with plotly.js
//!
//! One template serves two modes. Live pages post every dropdown change
//! to `/_update`; static pages carry every possible answer precomputed and
//! never talk to a server.

use crate::callbacks::{
    Dispatcher, UpdateRequest, UpdateResponse, COUNTRY_DROPDOWN, WIN_OUTPUT, YEAR_DROPDOWN,
    YEAR_OUTPUT,
};
use crate::context::AppContext;
use crate::error::{Error, Result};
use chrono::Utc;
use minijinja::{context, Environment};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// HTML template for the dashboard page
const DASHBOARD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <script src="https://cdn.plot.ly/plotly-2.35.2.min.js" charset="utf-8"></script>
    <style>
        :root {
            --bg-primary: #f6f8fa;
            --bg-card: #ffffff;
            --text-primary: #1f2328;
            --text-secondary: #59636e;
            --border-color: #d1d9e0;
            --accent-blue: #0969da;
        }

        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            line-height: 1.6;
        }

        .container {
            max-width: 1100px;
            margin: 0 auto;
            padding: 2rem;
        }

        h1 {
            text-align: center;
            font-size: 2.25rem;
            font-weight: 600;
            margin-bottom: 1.5rem;
        }

        .card {
            background: var(--bg-card);
            border: 1px solid var(--border-color);
            border-radius: 12px;
            padding: 1.25rem 1.5rem;
            margin-bottom: 1.5rem;
        }

        #world_cup_map {
            height: 520px;
        }

        label {
            display: block;
            font-weight: 500;
            margin-bottom: 0.5rem;
        }

        select {
            width: 100%;
            padding: 0.5rem 0.75rem;
            font-size: 1rem;
            border: 1px solid var(--border-color);
            border-radius: 6px;
            background: var(--bg-card);
            color: var(--text-primary);
        }

        .output {
            margin-top: 0.75rem;
            font-size: 1.1rem;
            color: var(--accent-blue);
            min-height: 1.6em;
        }

        footer {
            text-align: center;
            color: var(--text-secondary);
            font-size: 0.9rem;
        }

        @media (max-width: 768px) {
            .container {
                padding: 1rem;
            }

            h1 {
                font-size: 1.6rem;
            }

            #world_cup_map {
                height: 340px;
            }
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>{{ title }}</h1>

        <div class="card">
            <div id="world_cup_map"></div>
        </div>

        <div class="card">
            <label for="{{ country_input }}">Select a Country to View Wins:</label>
            <select id="{{ country_input }}" data-output="{{ win_output }}">
                {% for country in countries %}
                <option value="{{ country }}"{% if country == selected_country %} selected{% endif %}>{{ country }}</option>
                {% endfor %}
            </select>
            <div id="{{ win_output }}" class="output">{{ win_text }}</div>
        </div>

        <div class="card">
            <label for="{{ year_input }}">Select a Year to View Winner &amp; Runner-up:</label>
            <select id="{{ year_input }}" data-output="{{ year_output }}" data-numeric="true">
                {% for year in years %}
                <option value="{{ year }}"{% if year == selected_year %} selected{% endif %}>{{ year }}</option>
                {% endfor %}
            </select>
            <div id="{{ year_output }}" class="output">{{ year_text }}</div>
        </div>

        {% if generated_at %}
        <footer>
            <p>Generated {{ generated_at }}</p>
        </footer>
        {% endif %}
    </div>

    <script>
        const FIGURE = {{ figure | tojson }};
        const STATIC_OUTPUTS = {{ static_outputs | tojson }};

        async function requestUpdate(input, value) {
            if (STATIC_OUTPUTS) {
                return STATIC_OUTPUTS[input][String(value)];
            }
            const response = await fetch('/_update', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ input, value })
            });
            if (!response.ok) {
                throw new Error(await response.text());
            }
            return response.json();
        }

        document.addEventListener('DOMContentLoaded', function() {
            Plotly.newPlot('world_cup_map', FIGURE.data, FIGURE.layout, { responsive: true });

            document.querySelectorAll('select[data-output]').forEach(select => {
                select.addEventListener('change', async () => {
                    const value = select.dataset.numeric ? Number(select.value) : select.value;
                    try {
                        const update = await requestUpdate(select.id, value);
                        document.getElementById(update.output).textContent = update.children;
                    } catch (err) {
                        document.getElementById(select.dataset.output).textContent = 'Update failed: ' + err.message;
                    }
                });
            });
        });
    </script>
</body>
</html>
"#;

/// Page heading
pub const DEFAULT_TITLE: &str = "FIFA World Cup Dashboard";

/// Country selected when the page loads
pub const DEFAULT_COUNTRY: &str = "Brazil";

/// Year selected when the page loads
pub const DEFAULT_YEAR: i32 = 2022;

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Page heading and document title
    pub title: String,
    /// Initially selected country
    pub default_country: String,
    /// Initially selected year
    pub default_year: i32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            default_country: DEFAULT_COUNTRY.to_string(),
            default_year: DEFAULT_YEAR,
        }
    }
}

/// How the page obtains callback outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Post changes to the server
    Live,
    /// Embed every output; no server needed
    Static,
}

/// Precomputed outputs: input id -> option value -> response
type StaticOutputs = BTreeMap<&'static str, BTreeMap<String, UpdateResponse>>;

/// Render the dashboard page
pub fn generate_dashboard(
    ctx: &AppContext,
    dispatcher: &Dispatcher,
    config: &DashboardConfig,
    mode: RenderMode,
) -> Result<String> {
    let mut env = Environment::new();
    // the .html suffix turns on HTML auto-escaping
    env.add_template("dashboard.html", DASHBOARD_TEMPLATE)?;

    let template = env.get_template("dashboard.html")?;

    let countries = ctx.wins().countries_sorted();
    let years: Vec<i32> = ctx.dataset().years().collect();

    let selected_country = initial_country(ctx, config);
    let selected_year = initial_year(ctx, config);

    let win_text = dispatch(
        ctx,
        dispatcher,
        COUNTRY_DROPDOWN,
        Value::from(selected_country.clone()),
    )?
    .children;
    let year_text = dispatch(ctx, dispatcher, YEAR_DROPDOWN, Value::from(selected_year))?.children;

    let (outputs, generated_at) = match mode {
        RenderMode::Live => (None, None),
        RenderMode::Static => (
            Some(static_outputs(ctx, dispatcher, &countries, &years)?),
            Some(Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ),
    };

    let html = template.render(context! {
        title => &config.title,
        figure => ctx.figure(),
        country_input => COUNTRY_DROPDOWN,
        win_output => WIN_OUTPUT,
        year_input => YEAR_DROPDOWN,
        year_output => YEAR_OUTPUT,
        countries => countries,
        years => years,
        selected_country => selected_country,
        selected_year => selected_year,
        win_text => win_text,
        year_text => year_text,
        static_outputs => outputs,
        generated_at => generated_at,
    })?;

    Ok(html)
}

/// Write a self-contained dashboard to `output_dir`.
///
/// Produces `index.html` and the raw map figure as `figure.json`;
/// returns the path of `index.html`.
pub fn write_dashboard(
    ctx: &AppContext,
    dispatcher: &Dispatcher,
    config: &DashboardConfig,
    output_dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(|e| Error::FileWriteError {
        path: output_dir.display().to_string(),
        source: e,
    })?;

    let html = generate_dashboard(ctx, dispatcher, config, RenderMode::Static)?;
    let index_path = output_dir.join("index.html");
    write_file(&index_path, html)?;

    let figure_path = output_dir.join("figure.json");
    write_file(&figure_path, serde_json::to_string_pretty(ctx.figure())?)?;

    Ok(index_path)
}

fn write_file(path: &Path, contents: String) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| Error::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Configured country, or the first one on offer if it never won
fn initial_country(ctx: &AppContext, config: &DashboardConfig) -> String {
    if ctx.wins().contains(&config.default_country) {
        return config.default_country.clone();
    }
    ctx.wins()
        .countries_sorted()
        .first()
        .map(|c| c.to_string())
        .unwrap_or_default()
}

/// Configured year, or the most recent final if there is no such year
fn initial_year(ctx: &AppContext, config: &DashboardConfig) -> i32 {
    if ctx.dataset().find_by_year(config.default_year).is_some() {
        return config.default_year;
    }
    ctx.dataset()
        .years()
        .last()
        .unwrap_or(config.default_year)
}

fn dispatch(
    ctx: &AppContext,
    dispatcher: &Dispatcher,
    input: &str,
    value: Value,
) -> Result<UpdateResponse> {
    dispatcher.dispatch(
        ctx,
        &UpdateRequest {
            input: input.to_string(),
            value,
        },
    )
}

fn static_outputs(
    ctx: &AppContext,
    dispatcher: &Dispatcher,
    countries: &[&str],
    years: &[i32],
) -> Result<StaticOutputs> {
    let mut outputs = StaticOutputs::new();

    let by_country = outputs.entry(COUNTRY_DROPDOWN).or_default();
    for country in countries {
        let response = dispatch(ctx, dispatcher, COUNTRY_DROPDOWN, Value::from(*country))?;
        by_country.insert(country.to_string(), response);
    }

    let by_year = outputs.entry(YEAR_DROPDOWN).or_default();
    for year in years {
        let response = dispatch(ctx, dispatcher, YEAR_DROPDOWN, Value::from(*year))?;
        // duplicate years keep the first record's answer, same as the live lookup
        by_year.entry(year.to_string()).or_insert(response);
    }

    Ok(outputs)
}
