//! worldcup-dashboard CLI
//!
//! Serves the FIFA World Cup dashboard, exports it as a static page, or
//! prints the win table.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tracing::info;

use worldcup_dashboard::{
    aggregate::CountryWins,
    callbacks::Dispatcher,
    context::AppContext,
    html::{self, DashboardConfig, DEFAULT_COUNTRY, DEFAULT_TITLE, DEFAULT_YEAR},
    server::{self, AppState},
};

const DEFAULT_DATA_FILE: &str = "fifa_world_cup_finals.csv";
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 8050;

/// worldcup-dashboard: FIFA World Cup finals at a glance
#[derive(Parser, Debug)]
#[command(name = "worldcup-dashboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the finals CSV file
    #[arg(long, global = true, env = "WORLDCUP_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the interactive dashboard (default)
    Serve(ServeArgs),

    /// Write a self-contained dashboard to a directory
    Export(ExportArgs),

    /// Print win counts per country
    Summary(SummaryArgs),
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "WORLDCUP_HOST", default_value_t = DEFAULT_HOST)]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "WORLDCUP_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    #[command(flatten)]
    page: PageArgs,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Output directory for the dashboard
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,

    #[command(flatten)]
    page: PageArgs,
}

#[derive(clap::Args, Debug)]
struct PageArgs {
    /// Dashboard title
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Country selected on load
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    default_country: String,

    /// Year selected on load
    #[arg(long, default_value_t = DEFAULT_YEAR)]
    default_year: i32,
}

impl From<PageArgs> for DashboardConfig {
    fn from(args: PageArgs) -> Self {
        Self {
            title: args.title,
            default_country: args.default_country,
            default_year: args.default_year,
        }
    }
}

#[derive(Parser, Debug)]
struct SummaryArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    format: SummaryFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SummaryFormat {
    Text,
    Markdown,
    Json,
}

impl Cli {
    /// The chosen subcommand, or `serve` parsed with its defaults and env fallbacks
    fn command_or_serve(self) -> Result<Commands> {
        match self.command {
            Some(command) => Ok(command),
            None => {
                let args = ServeArgs::try_parse_from([env!("CARGO_PKG_NAME")])
                    .with_context(|| "Failed to read serve settings")?;
                Ok(Commands::Serve(args))
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    // Data problems abort here, before anything is served
    let ctx = AppContext::load(&cli.data_file)
        .with_context(|| format!("Failed to load World Cup data from {:?}", cli.data_file))?;

    match cli.command_or_serve()? {
        Commands::Serve(args) => serve_command(ctx, args).await,
        Commands::Export(args) => export_command(ctx, args),
        Commands::Summary(args) => summary_command(ctx, args),
    }
}

/// Serve the live dashboard
async fn serve_command(ctx: AppContext, args: ServeArgs) -> Result<()> {
    let config = DashboardConfig::from(args.page);
    let state = AppState::new(ctx, Dispatcher::default(), &config)
        .with_context(|| "Failed to render dashboard")?;

    let addr = SocketAddr::new(args.host, args.port);
    server::serve(state, addr)
        .await
        .with_context(|| format!("Dashboard server failed on {}", addr))?;

    Ok(())
}

/// Export a static dashboard
fn export_command(ctx: AppContext, args: ExportArgs) -> Result<()> {
    info!("Generating dashboard");

    let config = DashboardConfig::from(args.page);
    let index = html::write_dashboard(&ctx, &Dispatcher::default(), &config, &args.output_dir)
        .with_context(|| "Failed to generate dashboard")?;

    info!("Dashboard generated at {:?}", index);

    Ok(())
}

/// Print the win table
fn summary_command(ctx: AppContext, args: SummaryArgs) -> Result<()> {
    print!("{}", render_summary(&ctx, args.format)?);
    Ok(())
}

/// Win table, most wins first, in the requested format
fn render_summary(ctx: &AppContext, format: SummaryFormat) -> Result<String> {
    let ranked = ctx.wins().ranked();
    let mut out = String::new();

    match format {
        SummaryFormat::Json => {
            let output = serde_json::json!({
                "finals": ctx.dataset().len(),
                "countries": ranked,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
        SummaryFormat::Markdown => {
            writeln!(out, "| Country | Wins |")?;
            writeln!(out, "|---|---:|")?;
            for CountryWins { country, wins } in &ranked {
                writeln!(out, "| {} | {} |", country, wins)?;
            }
        }
        SummaryFormat::Text => {
            writeln!(
                out,
                "{} finals, {} winning countries",
                ctx.dataset().len(),
                ranked.len()
            )?;
            let width = ranked.iter().map(|c| c.country.len()).max().unwrap_or(0);
            for CountryWins { country, wins } in &ranked {
                writeln!(out, "  {:<width$}  {}", country, wins, width = width)?;
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use worldcup_dashboard::data::Dataset;

    const FINALS_CSV: &str = include_str!("../fifa_world_cup_finals.csv");

    fn ctx() -> AppContext {
        AppContext::from_dataset(Dataset::from_reader(FINALS_CSV.as_bytes(), "finals").unwrap())
    }

    fn serve_args(argv: &[&str]) -> ServeArgs {
        match Cli::try_parse_from(argv).unwrap().command_or_serve().unwrap() {
            Commands::Serve(args) => args,
            other => panic!("expected serve, got {other:?}"),
        }
    }

    // The only test that touches WORLDCUP_HOST / WORLDCUP_PORT, so parallel
    // tests never see them half-set.
    #[test]
    fn test_serve_env_fallbacks_with_and_without_subcommand() {
        std::env::set_var("WORLDCUP_HOST", "0.0.0.0");
        std::env::set_var("WORLDCUP_PORT", "9000");

        let explicit = serve_args(&["worldcup-dashboard", "serve"]);
        let implicit = serve_args(&["worldcup-dashboard"]);

        std::env::remove_var("WORLDCUP_HOST");
        std::env::remove_var("WORLDCUP_PORT");

        let expected: IpAddr = "0.0.0.0".parse().unwrap();
        assert_eq!((explicit.host, explicit.port), (expected, 9000));
        assert_eq!((implicit.host, implicit.port), (expected, 9000));
    }

    #[test]
    fn test_no_subcommand_uses_page_defaults() {
        let args = serve_args(&["worldcup-dashboard"]);
        let config = DashboardConfig::from(args.page);

        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.default_country, DEFAULT_COUNTRY);
        assert_eq!(config.default_year, DEFAULT_YEAR);
    }

    #[test]
    fn test_serve_flags_override_defaults() {
        let args = serve_args(&[
            "worldcup-dashboard",
            "serve",
            "--title",
            "Finals",
            "--default-country",
            "Italy",
            "--default-year",
            "1982",
        ]);
        let config = DashboardConfig::from(args.page);

        assert_eq!(config.title, "Finals");
        assert_eq!(config.default_country, "Italy");
        assert_eq!(config.default_year, 1982);
    }

    #[test]
    fn test_global_data_file_and_summary_format() {
        let cli = Cli::try_parse_from([
            "worldcup-dashboard",
            "summary",
            "--format",
            "markdown",
            "--data-file",
            "finals.csv",
        ])
        .unwrap();

        assert_eq!(cli.data_file, PathBuf::from("finals.csv"));
        match cli.command {
            Some(Commands::Summary(args)) => assert_eq!(args.format, SummaryFormat::Markdown),
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[test]
    fn test_summary_text() {
        let text = render_summary(&ctx(), SummaryFormat::Text).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "22 finals, 8 winning countries");
        assert_eq!(lines[1], "  Brazil     5");
        assert_eq!(lines[2], "  Germany    4");
        assert_eq!(lines[3], "  Italy      4");
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn test_summary_markdown() {
        let markdown = render_summary(&ctx(), SummaryFormat::Markdown).unwrap();

        assert_eq!(
            markdown,
            "| Country | Wins |\n\
             |---|---:|\n\
             | Brazil | 5 |\n\
             | Germany | 4 |\n\
             | Italy | 4 |\n\
             | Argentina | 3 |\n\
             | France | 2 |\n\
             | Uruguay | 2 |\n\
             | England | 1 |\n\
             | Spain | 1 |\n"
        );
    }

    #[test]
    fn test_summary_json() {
        let json = render_summary(&ctx(), SummaryFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["finals"], 22);
        let countries = value["countries"].as_array().unwrap();
        assert_eq!(countries.len(), 8);
        assert_eq!(countries[0]["country"], "Brazil");
        assert_eq!(countries[0]["wins"], 5);
        assert_eq!(countries[7]["country"], "Spain");

        let wins: Vec<u64> = countries
            .iter()
            .map(|c| c["wins"].as_u64().unwrap())
            .collect();
        assert!(wins.windows(2).all(|w| w[0] >= w[1]));
    }
}
