#![deny(missing_docs)]
//! Shipyard command-line interface.
//!
//! Lists, counts, and edits ships through the Shipyard REST API.

mod client;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use shipyard_core::{PageQuery, Ship, ShipCriteria, ShipPatch, ShipType};
use std::fmt::Write;

use crate::client::ShipClient;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser, Debug)]
#[command(name = "shipyard", version, about = "Shipyard CLI")]
struct Cli {
    /// Base URL of the Shipyard server.
    #[arg(long, global = true, env = "SHIPYARD_API_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Substring of the ship name.
    #[arg(long)]
    name: Option<String>,
    /// Substring of the planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type: transport, military, or merchant.
    #[arg(long, value_parser = parse_ship_type)]
    ship_type: Option<ShipType>,
    /// Produced at or after this date (YYYY-MM-DD or epoch millis).
    #[arg(long, value_parser = parse_timestamp)]
    after: Option<i64>,
    /// Produced in or before the year of this date (YYYY-MM-DD or epoch millis).
    #[arg(long, value_parser = parse_timestamp)]
    before: Option<i64>,
    /// Usage flag.
    #[arg(long)]
    used: Option<bool>,
    /// Minimum speed.
    #[arg(long)]
    min_speed: Option<f64>,
    /// Maximum speed.
    #[arg(long)]
    max_speed: Option<f64>,
    /// Minimum crew size.
    #[arg(long)]
    min_crew_size: Option<i32>,
    /// Maximum crew size.
    #[arg(long)]
    max_crew_size: Option<i32>,
    /// Minimum rating.
    #[arg(long)]
    min_rating: Option<f64>,
    /// Maximum rating.
    #[arg(long)]
    max_rating: Option<f64>,
}

impl FilterArgs {
    fn criteria(&self) -> ShipCriteria {
        ShipCriteria {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type: self.ship_type,
            after: self.after,
            before: self.before,
            is_used: self.used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew_size,
            max_crew_size: self.max_crew_size,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct PageArgs {
    /// Sort key: id, speed, prodDate, or rating.
    #[arg(long)]
    order: Option<String>,
    /// Zero-based page number.
    #[arg(long)]
    page_number: Option<usize>,
    /// Ships per page.
    #[arg(long)]
    page_size: Option<usize>,
}

impl PageArgs {
    fn query(&self) -> PageQuery {
        PageQuery {
            order: self.order.clone(),
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct ShipFieldArgs {
    /// Ship name.
    #[arg(long)]
    name: Option<String>,
    /// Planet of registration.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type: transport, military, or merchant.
    #[arg(long, value_parser = parse_ship_type)]
    ship_type: Option<ShipType>,
    /// Production date (YYYY-MM-DD or epoch millis).
    #[arg(long, value_parser = parse_timestamp)]
    prod_date: Option<i64>,
    /// Whether the ship was used before.
    #[arg(long)]
    used: Option<bool>,
    /// Speed between 0.01 and 0.99.
    #[arg(long)]
    speed: Option<f64>,
    /// Crew size between 1 and 9999.
    #[arg(long)]
    crew_size: Option<i32>,
}

impl ShipFieldArgs {
    fn patch(&self) -> ShipPatch {
        ShipPatch {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type: self.ship_type,
            prod_date: self.prod_date,
            is_used: self.used,
            speed: self.speed,
            crew_size: self.crew_size,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List one page of ships.
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Count ships matching the filters.
    Count {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show a single ship.
    Get {
        /// Ship identifier.
        id: String,
    },
    /// Create a ship.
    Create {
        #[command(flatten)]
        fields: ShipFieldArgs,
    },
    /// Update the given fields of a ship.
    Update {
        /// Ship identifier.
        id: String,
        #[command(flatten)]
        fields: ShipFieldArgs,
    },
    /// Delete a ship.
    Delete {
        /// Ship identifier.
        id: String,
    },
}

fn parse_ship_type(raw: &str) -> Result<ShipType, String> {
    raw.trim()
        .to_uppercase()
        .parse()
        .map_err(|_| format!("unknown ship type {raw}, expected transport, military, or merchant"))
}

fn parse_timestamp(raw: &str) -> Result<i64, String> {
    let raw = raw.trim();
    if let Ok(millis) = raw.parse::<i64>() {
        return Ok(millis);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|moment| moment.and_utc().timestamp_millis())
        .ok_or_else(|| format!("expected YYYY-MM-DD or epoch millis, got {raw}"))
}

fn render_ships(ships: &[Ship], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ships)?),
        OutputFormat::Text => {
            if ships.is_empty() {
                return Ok("No ships found.".to_string());
            }
            let mut out = String::new();
            for ship in ships {
                writeln!(out, "{}", ship_line(ship))?;
            }
            Ok(out.trim_end().to_string())
        }
    }
}

fn render_ship(ship: &Ship, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ship)?),
        OutputFormat::Text => Ok(ship_line(ship)),
    }
}

fn ship_line(ship: &Ship) -> String {
    format!(
        "#{} {} ({}) {} built {} {} speed {:.2} crew {} rating {:.2}",
        ship.id,
        ship.name,
        ship.planet,
        ship.ship_type,
        ship.production_year(),
        if ship.is_used { "used" } else { "new" },
        ship.speed,
        ship.crew_size,
        ship.rating
    )
}

async fn run(cli: Cli) -> CliResult<String> {
    let client = ShipClient::new(&cli.server_url)?;
    let format = cli.format;
    match cli.command {
        Commands::List { filters, page } => {
            let ships = client.list(&filters.criteria(), &page.query()).await?;
            render_ships(&ships, format)
        }
        Commands::Count { filters } => {
            let count = client.count(&filters.criteria()).await?;
            Ok(count.to_string())
        }
        Commands::Get { id } => render_ship(&client.get(&id).await?, format),
        Commands::Create { fields } => render_ship(&client.create(&fields.patch()).await?, format),
        Commands::Update { id, fields } => {
            render_ship(&client.update(&id, &fields.patch()).await?, format)
        }
        Commands::Delete { id } => {
            client.delete(&id).await?;
            Ok(format!("Deleted ship {}.", id.trim()))
        }
    }
}

#[cfg_attr(test, allow(dead_code))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let output = run(cli).await?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    fn sample_ship() -> Ship {
        Ship {
            id: 4,
            name: "Rogue".to_string(),
            planet: "Mars".to_string(),
            ship_type: ShipType::Transport,
            prod_date: Utc.with_ymd_and_hms(3017, 2, 3, 0, 0, 0).unwrap(),
            is_used: false,
            speed: 0.91,
            crew_size: 6,
            rating: 12.13,
        }
    }

    #[test]
    fn list_arguments_map_to_query() {
        let cli = Cli::try_parse_from([
            "shipyard",
            "list",
            "--planet",
            "Mars",
            "--ship-type",
            "military",
            "--before",
            "3010-01-01",
            "--used",
            "false",
            "--order",
            "rating",
            "--page-size",
            "10",
        ])
        .expect("parse");

        let Commands::List { filters, page } = cli.command else {
            panic!("expected list command");
        };
        let criteria = filters.criteria();
        assert_eq!(criteria.planet.as_deref(), Some("Mars"));
        assert_eq!(criteria.ship_type, Some(ShipType::Military));
        assert_eq!(criteria.is_used, Some(false));
        assert_eq!(
            criteria.before,
            Some(
                Utc.with_ymd_and_hms(3010, 1, 1, 0, 0, 0)
                    .unwrap()
                    .timestamp_millis()
            )
        );
        assert_eq!(page.query().order.as_deref(), Some("rating"));
        assert_eq!(page.query().page_size, Some(10));
        assert_eq!(cli.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn update_arguments_only_set_given_fields() {
        let cli = Cli::try_parse_from([
            "shipyard",
            "update",
            "12",
            "--crew-size",
            "40",
            "--prod-date",
            "32503680000000",
        ])
        .expect("parse");

        let Commands::Update { id, fields } = cli.command else {
            panic!("expected update command");
        };
        assert_eq!(id, "12");
        assert_eq!(
            fields.patch(),
            ShipPatch {
                crew_size: Some(40),
                prod_date: Some(32_503_680_000_000),
                ..ShipPatch::default()
            }
        );
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["shipyard", "list", "--ship-type", "pirate"]).is_err());
        assert!(Cli::try_parse_from(["shipyard", "list", "--after", "yesterday"]).is_err());
        assert!(Cli::try_parse_from(["shipyard", "get"]).is_err());
    }

    #[test]
    fn text_rendering_summarizes_ships() {
        let line = render_ship(&sample_ship(), OutputFormat::Text).expect("render");
        assert_eq!(
            line,
            "#4 Rogue (Mars) TRANSPORT built 3017 new speed 0.91 crew 6 rating 12.13"
        );
        assert_eq!(
            render_ships(&[], OutputFormat::Text).expect("render"),
            "No ships found."
        );
    }

    #[test]
    fn json_rendering_uses_wire_shape() {
        let rendered = render_ships(&[sample_ship()], OutputFormat::Json).expect("render");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("json");
        assert_eq!(value[0]["shipType"], "TRANSPORT");
        assert_eq!(value[0]["crewSize"], 6);
    }

    #[tokio::test]
    async fn run_count_prints_number() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/ships/count")
                    .query_param("planet", "Mars");
                then.status(200).json_body(json!(2));
            })
            .await;

        let cli = Cli::try_parse_from([
            "shipyard",
            "--server-url",
            &server.base_url(),
            "count",
            "--planet",
            "Mars",
        ])
        .expect("parse");
        assert_eq!(run(cli).await.expect("run"), "2");
    }
}
