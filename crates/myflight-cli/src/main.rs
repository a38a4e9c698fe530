// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use myflight_core::aircraft::AircraftClassifier;
use myflight_core::config::NormalizerConfig;
use myflight_core::{
    time, CanonicalFlightRecord, FlightQuery, Normalizer, ProviderKind, ProviderPayload,
};
use rayon::prelude::*;
use serde_json::Value;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config.json (defaults to the platform config directory)
    #[arg(short, long, env = "MYFLIGHT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize one provider response (file or stdin) into a flight record
    Normalize {
        #[arg(short, long)]
        provider: ProviderKind,
        /// Requested flight number, echoed in the record
        #[arg(short, long)]
        number: Option<String>,
        /// Requested flight date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Payload file; `-` or nothing reads stdin
        input: Option<PathBuf>,
    },
    /// Normalize a JSON array of provider responses in parallel
    Batch {
        #[arg(short, long)]
        provider: ProviderKind,
        file: PathBuf,
    },
    /// Show the airframe code for model names or type codes
    Classify {
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
    /// Look up an airport in the geo index
    Airport { iata: String },
    /// Convert a provider local timestamp to UTC using an IANA zone
    Resolve { timestamp: String, zone: String },
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Info
    };
    // Logs go to stderr so stdout stays valid JSON
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let today = Local::now().date_naive();
    let config_path = cli.config.unwrap_or_else(NormalizerConfig::default_path);
    let config = NormalizerConfig::load(&config_path)?;

    match cli.command {
        Commands::Normalize {
            provider,
            number,
            date,
            input,
        } => {
            let normalizer = Normalizer::from_config(&config)?;
            let raw = read_input(input.as_deref())?;
            let query = number.map(|n| FlightQuery::new(&n, date));

            let result = ProviderPayload::parse(provider, &raw)
                .and_then(|payload| normalizer.normalize_for(query.as_ref(), &payload));
            match result {
                Ok(mut record) => {
                    default_flight_date(&mut record, today);
                    println!("{}", serde_json::to_string_pretty(&record)?);
                }
                Err(e) => {
                    println!("{}", serde_json::to_string_pretty(&e.to_json())?);
                    anyhow::bail!("Normalization failed (status {}): {}", e.http_status(), e);
                }
            }
        }
        Commands::Batch { provider, file } => {
            let normalizer = Normalizer::from_config(&config)?;
            let content = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let payloads: Vec<Value> = serde_json::from_str(&content)
                .with_context(|| format!("{} must contain a JSON array", file.display()))?;

            let results = normalize_batch(&normalizer, provider, payloads, today)?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Classify { identifiers } => {
            for ident in &identifiers {
                println!("{}\t{}", ident, AircraftClassifier::classify(Some(ident)));
            }
        }
        Commands::Airport { iata } => {
            let normalizer = Normalizer::from_config(&config)?;
            let info = normalizer
                .index()
                .get(&iata)
                .ok_or_else(|| anyhow::anyhow!("Airport '{}' is not in the geo index", iata))?;
            println!("{}", serde_json::to_string_pretty(info)?);
        }
        Commands::Resolve { timestamp, zone } => {
            let resolved = time::resolve_utc(&timestamp, &zone)
                .ok_or_else(|| anyhow::anyhow!("Could not parse timestamp '{}'", timestamp))?;
            let out = serde_json::json!({
                "utc": resolved.instant.to_rfc3339(),
                "basis": resolved.basis,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Config => {
            println!("# {}", config_path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read payload from stdin")?;
            Ok(buf)
        }
    }
}

/// Requests always carry a date; when neither the caller nor the provider
/// supplied one, the flight is taken to be today's.
fn default_flight_date(record: &mut CanonicalFlightRecord, today: NaiveDate) {
    record.flight.date.get_or_insert(today);
}

/// One output entry per input payload, in input order. Failures become
/// `{"error": ..., "status": ...}` entries instead of aborting the batch.
fn normalize_batch(
    normalizer: &Normalizer,
    provider: ProviderKind,
    payloads: Vec<Value>,
    today: NaiveDate,
) -> Result<Vec<Value>> {
    let total = payloads.len();
    let results: Vec<Value> = payloads
        .into_par_iter()
        .map(|raw| {
            let outcome = ProviderPayload::from_json(provider, raw)
                .and_then(|payload| normalizer.normalize(&payload));
            match outcome {
                Ok(mut record) => {
                    default_flight_date(&mut record, today);
                    serde_json::to_value(&record)
                }
                Err(e) => {
                    log::warn!("[Batch] {}", e);
                    let mut body = e.to_json();
                    body["status"] = Value::from(e.http_status());
                    Ok(body)
                }
            }
        })
        .collect::<Result<_, _>>()?;

    let failed = results.iter().filter(|r| r.get("error").is_some()).count();
    log::info!(
        "[Batch] Normalized {} of {} payloads ({} failed)",
        total - failed,
        total,
        failed
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_normalize_args() {
        let cli = Cli::try_parse_from([
            "myflight",
            "normalize",
            "--provider",
            "aviationstack",
            "--number",
            "IB3166",
            "--date",
            "2026-02-11",
            "payload.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Normalize {
                provider,
                number,
                date,
                input,
            } => {
                assert_eq!(provider, ProviderKind::AviationStack);
                assert_eq!(number.as_deref(), Some("IB3166"));
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 2, 11));
                assert_eq!(input, Some(PathBuf::from("payload.json")));
            }
            _ => panic!("expected normalize"),
        }

        assert!(Cli::try_parse_from(["myflight", "normalize", "--provider", "flightaware"]).is_err());
    }

    #[test]
    fn test_batch_keeps_order_and_reports_errors() {
        let normalizer = Normalizer::default();
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let payloads = vec![
            json!({ "data": [{ "departure": { "iata": "MAD" }, "arrival": { "iata": "LHR" } }] }),
            json!({ "data": [] }),
            json!([{ "departure": { "iata": "BCN" } }]),
        ];

        let results =
            normalize_batch(&normalizer, ProviderKind::AviationStack, payloads, today).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["flight"]["date"], "2026-03-01");
        assert_eq!(results[0]["departure"]["iata"], "MAD");
        assert_eq!(results[0]["durationMinutes"], 122);
        assert_eq!(results[1]["status"], 404);
        assert_eq!(results[1]["error"], "Flight not found in aviationstack response");
        assert_eq!(results[2]["status"], 404);
    }

    #[test]
    fn test_missing_date_defaults_to_today() {
        let normalizer = Normalizer::default();
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let payload = ProviderPayload::from_json(
            ProviderKind::AviationStack,
            json!({ "departure": { "iata": "MAD" }, "arrival": { "iata": "LHR" } }),
        )
        .unwrap();

        let mut record = normalizer.normalize(&payload).unwrap();
        assert_eq!(record.flight.date, None);
        default_flight_date(&mut record, today);
        assert_eq!(record.flight.date, Some(today));

        // A provider date is never replaced
        let dated = ProviderPayload::from_json(
            ProviderKind::AviationStack,
            json!({
                "flight_date": "2026-02-11",
                "departure": { "iata": "MAD" },
                "arrival": { "iata": "LHR" }
            }),
        )
        .unwrap();
        let mut record = normalizer.normalize(&dated).unwrap();
        default_flight_date(&mut record, today);
        assert_eq!(record.flight.date, NaiveDate::from_ymd_opt(2026, 2, 11));
    }
}
