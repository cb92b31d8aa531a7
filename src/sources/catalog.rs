//! The default set of statistics providers and their fallback figures.

use super::normalize::ResponseFormat;
use super::{DataSource, HttpSource, Payload};
use crate::config::Config;
use crate::environment::Environment;
use crate::network::JsonFetcher;
use std::sync::Arc;

pub const TRADE: &str = "trade";
pub const MARKET: &str = "market";
pub const ECONOMY: &str = "economy";
pub const PORT: &str = "port";

fn world_bank_url(country: &str) -> String {
    format!(
        "https://api.worldbank.org/v2/country/{}/indicator/TX.VAL.MRCH.CD.WT?format=json&per_page=10",
        urlencoding::encode(country)
    )
}

fn oecd_url(country: &str) -> String {
    format!(
        "https://sdmx.oecd.org/public/rest/data/OECD.SDD.STES,DSD_STES@DF_CLI,4.1/{}.M.LI...AA...H?lastNObservations=12&format=jsondata",
        urlencoding::encode(country)
    )
}

// Australian Bureau of Statistics, CPI all groups, annual change.
const ABS_CPI_URL: &str =
    "https://data.api.abs.gov.au/rest/data/ABS,CPI,1.1.0/3.10001.10.50.Q?lastNObservations=4&format=jsondata";

fn trade_fallback() -> Payload {
    Payload::new(Some("2023".to_string()))
        .with_metric("merchandise_exports_usd", 371_600_000_000.0)
        .with_metric("merchandise_exports_usd_change_pct", -12.4)
}

fn market_fallback() -> Payload {
    Payload::new(Some("2024-06".to_string()))
        .with_metric("leading_indicator", 99.6)
        .with_metric("leading_indicator_change_pct", 0.1)
}

fn economy_fallback() -> Payload {
    Payload::new(Some("2024-Q2".to_string()))
        .with_metric("cpi_annual_change_pct", 3.8)
}

fn port_fallback() -> Payload {
    Payload::new(Some("2024-05".to_string()))
        .with_metric("teu", 285_400.0)
        .with_metric("vessel_calls", 248.0)
        .with_metric("bulk_tonnes", 1_960_000.0)
}

/// Resolves a source URL: explicit config override, then the environment.
///
/// `public_url` is `None` for providers without a public default; they stay
/// unconfigured in production unless the config file names an endpoint.
fn resolve_url(
    name: &str,
    public_url: Option<String>,
    env: &Environment,
    config: &Config,
) -> Option<String> {
    if let Some(url) = config.source_urls.get(name) {
        return Some(url.clone());
    }
    match env {
        Environment::Production => public_url,
        Environment::Local { .. } => Some(env.source_url(name, "")),
    }
}

/// Builds the four standard sources, all sharing `fetcher`.
pub fn default_sources(
    env: &Environment,
    config: &Config,
    fetcher: Arc<dyn JsonFetcher>,
) -> Vec<Arc<dyn DataSource>> {
    vec![
        Arc::new(HttpSource::new(
            TRADE,
            "Merchandise Exports (World Bank)",
            resolve_url(TRADE, Some(world_bank_url(&config.country)), env, config),
            ResponseFormat::WorldBank {
                metric: "merchandise_exports_usd".to_string(),
            },
            trade_fallback(),
            fetcher.clone(),
        )),
        Arc::new(HttpSource::new(
            MARKET,
            "Composite Leading Indicator (OECD)",
            resolve_url(MARKET, Some(oecd_url(&config.country)), env, config),
            ResponseFormat::SdmxJson {
                metric: "leading_indicator".to_string(),
            },
            market_fallback(),
            fetcher.clone(),
        )),
        Arc::new(HttpSource::new(
            ECONOMY,
            "Consumer Prices (ABS)",
            resolve_url(ECONOMY, Some(ABS_CPI_URL.to_string()), env, config),
            ResponseFormat::SdmxJson {
                metric: "cpi_annual_change_pct".to_string(),
            },
            economy_fallback(),
            fetcher.clone(),
        )),
        Arc::new(HttpSource::new(
            PORT,
            "Port Throughput",
            resolve_url(PORT, None, env, config),
            ResponseFormat::FlatRecords {
                fields: vec![
                    "teu".to_string(),
                    "vessel_calls".to_string(),
                    "bulk_tonnes".to_string(),
                ],
            },
            port_fallback(),
            fetcher,
        )),
    ]
}
