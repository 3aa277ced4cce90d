//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use aurum_vault::GoldPriceQuote;

pub const BIND_ADDR_ENV: &str = "AURUM_BIND_ADDR";
pub const SEED_ON_START_ENV: &str = "AURUM_SEED_ON_START";
pub const FALLBACK_GOLD_PRICE_ENV: &str = "AURUM_FALLBACK_GOLD_PRICE";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Fill an empty vault history with simulated data at startup.
    pub seed_on_start: bool,
    /// Quote used for rebalances before any vault snapshot exists.
    pub fallback_gold_price: GoldPriceQuote,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            seed_on_start: false,
            fallback_gold_price: GoldPriceQuote::fallback(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take their default;
    /// unparseable values are logged and replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        match lookup(BIND_ADDR_ENV) {
            Some(raw) => match raw.parse() {
                Ok(addr) => config.bind_addr = addr,
                Err(e) => tracing::warn!(
                    "{BIND_ADDR_ENV}={raw:?} is invalid ({e}); using {DEFAULT_BIND_ADDR}"
                ),
            },
            None => tracing::warn!("{BIND_ADDR_ENV} not set; using {DEFAULT_BIND_ADDR}"),
        }

        if let Some(raw) = lookup(SEED_ON_START_ENV) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => config.seed_on_start = true,
                "0" | "false" | "no" => config.seed_on_start = false,
                _ => tracing::warn!("{SEED_ON_START_ENV}={raw:?} is not a boolean; ignoring"),
            }
        }

        if let Some(raw) = lookup(FALLBACK_GOLD_PRICE_ENV) {
            match raw.trim().parse::<f64>().map(GoldPriceQuote::new) {
                Ok(Ok(quote)) => config.fallback_gold_price = quote,
                _ => tracing::warn!(
                    "{FALLBACK_GOLD_PRICE_ENV}={raw:?} is not a positive price; using {}",
                    GoldPriceQuote::FALLBACK_USD
                ),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        assert_eq!(ApiConfig::from_lookup(lookup(&[])), ApiConfig::default());
    }

    #[test]
    fn reads_all_keys() {
        let config = ApiConfig::from_lookup(lookup(&[
            (BIND_ADDR_ENV, "127.0.0.1:9000"),
            (SEED_ON_START_ENV, "true"),
            (FALLBACK_GOLD_PRICE_ENV, "2350.75"),
        ]));
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert!(config.seed_on_start);
        assert_eq!(config.fallback_gold_price.usd_per_unit(), 2350.75);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[
            (BIND_ADDR_ENV, "not-an-address"),
            (SEED_ON_START_ENV, "maybe"),
            (FALLBACK_GOLD_PRICE_ENV, "-5"),
        ]));
        assert_eq!(config, ApiConfig::default());
    }
}
