use crate::domain::OrderTypeMapping;
use crate::engine::{EngineConfig, UnitConverter, DEFAULT_LAMPORT_DECIMALS, DEFAULT_PRICE_DECIMALS};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub user_address: String,
    pub mint_address: String,
    pub report_mode: ReportMode,
    pub lamport_decimals: u32,
    pub price_decimals: u32,
    pub order_type_mapping: OrderTypeMapping,
    pub long_pnl_variant: LongPnlVariant,
    pub short_pnl_variant: ShortPnlVariant,
    pub curve_quotes_path: Option<String>,
    /// Price query route with a `{mint}` placeholder; token info is used when unset.
    pub price_query_path: Option<String>,
    pub success_code: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    Active,
    History,
}

/// Which long-position formula to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongPnlVariant {
    /// `gross = sell + marginInit - borrowed`, `net = gross - marginCurrent`.
    #[default]
    InitialMargin,
    /// `gross = sell + marginCurrent - borrowed`, `net = gross - marginCurrent + realized`.
    CreditRealized,
}

/// Which short-position return formula to apply. Gross and net are the same in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortPnlVariant {
    /// `% = (realized + net) / marginInit`.
    #[default]
    CreditRealized,
    /// `% = net / marginInit`.
    NetOnly,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let api_url = required(&env_map, "PINPET_API_URL")?
            .trim_end_matches('/')
            .to_string();
        let user_address = required(&env_map, "USER_ADDRESS")?;
        let mint_address = required(&env_map, "MINT_ADDRESS")?;

        let report_mode = match env_map
            .get("REPORT_MODE")
            .map(|s| s.as_str())
            .unwrap_or("active")
        {
            "active" => ReportMode::Active,
            "history" => ReportMode::History,
            other => {
                return Err(ConfigError::InvalidValue(
                    "REPORT_MODE".to_string(),
                    format!("must be active or history, got {}", other),
                ))
            }
        };

        let lamport_decimals = parse_decimals(&env_map, "LAMPORT_DECIMALS", DEFAULT_LAMPORT_DECIMALS)?;
        let price_decimals = parse_decimals(&env_map, "PRICE_DECIMALS", DEFAULT_PRICE_DECIMALS)?;

        let order_type_mapping = match env_map
            .get("ORDER_TYPE_MAPPING")
            .map(|s| s.as_str())
            .unwrap_or("long-is-1")
        {
            "long-is-1" => OrderTypeMapping::LongIsOne,
            "short-is-1" => OrderTypeMapping::ShortIsOne,
            other => {
                return Err(ConfigError::InvalidValue(
                    "ORDER_TYPE_MAPPING".to_string(),
                    format!("must be long-is-1 or short-is-1, got {}", other),
                ))
            }
        };

        let long_pnl_variant = match env_map
            .get("LONG_PNL_VARIANT")
            .map(|s| s.as_str())
            .unwrap_or("initial-margin")
        {
            "initial-margin" => LongPnlVariant::InitialMargin,
            "credit-realized" => LongPnlVariant::CreditRealized,
            other => {
                return Err(ConfigError::InvalidValue(
                    "LONG_PNL_VARIANT".to_string(),
                    format!("must be initial-margin or credit-realized, got {}", other),
                ))
            }
        };

        let short_pnl_variant = match env_map
            .get("SHORT_PNL_VARIANT")
            .map(|s| s.as_str())
            .unwrap_or("credit-realized")
        {
            "credit-realized" => ShortPnlVariant::CreditRealized,
            "net-only" => ShortPnlVariant::NetOnly,
            other => {
                return Err(ConfigError::InvalidValue(
                    "SHORT_PNL_VARIANT".to_string(),
                    format!("must be credit-realized or net-only, got {}", other),
                ))
            }
        };

        let curve_quotes_path = env_map
            .get("CURVE_QUOTES_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if report_mode == ReportMode::Active && curve_quotes_path.is_none() {
            return Err(ConfigError::MissingEnv("CURVE_QUOTES_PATH".to_string()));
        }

        let price_query_path = env_map
            .get("PRICE_QUERY_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(path) = &price_query_path {
            if !path.contains("{mint}") {
                return Err(ConfigError::InvalidValue(
                    "PRICE_QUERY_PATH".to_string(),
                    format!("must contain a {{mint}} placeholder, got {}", path),
                ));
            }
        }

        let success_code = env_map
            .get("SUCCESS_CODE")
            .map(|s| s.as_str())
            .unwrap_or("200")
            .parse::<i64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "SUCCESS_CODE".to_string(),
                    "must be a valid i64".to_string(),
                )
            })?;

        Ok(Config {
            api_url,
            user_address,
            mint_address,
            report_mode,
            lamport_decimals,
            price_decimals,
            order_type_mapping,
            long_pnl_variant,
            short_pnl_variant,
            curve_quotes_path,
            price_query_path,
            success_code,
        })
    }

    /// Engine settings derived from this configuration.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let units = UnitConverter::new(self.lamport_decimals, self.price_decimals)
            .map_err(|e| ConfigError::InvalidValue("PRICE_DECIMALS".to_string(), e.to_string()))?;
        Ok(EngineConfig {
            units,
            order_types: self.order_type_mapping,
            long_variant: self.long_pnl_variant,
            short_variant: self.short_pnl_variant,
        })
    }
}

fn required(env_map: &HashMap<String, String>, key: &str) -> Result<String, ConfigError> {
    env_map
        .get(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}

fn parse_decimals(
    env_map: &HashMap<String, String>,
    key: &str,
    default: u32,
) -> Result<u32, ConfigError> {
    let value = match env_map.get(key) {
        Some(s) => s.parse::<u32>().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), "must be a valid u32".to_string())
        })?,
        None => default,
    };
    if value > crate::engine::MAX_DECIMALS {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("must be at most {}", crate::engine::MAX_DECIMALS),
        ));
    }
    Ok(value)
}
