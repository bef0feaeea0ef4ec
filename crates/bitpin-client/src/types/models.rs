/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub title_fa: Option<String>,
    pub code: String,
    #[serde(default)]
    pub tradable: bool,
    #[serde(default)]
    pub for_test: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub decimal: Option<u32>,
    #[serde(default)]
    pub decimal_amount: Option<u32>,
    #[serde(default)]
    pub decimal_irt: Option<u32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub high_risk: bool,
    #[serde(default)]
    pub show_high_risk: bool,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero"
    )]
    pub withdraw_commission: Decimal,
    #[serde(default)]
    pub tags: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInfo {
    pub id: u64,
    pub currency1: CurrencyInfo,
    pub currency2: CurrencyInfo,
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub title_fa: Option<String>,
    #[serde(default)]
    pub commissions: Value,
}

/// Order as returned by create and list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub market: MarketInfo,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount1: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero"
    )]
    pub amount2: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub price_limit: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub price_stop: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub price_limit_oco: Option<Decimal>,
    #[serde(rename = "type")]
    pub order_type: String,
    #[serde(default)]
    pub identifier: Option<String>,
    pub mode: String,
    pub state: String,
    #[serde(default)]
    pub fulfilled: f64,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero"
    )]
    pub remain_amount: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero"
    )]
    pub average_price: Decimal,
    #[serde(default)]
    pub req_to_cancel: bool,
    pub created_at: String,
    #[serde(default)]
    pub activated_at: Option<String>,
    #[serde(default)]
    pub closed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderbookEntry {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub remain: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentTrade {
    pub time: f64,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub match_amount: Decimal,
    #[serde(rename = "type")]
    pub trade_type: String,
    pub match_id: String,
}

mod serde_helpers {
    use super::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    /// Accepts a decimal string or number; null and empty strings become zero.
    pub fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Null => Ok(Decimal::ZERO),
            Value::String(raw) if raw.trim().is_empty() => Ok(Decimal::ZERO),
            Value::String(raw) => Decimal::from_str(raw.trim()).map_err(serde::de::Error::custom),
            Value::Number(number) => {
                Decimal::from_str(&number.to_string()).map_err(serde::de::Error::custom)
            }
            other => Err(serde::de::Error::custom(format!(
                "expected decimal string, got {other}"
            ))),
        }
    }
}
