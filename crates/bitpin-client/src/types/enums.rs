/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization and case-insensitive parsing
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new enum values are added
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a string does not name any value of an API enum
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Enums whose wire representation is a fixed lowercase string
pub trait ApiEnum: Sized + Copy + 'static {
    /// Name used in parse errors
    const KIND: &'static str;
    /// Every variant, in declaration order
    const VARIANTS: &'static [Self];

    /// Wire value of the variant
    fn as_str(&self) -> &'static str;
}

/// Case-insensitive lookup of an enum value by its wire string.
pub fn parse_enum<E: ApiEnum>(raw: &str) -> Result<E, ParseEnumError> {
    let needle = raw.trim();
    E::VARIANTS
        .iter()
        .copied()
        .find(|variant| variant.as_str().eq_ignore_ascii_case(needle))
        .ok_or_else(|| ParseEnumError {
            kind: E::KIND,
            value: raw.to_string(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Buy,
    Sell,
}

impl ApiEnum for OrderType {
    const KIND: &'static str = "order type";
    const VARIANTS: &'static [Self] = &[OrderType::Buy, OrderType::Sell];

    fn as_str(&self) -> &'static str {
        match self {
            OrderType::Buy => "buy",
            OrderType::Sell => "sell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderMode {
    Limit,
    Market,
    Oco,
    StopLimit,
}

impl ApiEnum for OrderMode {
    const KIND: &'static str = "order mode";
    const VARIANTS: &'static [Self] = &[
        OrderMode::Limit,
        OrderMode::Market,
        OrderMode::Oco,
        OrderMode::StopLimit,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            OrderMode::Limit => "limit",
            OrderMode::Market => "market",
            OrderMode::Oco => "oco",
            OrderMode::StopLimit => "stop_limit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    Initial,
    Active,
    Closed,
}

impl ApiEnum for OrderState {
    const KIND: &'static str = "order state";
    const VARIANTS: &'static [Self] = &[OrderState::Initial, OrderState::Active, OrderState::Closed];

    fn as_str(&self) -> &'static str {
        match self {
            OrderState::Initial => "initial",
            OrderState::Active => "active",
            OrderState::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl ApiEnum for RequestMethod {
    const KIND: &'static str = "request method";
    const VARIANTS: &'static [Self] = &[
        RequestMethod::Get,
        RequestMethod::Post,
        RequestMethod::Put,
        RequestMethod::Delete,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "get",
            RequestMethod::Post => "post",
            RequestMethod::Put => "put",
            RequestMethod::Delete => "delete",
        }
    }
}

impl From<RequestMethod> for reqwest::Method {
    fn from(method: RequestMethod) -> Self {
        match method {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Versioned path segment of the REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    #[default]
    V1,
    V2,
}

impl ApiEnum for ApiVersion {
    const KIND: &'static str = "api version";
    const VARIANTS: &'static [Self] = &[ApiVersion::V1, ApiVersion::V2];

    fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }
}

macro_rules! impl_display_from_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = ParseEnumError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    parse_enum(s)
                }
            }
        )+
    };
}

impl_display_from_str!(OrderType, OrderMode, OrderState, RequestMethod, ApiVersion);
