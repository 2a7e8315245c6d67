use serde::{Deserialize, Serialize};
use std::fmt;

/// Feed carrying full book snapshots
pub const SNAPSHOT_FEED: &str = "book_ui_1_snapshot";
/// Feed carrying incremental level updates
pub const DELTA_FEED: &str = "book_ui_1";
/// Event sent by the venue once a product is unsubscribed
pub const UNSUBSCRIBED_EVENT: &str = "unsubscribed";

/// One inbound frame as the venue sends it
///
/// Every field is optional on the wire: subscription acks, info frames and
/// heartbeats share the socket with book data and carry neither side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedMessage {
    #[serde(default)]
    pub feed: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub bids: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pub asks: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pub event: Option<String>,
}

impl FeedMessage {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.event.as_deref() == Some(UNSUBSCRIBED_EVENT)
    }
}

/// Instrument identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductId {
    XbtUsd,
    EthUsd,
    Other(String),
}

impl ProductId {
    pub fn as_str(&self) -> &str {
        match self {
            ProductId::XbtUsd => "PI_XBTUSD",
            ProductId::EthUsd => "PI_ETHUSD",
            ProductId::Other(id) => id,
        }
    }

    /// Flips between the two default instruments
    pub fn toggle(&self) -> ProductId {
        match self {
            ProductId::XbtUsd => ProductId::EthUsd,
            _ => ProductId::XbtUsd,
        }
    }
}

impl Default for ProductId {
    fn default() -> Self {
        ProductId::XbtUsd
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PI_XBTUSD" => ProductId::XbtUsd,
            "PI_ETHUSD" => ProductId::EthUsd,
            _ => ProductId::Other(value),
        }
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        ProductId::from(value.to_string())
    }
}

impl From<ProductId> for String {
    fn from(value: ProductId) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionEvent {
    Subscribe,
    Unsubscribe,
}

/// Control frame sent by the transport to (un)subscribe a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    pub event: SubscriptionEvent,
    pub feed: String,
    pub product_ids: Vec<ProductId>,
}

impl SubscriptionRequest {
    pub fn subscribe(product: ProductId) -> Self {
        Self {
            event: SubscriptionEvent::Subscribe,
            feed: DELTA_FEED.to_string(),
            product_ids: vec![product],
        }
    }

    pub fn unsubscribe(product: ProductId) -> Self {
        Self {
            event: SubscriptionEvent::Unsubscribe,
            feed: DELTA_FEED.to_string(),
            product_ids: vec![product],
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Two decimals with thousands separators, e.g. `38465.5` -> `38,465.50`
pub fn format_price(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot() {
        let raw = r#"{"numLevels":25,"feed":"book_ui_1_snapshot","bids":[[38465.5,1200.0]],"asks":[[38470.0,500.0]],"product_id":"PI_XBTUSD"}"#;
        let msg = FeedMessage::parse(raw).unwrap();

        assert_eq!(msg.feed.as_deref(), Some(SNAPSHOT_FEED));
        assert_eq!(msg.product_id.as_deref(), Some("PI_XBTUSD"));
        assert_eq!(msg.bids, Some(vec![[38465.5, 1200.0]]));
        assert!(!msg.is_unsubscribed());
    }

    #[test]
    fn test_parse_unsubscribed_event() {
        let raw = r#"{"event":"unsubscribed","feed":"book_ui_1","product_ids":["PI_XBTUSD"]}"#;
        let msg = FeedMessage::parse(raw).unwrap();

        assert!(msg.is_unsubscribed());
        assert!(msg.bids.is_none());
    }

    #[test]
    fn test_parse_rejects_malformed_levels() {
        assert!(FeedMessage::parse(r#"{"feed":"book_ui_1","bids":[[1.0]],"asks":[]}"#).is_err());
        assert!(FeedMessage::parse(r#"{"feed":"book_ui_1","bids":"x","asks":[]}"#).is_err());
        assert!(FeedMessage::parse("not json").is_err());
    }

    #[test]
    fn test_subscription_frames() {
        let sub = SubscriptionRequest::subscribe(ProductId::XbtUsd).to_json().unwrap();
        assert_eq!(
            sub,
            r#"{"event":"subscribe","feed":"book_ui_1","product_ids":["PI_XBTUSD"]}"#
        );

        let unsub = SubscriptionRequest::unsubscribe(ProductId::EthUsd).to_json().unwrap();
        assert_eq!(
            unsub,
            r#"{"event":"unsubscribe","feed":"book_ui_1","product_ids":["PI_ETHUSD"]}"#
        );
    }

    #[test]
    fn test_product_toggle() {
        assert_eq!(ProductId::XbtUsd.toggle(), ProductId::EthUsd);
        assert_eq!(ProductId::EthUsd.toggle(), ProductId::XbtUsd);
        assert_eq!(ProductId::from("PI_SOLUSD").toggle(), ProductId::XbtUsd);
        assert_eq!(ProductId::from("PI_SOLUSD").as_str(), "PI_SOLUSD");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(38465.5), "38,465.50");
        assert_eq!(format_price(999.999), "1,000.00");
        assert_eq!(format_price(12.0), "12.00");
        assert_eq!(format_price(1234567.891), "1,234,567.89");
        assert_eq!(format_price(-1500.0), "-1,500.00");
    }
}
