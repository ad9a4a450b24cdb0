use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

pub const ADDRESS_LEN: usize = 32;

/// 32-byte account identity, rendered as URL-safe unpadded base64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds a well-known address from a short ASCII tag, zero-padded.
    pub const fn from_tag(tag: &[u8]) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        let mut i = 0;
        while i < tag.len() && i < ADDRESS_LEN {
            bytes[i] = tag[i];
            i += 1;
        }
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Leading characters of the encoded form, for status lines and logs.
    pub fn short(&self) -> String {
        let encoded = self.to_string();
        encoded.chars().take(6).collect()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&URL_SAFE_NO_PAD.encode(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address encoding: {0}")]
pub struct ParseAddressError(String);

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = URL_SAFE_NO_PAD
            .decode(s.as_bytes())
            .map_err(|e| ParseAddressError(e.to_string()))?;
        let bytes: [u8; ADDRESS_LEN] = decoded
            .try_into()
            .map_err(|_| ParseAddressError(format!("expected {ADDRESS_LEN} bytes")))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

/// One seller persona in the compiled-in catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Influencer {
    pub id: String,
    pub name: String,
    pub description: String,
    pub avatar_uri: String,
    /// Ordered, non-empty set of outfit asset URIs this persona can drop.
    pub outfits: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Processing,
    Shipped,
    Delivered,
}

/// Shipping capture for one purchase. Held transiently by the session only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingDetails {
    pub recipient_name: String,
    pub street_address: String,
    pub city: String,
    pub postal_code: String,
}

impl ShippingDetails {
    /// Single-line summary stored on the order record.
    pub fn summary(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.recipient_name, self.street_address, self.city, self.postal_code
        )
    }
}

/// Confirmed purchase, appended to the local ledger newest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub tracking_id: String,
    pub asset_uri: String,
    pub influencer: String,
    pub created_at: DateTime<Utc>,
    pub delivery_status: DeliveryStatus,
    pub shipping_summary: String,
    pub listing: Address,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_round_trips_through_display() {
        let address = Address::new([7u8; ADDRESS_LEN]);
        let parsed: Address = address.to_string().parse().unwrap();
        assert_eq!(parsed, address);
    }

    #[test]
    fn address_rejects_wrong_length() {
        assert!("AAEC".parse::<Address>().is_err());
        assert!("not base64!!".parse::<Address>().is_err());
    }

    #[test]
    fn tag_addresses_are_stable() {
        assert_eq!(
            Address::from_tag(b"authority"),
            Address::from_tag(b"authority")
        );
        assert_ne!(
            Address::from_tag(b"authority"),
            Address::from_tag(b"metadata")
        );
    }

    #[test]
    fn shipping_summary_joins_fields() {
        let details = ShippingDetails {
            recipient_name: "Jane".into(),
            street_address: "1 Main St".into(),
            city: "NYC".into(),
            postal_code: "10001".into(),
        };
        assert_eq!(details.summary(), "Jane, 1 Main St, NYC 10001");
    }
}
