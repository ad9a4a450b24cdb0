//! Append-only, newest-first record of confirmed purchases. Lives for the
//! running session only; there is no removal operation.

use rand::Rng;
use shared::domain::Order;

#[derive(Default)]
pub struct OrderLedger {
    entries: Vec<Order>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts at the head; existing entries keep their order.
    pub fn append(&mut self, order: Order) {
        self.entries.insert(0, order);
    }

    /// Entries newest-first.
    pub fn orders(&self) -> &[Order] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Display-only identifiers. Not unique in any cryptographic sense; the chain
// signature on the order is the authoritative reference.
const ID_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const ID_SUFFIX_LEN: usize = 8;

fn display_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{prefix}-{suffix}")
}

pub fn new_order_id() -> String {
    display_id("ORD")
}

pub fn new_tracking_id() -> String {
    display_id("TRK")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use shared::domain::{Address, DeliveryStatus};

    use super::*;

    fn order(tag: u8) -> Order {
        Order {
            order_id: new_order_id(),
            tracking_id: new_tracking_id(),
            asset_uri: format!("ipfs://outfit-{tag}"),
            influencer: "Zaara".into(),
            created_at: Utc::now(),
            delivery_status: DeliveryStatus::Processing,
            shipping_summary: "Jane, 1 Main St, NYC 10001".into(),
            listing: Address::new([tag; 32]),
        }
    }

    #[test]
    fn append_inserts_newest_first() {
        let mut ledger = OrderLedger::new();
        ledger.append(order(1));
        ledger.append(order(2));
        ledger.append(order(3));

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.orders()[0].listing, Address::new([3; 32]));
        assert_eq!(ledger.orders()[2].listing, Address::new([1; 32]));
        assert!(ledger.orders()[0].created_at >= ledger.orders()[2].created_at);
    }

    #[test]
    fn display_ids_carry_prefix_and_length() {
        let id = new_order_id();
        assert!(id.starts_with("ORD-"));
        assert_eq!(id.len(), 4 + ID_SUFFIX_LEN);
        assert!(new_tracking_id().starts_with("TRK-"));
    }
}
