use serde::{Deserialize, Serialize};

/// A prepaid credit pack as listed by the billing API. `amount` is in minor
/// currency units. List order is whatever the server returned.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreditPack {
    pub id: String,
    pub label: String,
    pub amount: i64,
    pub credits: i64,
    #[serde(default)]
    pub currency: String,
}

/// Response from order creation. The gateway order is opaque to this client
/// and is handed to the external checkout unmodified; only `id` is ever read.
#[derive(Clone, Debug, Deserialize)]
pub struct OrderReceipt {
    pub order: serde_json::Value,
    pub key_id: String,
}

impl OrderReceipt {
    pub fn order_id(&self) -> Option<&str> {
        self.order.get("id").and_then(|v| v.as_str())
    }
}

/// An order receipt paired with the cached pack it was created from, when the
/// pack is known. The pack is display-only.
#[derive(Clone, Debug)]
pub struct PlacedOrder {
    pub receipt: OrderReceipt,
    pub pack: Option<CreditPack>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_list_deserializes_in_server_order() {
        let body = r#"[
            {"id":"starter_1000","amount":1000,"credits":1000,"label":"Starter","currency":"INR"},
            {"id":"growth_6000","amount":5000,"credits":6000,"label":"Growth","currency":"INR"}
        ]"#;

        let packs: Vec<CreditPack> = serde_json::from_str(body).unwrap();
        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].id, "starter_1000");
        assert_eq!(packs[0].amount, 1000);
        assert_eq!(packs[1].label, "Growth");
        assert_eq!(packs[1].currency, "INR");
    }

    #[test]
    fn pack_without_currency_defaults_to_empty() {
        let body = r#"{"id":"2","amount":5000,"credits":6000,"label":"Growth"}"#;
        let pack: CreditPack = serde_json::from_str(body).unwrap();
        assert_eq!(pack.currency, "");
    }

    #[test]
    fn receipt_keeps_the_order_opaque() {
        let body = r#"{
            "order": {
                "id": "order_EKwxwAgItmmXdp",
                "entity": "order",
                "amount": 5000,
                "currency": "INR",
                "receipt": "7::growth_6000",
                "status": "created"
            },
            "key_id": "rzp_test_key"
        }"#;

        let receipt: OrderReceipt = serde_json::from_str(body).unwrap();
        assert_eq!(receipt.order_id(), Some("order_EKwxwAgItmmXdp"));
        assert_eq!(receipt.key_id, "rzp_test_key");
        assert_eq!(receipt.order["receipt"], "7::growth_6000");
    }

    #[test]
    fn receipt_without_order_id_is_still_usable() {
        let body = r#"{"order": {"status": "created"}, "key_id": "k"}"#;
        let receipt: OrderReceipt = serde_json::from_str(body).unwrap();
        assert_eq!(receipt.order_id(), None);
    }
}
