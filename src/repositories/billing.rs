use crate::models::billing::{CreditPack, OrderReceipt};
use anyhow::bail;
use reqwest;
use serde_json::json;
use uuid::Uuid;

#[derive(Clone)]
pub struct BillingApi {
    url: String,
    client: reqwest::Client,
}

impl BillingApi {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    pub async fn list_packs(&self, token: &str) -> Result<Vec<CreditPack>, anyhow::Error> {
        let response = self
            .client
            .get(format!("{}/billing/packs", self.url))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_packs(status, &body)
    }

    pub async fn create_order(
        &self,
        token: &str,
        pack_id: &str,
    ) -> Result<OrderReceipt, anyhow::Error> {
        let nonce = Uuid::new_v4().hyphenated().to_string();
        let payload = json!({ "pack_id": pack_id });

        let response = self
            .client
            .post(format!("{}/billing/create_order", self.url))
            .bearer_auth(token)
            .header("X-Request-Id", nonce)
            .json(&payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_order(status, &body)
    }
}

pub fn parse_packs(status: u16, body: &str) -> Result<Vec<CreditPack>, anyhow::Error> {
    if !(200..300).contains(&status) {
        bail!("Billing: pack listing failed ({}): {}", status, body);
    }

    match serde_json::from_str(body) {
        Ok(packs) => Ok(packs),
        Err(_) => bail!("Billing: Bad pack list format."),
    }
}

pub fn parse_order(status: u16, body: &str) -> Result<OrderReceipt, anyhow::Error> {
    if !(200..300).contains(&status) {
        bail!("Billing: order creation failed ({}): {}", status, body);
    }

    match serde_json::from_str(body) {
        Ok(receipt) => Ok(receipt),
        Err(_) => bail!("Billing: Bad order format."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_parse_on_success_status() {
        let body = r#"[{"id":"starter_1000","amount":1000,"credits":1000,"label":"Starter","currency":"INR"}]"#;
        let packs = parse_packs(200, body).unwrap();
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].credits, 1000);
    }

    #[test]
    fn packs_error_carries_status_and_body() {
        let err = parse_packs(401, r#"{"detail":"Invalid token"}"#).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("Invalid token"));
    }

    #[test]
    fn order_parses_with_opaque_payload() {
        let body = r#"{"order":{"id":"order_1","amount":5000,"notes":{"pack_id":"growth_6000"}},"key_id":"rzp_k"}"#;
        let receipt = parse_order(200, body).unwrap();
        assert_eq!(receipt.order_id(), Some("order_1"));
        assert_eq!(receipt.order["notes"]["pack_id"], "growth_6000");
    }

    #[test]
    fn order_404_is_an_error() {
        assert!(parse_order(404, r#"{"detail":"Pack not found"}"#).is_err());
    }

    #[test]
    fn malformed_order_body_is_an_error() {
        assert!(parse_order(200, r#"{"key_id":"rzp_k"}"#).is_err());
    }
}
