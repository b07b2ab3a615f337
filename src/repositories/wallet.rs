use crate::models::wallet::WalletBalance;
use anyhow::bail;
use reqwest;

#[derive(Clone)]
pub struct WalletApi {
    url: String,
    client: reqwest::Client,
}

impl WalletApi {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    pub async fn balance(&self, token: &str) -> Result<WalletBalance, anyhow::Error> {
        let response = self
            .client
            .get(format!("{}/wallet", self.url))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_balance(status, &body)
    }

    pub async fn recharge(&self, token: &str, amount: i64) -> Result<WalletBalance, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/wallet/recharge", self.url))
            .bearer_auth(token)
            .query(&[("amount", amount)])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_balance(status, &body)
    }
}

pub fn parse_balance(status: u16, body: &str) -> Result<WalletBalance, anyhow::Error> {
    if !(200..300).contains(&status) {
        bail!("Wallet: request failed ({}): {}", status, body);
    }

    match serde_json::from_str(body) {
        Ok(balance) => Ok(balance),
        Err(_) => bail!("Wallet: Bad balance format."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_parses_credits() {
        let balance = parse_balance(200, r#"{"credits":500}"#).unwrap();
        assert_eq!(balance.credits, 500);
    }

    #[test]
    fn non_success_status_is_an_error() {
        let err = parse_balance(500, "oops").unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn missing_credits_field_is_an_error() {
        assert!(parse_balance(200, r#"{"balance":500}"#).is_err());
    }
}
