use crate::models::session::AuthAttempt;
use anyhow::bail;
use reqwest;
use serde_json::json;

#[derive(Clone)]
pub struct AuthApi {
    url: String,
    client: reqwest::Client,
}

impl AuthApi {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    pub async fn signup(
        &self,
        business_name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthAttempt, anyhow::Error> {
        let payload = json!({
            "business_name": business_name,
            "email": email,
            "password": password
        });

        let response = self
            .client
            .post(format!("{}/auth/signup", self.url))
            .json(&payload)
            .send()
            .await?
            .text()
            .await?;

        parse_auth_response(&response)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthAttempt, anyhow::Error> {
        let payload = json!({
            "email": email,
            "password": password
        });

        let response = self
            .client
            .post(format!("{}/auth/login", self.url))
            .json(&payload)
            .send()
            .await?
            .text()
            .await?;

        parse_auth_response(&response)
    }
}

/// A body carrying a string `token` grants a session; any other JSON body is
/// a denial kept verbatim for display. A non-JSON body is a protocol error.
pub fn parse_auth_response(body: &str) -> Result<AuthAttempt, anyhow::Error> {
    let response_json: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => bail!("Auth: Bad response format: {}", body),
    };

    match response_json.get("token").and_then(|t| t.as_str()) {
        Some(token) => Ok(AuthAttempt::Granted {
            token: token.to_string(),
        }),
        None => Ok(AuthAttempt::Denied {
            raw: body.to_string(),
        }),
    }
}
