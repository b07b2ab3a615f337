use async_trait::async_trait;
use futures_util::TryFutureExt;
use tokio::sync::oneshot;

use super::{require_token, RequestHandler, Service, ServiceError};
use crate::models::session::SessionStore;
use crate::models::wallet::WalletBalance;
use crate::repositories::wallet::WalletApi;

pub enum WalletRequest {
    GetBalance {
        response: oneshot::Sender<Result<WalletBalance, ServiceError>>,
    },
    Recharge {
        amount: i64,
        response: oneshot::Sender<Result<WalletBalance, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct WalletRequestHandler {
    api: WalletApi,
    store: SessionStore,
}

impl WalletRequestHandler {
    pub fn new(api_url: String, store: SessionStore) -> Self {
        WalletRequestHandler {
            api: WalletApi::new(api_url),
            store,
        }
    }

    async fn get_balance(&self) -> Result<WalletBalance, ServiceError> {
        let token = require_token(&self.store, "Wallet").await?;

        self.api
            .balance(&token)
            .map_err(|e| ServiceError::Repository("Wallet".to_string(), e.to_string()))
            .await
    }

    async fn recharge(&self, amount: i64) -> Result<WalletBalance, ServiceError> {
        let token = require_token(&self.store, "Wallet").await?;

        self.api
            .recharge(&token, amount)
            .map_err(|e| ServiceError::Repository("Wallet".to_string(), e.to_string()))
            .await
    }
}

#[async_trait]
impl RequestHandler<WalletRequest> for WalletRequestHandler {
    async fn handle_request(&self, request: WalletRequest) {
        match request {
            WalletRequest::GetBalance { response } => {
                let balance = self.get_balance().await;
                let _ = response.send(balance);
            }
            WalletRequest::Recharge { amount, response } => {
                let balance = self.recharge(amount).await;
                let _ = response.send(balance);
            }
        }
    }
}

pub struct WalletService;

impl WalletService {
    pub fn new() -> Self {
        WalletService {}
    }
}

#[async_trait]
impl Service<WalletRequest, WalletRequestHandler> for WalletService {}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn balance_without_session_fails_before_any_io() {
        let store = SessionStore::new();
        // Unroutable port: touching the network would surface a different error.
        let handler = WalletRequestHandler::new("http://127.0.0.1:1".to_string(), store);

        let err = handler.get_balance().await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn recharge_without_session_fails_before_any_io() {
        let store = SessionStore::new();
        let handler = WalletRequestHandler::new("http://127.0.0.1:1".to_string(), store);

        let err = handler.recharge(100).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }
}
