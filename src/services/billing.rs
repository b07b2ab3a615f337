use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::oneshot;

use super::{require_token, RequestHandler, Service, ServiceError};
use crate::models::billing::{CreditPack, PlacedOrder};
use crate::models::session::SessionStore;
use crate::repositories::billing::BillingApi;

pub enum BillingRequest {
    ListPacks {
        response: oneshot::Sender<Result<Vec<CreditPack>, ServiceError>>,
    },
    CreateOrder {
        pack_id: String,
        response: oneshot::Sender<Result<PlacedOrder, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct BillingRequestHandler {
    api: BillingApi,
    store: SessionStore,
    // Last pack listing, keyed by id. Display-only: the server stays the
    // authority on pack existence, unknown ids are forwarded untouched.
    packs: Arc<DashMap<String, CreditPack>>,
}

impl BillingRequestHandler {
    pub fn new(api_url: String, store: SessionStore) -> Self {
        BillingRequestHandler {
            api: BillingApi::new(api_url),
            store,
            packs: Arc::new(DashMap::new()),
        }
    }

    async fn list_packs(&self) -> Result<Vec<CreditPack>, ServiceError> {
        let token = require_token(&self.store, "Billing").await?;

        let packs = self
            .api
            .list_packs(&token)
            .await
            .map_err(|e| ServiceError::Repository("Billing".to_string(), e.to_string()))?;

        self.packs.clear();
        for pack in &packs {
            self.packs.insert(pack.id.clone(), pack.clone());
        }

        Ok(packs)
    }

    async fn create_order(&self, pack_id: &str) -> Result<PlacedOrder, ServiceError> {
        let token = require_token(&self.store, "Billing").await?;

        let receipt = self
            .api
            .create_order(&token, pack_id)
            .await
            .map_err(|e| ServiceError::Repository("Billing".to_string(), e.to_string()))?;

        let pack = self.packs.get(pack_id).map(|entry| entry.value().clone());

        Ok(PlacedOrder { receipt, pack })
    }
}

#[async_trait]
impl RequestHandler<BillingRequest> for BillingRequestHandler {
    async fn handle_request(&self, request: BillingRequest) {
        match request {
            BillingRequest::ListPacks { response } => {
                let packs = self.list_packs().await;
                let _ = response.send(packs);
            }
            BillingRequest::CreateOrder { pack_id, response } => {
                let order = self.create_order(&pack_id).await;
                let _ = response.send(order);
            }
        }
    }
}

pub struct BillingService;

impl BillingService {
    pub fn new() -> Self {
        BillingService {}
    }
}

#[async_trait]
impl Service<BillingRequest, BillingRequestHandler> for BillingService {}
