use std::path::PathBuf;

use async_trait::async_trait;
use futures_util::TryFutureExt;
use tokio::sync::oneshot;

use super::{require_token, RequestHandler, Service, ServiceError};
use crate::models::leads::{LeadCreated, LeadImportReport, NewLead};
use crate::models::session::SessionStore;
use crate::repositories::leads::LeadsApi;

pub enum LeadRequest {
    AddLead {
        lead: NewLead,
        response: oneshot::Sender<Result<LeadCreated, ServiceError>>,
    },
    ImportCsv {
        path: PathBuf,
        response: oneshot::Sender<Result<LeadImportReport, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct LeadRequestHandler {
    api: LeadsApi,
    store: SessionStore,
}

impl LeadRequestHandler {
    pub fn new(api_url: String, store: SessionStore) -> Self {
        LeadRequestHandler {
            api: LeadsApi::new(api_url),
            store,
        }
    }

    async fn add_lead(&self, lead: NewLead) -> Result<LeadCreated, ServiceError> {
        let token = require_token(&self.store, "Leads").await?;

        self.api
            .add_lead(&token, &lead)
            .map_err(|e| ServiceError::Repository("Leads".to_string(), e.to_string()))
            .await
    }

    async fn import_csv(&self, path: PathBuf) -> Result<LeadImportReport, ServiceError> {
        let token = require_token(&self.store, "Leads").await?;

        self.api
            .upload_csv(&token, &path)
            .map_err(|e| ServiceError::Repository("Leads".to_string(), e.to_string()))
            .await
    }
}

#[async_trait]
impl RequestHandler<LeadRequest> for LeadRequestHandler {
    async fn handle_request(&self, request: LeadRequest) {
        match request {
            LeadRequest::AddLead { lead, response } => {
                let created = self.add_lead(lead).await;
                let _ = response.send(created);
            }
            LeadRequest::ImportCsv { path, response } => {
                let report = self.import_csv(path).await;
                let _ = response.send(report);
            }
        }
    }
}

pub struct LeadService;

impl LeadService {
    pub fn new() -> Self {
        LeadService {}
    }
}

#[async_trait]
impl Service<LeadRequest, LeadRequestHandler> for LeadService {}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_without_session_fails_before_any_io() {
        let store = SessionStore::new();
        let handler = LeadRequestHandler::new("http://127.0.0.1:1".to_string(), store);

        let err = handler
            .add_lead(NewLead {
                name: "Bob".to_string(),
                phone: "+15551234567".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn import_without_session_fails_before_any_io() {
        let store = SessionStore::new();
        let handler = LeadRequestHandler::new("http://127.0.0.1:1".to_string(), store);

        let err = handler.import_csv(PathBuf::from("leads.csv")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }
}
