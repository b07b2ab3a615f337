use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::session::{AuthAttempt, Session, SessionStore};
use crate::repositories::auth::AuthApi;

pub enum SessionRequest {
    SignUp {
        business_name: String,
        email: String,
        password: String,
        response: oneshot::Sender<Result<Session, ServiceError>>,
    },
    LogIn {
        email: String,
        password: String,
        response: oneshot::Sender<Result<Session, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct SessionRequestHandler {
    api: AuthApi,
    store: SessionStore,
}

impl SessionRequestHandler {
    pub fn new(api_url: String, store: SessionStore) -> Self {
        SessionRequestHandler {
            api: AuthApi::new(api_url),
            store,
        }
    }

    async fn sign_up(
        &self,
        business_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ServiceError> {
        let attempt = self
            .api
            .signup(business_name, email, password)
            .await
            .map_err(|e| ServiceError::Repository("Session".to_string(), e.to_string()))?;

        self.admit(attempt).await
    }

    async fn log_in(&self, email: &str, password: &str) -> Result<Session, ServiceError> {
        let attempt = self
            .api
            .login(email, password)
            .await
            .map_err(|e| ServiceError::Repository("Session".to_string(), e.to_string()))?;

        self.admit(attempt).await
    }

    /// Stores the session only when the server granted a token. A denial
    /// leaves the store untouched and carries the raw body.
    async fn admit(&self, attempt: AuthAttempt) -> Result<Session, ServiceError> {
        match attempt {
            AuthAttempt::Granted { token } => {
                let session = Session::new(token);
                self.store.set(session.clone()).await;
                log::info!("Session token acquired.");
                Ok(session)
            }
            AuthAttempt::Denied { raw } => {
                log::warn!("Authentication denied by server.");
                Err(ServiceError::Rejected(raw))
            }
        }
    }
}

#[async_trait]
impl RequestHandler<SessionRequest> for SessionRequestHandler {
    async fn handle_request(&self, request: SessionRequest) {
        match request {
            SessionRequest::SignUp {
                business_name,
                email,
                password,
                response,
            } => {
                let session = self.sign_up(&business_name, &email, &password).await;
                let _ = response.send(session);
            }
            SessionRequest::LogIn {
                email,
                password,
                response,
            } => {
                let session = self.log_in(&email, &password).await;
                let _ = response.send(session);
            }
        }
    }
}

pub struct SessionService;

impl SessionService {
    pub fn new() -> Self {
        SessionService {}
    }
}

#[async_trait]
impl Service<SessionRequest, SessionRequestHandler> for SessionService {}
