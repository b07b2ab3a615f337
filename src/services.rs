use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::models::session::SessionStore;
use crate::settings::Settings;

pub mod billing;
pub mod console;
pub mod leads;
pub mod session;
pub mod wallet;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Repository error: {0} - {1}")]
    Repository(String, String),
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
    #[error("Not authenticated: {0} requires a session token")]
    Unauthenticated(String),
    #[error("{0}")]
    Rejected(String),
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

/// No authenticated request leaves the process without a stored token.
pub(crate) async fn require_token(
    store: &SessionStore,
    service: &str,
) -> Result<String, ServiceError> {
    match store.token().await {
        Some(token) => Ok(token),
        None => Err(ServiceError::Unauthenticated(service.to_string())),
    }
}

/// Request senders handed to the console, plus the shared session store that
/// gates the authenticated screen.
#[derive(Clone)]
pub struct ServiceChannels {
    pub session: mpsc::Sender<session::SessionRequest>,
    pub wallet: mpsc::Sender<wallet::WalletRequest>,
    pub billing: mpsc::Sender<billing::BillingRequest>,
    pub leads: mpsc::Sender<leads::LeadRequest>,
    pub session_store: SessionStore,
}

pub async fn start_services(settings: Settings) -> Result<ServiceChannels, anyhow::Error> {
    let base_url = settings.api.base_url();
    let store = SessionStore::new();

    let (session_tx, mut session_rx) = mpsc::channel(512);
    let (wallet_tx, mut wallet_rx) = mpsc::channel(512);
    let (billing_tx, mut billing_rx) = mpsc::channel(512);
    let (lead_tx, mut lead_rx) = mpsc::channel(512);

    let mut session_service = session::SessionService::new();
    let mut wallet_service = wallet::WalletService::new();
    let mut billing_service = billing::BillingService::new();
    let mut lead_service = leads::LeadService::new();

    println!("[*] Starting session service.");
    let session_url = base_url.clone();
    let session_store = store.clone();
    tokio::spawn(async move {
        session_service
            .run(
                session::SessionRequestHandler::new(session_url, session_store),
                &mut session_rx,
            )
            .await;
    });

    log::info!("Starting wallet service.");
    let wallet_url = base_url.clone();
    let wallet_store = store.clone();
    tokio::spawn(async move {
        wallet_service
            .run(
                wallet::WalletRequestHandler::new(wallet_url, wallet_store),
                &mut wallet_rx,
            )
            .await;
    });

    log::info!("Starting billing service.");
    let billing_url = base_url.clone();
    let billing_store = store.clone();
    tokio::spawn(async move {
        billing_service
            .run(
                billing::BillingRequestHandler::new(billing_url, billing_store),
                &mut billing_rx,
            )
            .await;
    });

    println!("[*] Starting lead service.");
    let lead_url = base_url.clone();
    let lead_store = store.clone();
    tokio::spawn(async move {
        lead_service
            .run(
                leads::LeadRequestHandler::new(lead_url, lead_store),
                &mut lead_rx,
            )
            .await;
    });

    println!("[SUCCESS] Started services.");
    Ok(ServiceChannels {
        session: session_tx,
        wallet: wallet_tx,
        billing: billing_tx,
        leads: lead_tx,
        session_store: store,
    })
}
