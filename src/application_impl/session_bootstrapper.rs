use crate::application_impl::CredentialStore;
use crate::application_port::{GatewayClient, HealthReport, SessionError, SessionService};
use crate::domain_model::*;
use crate::domain_port::{ChatSessionError, ChatSessionProvider};
use crate::logger::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, watch};

/// Client-side session coordinator.
///
/// All collaborators are handed in at construction; state changes are
/// published on a watch channel for whatever renders them.
pub struct SessionBootstrapper {
    gateway: Arc<dyn GatewayClient>,
    chat: Arc<dyn ChatSessionProvider>,
    credentials: CredentialStore,
    state: watch::Sender<SessionState>,
    login_flight: Mutex<()>,
    restored: AtomicBool,
}

impl SessionBootstrapper {
    pub fn new(
        gateway: Arc<dyn GatewayClient>,
        chat: Arc<dyn ChatSessionProvider>,
        credentials: CredentialStore,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::initial());
        Self {
            gateway,
            chat,
            credentials,
            state,
            login_flight: Mutex::new(()),
            restored: AtomicBool::new(false),
        }
    }

    fn phase(&self) -> SessionPhase {
        self.state.borrow().phase
    }

    fn set_connecting(&self) {
        self.state.send_replace(SessionState {
            phase: SessionPhase::Connecting,
            current_user: None,
        });
    }

    fn set_authenticated(&self, user: CurrentUser) {
        self.state.send_replace(SessionState {
            phase: SessionPhase::Authenticated,
            current_user: Some(user),
        });
    }

    fn set_unauthenticated(&self) {
        self.state.send_replace(SessionState {
            phase: SessionPhase::Unauthenticated,
            current_user: None,
        });
    }

    async fn connect(
        &self,
        user_id: &UserId,
        token: &ChatToken,
        user_data: Option<&ChatUser>,
    ) -> Result<CurrentUser, ChatSessionError> {
        let descriptor = ChatUserDescriptor::new(user_id.clone(), user_data);
        self.chat.connect_user(&descriptor, token).await?;
        Ok(CurrentUser {
            id: user_id.clone(),
            token: token.clone(),
            user_data: user_data.cloned(),
        })
    }

    async fn discard_credentials(&self) {
        if let Err(e) = self.credentials.clear().await {
            error!("clearing stored credentials: {}", e);
        }
    }
}

#[async_trait::async_trait]
impl SessionService for SessionBootstrapper {
    async fn restore_session(&self) -> SessionState {
        if self.restored.swap(true, Ordering::SeqCst) {
            return self.state();
        }

        let record = match self.credentials.load().await {
            Ok(record) => record,
            Err(e) => {
                warn!("reading stored credentials: {}", e);
                self.discard_credentials().await;
                self.set_unauthenticated();
                return self.state();
            }
        };

        let Some((user_id, token)) = record.restorable() else {
            if record.is_empty() {
                info!("no existing auth data found");
            } else {
                warn!("discarding incomplete stored credentials");
                self.discard_credentials().await;
            }
            self.set_unauthenticated();
            return self.state();
        };

        info!(%user_id, "found existing auth data");
        match self.connect(user_id, token, record.user_data.as_ref()).await {
            Ok(current) => {
                info!(%user_id, "chat client initialized");
                self.set_authenticated(current);
            }
            Err(e) => {
                warn!(%user_id, "stored session rejected: {}", e);
                self.discard_credentials().await;
                self.set_unauthenticated();
            }
        }
        self.state()
    }

    async fn login(&self, user_id: &str) -> Result<CurrentUser, SessionError> {
        let user_id = UserId::parse(user_id)?;
        let _flight = self
            .login_flight
            .try_lock()
            .map_err(|_| SessionError::LoginInProgress)?;

        let phase = self.phase();
        if phase != SessionPhase::Unauthenticated {
            return Err(SessionError::InvalidTransition {
                action: "log in",
                phase,
            });
        }
        self.set_connecting();

        let grant = match self.gateway.login(&user_id).await {
            Ok(grant) => grant,
            Err(e) => {
                warn!(%user_id, "login rejected: {}", e);
                self.set_unauthenticated();
                return Err(e.into());
            }
        };

        let record = CredentialRecord::from(&grant);
        if let Err(e) = self.credentials.save(&record).await {
            error!(%user_id, "saving credentials: {}", e);
            self.discard_credentials().await;
            self.set_unauthenticated();
            return Err(e.into());
        }

        match self.connect(&grant.user_id, &grant.token, Some(&grant.user)).await {
            Ok(current) => {
                info!(user_id = %current.id, "logged in");
                self.set_authenticated(current.clone());
                Ok(current)
            }
            Err(e) => {
                error!(%user_id, "initializing chat: {}", e);
                self.discard_credentials().await;
                self.set_unauthenticated();
                Err(e.into())
            }
        }
    }

    async fn logout(&self) -> Result<(), SessionError> {
        let phase = self.phase();
        match phase {
            SessionPhase::Connecting => {
                return Err(SessionError::InvalidTransition {
                    action: "log out",
                    phase,
                });
            }
            SessionPhase::Authenticated => {
                // Disconnect settles before credentials are cleared.
                if let Err(e) = self.chat.disconnect_user().await {
                    warn!("disconnecting chat: {}", e);
                }
            }
            SessionPhase::Unauthenticated => {}
        }

        let cleared = self.credentials.clear().await;
        self.set_unauthenticated();
        cleared?;
        info!("logged out");
        Ok(())
    }

    async fn check_gateway(&self) -> Result<HealthReport, SessionError> {
        let report = self.gateway.check_health().await.inspect_err(|e| {
            warn!("backend connection failed: {}", e);
        })?;
        debug!(message = %report.message, "backend connection successful");
        Ok(report)
    }

    fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}
