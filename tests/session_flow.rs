use huddle::api;
use huddle::application_impl::{CREDENTIAL_KEYS, CredentialStore, RealAuthGateway, SessionBootstrapper};
use huddle::application_port::{GatewayClient, GatewayClientError, SessionError, SessionService};
use huddle::domain_model::{ChatUser, SessionPhase, UserId};
use huddle::domain_port::{ChatSessionProvider, ChatUserDirectory, DirectoryError, KeyValueStore};
use huddle::infra::{FakeChatSession, FileKeyValueStore, HttpGatewayClient, JwtTokenMinter, MemoryUserDirectory};
use huddle::server::Server;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn spawn_gateway(directory: Arc<dyn ChatUserDirectory>) -> SocketAddr {
    let gateway = RealAuthGateway::new(directory, Arc::new(JwtTokenMinter::new(b"secret")), "key-123");
    let server = Arc::new(Server::new(Arc::new(gateway)));
    let (address, serving) = warp::serve(api::api(server)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(serving);
    address
}

fn client(address: SocketAddr) -> HttpGatewayClient {
    HttpGatewayClient::new(format!("http://{}/", address), Duration::from_secs(5)).unwrap()
}

fn launch(address: SocketAddr, storage: &Path, chat: Arc<FakeChatSession>) -> SessionBootstrapper {
    SessionBootstrapper::new(
        Arc::new(client(address)),
        chat,
        CredentialStore::new(Arc::new(FileKeyValueStore::new(storage))),
    )
}

#[tokio::test]
async fn login_survives_relaunch_and_logout_forgets_it() {
    let address = spawn_gateway(Arc::new(MemoryUserDirectory::new()));
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("session.json");
    let chat = Arc::new(FakeChatSession::new());

    let session = launch(address, &storage, chat.clone());
    assert!(session.check_gateway().await.unwrap().success);
    assert_eq!(session.restore_session().await.phase, SessionPhase::Unauthenticated);

    let current = session.login("john_doe").await.unwrap();
    assert_eq!(current.id.as_str(), "john_doe");
    assert_eq!(
        current.user_data.as_ref().and_then(|u| u.name.as_deref()),
        Some("john_doe")
    );
    assert_eq!(chat.current_user().await.unwrap().id.as_str(), "john_doe");

    let relaunched = launch(address, &storage, chat.clone());
    let state = relaunched.restore_session().await;
    assert!(state.is_authenticated());
    assert_eq!(state.current_user.unwrap().id, current.id);

    relaunched.logout().await.unwrap();
    assert!(chat.current_user().await.is_none());
    let store = FileKeyValueStore::new(&storage);
    for key in CREDENTIAL_KEYS {
        assert_eq!(store.get(key).await.unwrap(), None, "{key} survived logout");
    }

    let after_logout = launch(address, &storage, chat);
    assert_eq!(
        after_logout.restore_session().await.phase,
        SessionPhase::Unauthenticated
    );
}

#[tokio::test]
async fn gateway_sees_the_same_user_on_every_login() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let address = spawn_gateway(directory.clone());
    let client = client(address);
    let id = UserId::parse("john_doe").unwrap();

    let first = client.login(&id).await.unwrap();
    let second = client.login(&id).await.unwrap();
    assert_eq!(first.user, second.user);
    assert_ne!(first.token, second.token);
    assert_eq!(first.api_key, "key-123");
    assert_eq!(directory.len(), 1);
}

struct DownDirectory;

#[async_trait::async_trait]
impl ChatUserDirectory for DownDirectory {
    async fn query_user(&self, _id: &UserId) -> Result<Option<ChatUser>, DirectoryError> {
        Err(DirectoryError::Rejected {
            status: 401,
            body: "api secret mismatch".to_string(),
        })
    }

    async fn upsert_user(&self, _user: &ChatUser) -> Result<ChatUser, DirectoryError> {
        unreachable!("upsert after a failed query")
    }
}

#[tokio::test]
async fn backend_failure_reaches_the_client_as_a_server_error() {
    let address = spawn_gateway(Arc::new(DownDirectory));
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("session.json");

    let session = launch(address, &storage, Arc::new(FakeChatSession::new()));
    session.restore_session().await;
    let err = session.login("john_doe").await.unwrap_err();
    match err {
        SessionError::Gateway(GatewayClientError::Rejected { status, message, detail }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Login failed");
            assert!(detail.unwrap().contains("api secret mismatch"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(session.state().phase, SessionPhase::Unauthenticated);
    assert!(!storage.exists());
}

#[tokio::test]
async fn unreachable_gateway_is_a_transport_error() {
    let dir = tempfile::tempdir().unwrap();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let session = launch(address, &dir.path().join("s.json"), Arc::new(FakeChatSession::new()));
    session.restore_session().await;
    let err = session.login("john_doe").await.unwrap_err();
    assert!(matches!(err, SessionError::Gateway(GatewayClientError::Transport(_))));
}
