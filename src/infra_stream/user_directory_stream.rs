use crate::domain_model::{ChatUser, UserId};
use crate::domain_port::{ChatUserDirectory, DirectoryError};
use crate::logger::*;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://chat.stream-io-api.com";

#[derive(Debug, Serialize)]
struct ServerClaims {
    server: bool,
}

#[derive(Debug, Deserialize)]
struct QueryUsersResponse {
    #[serde(default)]
    users: Vec<ChatUser>,
}

#[derive(Debug, Deserialize)]
struct UpsertUsersResponse {
    #[serde(default)]
    users: HashMap<String, ChatUser>,
}

/// User directory backed by the hosted chat service's REST API.
///
/// Requests authenticate with a server token: an HS256 JWT with
/// `{"server": true}` signed by the api secret.
pub struct StreamUserDirectory {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    signing_key: EncodingKey,
}

impl StreamUserDirectory {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: &[u8],
        timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;
        Ok(StreamUserDirectory {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            signing_key: EncodingKey::from_secret(api_secret),
        })
    }

    fn server_token(&self) -> Result<String, DirectoryError> {
        encode(
            &Header::new(Algorithm::HS256),
            &ServerClaims { server: true },
            &self.signing_key,
        )
        .map_err(|e| DirectoryError::Signing(e.to_string()))
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, DirectoryError> {
        Ok(self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .query(&[("api_key", self.api_key.as_str())])
            .header(reqwest::header::AUTHORIZATION, self.server_token()?)
            .header("stream-auth-type", "jwt"))
    }
}

async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, DirectoryError> {
    let response = request
        .send()
        .await
        .map_err(|e| DirectoryError::Transport(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| DirectoryError::Transport(e.to_string()))?;
    if !status.is_success() {
        return Err(DirectoryError::Rejected {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| DirectoryError::Decode(e.to_string()))
}

#[async_trait::async_trait]
impl ChatUserDirectory for StreamUserDirectory {
    async fn query_user(&self, id: &UserId) -> Result<Option<ChatUser>, DirectoryError> {
        let payload = json!({
            "filter_conditions": { "id": { "$eq": id.as_str() } },
            "limit": 1,
        });
        let request = self
            .request(reqwest::Method::GET, "/users")?
            .query(&[("payload", payload.to_string())]);
        let response: QueryUsersResponse = send(request).await?;
        trace!(user_id = %id, found = response.users.len(), "queried chat users");
        Ok(response.users.into_iter().find(|user| user.id == id.as_str()))
    }

    async fn upsert_user(&self, user: &ChatUser) -> Result<ChatUser, DirectoryError> {
        let request = self
            .request(reqwest::Method::POST, "/users")?
            .json(&json!({ "users": HashMap::from([(user.id.as_str(), user)]) }));
        let mut response: UpsertUsersResponse = send(request).await?;
        Ok(response.users.remove(&user.id).unwrap_or_else(|| user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn directory(server: &MockServer) -> StreamUserDirectory {
        StreamUserDirectory::new(server.uri(), "key-123", b"secret", Duration::from_secs(5))
            .unwrap()
    }

    #[tokio::test]
    async fn query_returns_none_when_backend_has_no_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("api_key", "key-123"))
            .and(header("stream-auth-type", "jwt"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "users": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let id = UserId::parse("john_doe").unwrap();
        assert_eq!(directory(&server).query_user(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn query_returns_the_stored_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [{
                    "id": "john_doe",
                    "name": "John",
                    "image": "https://example.com/john.png",
                    "role": "user",
                    "online": true
                }],
                "duration": "1.2ms"
            })))
            .mount(&server)
            .await;

        let id = UserId::parse("john_doe").unwrap();
        let user = directory(&server).query_user(&id).await.unwrap().unwrap();
        assert_eq!(user.name.as_deref(), Some("John"));
        assert_eq!(user.extra.get("online"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn upsert_posts_the_user_keyed_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(body_partial_json(json!({
                "users": { "john_doe": { "id": "john_doe", "name": "john_doe", "role": "user" } }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "users": { "john_doe": { "id": "john_doe", "name": "john_doe", "role": "user" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let id = UserId::parse("john_doe").unwrap();
        let stored = directory(&server)
            .upsert_user(&ChatUser::placeholder(&id))
            .await
            .unwrap();
        assert_eq!(stored.id, "john_doe");
    }

    #[tokio::test]
    async fn backend_error_status_is_surfaced_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(401).set_body_string("api key not valid"))
            .mount(&server)
            .await;

        let id = UserId::parse("john_doe").unwrap();
        let err = directory(&server).query_user(&id).await.unwrap_err();
        match err {
            DirectoryError::Rejected { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "api key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
