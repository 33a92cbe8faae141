#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use cesizen_lib::{
    api::ApiClient,
    auth::{AuthSession, TokenStore},
    models::User,
};
use serde_json::json;

/// Serve `app` on an ephemeral port and return its base URL.
pub async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    format!("http://{addr}")
}

pub fn token_expiring_in(seconds: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let exp = chrono::Utc::now().timestamp() + seconds;
    let claims = URL_SAFE_NO_PAD.encode(json!({ "sub": "alice", "exp": exp }).to_string());
    format!("{header}.{claims}.signature")
}

pub fn alice() -> User {
    User {
        email: "alice@cesizen.fr".into(),
        name: Some("Alice".into()),
        ..User::default()
    }
}

pub fn signed_in(token: String) -> AuthSession {
    let session = AuthSession::load(TokenStore::in_memory());
    session.establish(token, alice()).expect("establish session");
    session
}

pub fn client(base_url: &str, auth: AuthSession) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5), auth).expect("build client")
}
