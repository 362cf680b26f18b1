//! Client de l'API d'authentification (login, logout, activation).

use gloo_net::http::{Request, RequestBuilder, Response};
use lms_gate::{Identity, Session};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/* URL de base de l'API */
const BASE: &str = match option_env!("LMS_API_BASE") {
    Some(base) => base,
    None => "http://127.0.0.1:8000/api",
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx answer from the API, passed through unchanged.
    #[error("{message} (HTTP {status})")]
    AuthExchangeFailed { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<gloo_net::Error> for ApiError {
    fn from(e: gloo_net::Error) -> Self {
        match e {
            gloo_net::Error::SerdeError(e) => ApiError::Decode(e.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

/* ---------------- corps échangés ---------------- */

#[derive(Serialize)]
struct LoginBody<'a> {
    email:       &'a str,
    password:    &'a str,
    remember_me: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    user:          Identity,
    #[serde(alias = "access")]
    access_token:  String,
    #[serde(alias = "refresh")]
    refresh_token: String,
}

#[derive(Serialize)]
struct RefreshBody<'a> {
    refresh: &'a str,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

/// Django-style error payloads: `{"detail": ".."}` or `{"message": ".."}`.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "message")]
    detail: String,
}

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

async fn check(resp: Response) -> Result<Response, ApiError> {
    if resp.ok() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.detail)
        .unwrap_or_else(|_| resp.status_text());
    Err(ApiError::AuthExchangeFailed { status, message })
}

async fn post_json<T, U>(builder: RequestBuilder, body: &T) -> Result<U, ApiError>
where
    T: Serialize + ?Sized,
    U: DeserializeOwned,
{
    let resp = check(builder.json(body)?.send().await?).await?;
    Ok(resp.json().await?)
}

async fn post_empty<T: Serialize + ?Sized>(builder: RequestBuilder, body: &T) -> Result<(), ApiError> {
    check(builder.json(body)?.send().await?).await.map(|_| ())
}

/* ---------------- opérations ---------------- */

pub async fn login(email: &str, password: &str, remember_me: bool) -> Result<Session, ApiError> {
    let body = LoginBody { email, password, remember_me };
    let resp: LoginResponse = post_json(Request::post(&url("/auth/login/")), &body).await?;
    Ok(Session {
        identity:      resp.user,
        access_token:  resp.access_token,
        refresh_token: resp.refresh_token,
    })
}

pub async fn logout(access_token: &str, refresh_token: &str) -> Result<(), ApiError> {
    let builder = Request::post(&url("/auth/logout/"))
        .header("Authorization", &format!("Bearer {access_token}"));
    post_empty(builder, &RefreshBody { refresh: refresh_token }).await
}

pub async fn activate(uidb64: &str, token: &str) -> Result<(), ApiError> {
    let resp = Request::get(&url(&format!("/auth/activate/{uidb64}/{token}/"))).send().await?;
    check(resp).await.map(|_| ())
}

pub async fn resend_activation(email: &str) -> Result<(), ApiError> {
    post_empty(Request::post(&url("/auth/resend-activation/")), &EmailBody { email }).await
}
