//! HTTP access to the Examupdt service.

use async_trait::async_trait;
use examupdt_core::selection::Deleter;
use examupdt_core::{AuthUser, ContentKind, Error, IdentityProvider, Session};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base: Url,
    token: Option<String>,
}

#[derive(Deserialize)]
struct SessionBody {
    user: AuthUser,
}

#[derive(Deserialize)]
struct LoginBody {
    user: AuthUser,
    token: String,
}

/// Maps a failed response onto the shared error kinds, keeping the server's
/// message where it sent one.
fn classify(status: StatusCode, body: &Value) -> Error {
    let message = body["error"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());
    match status {
        StatusCode::BAD_REQUEST => Error::Validation(message),
        StatusCode::UNAUTHORIZED => Error::Auth(message),
        StatusCode::NOT_FOUND => Error::NotFound {
            kind: "record",
            id: message,
        },
        _ => Error::Transient(message),
    }
}

impl ApiClient {
    pub fn new(service_url: &str) -> Result<Self, Error> {
        let mut base = Url::parse(service_url)
            .map_err(|err| Error::Validation(format!("invalid service URL: {err}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base
            .join("api/v1/")
            .and_then(|api| api.join(path.trim_start_matches('/')))
            .map_err(|err| Error::Validation(format!("invalid path {path}: {err}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, Error> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "Sending request");
        let builder = self.http.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(builder: RequestBuilder) -> Result<Value, Error> {
        let response = builder.send().await.map_err(Error::transient)?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if status.is_success() {
            Ok(body)
        } else {
            Err(classify(status, &body))
        }
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, Error> {
        Self::send(self.request(Method::GET, path)?.query(query)).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, Error> {
        Self::send(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, Error> {
        Self::send(self.request(Method::PUT, path)?.json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, Error> {
        Self::send(self.request(Method::DELETE, path)?).await
    }
}

/// Where a collection's records live for an authenticated admin.
pub fn admin_path(kind: ContentKind) -> String {
    match kind {
        ContentKind::Messages => "contact".to_string(),
        kind => format!("admin/{}", kind.slug()),
    }
}

/// Key the service lists a collection's rows under.
pub fn list_key(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Messages => "messages",
        kind => kind.slug(),
    }
}

/// Signs in against the service's auth routes.
#[derive(Clone, Debug)]
pub struct HttpIdentityProvider {
    client: ApiClient,
}

impl HttpIdentityProvider {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, Error> {
        let body = self
            .client
            .post("auth/login", &json!({ "email": email, "password": password }))
            .await?;
        let login: LoginBody = serde_json::from_value(body).map_err(Error::transient)?;
        Ok(Session {
            user: login.user,
            token: login.token,
        })
    }

    async fn sign_out(&self, token: &str) -> Result<(), Error> {
        self.client
            .clone()
            .with_token(token)
            .post("auth/logout", &json!({}))
            .await
            .map(|_| ())
    }

    async fn get_session(&self, token: &str) -> Result<Option<AuthUser>, Error> {
        match self.client.clone().with_token(token).get("auth/session", &[]).await {
            Ok(body) => {
                let session: SessionBody = serde_json::from_value(body).map_err(Error::transient)?;
                Ok(Some(session.user))
            }
            Err(Error::Auth(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Deletes records of one collection over HTTP.
pub struct RemoteCollection<'a> {
    client: &'a ApiClient,
    kind: ContentKind,
}

impl<'a> RemoteCollection<'a> {
    pub fn new(client: &'a ApiClient, kind: ContentKind) -> Self {
        Self { client, kind }
    }
}

#[async_trait]
impl Deleter for RemoteCollection<'_> {
    async fn delete(&self, id: &str) -> Result<(), Error> {
        let path = format!("{}/{id}", admin_path(self.kind));
        self.client.delete(&path).await.map(|_| ())
    }
}
