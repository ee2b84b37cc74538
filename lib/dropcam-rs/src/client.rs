use crate::{
    Camera,
    CameraListing,
    Endpoints,
    Error,
    LoginResponse,
    USER_AGENT_STR,
};
use reqwest::{
    header::{
        COOKIE,
        SET_COOKIE,
    },
    StatusCode,
};
use std::sync::{
    Arc,
    Mutex,
};
use tracing::{
    debug,
    error,
    info,
};

/// A Dropcam client.
///
/// This holds the account credentials and the session cookie.
/// Clones share the same session.
#[derive(Debug, Clone)]
pub struct Client {
    /// The inner http client.
    ///
    /// This probably shouldn't be used by you.
    pub client: reqwest::Client,

    session: Arc<Session>,
    endpoints: Arc<Endpoints>,
}

impl Client {
    /// Make a new [`Client`] for the production api.
    ///
    /// This does not log in.
    /// Logging in happens lazily on the first call that needs a session,
    /// or explicitly with [`Client::login`].
    pub fn new(username: &str, password: &str) -> Self {
        Self::with_endpoints(username, password, Endpoints::default())
    }

    /// Make a new [`Client`] that talks to the given hosts.
    pub fn with_endpoints(username: &str, password: &str, endpoints: Endpoints) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT_STR)
            .build()
            .expect("failed to build dropcam client");

        Self::with_client(client, username, password, endpoints)
    }

    /// Make a new [`Client`] from a pre-built http client.
    ///
    /// Use this to set timeouts or proxies.
    pub fn with_client(
        client: reqwest::Client,
        username: &str,
        password: &str,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            client,
            session: Arc::new(Session {
                username: username.into(),
                password: password.into(),
                cookie: Mutex::new(None),
            }),
            endpoints: Arc::new(endpoints),
        }
    }

    /// Get the hosts this client talks to.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Get the current session cookie, if logged in.
    pub fn cookie(&self) -> Option<String> {
        self.session.cookie.lock().expect("session poisoned").clone()
    }

    /// Log in, replacing the session cookie.
    ///
    /// On failure, the session cookie is cleared.
    pub async fn login(&self) -> Result<LoginResponse, Error> {
        *self.session.cookie.lock().expect("session poisoned") = None;

        let url = self.endpoints.login()?;
        debug!("logging in as `{}`", self.session.username);
        let response = self
            .send(self.client.post(url).form(&[
                ("username", self.session.username.as_str()),
                ("password", self.session.password.as_str()),
            ]))
            .await?;

        let status = response.status();
        if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
            error!("login rejected with status {status}");
            return Err(Error::LoginRejected(status));
        }

        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(first_cookie_segment)
            .map(String::from);
        let login_response: LoginResponse = response.json().await?;

        if !login_response.is_ok() {
            let description = login_response
                .status_description
                .clone()
                .unwrap_or_default();
            error!(
                "login failed with code {}: {description}",
                login_response.status
            );
            return Err(Error::LoginFailed {
                status: login_response.status,
                description,
            });
        }

        let cookie = cookie.ok_or(Error::MissingCookie)?;
        *self.session.cookie.lock().expect("session poisoned") = Some(cookie);
        info!("logged in as `{}`", self.session.username);

        Ok(login_response)
    }

    /// List the cameras visible to this account, in the order the server sends them.
    ///
    /// This logs in first if there is no session.
    pub async fn list_cameras(&self) -> Result<Vec<Camera>, Error> {
        let url = self.endpoints.cameras()?;
        let request = self
            .authed(self.client.get(url))
            .await?
            .query(&[("group_cameras", "true")]);
        let listing: CameraListing = self.send_ok(request).await?.json().await?;

        let cameras = listing
            .items
            .into_iter()
            .flat_map(|group| group.owned)
            .map(|info| Camera::new(self.clone(), info))
            .collect();

        Ok(cameras)
    }

    /// Get the session cookie, logging in if it is missing.
    ///
    /// An expired cookie is not detected here.
    /// Calls made with one will fail with a status error.
    pub(crate) async fn session_cookie(&self) -> Result<String, Error> {
        if let Some(cookie) = self.cookie() {
            return Ok(cookie);
        }

        debug!("no session cookie, logging in");
        self.login().await?;
        self.cookie().ok_or(Error::MissingCookie)
    }

    /// Attach the session cookie to a request.
    pub(crate) async fn authed(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, Error> {
        let cookie = self.session_cookie().await?;
        Ok(request.header(COOKIE, cookie))
    }

    /// Send a request, logging transport errors.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Error> {
        let response = request.send().await.map_err(|error| {
            error!("request failed: {error}");
            Error::from(error)
        })?;
        debug!("{} {}", response.status(), response.url().path());

        Ok(response)
    }

    /// Send a request, logging and failing on a non-success status.
    pub(crate) async fn send_ok(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Error> {
        let response = self.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            error!("request to `{}` failed with status {status}", response.url().path());
            return Err(Error::InvalidStatus(status));
        }

        Ok(response)
    }
}

/// The credentials and session cookie
struct Session {
    username: String,
    password: String,
    cookie: Mutex<Option<String>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let has_cookie = self.cookie.lock().map(|c| c.is_some()).unwrap_or(false);
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("has_cookie", &has_cookie)
            .finish()
    }
}

/// Get the first `name=value` pair of a `Set-Cookie` header.
fn first_cookie_segment(header: &str) -> Option<&str> {
    let segment = header.split(';').next()?.trim();
    if segment.is_empty() {
        return None;
    }

    Some(segment)
}
