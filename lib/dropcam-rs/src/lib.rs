//! An unofficial client for the Dropcam camera api.

/// The camera handle
mod camera;
/// The client
mod client;
/// Api hosts
mod endpoints;
/// Api types
pub mod types;

pub use self::{
    camera::Camera,
    client::Client,
    endpoints::Endpoints,
    types::{
        CameraGroup,
        CameraInfo,
        CameraListing,
        Event,
        LoginResponse,
    },
};
pub use bytes::Bytes;
pub use reqwest::StatusCode;
pub use url::Url;

/// The default image width, in pixels.
pub const DEFAULT_IMAGE_WIDTH: u32 = 720;

const USER_AGENT_STR: &str = "dropcam-rs";

/// Error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reqwest Error
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// A request got a non-success status
    #[error("invalid status {0}")]
    InvalidStatus(StatusCode),

    /// The login endpoint rejected the request
    #[error("login rejected with status {0}")]
    LoginRejected(StatusCode),

    /// The login endpoint returned a failure code
    #[error("login failed with code {status}: {description}")]
    LoginFailed {
        /// The api status code
        status: i64,

        /// The api status description
        description: String,
    },

    /// Login succeeded but no session cookie was set
    #[error("missing session cookie")]
    MissingCookie,

    /// The camera sent no image, usually because it is off or offline
    #[error("camera image unavailable")]
    ImageUnavailable,

    /// Json
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Invalid Url
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),

    /// Io Error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error came from logging in.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::LoginRejected(_) | Self::LoginFailed { .. } | Self::MissingCookie
        )
    }
}
