use url::Url;

const API_BASE: &str = "https://www.dropcam.com";
const NEXUS_BASE: &str = "https://nexusapi.dropcam.com";

const LOGIN_PATH: &str = "api/v1/login.login";
const CAMERAS_PATH: &str = "api/v1/cameras.get_visible";
const IMAGE_PATH: &str = "get_image";
const EVENT_PATH: &str = "get_cuepoint";
const PROPERTIES_PATH: &str = "app/cameras/properties";
const WATCH_PATH: &str = "watch";

/// The hosts the api is served from.
///
/// Production defaults are available through [`Default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// The main web api host, used for login, camera listing, and properties.
    pub api_base: Url,

    /// The media host, used for images and events.
    pub nexus_base: Url,
}

impl Endpoints {
    /// Make a new [`Endpoints`] from two base urls.
    pub fn new(api_base: &str, nexus_base: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            api_base: Url::parse(api_base)?,
            nexus_base: Url::parse(nexus_base)?,
        })
    }

    pub(crate) fn login(&self) -> Result<Url, url::ParseError> {
        join(&self.api_base, LOGIN_PATH)
    }

    pub(crate) fn cameras(&self) -> Result<Url, url::ParseError> {
        join(&self.api_base, CAMERAS_PATH)
    }

    pub(crate) fn image(&self) -> Result<Url, url::ParseError> {
        join(&self.nexus_base, IMAGE_PATH)
    }

    pub(crate) fn events(&self) -> Result<Url, url::ParseError> {
        join(&self.nexus_base, EVENT_PATH)
    }

    pub(crate) fn properties(&self, uuid: &str) -> Result<Url, url::ParseError> {
        join(&self.api_base, &format!("{PROPERTIES_PATH}/{uuid}"))
    }

    pub(crate) fn watch(&self, uuid: &str) -> Result<Url, url::ParseError> {
        join(&self.api_base, &format!("{WATCH_PATH}/{uuid}"))
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(API_BASE, NEXUS_BASE).expect("invalid default endpoints")
    }
}

/// Join a relative path onto a base, keeping any path the base already has.
fn join(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let base = base.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/{path}"))
}
