use crate::{
    CameraInfo,
    Client,
    Error,
    Event,
};
use bytes::Bytes;
use reqwest::{
    header::{
        CONTENT_LENGTH,
        REFERER,
    },
    StatusCode,
};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{
    debug,
    error,
    warn,
};

/// A camera, bound to the client that listed it.
#[derive(Debug, Clone)]
pub struct Camera {
    client: Client,
    info: CameraInfo,
}

impl Camera {
    pub(crate) fn new(client: Client, info: CameraInfo) -> Self {
        Self { client, info }
    }

    /// The camera data from the listing
    pub fn info(&self) -> &CameraInfo {
        &self.info
    }

    /// The unique id
    pub fn uuid(&self) -> &str {
        &self.info.uuid
    }

    /// The display name
    pub fn title(&self) -> &str {
        &self.info.title
    }

    /// Take the camera data, dropping the client.
    pub fn into_info(self) -> CameraInfo {
        self.info
    }

    /// Request a jpeg image.
    ///
    /// `time` is the capture time in seconds since the epoch, or `None` for the latest image.
    /// A time of 0 also means the latest image.
    ///
    /// # Errors
    /// Returns [`Error::ImageUnavailable`] if the server does not respond with a 200,
    /// or responds with an empty or unsized body.
    /// The server does the latter when the camera is off or offline.
    pub async fn get_image(&self, width: u32, time: Option<i64>) -> Result<reqwest::Response, Error> {
        let url = self.client.endpoints().image()?;
        let query = ImageQuery {
            uuid: self.uuid(),
            width,
            time: time.filter(|&time| time != 0),
        };
        let request = self
            .client
            .authed(self.client.client.get(url))
            .await?
            .query(&query);
        let response = self.client.send(request).await?;

        let status = response.status();
        if status != StatusCode::OK {
            error!("image request for `{}` failed with status {status}", self.uuid());
            return Err(Error::ImageUnavailable);
        }

        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(0);
        if content_length == 0 {
            warn!("camera `{}` sent an empty image", self.uuid());
            return Err(Error::ImageUnavailable);
        }

        Ok(response)
    }

    /// Request a jpeg image and read the whole body.
    pub async fn get_image_bytes(&self, width: u32, time: Option<i64>) -> Result<Bytes, Error> {
        Ok(self.get_image(width, time).await?.bytes().await?)
    }

    /// Save a jpeg image to a path, overwriting what is there.
    ///
    /// The image is downloaded to a temporary ".part" file next to the path first,
    /// then renamed over it.
    /// On failure, the file at the path is not touched.
    ///
    /// # Errors
    /// Fails with an [`std::io::ErrorKind::AlreadyExists`] error if the ".part" file exists,
    /// which happens if another save to the same path is in progress.
    pub async fn save_image<P>(&self, path: P, width: u32, time: Option<i64>) -> Result<(), Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let mut response = self.get_image(width, time).await?;

        let temp_path = nd_util::with_push_extension(path, "part");
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .await?;
        let mut temp_path = nd_util::DropRemovePath::new(temp_path);

        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&temp_path, path).await?;
        temp_path.persist();
        debug!("saved image of `{}` to '{}'", self.uuid(), path.display());

        Ok(())
    }

    /// List events between `start` and `end`, in seconds since the epoch.
    ///
    /// If `end` is `None`, the current time is used.
    pub async fn list_events(&self, start: i64, end: Option<i64>) -> Result<Vec<Event>, Error> {
        let end = end.unwrap_or_else(|| time::OffsetDateTime::now_utc().unix_timestamp());

        let url = self.client.endpoints().events()?;
        let query = EventQuery {
            uuid: self.uuid(),
            start_time: start,
            end_time: end,
        };
        let request = self
            .client
            .authed(self.client.client.get(url))
            .await?
            .query(&query);
        let mut events: Vec<Event> = self.client.send_ok(request).await?.json().await?;

        for event in events.iter_mut() {
            event.camera_uuid.clone_from(&self.info.uuid);
        }

        Ok(events)
    }

    /// Set a camera property, like "streaming.enabled".
    ///
    /// This is best-effort.
    /// A non-200 response is logged, not returned.
    /// Failing to get a response at all is still an error.
    pub async fn set_property(&self, name: &str, value: &str) -> Result<(), Error> {
        let endpoints = self.client.endpoints();
        let url = endpoints.properties(self.uuid())?;
        let referer = endpoints.watch(self.uuid())?;

        let request = self
            .client
            .authed(self.client.client.post(url))
            .await?
            .header(REFERER, referer.as_str())
            .form(&[
                ("camera_uuid", self.uuid()),
                ("name", name),
                ("value", value),
            ]);
        let response = self.client.send(request).await?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(
                "failed to set `{name}` to `{value}` on `{}`, got status {status}",
                self.uuid()
            );
        }

        Ok(())
    }
}

#[derive(Debug, serde::Serialize)]
struct ImageQuery<'a> {
    uuid: &'a str,
    width: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<i64>,
}

#[derive(Debug, serde::Serialize)]
struct EventQuery<'a> {
    uuid: &'a str,
    start_time: i64,
    end_time: i64,
}
