use serde::{
    Deserialize,
    Serialize,
};
use std::collections::HashMap;

/// The api status code for success
pub const STATUS_OK: i64 = 0;

/// The response of a login request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The api status code. 0 is success.
    pub status: i64,

    /// A description of the status
    #[serde(default)]
    pub status_description: Option<String>,

    /// Extra detail about the status
    #[serde(default)]
    pub status_detail: Option<String>,

    /// Unknown data
    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}

impl LoginResponse {
    /// Whether the api reported success
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// The visible cameras of an account, grouped by owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraListing {
    /// Camera groups
    pub items: Vec<CameraGroup>,

    /// Unknown data
    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}

/// A group of cameras
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraGroup {
    /// Cameras owned by this group's owner
    #[serde(default)]
    pub owned: Vec<CameraInfo>,

    /// Unknown data
    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}

/// Camera data from a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraInfo {
    /// The unique id
    pub uuid: String,

    /// The display name
    pub title: String,

    /// Unknown data
    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}

/// A camera event, or "cue point".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The event id
    pub id: u64,

    /// When the event happened
    pub time: serde_json::Number,

    /// The event kind, ex: "motion" or "sound"
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// A user note
    #[serde(default)]
    pub note: Option<String>,

    /// How important the server thinks this is
    #[serde(default)]
    pub importance: Option<serde_json::Number>,

    /// When the event ended
    #[serde(default)]
    pub end_time: Option<serde_json::Number>,

    /// The uuid of the camera this event belongs to.
    ///
    /// This is not sent by the api, it is filled in by the client.
    #[serde(skip)]
    pub camera_uuid: String,

    /// Unknown data
    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}
