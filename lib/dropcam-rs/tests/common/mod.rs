#![allow(dead_code)]

use dropcam::{
    Client,
    Endpoints,
};
use serde_json::json;
use std::{
    io::Write,
    sync::{
        Arc,
        Mutex,
    },
};
use tracing::subscriber::DefaultGuard;
use wiremock::{
    matchers::{
        method,
        path,
    },
    Mock,
    MockServer,
    ResponseTemplate,
};

pub const USERNAME: &str = "someone";
pub const PASSWORD: &str = "hunter2";
pub const SESSION_COOKIE: &str = "website_2=a1b2c3d4";

/// Make a client that talks to a mock server.
pub fn client_for(server: &MockServer) -> Client {
    let endpoints = Endpoints::new(&server.uri(), &server.uri()).expect("invalid endpoints");
    Client::with_endpoints(USERNAME, PASSWORD, endpoints)
}

/// A login response that sets the session cookie.
pub fn login_ok() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header(
            "set-cookie",
            format!("{SESSION_COOKIE}; Domain=.dropcam.com; Path=/; HttpOnly").as_str(),
        )
        .set_body_json(json!({
            "status": 0,
            "status_description": "ok",
            "status_detail": "",
            "items": [],
        }))
}

/// A camera listing with the given groups of camera uuids.
pub fn cameras_ok(groups: &[&[&str]]) -> ResponseTemplate {
    let items: Vec<_> = groups
        .iter()
        .map(|group| {
            let owned: Vec<_> = group
                .iter()
                .map(|uuid| {
                    json!({
                        "uuid": uuid,
                        "title": format!("Camera {uuid}"),
                        "is_online": true,
                    })
                })
                .collect();
            json!({ "owned": owned, "shared": [] })
        })
        .collect();

    ResponseTemplate::new(200).set_body_json(json!({
        "status": 0,
        "items": items,
    }))
}

/// Mount a login and a listing with one camera, `cam-1`.
pub async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/login.login"))
        .respond_with(login_ok())
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/cameras.get_visible"))
        .respond_with(cameras_ok(&[&["cam-1"]]))
        .mount(server)
        .await;
}

/// A log sink shared with a tracing subscriber.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        let buffer = self.0.lock().expect("log buffer poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer poisoned").write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Capture log output on this thread until the guard drops.
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();

    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
