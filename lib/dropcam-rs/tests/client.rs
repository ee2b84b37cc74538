mod common;

use self::common::*;
use dropcam::{
    Error,
    StatusCode,
};
use serde_json::json;
use wiremock::{
    matchers::{
        body_string,
        header,
        header_exists,
        method,
        path,
        query_param,
    },
    Mock,
    MockServer,
    ResponseTemplate,
};

#[tokio::test]
async fn login_stores_first_cookie_segment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login.login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("username=someone&password=hunter2"))
        .respond_with(login_ok())
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.cookie().is_none());

    let response = client.login().await.expect("failed to log in");
    assert!(response.is_ok());
    assert_eq!(client.cookie().as_deref(), Some(SESSION_COOKIE));
}

#[tokio::test]
async fn login_failure_code_leaves_cookie_unset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login.login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "website_2=nope; Path=/")
                .set_body_json(json!({
                    "status": 1,
                    "status_description": "invalid username or password",
                })),
        )
        .mount(&server)
        .await;

    let (logs, _guard) = capture_logs();
    let client = client_for(&server);
    let error = client.login().await.expect_err("login should fail");

    match &error {
        Error::LoginFailed {
            status,
            description,
        } => {
            assert_eq!(*status, 1);
            assert_eq!(description, "invalid username or password");
        }
        error => panic!("unexpected error: {error:?}"),
    }
    assert!(error.is_auth_error());
    assert!(client.cookie().is_none());
    assert!(logs.contents().contains("ERROR"));
}

#[tokio::test]
async fn login_bad_status_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login.login"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client.login().await.expect_err("login should fail");

    assert!(matches!(error, Error::LoginRejected(StatusCode::FORBIDDEN)));
    assert!(client.cookie().is_none());
}

#[tokio::test]
async fn login_accepts_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login.login"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("set-cookie", "sessionid=xyz")
                .set_body_json(json!({ "status": 0 })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.login().await.expect("failed to log in");
    assert_eq!(client.cookie().as_deref(), Some("sessionid=xyz"));
}

#[tokio::test]
async fn login_without_cookie_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login.login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 0 })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client.login().await.expect_err("login should fail");

    assert!(matches!(error, Error::MissingCookie));
    assert!(client.cookie().is_none());
}

#[tokio::test]
async fn failed_relogin_clears_old_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login.login"))
        .respond_with(login_ok())
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login.login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.login().await.expect("failed to log in");
    assert!(client.cookie().is_some());

    client.login().await.expect_err("second login should fail");
    assert!(client.cookie().is_none());
}

#[tokio::test]
async fn list_cameras_logs_in_once_first() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login.login"))
        .respond_with(login_ok())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/cameras.get_visible"))
        .and(query_param("group_cameras", "true"))
        .and(header("cookie", SESSION_COOKIE))
        .respond_with(cameras_ok(&[&["cam-1"]]))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let cameras = client.list_cameras().await.expect("failed to list cameras");
    assert_eq!(cameras.len(), 1);

    let requests = server
        .received_requests()
        .await
        .expect("request recording is disabled");
    let paths: Vec<_> = requests.iter().map(|request| request.url.path()).collect();
    assert_eq!(paths, ["/api/v1/login.login", "/api/v1/cameras.get_visible"]);
}

#[tokio::test]
async fn list_cameras_reuses_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login.login"))
        .respond_with(login_ok())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/cameras.get_visible"))
        .and(header_exists("cookie"))
        .respond_with(cameras_ok(&[&["cam-1"]]))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.list_cameras().await.expect("failed to list cameras");
    client
        .clone()
        .list_cameras()
        .await
        .expect("failed to list cameras");
}

#[tokio::test]
async fn list_cameras_flattens_groups_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login.login"))
        .respond_with(login_ok())
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/cameras.get_visible"))
        .respond_with(cameras_ok(&[&["a", "b"], &[], &["c", "d", "e"]]))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let cameras = client.list_cameras().await.expect("failed to list cameras");

    let uuids: Vec<_> = cameras.iter().map(|camera| camera.uuid()).collect();
    assert_eq!(uuids, ["a", "b", "c", "d", "e"]);
    assert_eq!(cameras[2].title(), "Camera c");
    assert_eq!(
        cameras[0].info().unknown.get("is_online"),
        Some(&serde_json::Value::Bool(true))
    );
}

#[tokio::test]
async fn list_cameras_expired_session_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login.login"))
        .respond_with(login_ok())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/cameras.get_visible"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let (logs, _guard) = capture_logs();
    let client = client_for(&server);
    let error = client
        .list_cameras()
        .await
        .expect_err("listing should fail");

    assert!(matches!(
        error,
        Error::InvalidStatus(StatusCode::UNAUTHORIZED)
    ));
    assert!(logs.contents().contains("401"));
}
