use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{web, App};
use serde_json::{json, Value};
use std::sync::Arc;
use todo_server::{routes, AppState, MemoryStore, Settings};

fn test_state() -> web::Data<AppState> {
    let config = Settings::new_for_test().expect("Failed to load test config");
    web::Data::new(AppState::with_store(config, Arc::new(MemoryStore::new())))
}

fn register_req(login: &str, password: &str, password2: &str) -> TestRequest {
    TestRequest::post()
        .uri("/users/register")
        .set_json(json!({ "login": login, "password": password, "password2": password2 }))
}

fn login_req(login: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/users/login")
        .set_json(json!({ "login": login, "password": password }))
}

#[actix_web::test]
async fn test_register_and_login() {
    let app = test::init_service(App::new().app_data(test_state()).configure(routes::configure)).await;

    let resp = test::call_service(&app, register_req("loginlogin", "Passwd@1", "Passwd@1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(&app, login_req("loginlogin", "Passwd@1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[actix_web::test]
async fn test_duplicate_registration_conflicts() {
    let app = test::init_service(App::new().app_data(test_state()).configure(routes::configure)).await;

    let resp = test::call_service(&app, register_req("loginlogin", "Passwd@1", "Passwd@1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(&app, register_req("LoginLogin", "Passwd@1", "Passwd@1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["status"], 409);
    assert_eq!(body["error"]["message"], "the user already exists");
}

#[actix_web::test]
async fn test_login_is_case_insensitive() {
    let app = test::init_service(App::new().app_data(test_state()).configure(routes::configure)).await;

    test::call_service(&app, register_req("MixedCase", "Passwd@1", "Passwd@1").to_request()).await;

    let resp = test::call_service(&app, login_req("mixedcase", "Passwd@1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = test::call_service(&app, login_req("MIXEDCASE", "Passwd@1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_invalid_login_does_not_reveal_which_part_failed() {
    let app = test::init_service(App::new().app_data(test_state()).configure(routes::configure)).await;

    test::call_service(&app, register_req("loginlogin", "Passwd@1", "Passwd@1").to_request()).await;

    let wrong_password = test::call_service(&app, login_req("loginlogin", "Passwd@2").to_request()).await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = test::read_body_json(wrong_password).await;

    let unknown_login = test::call_service(&app, login_req("nobodyhere", "Passwd@1").to_request()).await;
    assert_eq!(unknown_login.status(), StatusCode::UNAUTHORIZED);
    let unknown_login: Value = test::read_body_json(unknown_login).await;

    assert_eq!(wrong_password, unknown_login);
}

#[actix_web::test]
async fn test_registration_validation_messages() {
    let app = test::init_service(App::new().app_data(test_state()).configure(routes::configure)).await;

    let long_login = "a".repeat(120);
    let cases = [
        (register_req("ab", "Passwd@1", "Passwd@1"), "login is too short"),
        (register_req(&long_login, "Passwd@1", "Passwd@1"), "login is too long"),
        (
            register_req("asdfasdf@", "Passwd@1", "Passwd@1"),
            "login should only contain letters and numbers",
        ),
        (register_req("loginlogin", "Passwd@1", "Passwd@2"), "Entered passwords didn't match"),
        (register_req("loginlogin", "", ""), "password is required"),
    ];

    for (req, expected) in cases {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], expected);
    }

    let resp = test::call_service(&app, register_req("loginlogin", "somepassw", "somepassw").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]["message"].as_str().unwrap().starts_with("insecure password"));
}

#[actix_web::test]
async fn test_malformed_body_is_bad_input() {
    let app = test::init_service(App::new().app_data(test_state()).configure(routes::configure)).await;

    let req = TestRequest::post()
        .uri("/users/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]["message"].as_str().unwrap().starts_with("invalid request body"));
}

#[actix_web::test]
async fn test_logout() {
    let app = test::init_service(App::new().app_data(test_state()).configure(routes::configure)).await;

    test::call_service(&app, register_req("loginlogin", "Passwd@1", "Passwd@1").to_request()).await;
    let body: Value = test::call_and_read_body_json(&app, login_req("loginlogin", "Passwd@1").to_request()).await;
    let token = body["token"].as_str().unwrap().to_string();

    let unauthenticated = TestRequest::post().uri("/users/logout").to_request();
    let resp = test::call_service(&app, unauthenticated).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = TestRequest::post()
        .uri("/users/logout")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Signed tokens stay valid until they expire.
    let req = TestRequest::get()
        .uri("/todo/list?start=0&count=0")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_ne!(resp.status(), StatusCode::UNAUTHORIZED);
}
