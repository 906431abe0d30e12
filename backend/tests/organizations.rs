#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use common::TestEnv;
use serde_json::json;

fn register(form: serde_json::Value) -> TestRequest {
    TestRequest::post()
        .uri("/api/organizations/register")
        .set_json(form)
}

#[actix_web::test]
async fn complete_form_is_accepted_but_not_registered() {
    let env = TestEnv::new(false, 0);
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let (status, body) = call_json!(
        &app,
        register(json!({
            "organization_name": "Northbridge University",
            "organization_type": "university",
            "address": "1 Campus Road",
            "contact_person": "Dana Reyes",
            "phone": "+1 555 0100",
            "email": "registrar@northbridge.edu",
            "password": "s3cret",
            "confirm_password": "s3cret"
        }))
    );
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["error"], "Organization registration is not available yet");
}

#[actix_web::test]
async fn missing_fields_are_reported() {
    let env = TestEnv::new(false, 0);
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let (status, body) = call_json!(
        &app,
        register(json!({
            "organization_name": "Northbridge University",
            "contact_person": "",
            "email": "registrar-at-northbridge",
            "password": "s3cret",
            "confirm_password": "s3cret"
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"contact_person"));
    assert!(fields.contains(&"organization_type"));
    assert!(fields.contains(&"email"));
    assert!(!fields.contains(&"organization_name"));
}

#[actix_web::test]
async fn malformed_body_is_a_json_error() {
    let env = TestEnv::new(false, 0);
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let (status, body) = call_json!(
        &app,
        TestRequest::post()
            .uri("/api/organizations/register")
            .insert_header((actix_web::http::header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"organization_name\": ")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = call_json!(
        &app,
        register(json!({ "organization_type": "charity" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("charity"));
}
