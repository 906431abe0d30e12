#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use certverify_common::jobs::JobStatus;
use common::{
    certificate, create_session, start_verification, upload_certificate, upload_dataset,
    wait_for_job, Part, TestEnv,
};

const GRADUATES_CSV: &str = "Certificate ID,Student Name,Course\n\
CERT-2024-001,John Doe,Computer Science\n\
CERT-2024-010,Ada Lovelace,Mathematics\n";

fn dataset_form<'a>(name: &'a str, filename: &'a str, bytes: &'a [u8]) -> Vec<Part<'a>> {
    vec![
        Part::Text {
            name: "name",
            value: name,
        },
        Part::File {
            name: "file",
            filename,
            content_type: "text/csv",
            bytes,
        },
    ]
}

#[actix_web::test]
async fn seeded_datasets_are_listed_and_searchable() {
    let env = TestEnv::new(true, 0);
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let (status, all) = call_json!(&app, TestRequest::get().uri("/api/datasets"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, degrees) = call_json!(&app, TestRequest::get().uri("/api/datasets?search=DEGREES"));
    let names: Vec<&str> = degrees
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Bachelor Degrees 2020-2024"));
    assert!(names.contains(&"Master Degrees 2022-2024"));
}

#[actix_web::test]
async fn csv_upload_creates_a_dataset() {
    let env = TestEnv::new(false, 0);
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let (status, dataset) = call_json!(
        &app,
        upload_dataset(&dataset_form("Graduates 2024", "graduates.csv", GRADUATES_CSV.as_bytes()))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(dataset["name"], "Graduates 2024");
    assert_eq!(dataset["record_count"], 2);
    assert_eq!(dataset["status"], "active");
    let id = dataset["id"].as_i64().unwrap();

    let (status, fetched) = call_json!(
        &app,
        TestRequest::get().uri(&format!("/api/datasets/{}", id))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Graduates 2024");

    let (_, listed) = call_json!(&app, TestRequest::get().uri("/api/datasets"));
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn name_part_may_follow_the_file_part() {
    let env = TestEnv::new(false, 0);
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let mut form = dataset_form("Reordered", "graduates.csv", GRADUATES_CSV.as_bytes());
    form.reverse();
    let (status, dataset) = call_json!(&app, upload_dataset(&form));
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(dataset["name"], "Reordered");
}

#[actix_web::test]
async fn rejected_dataset_uploads() {
    let env = TestEnv::new(false, 0);
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let (status, _) = call_json!(
        &app,
        upload_dataset(&dataset_form("First", "graduates.csv", GRADUATES_CSV.as_bytes()))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call_json!(
        &app,
        upload_dataset(&dataset_form("Again", "copy.csv", GRADUATES_CSV.as_bytes()))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("First"));

    let (status, _) = call_json!(
        &app,
        upload_dataset(&dataset_form("Sheet", "graduates.xlsx", b"PK\x03\x04"))
    );
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let (status, _) = call_json!(
        &app,
        upload_dataset(&dataset_form("Notes", "graduates.txt", b"hello"))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call_json!(
        &app,
        upload_dataset(&dataset_form("   ", "other.csv", b"certificate_id,name,course\nX-1,A,B\n"))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Dataset name is required");

    let (status, body) = call_json!(
        &app,
        upload_dataset(&dataset_form("Broken", "broken.csv", b"certificate_id,name,course\n,A,B\n"))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("row 2"));

    let (_, listed) = call_json!(&app, TestRequest::get().uri("/api/datasets"));
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn deleted_dataset_is_gone() {
    let env = TestEnv::new(true, 0);
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let (_, all) = call_json!(&app, TestRequest::get().uri("/api/datasets"));
    let id = all[0]["id"].as_i64().unwrap();

    let (status, body) = call_json!(
        &app,
        TestRequest::delete().uri(&format!("/api/datasets/{}", id))
    );
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = call_json!(
        &app,
        TestRequest::delete().uri(&format!("/api/datasets/{}", id))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call_json!(&app, TestRequest::get().uri(&format!("/api/datasets/{}", id)));
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = call_json!(&app, TestRequest::get().uri("/api/datasets/abc"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (_, stats) = call_json!(&app, TestRequest::get().uri("/api/dashboard/stats"));
    assert_eq!(stats["datasets_count"], 2);
}

#[actix_web::test]
async fn uploaded_dataset_makes_its_certificates_verifiable() {
    let env = TestEnv::new(false, 0);
    let app = test::init_service(App::new().configure(|cfg| env.state.configure(cfg))).await;

    let (status, _) = call_json!(
        &app,
        upload_dataset(&dataset_form("Graduates 2024", "graduates.csv", GRADUATES_CSV.as_bytes()))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (_, session) = call_json!(&app, create_session("registrar@example.edu"));
    let session_id = session["id"].as_str().unwrap().to_string();
    call_json!(
        &app,
        upload_certificate(
            &session_id,
            &certificate("john.pdf", "application/pdf", b"%PDF-1.4 john")
        )
    );
    let (_, started) = call_json!(&app, start_verification(&session_id));

    match wait_for_job(&env.state.jobs, started["job_id"].as_str().unwrap()).await {
        JobStatus::Completed(json) => {
            let outcome: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(outcome["status"], "valid");
        }
        other => panic!("unexpected job status {:?}", other),
    }
}
