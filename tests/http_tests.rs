mod common;

use axum::http::{StatusCode, header};
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use common::{package_draft, recipient_draft};
use parcel_records::{
    adapters::inbound::http::router::{AppState, create_router},
    create_in_memory_app,
    domain::value_objects::RecordKey,
};
use serde_json::{Value, json};

async fn setup_test_server() -> TestServer {
    let services = create_in_memory_app().await.unwrap();
    let app = create_router(AppState::from(services));
    TestServer::new(app).unwrap()
}

async fn create_recipient(server: &TestServer, n: usize) -> Value {
    let response = server.post("/recipients").json(&recipient_draft(n)).await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_health() {
    let server = setup_test_server().await;
    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_delivery_scenario() {
    let server = setup_test_server().await;

    let recipient = create_recipient(&server, 0).await;
    assert_eq!(recipient["identifier"], 1);
    assert_eq!(recipient["name"], "Ada Lovelace");
    assert_eq!(recipient["id_proof"]["content_type"], "No IDProof");

    let key: RecordKey = serde_json::from_value(recipient["key"].clone()).unwrap();
    let response = server.post("/packages").json(&package_draft(key)).await;
    response.assert_status(StatusCode::CREATED);
    let package: Value = response.json();
    assert_eq!(package["identifier"], 1);
    assert_eq!(package["status"], "pending");

    let response = server
        .patch("/packages/1")
        .json(&json!({ "status": "delivered" }))
        .await;
    response.assert_status_ok();

    let fetched: Value = server.get("/packages/1").await.json();
    assert_eq!(fetched["status"], "delivered");
    assert_eq!(fetched["recipient"], recipient["key"]);
}

#[tokio::test]
async fn test_error_statuses() {
    let server = setup_test_server().await;

    let response = server.get("/recipients/7").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "not_found");

    let mut draft = recipient_draft(0);
    draft.name = "R2D2".to_string();
    let response = server.post("/recipients").json(&draft).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_field");
    assert_eq!(body["details"]["field"], "name");

    let response = server
        .post("/packages")
        .json(&package_draft(RecordKey::generate()))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_reference");
}

#[tokio::test]
async fn test_update_and_delete() {
    let server = setup_test_server().await;
    create_recipient(&server, 0).await;

    let response = server.put("/recipients/1").json(&recipient_draft(2)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "Alan Turing");

    server.delete("/recipients/1").await.assert_status_ok();
    server
        .get("/recipients/1")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete("/recipients/1")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_routes() {
    let server = setup_test_server().await;

    let drafts: Vec<_> = (0..3).map(recipient_draft).collect();
    let response = server.post("/recipients/bulk").json(&drafts).await;
    response.assert_status(StatusCode::CREATED);
    let created: Vec<Value> = response.json();
    let identifiers: Vec<u64> = created
        .iter()
        .map(|r| r["identifier"].as_u64().unwrap())
        .collect();
    assert_eq!(identifiers, vec![1, 2, 3]);

    let response = server
        .patch("/recipients/bulk")
        .json(&json!([
            { "identifier": 1, "changes": { "address": "7 Jacquard Loom Street" } },
            { "identifier": 2, "changes": { "phone": "abc" } },
            { "identifier": 40, "changes": {} }
        ]))
        .await;
    response.assert_status_ok();
    let report: Value = response.json();
    assert_eq!(report["success_count"], 1);
    assert_eq!(report["failed_identifiers"], json!([2]));
    assert_eq!(report["not_found"], json!([40]));
    assert_eq!(report["failures"][0]["kind"], "invalid_field");

    let response = server
        .delete("/recipients/bulk")
        .json(&json!({ "identifiers": [1, 2, 9] }))
        .await;
    response.assert_status_ok();
    let report: Value = response.json();
    assert_eq!(report["deleted_count"], 2);
    assert_eq!(report["not_found"], json!([9]));

    let listed: Vec<Value> = server.get("/recipients").await.json();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["identifier"], 3);

    let response = server
        .post("/recipients/bulk")
        .json(&Vec::<Value>::new())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn test_import_file() {
    let server = setup_test_server().await;
    let body = serde_json::to_vec(&vec![recipient_draft(0), recipient_draft(1)]).unwrap();

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(body)
            .file_name("recipients.json")
            .mime_type("application/json"),
    );
    let response = server.post("/recipients/import").multipart(form).await;
    response.assert_status(StatusCode::CREATED);
    let created: Vec<Value> = response.json();
    assert_eq!(created.len(), 2);

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"name,email".to_vec())
            .file_name("recipients.csv")
            .mime_type("text/csv"),
    );
    server
        .post("/recipients/import")
        .multipart(form)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let form = MultipartForm::new().add_text("comment", "no file here");
    let response = server.post("/recipients/import").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "No file uploaded");
}

#[tokio::test]
async fn test_id_proof_routes() {
    let server = setup_test_server().await;
    create_recipient(&server, 0).await;
    let image = b"\x89PNG\r\n\x1a\nfake image body".to_vec();

    server
        .get("/recipients/1/id-proof")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let form = MultipartForm::new().add_part(
        "image",
        Part::bytes(image.clone())
            .file_name("passport.png")
            .mime_type("image/png"),
    );
    let response = server.post("/recipients/1/id-proof").multipart(form).await;
    response.assert_status_ok();
    let uploaded: Value = response.json();
    assert_eq!(uploaded["original_name"], "passport.png");
    assert_eq!(uploaded["content_type"], "image/png");
    assert_eq!(uploaded["revision"], 1);

    let response = server.get("/recipients/1/id-proof").await;
    response.assert_status_ok();
    assert_eq!(response.header(header::CONTENT_TYPE), "image/png");
    let etag = format!("\"{:x}\"", md5::compute(&image));
    assert_eq!(response.header(header::ETAG), etag.as_str());
    assert_eq!(response.as_bytes().to_vec(), image);

    let response = server.delete("/recipients/1/id-proof").await;
    response.assert_status_ok();
    let cleared: Value = response.json();
    assert_eq!(cleared["id_proof"]["content_type"], "No IDProof");
    assert_eq!(cleared["id_proof"]["revision"], 2);

    server
        .get("/recipients/1/id-proof")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_id_proof_rejections() {
    let server = setup_test_server().await;
    create_recipient(&server, 0).await;

    let form = MultipartForm::new().add_part(
        "image",
        Part::bytes(b"plain words".to_vec())
            .file_name("notes.txt")
            .mime_type("text/plain"),
    );
    let response = server.post("/recipients/1/id-proof").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_attachment");

    let oversized = vec![0u8; 5 * 1024 * 1024 + 1];
    let form = MultipartForm::new().add_part(
        "image",
        Part::bytes(oversized)
            .file_name("huge.jpg")
            .mime_type("image/jpeg"),
    );
    let response = server.post("/recipients/1/id-proof").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_attachment");

    let form = MultipartForm::new().add_part(
        "image",
        Part::bytes(b"\x89PNG".to_vec())
            .file_name("passport.png")
            .mime_type("image/png"),
    );
    server
        .post("/recipients/9/id-proof")
        .multipart(form)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
