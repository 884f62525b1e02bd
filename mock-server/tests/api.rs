use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Analysis, DogEntry, Matches};
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn upload_request(uri: &str, field: &str, image: &[u8]) -> Request<axum::body::Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"dog_photo.jpg\"\r\n").as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    body.extend_from_slice(image);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(axum::body::Body::from(bytes::Bytes::from(body)))
        .unwrap()
}

fn get(uri: &str) -> Request<axum::body::Body> {
    Request::builder().uri(uri).body(axum::body::Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_dogs_empty() {
    let resp = app().oneshot(get("/admin/list")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let dogs: Vec<DogEntry> = body_json(resp).await;
    assert!(dogs.is_empty());
}

// --- analyze ---

#[tokio::test]
async fn analyze_returns_analysis() {
    let resp = app()
        .oneshot(upload_request("/analyze", "file", b"a dog photo"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let analysis: Analysis = body_json(resp).await;
    assert!(!analysis.uid.is_empty());
    assert!(!analysis.species.is_empty());
    assert_eq!(analysis.nose_features.len(), 4);
    assert!(analysis.dog_img_url.contains(&analysis.uid));
}

#[tokio::test]
async fn analyze_accepts_phone_sized_photo() {
    let photo = vec![0xab; 6 * 1024 * 1024];
    let resp = app()
        .oneshot(upload_request("/analyze", "file", &photo))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let analysis: Analysis = body_json(resp).await;
    assert!(!analysis.uid.is_empty());
}

#[tokio::test]
async fn match_accepts_phone_sized_photo() {
    let photo = vec![0x5c; 4 * 1024 * 1024];
    let resp = app()
        .oneshot(upload_request("/match", "file", &photo))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let matches: Matches = body_json(resp).await;
    assert!(matches.matches.is_empty());
}

#[tokio::test]
async fn analyze_empty_image_reports_error_field() {
    let resp = app().oneshot(upload_request("/analyze", "file", b"")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn analyze_without_file_field_returns_422() {
    let resp = app()
        .oneshot(upload_request("/analyze", "photo", b"bytes"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn analyze_without_multipart_is_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze")
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
}

// --- match ---

#[tokio::test]
async fn match_with_no_dogs_is_empty() {
    let resp = app()
        .oneshot(upload_request("/match", "file", b"nose"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let matches: Matches = body_json(resp).await;
    assert!(matches.matches.is_empty());
}

// --- delete ---

#[tokio::test]
async fn delete_unknown_dog_returns_404() {
    let resp = app().oneshot(delete("/admin/delete/nope")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["detail"], "dog not found");
}

// --- full register / match / delete lifecycle ---

#[tokio::test]
async fn register_match_delete_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // register
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(upload_request("/analyze", "file", b"rex"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let rex: Analysis = body_json(resp).await;

    // a second, different dog
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(upload_request("/analyze", "file", b"bella"))
        .await
        .unwrap();
    let bella: Analysis = body_json(resp).await;

    // list — registration order
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/admin/list"))
        .await
        .unwrap();
    let dogs: Vec<DogEntry> = body_json(resp).await;
    let uids: Vec<&str> = dogs.iter().map(|d| d.uid.as_str()).collect();
    assert_eq!(uids, vec![rex.uid.as_str(), bella.uid.as_str()]);

    // match rex's photo
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(upload_request("/match", "file", b"rex"))
        .await
        .unwrap();
    let matches: Matches = body_json(resp).await;
    assert_eq!(matches.matches, vec![rex.uid.clone()]);

    // delete rex
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(delete(&format!("/admin/delete/{}", rex.uid)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["deleted"], rex.uid.as_str());

    // match after delete — nothing
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(upload_request("/match", "file", b"rex"))
        .await
        .unwrap();
    let matches: Matches = body_json(resp).await;
    assert!(matches.matches.is_empty());

    // list after delete — only bella
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/admin/list"))
        .await
        .unwrap();
    let dogs: Vec<DogEntry> = body_json(resp).await;
    assert_eq!(dogs.len(), 1);
    assert_eq!(dogs[0].uid, bella.uid);
}
