use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

/// Phone cameras produce photos well past axum's 2 MiB default.
pub const UPLOAD_LIMIT: usize = 32 * 1024 * 1024;

const BREEDS: [&str; 5] = ["Poodle", "Jindo", "Shiba Inu", "Maltese", "Golden Retriever"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Analysis {
    pub uid: String,
    pub species: String,
    pub nose_features: Vec<String>,
    pub dog_img_url: String,
    pub nose_img_url: String,
}

/// Body of `/analyze`: the backend answers 200 either way.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Registered(Analysis),
    Rejected { error: String },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DogEntry {
    pub uid: String,
    pub species: String,
    pub dog_img_url: String,
    pub nose_img_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Matches {
    pub matches: Vec<String>,
}

struct StoredDog {
    entry: DogEntry,
    image: Vec<u8>,
}

/// Registered dogs in registration order.
type Db = Arc<RwLock<Vec<StoredDog>>>;

type ApiError = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/analyze", post(analyze))
        .route("/match", post(match_nose))
        .route("/admin/list", get(list_dogs))
        .route("/admin/delete/{uid}", delete(delete_dog))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Pull the bytes of the `file` field out of the form.
async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(bad_request)?;
            return Ok(bytes.to_vec());
        }
    }
    Err((
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": "field 'file' is required" })),
    ))
}

fn bad_request(err: axum::extract::multipart::MultipartError) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "detail": err.body_text() })))
}

/// Stand-in for the real model: breed and features are derived from the
/// bytes so the same photo always analyzes the same way.
fn describe(image: &[u8]) -> (String, Vec<String>) {
    let checksum = image.iter().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(*b as usize));
    let species = BREEDS[checksum % BREEDS.len()].to_string();
    let features = image
        .chunks(image.len().div_ceil(4).max(1))
        .map(|chunk| format!("{:02x}", chunk.iter().fold(0u8, |acc, b| acc ^ b)))
        .collect();
    (species, features)
}

async fn analyze(State(db): State<Db>, multipart: Multipart) -> Result<Json<AnalyzeResponse>, ApiError> {
    let image = read_upload(multipart).await?;
    if image.is_empty() {
        return Ok(Json(AnalyzeResponse::Rejected {
            error: "no dog detected in the image".to_string(),
        }));
    }

    let uid = Uuid::new_v4().simple().to_string();
    let (species, nose_features) = describe(&image);
    let analysis = Analysis {
        uid: uid.clone(),
        species: species.clone(),
        nose_features,
        dog_img_url: format!("/images/{uid}/dog.jpg"),
        nose_img_url: format!("/images/{uid}/nose.jpg"),
    };
    let entry = DogEntry {
        uid: uid.clone(),
        species,
        dog_img_url: analysis.dog_img_url.clone(),
        nose_img_url: analysis.nose_img_url.clone(),
    };
    db.write().await.push(StoredDog { entry, image });
    info!(%uid, "dog registered");
    Ok(Json(AnalyzeResponse::Registered(analysis)))
}

/// A nose photo matches every registered dog uploaded with identical bytes.
async fn match_nose(State(db): State<Db>, multipart: Multipart) -> Result<Json<Matches>, ApiError> {
    let image = read_upload(multipart).await?;
    let dogs = db.read().await;
    let matches = dogs
        .iter()
        .filter(|dog| !image.is_empty() && dog.image == image)
        .map(|dog| dog.entry.uid.clone())
        .collect();
    Ok(Json(Matches { matches }))
}

async fn list_dogs(State(db): State<Db>) -> Json<Vec<DogEntry>> {
    let dogs = db.read().await;
    Json(dogs.iter().map(|dog| dog.entry.clone()).collect())
}

async fn delete_dog(State(db): State<Db>, Path(uid): Path<String>) -> Result<Json<Value>, ApiError> {
    let mut dogs = db.write().await;
    let index = dogs
        .iter()
        .position(|dog| dog.entry.uid == uid)
        .ok_or((StatusCode::NOT_FOUND, Json(json!({ "detail": "dog not found" }))))?;
    dogs.remove(index);
    info!(%uid, "dog deleted");
    Ok(Json(json!({ "deleted": uid })))
}
