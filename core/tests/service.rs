//! Async end-to-end flows: `ApiService` over `ReqwestTransport` against the
//! mock server, driven through the screen controllers.

use std::path::PathBuf;

use noseprint_core::{
    ApiError, ApiService, ClientConfig, DogListController, FindController, ImageRef, PetApi, RegisterController,
    RequestState,
};

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}")
}

/// A photo on disk, removed when dropped.
struct Photo(PathBuf);

impl Photo {
    fn new(bytes: &[u8]) -> Self {
        let path = std::env::temp_dir().join(format!("noseprint-{}.jpg", uuid::Uuid::new_v4()));
        std::fs::write(&path, bytes).unwrap();
        Self(path)
    }

    fn image(&self) -> ImageRef {
        ImageRef::new(&self.0)
    }
}

impl Drop for Photo {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[tokio::test]
async fn register_find_and_delete_through_controllers() {
    let api = ApiService::from_config(&ClientConfig::new(start_server().await));
    assert!(api.ping().await);

    let rex = Photo::new(b"rex nose print");
    let bella = Photo::new(b"bella nose print");

    // Register two dogs.
    let mut register = RegisterController::new();
    register.select_image(rex.image());
    assert!(register.analyze_with(&api).await);
    let rex_uid = register.result().unwrap().uid.clone();

    register.select_image(bella.image());
    assert!(register.analyze_with(&api).await);
    assert_ne!(register.result().unwrap().uid, rex_uid);

    // Find rex by nose photo.
    let mut find = FindController::new();
    find.select_image(rex.image());
    assert!(find.find_with(&api).await);
    let found = find.result().unwrap();
    assert!(!found.is_empty());
    assert_eq!(found.dogs.len(), 1);
    assert_eq!(found.dogs[0].uid, rex_uid);

    // My pets: both dogs, then delete rex.
    let mut pets = DogListController::new();
    pets.refresh(&api).await.unwrap();
    assert_eq!(pets.dogs().len(), 2);
    pets.delete(&api, &rex_uid).await.unwrap();
    assert_eq!(pets.dogs().len(), 1);

    // Deleting again fails and leaves the list alone.
    let before = pets.dogs().to_vec();
    let err = pets.delete(&api, &rex_uid).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(pets.dogs(), before.as_slice());

    // Rex no longer matches: the "no results" branch.
    find.select_image(rex.image());
    assert!(find.find_with(&api).await);
    assert!(find.result().unwrap().is_empty());
}

#[tokio::test]
async fn rejected_photo_lands_in_failed_state() {
    let api = ApiService::from_config(&ClientConfig::new(start_server().await));
    let empty = Photo::new(b"");

    let mut register = RegisterController::new();
    register.select_image(empty.image());
    assert!(register.analyze_with(&api).await);

    match register.state() {
        RequestState::Failed(ApiError::Server { status, message }) => {
            assert_eq!(*status, 200);
            assert_eq!(message, "no dog detected in the image");
        }
        other => panic!("expected server failure, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_is_network_failure() {
    // Bind then drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let api = ApiService::from_config(&ClientConfig::new(format!("http://{addr}")));

    assert!(!api.ping().await);
    let err = api.list_dogs().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
