//! The backend operations as async calls.
//!
//! # Design
//! `PetApi` is what the controllers depend on, so screen logic can be tested
//! against an in-memory fake. `ApiService` is the real implementation: it
//! reads the image, lets `PetClient` build the request, hands it to a
//! `Transport`, and parses the response. Every call goes to the network.

use std::future::Future;

use tracing::{debug, warn};

use crate::client::PetClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{AnalysisResult, DogRecord, ImageRef, MatchResult};

pub trait PetApi {
    fn analyze(&self, image: &ImageRef) -> impl Future<Output = Result<AnalysisResult, ApiError>>;

    fn match_nose(&self, image: &ImageRef) -> impl Future<Output = Result<MatchResult, ApiError>>;

    fn list_dogs(&self) -> impl Future<Output = Result<Vec<DogRecord>, ApiError>>;

    fn delete_dog(&self, uid: &str) -> impl Future<Output = Result<(), ApiError>>;

    /// `true` when the backend answered the listing with a 2xx.
    fn ping(&self) -> impl Future<Output = bool>;
}

#[derive(Debug, Clone)]
pub struct ApiService<T> {
    client: PetClient,
    transport: T,
}

impl ApiService<ReqwestTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.client(), ReqwestTransport::new())
    }
}

impl<T: Transport> ApiService<T> {
    pub fn new(client: PetClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &PetClient {
        &self.client
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let response = self.transport.execute(request).await;
        match &response {
            Ok(r) => debug!(status = r.status, "response received"),
            Err(e) => warn!(error = %e, "request failed"),
        }
        response
    }
}

async fn read_image(image: &ImageRef) -> Result<Vec<u8>, ApiError> {
    tokio::fs::read(image.path())
        .await
        .map_err(|e| ApiError::Image(format!("{}: {e}", image.path().display())))
}

impl<T: Transport> PetApi for ApiService<T> {
    async fn analyze(&self, image: &ImageRef) -> Result<AnalysisResult, ApiError> {
        let bytes = read_image(image).await?;
        let response = self.send(self.client.build_analyze(&bytes)).await?;
        self.client.parse_analyze(response)
    }

    async fn match_nose(&self, image: &ImageRef) -> Result<MatchResult, ApiError> {
        let bytes = read_image(image).await?;
        let response = self.send(self.client.build_match(&bytes)).await?;
        self.client.parse_match(response)
    }

    async fn list_dogs(&self) -> Result<Vec<DogRecord>, ApiError> {
        let response = self.send(self.client.build_list_dogs()).await?;
        self.client.parse_list_dogs(response)
    }

    async fn delete_dog(&self, uid: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_dog(uid)).await?;
        self.client.parse_delete_dog(response)
    }

    async fn ping(&self) -> bool {
        match self.send(self.client.build_ping()).await {
            Ok(response) => self.client.parse_ping(response),
            Err(_) => false,
        }
    }
}
