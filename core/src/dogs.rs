//! The "my pets" list: registered dogs with refresh and delete.
//!
//! A refresh replaces the whole list with whatever the backend returned
//! last. Overlapping refreshes are allowed; `loading` stays set until the
//! last one has finished.

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::service::PetApi;
use crate::types::DogRecord;

#[derive(Debug, Default)]
pub struct DogListController {
    dogs: Vec<DogRecord>,
    pending: usize,
    last_error: Option<ApiError>,
}

impl DogListController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dogs(&self) -> &[DogRecord] {
        &self.dogs
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    /// Empty-state signal for the list screen. Not an error.
    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    pub fn begin_refresh(&mut self) {
        self.pending += 1;
    }

    /// A failed refresh keeps the current list.
    pub fn finish_refresh(&mut self, result: Result<Vec<DogRecord>, ApiError>) -> Result<(), ApiError> {
        self.pending = self.pending.saturating_sub(1);
        match result {
            Ok(dogs) => {
                debug!(count = dogs.len(), "dog list replaced");
                self.dogs = dogs;
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "dog list refresh failed");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub async fn refresh<A: PetApi>(&mut self, api: &A) -> Result<(), ApiError> {
        self.begin_refresh();
        let result = api.list_dogs().await;
        self.finish_refresh(result)
    }

    /// Delete `uid`, then refresh once. On failure the list is left as is.
    pub async fn delete<A: PetApi>(&mut self, api: &A, uid: &str) -> Result<(), ApiError> {
        if let Err(err) = api.delete_dog(uid).await {
            warn!(uid, error = %err, "delete failed");
            self.last_error = Some(err.clone());
            return Err(err);
        }
        self.refresh(api).await
    }
}
