//! Per-screen request state for the register and find screens.
//!
//! # Design
//! A controller owns one `RequestState` and moves it through
//! idle → image selected → submitting → succeeded/failed. Submitting hands
//! out a `Ticket`; a response only lands if its ticket is still the one in
//! flight. Picking a new image invalidates the ticket, so a late answer for
//! an old photo can never overwrite state that belongs to the new one.
//! Nothing is cancelled; stale responses are simply dropped.
//!
//! `submit` / `complete` are the sans-IO half and can be driven by any
//! event loop. `run` and the screen-specific `*_with` helpers drive one
//! round-trip end to end.

use std::future::Future;

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::service::PetApi;
use crate::types::{resolve_matches, AnalysisResult, FindResult, ImageRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState<R> {
    Idle,
    ImageSelected(ImageRef),
    Submitting(ImageRef),
    Succeeded(R),
    Failed(ApiError),
}

/// Identity of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: u64,
    image: ImageRef,
}

impl Ticket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }
}

#[derive(Debug)]
pub struct WorkflowController<R> {
    state: RequestState<R>,
    in_flight: Option<u64>,
    submitted: Option<ImageRef>,
    next_ticket: u64,
}

/// Register screen: analyze a dog photo.
pub type RegisterController = WorkflowController<AnalysisResult>;

/// Find screen: match a nose photo against registered dogs.
pub type FindController = WorkflowController<FindResult>;

impl<R> Default for WorkflowController<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> WorkflowController<R> {
    pub fn new() -> Self {
        Self {
            state: RequestState::Idle,
            in_flight: None,
            submitted: None,
            next_ticket: 0,
        }
    }

    pub fn state(&self) -> &RequestState<R> {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn result(&self) -> Option<&R> {
        match &self.state {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match &self.state {
            RequestState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// The image behind the current submitting / succeeded / failed state.
    pub fn submitted_image(&self) -> Option<&ImageRef> {
        self.submitted.as_ref()
    }

    /// Any previous result, error or in-flight request is discarded.
    pub fn select_image(&mut self, image: ImageRef) {
        if let Some(id) = self.in_flight.take() {
            debug!(ticket = id, "selection replaced in-flight request");
        }
        self.submitted = None;
        self.state = RequestState::ImageSelected(image);
    }

    /// Back to idle, e.g. when the screen is left.
    pub fn reset(&mut self) {
        self.in_flight = None;
        self.submitted = None;
        self.state = RequestState::Idle;
    }

    /// Start a submission for the selected image.
    ///
    /// Returns `None` without touching state when nothing is selected or a
    /// request is already in flight. After a failure the same image may be
    /// submitted again.
    pub fn submit(&mut self) -> Option<Ticket> {
        if self.in_flight.is_some() {
            debug!("submit ignored: request already in flight");
            return None;
        }
        let image = match &self.state {
            RequestState::ImageSelected(image) => image.clone(),
            RequestState::Failed(_) => self.submitted.clone()?,
            _ => {
                debug!("submit ignored: no image selected");
                return None;
            }
        };

        self.next_ticket += 1;
        let ticket = Ticket {
            id: self.next_ticket,
            image: image.clone(),
        };
        self.in_flight = Some(ticket.id);
        self.submitted = Some(image.clone());
        self.state = RequestState::Submitting(image);
        Some(ticket)
    }

    /// Apply the response for `ticket`. Returns `false` and leaves state
    /// untouched when the ticket is no longer the one in flight.
    pub fn complete(&mut self, ticket: Ticket, result: Result<R, ApiError>) -> bool {
        if self.in_flight != Some(ticket.id) {
            debug!(ticket = ticket.id, "stale response ignored");
            return false;
        }
        self.in_flight = None;
        self.state = match result {
            Ok(value) => RequestState::Succeeded(value),
            Err(err) => {
                warn!(error = %err, "request failed");
                RequestState::Failed(err)
            }
        };
        true
    }

    /// Submit, await `call` with the submitted image, then complete.
    /// Returns whether a response was applied.
    pub async fn run<F, Fut>(&mut self, call: F) -> bool
    where
        F: FnOnce(ImageRef) -> Fut,
        Fut: Future<Output = Result<R, ApiError>>,
    {
        let Some(ticket) = self.submit() else {
            return false;
        };
        let result = call(ticket.image().clone()).await;
        self.complete(ticket, result)
    }
}

impl WorkflowController<AnalysisResult> {
    pub async fn analyze_with<A: PetApi>(&mut self, api: &A) -> bool {
        self.run(|image| async move { api.analyze(&image).await }).await
    }
}

impl WorkflowController<FindResult> {
    pub async fn find_with<A: PetApi>(&mut self, api: &A) -> bool {
        self.run(|image| async move { find(api, &image).await }).await
    }
}

/// Match the nose photo, then resolve matched uids through the listing.
/// An empty match skips the listing call.
pub async fn find<A: PetApi>(api: &A, image: &ImageRef) -> Result<FindResult, ApiError> {
    let matches = api.match_nose(image).await?;
    if matches.is_empty() {
        return Ok(FindResult {
            matches,
            dogs: Vec::new(),
        });
    }
    let listing = api.list_dogs().await?;
    let dogs = resolve_matches(&matches, listing);
    Ok(FindResult { matches, dogs })
}
