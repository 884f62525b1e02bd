//! Client core for the dog nose-print identification service.
//!
//! # Overview
//! Users register a dog by uploading a photo for breed and nose-feature
//! analysis, and look for a lost dog by uploading a nose photo to be matched
//! against registered animals. All analysis and matching happens on the
//! backend; this crate talks to it and keeps per-screen request state.
//!
//! # Design
//! - `PetClient` is stateless and sans-IO: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `Transport` executes requests; `ReqwestTransport` is the real one.
//! - `ApiService` combines the two behind the async `PetApi` trait.
//! - `WorkflowController` and `DogListController` own screen state and only
//!   depend on `PetApi`, so they are testable without a network.
//! - Wire types are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod dogs;
pub mod error;
pub mod http;
pub mod multipart;
pub mod service;
pub mod transport;
pub mod types;
pub mod workflow;

pub use client::PetClient;
pub use config::ClientConfig;
pub use dogs::DogListController;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::{ApiService, PetApi};
pub use transport::{ReqwestTransport, Transport};
pub use types::{AnalysisResult, DogRecord, FindResult, ImageRef, MatchResult};
pub use workflow::{FindController, RegisterController, RequestState, Ticket, WorkflowController};
