//! Synchronous API client core for the todo lists service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network. The host executes the actual round-trip through a
//! `Transport`, which keeps the core deterministic and testable.
//!
//! # Design
//! - `TodoClient` is stateless: it holds only the base URL and bearer token.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit. `Session` chains the two for callers that own a
//!   transport.
//! - `views` holds the dashboard and detail screens as plain state machines
//!   driven one request per user action.
//! - DTOs are defined independently from the server crate; integration tests
//!   catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod session;
pub mod types;
pub mod views;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{Session, Transport};
pub use types::{CreateItem, Message, TodoItem, TodoList, TodoName, UpdateItem};
pub use views::{Dashboard, Detail};
