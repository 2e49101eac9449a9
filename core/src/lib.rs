//! Client core for the todo service.
//!
//! # Overview
//! `TodoClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. A `Transport` runs the round-trip in
//! between, and `TodoService` pairs the two into one async call per
//! operation. `TodoStore` sits on top and owns the collection the UI shows,
//! merging only what the server has confirmed.
//!
//! # Design
//! - `TodoClient` is stateless. It holds only `base_url`.
//! - Each CRUD operation is split into `build_*` and `parse_*`, so request
//!   shapes and status rules are testable without I/O.
//! - `filter` and friends are pure functions over a borrowed collection.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod service;
pub mod store;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, ValidationError};
pub use filter::{filter, group_by_status, Criteria, GroupedTodos, StatusCounts, StatusFilter};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::TodoService;
pub use store::{PendingKey, TodoStore};
pub use transport::{ReqwestTransport, Transport};
pub use types::{CreateTodo, Status, Todo, TodoId, UpdateTodo};
