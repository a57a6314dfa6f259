//! Headless core of the users admin screen.
//!
//! # Overview
//! Holds everything the screen knows: the fetched collection, the grid rows
//! derived from it, and the create/edit modal forms with their validation.
//! It talks to the users REST API without touching the network itself
//! (host-does-IO): every backend call yields an `HttpRequest` and later
//! consumes the host's `HttpResponse`.
//!
//! # Design
//! - `UserClient` is stateless. It holds only the injected base URL and
//!   builds the four endpoint URLs.
//! - `DataFetcher` loads a collection once per URL, exposing
//!   `{data, loading, error}`.
//! - `RecordTable` owns the local collection and applies create, edit and
//!   delete results optimistically, without re-fetching.
//! - `Transport` lets blocking hosts run a `begin_*`/`finish_*` pair in one
//!   call; `UreqTransport` is the stock implementation.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod form;
pub mod http;
pub mod table;
pub mod transport;
pub mod types;
pub mod view;

pub use client::UserClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, FormError};
pub use fetch::DataFetcher;
pub use form::{CreateForm, EditForm, EditSubmit, Field, FieldErrors, FormState, FormValues};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use table::{InlineEdit, Modal, PendingSubmit, PendingUpdate, RecordTable, SubmitTarget};
pub use transport::{Transport, UreqTransport};
pub use types::{Gender, NewUser, User};
pub use view::{Column, ColumnKind, GridRow, COLUMNS};
