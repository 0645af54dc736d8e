//! Typed client for JSON-over-HTTP search engine REST APIs.
//!
//! Every endpoint is a plain request struct under [`endpoints`]. Required
//! path parameters are constructor arguments and optional query parameters
//! are builder methods, so an unset option is simply never sent. A
//! [`Client`] turns the struct into an [`ApiRequest`], hands it to a
//! [`Transport`] and returns the raw [`Response`].
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sonar_lib::{Client, TracingInstrumentation, TransportConfig};
//! use sonar_lib::endpoints::CatNodeattrs;
//!
//! let client = Client::from_config(TransportConfig::from_env()?)?
//!     .with_instrumentation(Arc::new(TracingInstrumentation::new()));
//!
//! let response = client
//!     .send(CatNodeattrs::new().format("json").v(true))
//!     .await?
//!     .error_for_status()?;
//! println!("{}", response.text()?);
//! ```

pub mod client;
pub mod endpoints;
pub mod error;
pub mod instrumentation;
pub mod method;
pub mod request;
pub mod response;
pub mod transport;

pub use client::Client;
pub use endpoints::Endpoint;
pub use error::{ApiError, AuthError, ClientError, ConfigError, ValidationError};
pub use instrumentation::{Instrumentation, TracingInstrumentation};
pub use method::RestMethod;
pub use request::{ApiRequest, CommonParams, QueryParams, RequestBody};
pub use response::Response;
pub use transport::{Credentials, ReqwestTransport, ReqwestTransportBuilder, Transport, TransportConfig};
