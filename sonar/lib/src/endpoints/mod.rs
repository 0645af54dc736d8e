//! Typed request structs, one per REST endpoint.
//!
//! Required identifiers are constructor arguments; every optional query
//! parameter is a consuming builder method. Nothing is sent until the
//! struct is handed to [`Client::send`](crate::Client::send).
//!
//! ```rust,ignore
//! use sonar_lib::endpoints::CatNodeattrs;
//!
//! let response = client
//!     .send(CatNodeattrs::new().format("json").h(["node", "attr", "value"]))
//!     .await?;
//! ```

mod cat;
mod cluster;
mod document;
mod indices;
mod root;
mod search;

pub use cat::{CatIndices, CatNodeattrs};
pub use cluster::{
    ClusterDeleteVotingConfigExclusions, ClusterHealth, ClusterPostVotingConfigExclusions,
};
pub use document::{Create, Delete, Exists, Get, Index};
pub use indices::{IndicesCreate, IndicesDelete, IndicesExists, IndicesRefresh};
pub use root::{Info, Ping};
pub use search::{Bulk, Count, Search};

use crate::error::ApiError;
use crate::request::ApiRequest;

/// A request struct that knows how to become an [`ApiRequest`].
pub trait Endpoint {
    /// Dotted endpoint name reported to instrumentation, e.g. `cat.nodeattrs`.
    const NAME: &'static str;

    /// Builds the request.
    ///
    /// ## Errors
    ///
    /// Returns a local error when a required path parameter is empty or the
    /// body cannot be encoded. Nothing has been sent at that point.
    fn into_request(self) -> Result<ApiRequest, ApiError>;
}

fn to_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

/// Adds the response-shaping builder methods shared by every endpoint.
///
/// The target struct must have a `common: CommonParams` field.
macro_rules! common_params {
    ($ty:ty) => {
        impl $ty {
            /// Pretty-prints the response body.
            pub fn pretty(mut self) -> Self {
                self.common.pretty = true;
                self
            }

            /// Returns statistics in human readable form.
            pub fn human(mut self) -> Self {
                self.common.human = true;
                self
            }

            /// Includes stack traces in error responses.
            pub fn error_trace(mut self) -> Self {
                self.common.error_trace = true;
                self
            }

            /// Filters the response down to these paths.
            pub fn filter_path<I, S>(mut self, paths: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.common.filter_path = crate::endpoints::to_strings(paths);
                self
            }

            /// Adds a request header.
            pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
                self.common.headers.push((name.into(), value.into()));
                self
            }
        }
    };
}

pub(crate) use common_params;
