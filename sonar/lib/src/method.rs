//! HTTP verbs used by the search API.

use strum::Display;

/// The verbs the search API's endpoints are defined with.
///
/// Endpoints that need a query body (`_search`, `_count`) are sent as POST
/// rather than as GET with a body, so only POST and PUT carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RestMethod {
    Get,
    Post,
    Put,
    Delete,
    /// Existence checks; the status code is the answer.
    Head,
}

impl RestMethod {
    /// Returns `true` if requests with this verb may carry a body.
    pub fn accepts_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
        }
    }
}
