//! Cluster root endpoints.

use super::{Endpoint, common_params};
use crate::error::ApiError;
use crate::method::RestMethod;
use crate::request::{ApiRequest, CommonParams};

/// `GET /` - basic cluster and version information.
#[derive(Debug, Clone, Default)]
pub struct Info {
    common: CommonParams,
}

impl Info {
    pub fn new() -> Self {
        Self::default()
    }
}

common_params!(Info);

impl Endpoint for Info {
    const NAME: &'static str = "info";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        let mut request = ApiRequest::new(RestMethod::Get);
        self.common.apply(&mut request)?;
        Ok(request)
    }
}

/// `HEAD /` - liveness check; the status code is the answer.
#[derive(Debug, Clone, Default)]
pub struct Ping {
    common: CommonParams,
}

impl Ping {
    pub fn new() -> Self {
        Self::default()
    }
}

common_params!(Ping);

impl Endpoint for Ping {
    const NAME: &'static str = "ping";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        let mut request = ApiRequest::new(RestMethod::Head);
        self.common.apply(&mut request)?;
        Ok(request)
    }
}
