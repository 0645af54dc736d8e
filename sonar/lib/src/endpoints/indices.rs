//! Index management endpoints.

use std::time::Duration;

use super::{Endpoint, common_params, to_strings};
use crate::error::ApiError;
use crate::method::RestMethod;
use crate::request::{ApiRequest, CommonParams, RequestBody, require_path_list, require_path_part};

/// `PUT /{index}` - creates an index, optionally with settings and mappings.
#[derive(Debug, Clone)]
pub struct IndicesCreate {
    index: String,
    body: Option<RequestBody>,
    master_timeout: Option<Duration>,
    timeout: Option<Duration>,
    wait_for_active_shards: Option<String>,
    common: CommonParams,
}

impl IndicesCreate {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            body: None,
            master_timeout: None,
            timeout: None,
            wait_for_active_shards: None,
            common: CommonParams::default(),
        }
    }

    /// `settings`, `mappings` and `aliases` for the new index.
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn master_timeout(mut self, timeout: Duration) -> Self {
        self.master_timeout = Some(timeout);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn wait_for_active_shards(mut self, shards: impl Into<String>) -> Self {
        self.wait_for_active_shards = Some(shards.into());
        self
    }
}

common_params!(IndicesCreate);

impl Endpoint for IndicesCreate {
    const NAME: &'static str = "indices.create";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        require_path_part(Self::NAME, "index", &self.index)?;

        let mut request = ApiRequest::new(RestMethod::Put).path_part("index", self.index);
        request.query.duration("master_timeout", self.master_timeout);
        request.query.duration("timeout", self.timeout);
        request
            .query
            .string("wait_for_active_shards", self.wait_for_active_shards.as_deref());

        if let Some(body) = self.body {
            request = request.body(body)?;
        }
        self.common.apply(&mut request)?;
        Ok(request)
    }
}

/// `DELETE /{index,...}`.
#[derive(Debug, Clone)]
pub struct IndicesDelete {
    index: Vec<String>,
    allow_no_indices: Option<bool>,
    expand_wildcards: Vec<String>,
    ignore_unavailable: Option<bool>,
    master_timeout: Option<Duration>,
    timeout: Option<Duration>,
    common: CommonParams,
}

impl IndicesDelete {
    pub fn new<I, S>(index: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index: to_strings(index),
            allow_no_indices: None,
            expand_wildcards: Vec::new(),
            ignore_unavailable: None,
            master_timeout: None,
            timeout: None,
            common: CommonParams::default(),
        }
    }

    pub fn allow_no_indices(mut self, allow: bool) -> Self {
        self.allow_no_indices = Some(allow);
        self
    }

    pub fn expand_wildcards<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expand_wildcards = to_strings(states);
        self
    }

    pub fn ignore_unavailable(mut self, ignore: bool) -> Self {
        self.ignore_unavailable = Some(ignore);
        self
    }

    pub fn master_timeout(mut self, timeout: Duration) -> Self {
        self.master_timeout = Some(timeout);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

common_params!(IndicesDelete);

impl Endpoint for IndicesDelete {
    const NAME: &'static str = "indices.delete";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        require_path_list(Self::NAME, "index", &self.index)?;

        let mut request = ApiRequest::new(RestMethod::Delete).path_list("index", &self.index);
        let query = &mut request.query;
        query.flag("allow_no_indices", self.allow_no_indices);
        query.list("expand_wildcards", &self.expand_wildcards);
        query.flag("ignore_unavailable", self.ignore_unavailable);
        query.duration("master_timeout", self.master_timeout);
        query.duration("timeout", self.timeout);

        self.common.apply(&mut request)?;
        Ok(request)
    }
}

/// `HEAD /{index,...}` - 200 if every named index exists, 404 otherwise.
#[derive(Debug, Clone)]
pub struct IndicesExists {
    index: Vec<String>,
    allow_no_indices: Option<bool>,
    expand_wildcards: Vec<String>,
    ignore_unavailable: Option<bool>,
    include_defaults: Option<bool>,
    local: Option<bool>,
    common: CommonParams,
}

impl IndicesExists {
    pub fn new<I, S>(index: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index: to_strings(index),
            allow_no_indices: None,
            expand_wildcards: Vec::new(),
            ignore_unavailable: None,
            include_defaults: None,
            local: None,
            common: CommonParams::default(),
        }
    }

    pub fn allow_no_indices(mut self, allow: bool) -> Self {
        self.allow_no_indices = Some(allow);
        self
    }

    pub fn expand_wildcards<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expand_wildcards = to_strings(states);
        self
    }

    pub fn ignore_unavailable(mut self, ignore: bool) -> Self {
        self.ignore_unavailable = Some(ignore);
        self
    }

    pub fn include_defaults(mut self, include: bool) -> Self {
        self.include_defaults = Some(include);
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = Some(local);
        self
    }
}

common_params!(IndicesExists);

impl Endpoint for IndicesExists {
    const NAME: &'static str = "indices.exists";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        require_path_list(Self::NAME, "index", &self.index)?;

        let mut request = ApiRequest::new(RestMethod::Head).path_list("index", &self.index);
        let query = &mut request.query;
        query.flag("allow_no_indices", self.allow_no_indices);
        query.list("expand_wildcards", &self.expand_wildcards);
        query.flag("ignore_unavailable", self.ignore_unavailable);
        query.flag("include_defaults", self.include_defaults);
        query.flag("local", self.local);

        self.common.apply(&mut request)?;
        Ok(request)
    }
}

/// `POST [/{index}]/_refresh` - makes recent writes visible to search.
#[derive(Debug, Clone, Default)]
pub struct IndicesRefresh {
    index: Vec<String>,
    allow_no_indices: Option<bool>,
    expand_wildcards: Vec<String>,
    ignore_unavailable: Option<bool>,
    common: CommonParams,
}

impl IndicesRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index<I, S>(mut self, index: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index = to_strings(index);
        self
    }

    pub fn allow_no_indices(mut self, allow: bool) -> Self {
        self.allow_no_indices = Some(allow);
        self
    }

    pub fn expand_wildcards<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expand_wildcards = to_strings(states);
        self
    }

    pub fn ignore_unavailable(mut self, ignore: bool) -> Self {
        self.ignore_unavailable = Some(ignore);
        self
    }
}

common_params!(IndicesRefresh);

impl Endpoint for IndicesRefresh {
    const NAME: &'static str = "indices.refresh";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        let mut request = ApiRequest::new(RestMethod::Post)
            .path_list("index", &self.index)
            .segment("_refresh");
        let query = &mut request.query;
        query.flag("allow_no_indices", self.allow_no_indices);
        query.list("expand_wildcards", &self.expand_wildcards);
        query.flag("ignore_unavailable", self.ignore_unavailable);

        self.common.apply(&mut request)?;
        Ok(request)
    }
}
