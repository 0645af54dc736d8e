//! Single-document endpoints.

use std::time::Duration;

use super::{Endpoint, common_params, to_strings};
use crate::error::ApiError;
use crate::method::RestMethod;
use crate::request::{
    ApiRequest, CommonParams, QueryParams, RequestBody, require_path_part,
};

/// Write options shared by [`Index`], [`Create`] and [`Delete`].
#[derive(Debug, Clone, Default)]
struct WriteParams {
    refresh: Option<String>,
    routing: Option<String>,
    timeout: Option<Duration>,
    version: Option<i64>,
    version_type: Option<String>,
    wait_for_active_shards: Option<String>,
}

impl WriteParams {
    fn apply(&self, query: &mut QueryParams) {
        query.string("refresh", self.refresh.as_deref());
        query.string("routing", self.routing.as_deref());
        query.duration("timeout", self.timeout);
        query.int("version", self.version);
        query.string("version_type", self.version_type.as_deref());
        query.string("wait_for_active_shards", self.wait_for_active_shards.as_deref());
    }
}

/// Optimistic concurrency guard for [`Index`] and [`Delete`].
///
/// `_create` only ever writes a new document, so it takes neither.
#[derive(Debug, Clone, Default)]
struct SeqNoGuard {
    if_primary_term: Option<i64>,
    if_seq_no: Option<i64>,
}

impl SeqNoGuard {
    fn apply(&self, query: &mut QueryParams) {
        query.int("if_primary_term", self.if_primary_term);
        query.int("if_seq_no", self.if_seq_no);
    }
}

/// Read options shared by [`Get`] and [`Exists`].
#[derive(Debug, Clone, Default)]
struct ReadParams {
    preference: Option<String>,
    realtime: Option<bool>,
    refresh: Option<bool>,
    routing: Option<String>,
    source: Option<String>,
    source_excludes: Vec<String>,
    source_includes: Vec<String>,
    stored_fields: Vec<String>,
    version: Option<i64>,
    version_type: Option<String>,
}

impl ReadParams {
    fn apply(&self, query: &mut QueryParams) {
        query.string("preference", self.preference.as_deref());
        query.flag("realtime", self.realtime);
        query.flag("refresh", self.refresh);
        query.string("routing", self.routing.as_deref());
        query.string("_source", self.source.as_deref());
        query.list("_source_excludes", &self.source_excludes);
        query.list("_source_includes", &self.source_includes);
        query.list("stored_fields", &self.stored_fields);
        query.int("version", self.version);
        query.string("version_type", self.version_type.as_deref());
    }
}

/// Generates the builder methods for [`WriteParams`] on a struct with a
/// `write` field.
macro_rules! write_params {
    ($ty:ty) => {
        impl $ty {
            /// Refresh policy: `true`, `false` or `wait_for`.
            pub fn refresh(mut self, refresh: impl Into<String>) -> Self {
                self.write.refresh = Some(refresh.into());
                self
            }

            pub fn routing(mut self, routing: impl Into<String>) -> Self {
                self.write.routing = Some(routing.into());
                self
            }

            pub fn timeout(mut self, timeout: Duration) -> Self {
                self.write.timeout = Some(timeout);
                self
            }

            /// Explicit version for optimistic concurrency control.
            pub fn version(mut self, version: i64) -> Self {
                self.write.version = Some(version);
                self
            }

            pub fn version_type(mut self, version_type: impl Into<String>) -> Self {
                self.write.version_type = Some(version_type.into());
                self
            }

            pub fn wait_for_active_shards(mut self, shards: impl Into<String>) -> Self {
                self.write.wait_for_active_shards = Some(shards.into());
                self
            }
        }
    };
}

/// Generates the builder methods for [`SeqNoGuard`] on a struct with a
/// `guard` field.
macro_rules! seq_no_guard {
    ($ty:ty) => {
        impl $ty {
            /// Only write if the document has this primary term.
            pub fn if_primary_term(mut self, term: i64) -> Self {
                self.guard.if_primary_term = Some(term);
                self
            }

            /// Only write if the document has this sequence number.
            pub fn if_seq_no(mut self, seq_no: i64) -> Self {
                self.guard.if_seq_no = Some(seq_no);
                self
            }
        }
    };
}

/// Generates the builder methods for [`ReadParams`] on a struct with a
/// `read` field.
macro_rules! read_params {
    ($ty:ty) => {
        impl $ty {
            /// Node or shard the read should prefer.
            pub fn preference(mut self, preference: impl Into<String>) -> Self {
                self.read.preference = Some(preference.into());
                self
            }

            /// Read the latest version instead of the last refreshed one.
            pub fn realtime(mut self, realtime: bool) -> Self {
                self.read.realtime = Some(realtime);
                self
            }

            /// Refresh the shard before reading.
            pub fn refresh(mut self, refresh: bool) -> Self {
                self.read.refresh = Some(refresh);
                self
            }

            pub fn routing(mut self, routing: impl Into<String>) -> Self {
                self.read.routing = Some(routing.into());
                self
            }

            /// `true`, `false` or a comma list of fields to return.
            pub fn source(mut self, source: impl Into<String>) -> Self {
                self.read.source = Some(source.into());
                self
            }

            pub fn source_excludes<I, S>(mut self, fields: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.read.source_excludes = to_strings(fields);
                self
            }

            pub fn source_includes<I, S>(mut self, fields: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.read.source_includes = to_strings(fields);
                self
            }

            pub fn stored_fields<I, S>(mut self, fields: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.read.stored_fields = to_strings(fields);
                self
            }

            pub fn version(mut self, version: i64) -> Self {
                self.read.version = Some(version);
                self
            }

            pub fn version_type(mut self, version_type: impl Into<String>) -> Self {
                self.read.version_type = Some(version_type.into());
                self
            }
        }
    };
}

/// Stores a document.
///
/// With an ID the request is `PUT /{index}/_doc/{id}`; without one the
/// server assigns an ID via `POST /{index}/_doc`.
#[derive(Debug, Clone)]
pub struct Index {
    index: String,
    id: Option<String>,
    body: RequestBody,
    op_type: Option<String>,
    pipeline: Option<String>,
    require_alias: Option<bool>,
    write: WriteParams,
    guard: SeqNoGuard,
    common: CommonParams,
}

impl Index {
    pub fn new(index: impl Into<String>, body: impl Into<RequestBody>) -> Self {
        Self {
            index: index.into(),
            id: None,
            body: body.into(),
            op_type: None,
            pipeline: None,
            require_alias: None,
            write: WriteParams::default(),
            guard: SeqNoGuard::default(),
            common: CommonParams::default(),
        }
    }

    /// Document ID. An empty ID is treated as unset.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into()).filter(|id| !id.is_empty());
        self
    }

    /// `index` or `create`.
    pub fn op_type(mut self, op_type: impl Into<String>) -> Self {
        self.op_type = Some(op_type.into());
        self
    }

    /// Ingest pipeline to run the document through.
    pub fn pipeline(mut self, pipeline: impl Into<String>) -> Self {
        self.pipeline = Some(pipeline.into());
        self
    }

    pub fn require_alias(mut self, require: bool) -> Self {
        self.require_alias = Some(require);
        self
    }
}

common_params!(Index);
write_params!(Index);
seq_no_guard!(Index);

impl Endpoint for Index {
    const NAME: &'static str = "index";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        require_path_part(Self::NAME, "index", &self.index)?;

        let base = |method| {
            ApiRequest::new(method)
                .path_part("index", self.index.as_str())
                .segment("_doc")
        };
        let mut request = match &self.id {
            Some(id) => base(RestMethod::Put).path_part("id", id.as_str()),
            None => base(RestMethod::Post),
        };

        let query = &mut request.query;
        query.string("op_type", self.op_type.as_deref());
        query.string("pipeline", self.pipeline.as_deref());
        query.flag("require_alias", self.require_alias);
        self.write.apply(query);
        self.guard.apply(query);

        let mut request = request.body(self.body)?;
        self.common.apply(&mut request)?;
        Ok(request)
    }
}

/// `PUT /{index}/_create/{id}` - stores a document only if the ID is new.
#[derive(Debug, Clone)]
pub struct Create {
    index: String,
    id: String,
    body: RequestBody,
    pipeline: Option<String>,
    write: WriteParams,
    common: CommonParams,
}

impl Create {
    pub fn new(
        index: impl Into<String>,
        id: impl Into<String>,
        body: impl Into<RequestBody>,
    ) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            body: body.into(),
            pipeline: None,
            write: WriteParams::default(),
            common: CommonParams::default(),
        }
    }

    pub fn pipeline(mut self, pipeline: impl Into<String>) -> Self {
        self.pipeline = Some(pipeline.into());
        self
    }
}

common_params!(Create);
write_params!(Create);

impl Endpoint for Create {
    const NAME: &'static str = "create";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        require_path_part(Self::NAME, "index", &self.index)?;
        require_path_part(Self::NAME, "id", &self.id)?;

        let mut request = ApiRequest::new(RestMethod::Put)
            .path_part("index", self.index)
            .segment("_create")
            .path_part("id", self.id);

        request.query.string("pipeline", self.pipeline.as_deref());
        self.write.apply(&mut request.query);

        let mut request = request.body(self.body)?;
        self.common.apply(&mut request)?;
        Ok(request)
    }
}

/// `GET /{index}/_doc/{id}`.
#[derive(Debug, Clone)]
pub struct Get {
    index: String,
    id: String,
    read: ReadParams,
    common: CommonParams,
}

impl Get {
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            read: ReadParams::default(),
            common: CommonParams::default(),
        }
    }
}

common_params!(Get);
read_params!(Get);

impl Endpoint for Get {
    const NAME: &'static str = "get";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        require_path_part(Self::NAME, "index", &self.index)?;
        require_path_part(Self::NAME, "id", &self.id)?;

        let mut request = ApiRequest::new(RestMethod::Get)
            .path_part("index", self.index)
            .segment("_doc")
            .path_part("id", self.id);
        self.read.apply(&mut request.query);
        self.common.apply(&mut request)?;
        Ok(request)
    }
}

/// `HEAD /{index}/_doc/{id}` - 200 if the document exists, 404 if not.
#[derive(Debug, Clone)]
pub struct Exists {
    index: String,
    id: String,
    read: ReadParams,
    common: CommonParams,
}

impl Exists {
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            read: ReadParams::default(),
            common: CommonParams::default(),
        }
    }
}

common_params!(Exists);
read_params!(Exists);

impl Endpoint for Exists {
    const NAME: &'static str = "exists";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        require_path_part(Self::NAME, "index", &self.index)?;
        require_path_part(Self::NAME, "id", &self.id)?;

        let mut request = ApiRequest::new(RestMethod::Head)
            .path_part("index", self.index)
            .segment("_doc")
            .path_part("id", self.id);
        self.read.apply(&mut request.query);
        self.common.apply(&mut request)?;
        Ok(request)
    }
}

/// `DELETE /{index}/_doc/{id}`.
#[derive(Debug, Clone)]
pub struct Delete {
    index: String,
    id: String,
    write: WriteParams,
    guard: SeqNoGuard,
    common: CommonParams,
}

impl Delete {
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            write: WriteParams::default(),
            guard: SeqNoGuard::default(),
            common: CommonParams::default(),
        }
    }
}

common_params!(Delete);
write_params!(Delete);
seq_no_guard!(Delete);

impl Endpoint for Delete {
    const NAME: &'static str = "delete";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        require_path_part(Self::NAME, "index", &self.index)?;
        require_path_part(Self::NAME, "id", &self.id)?;

        let mut request = ApiRequest::new(RestMethod::Delete)
            .path_part("index", self.index)
            .segment("_doc")
            .path_part("id", self.id);
        self.write.apply(&mut request.query);
        self.guard.apply(&mut request.query);
        self.common.apply(&mut request)?;
        Ok(request)
    }
}
