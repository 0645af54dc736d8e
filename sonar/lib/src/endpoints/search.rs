//! Search, count and bulk endpoints.

use std::time::Duration;

use super::{Endpoint, common_params, to_strings};
use crate::error::{ApiError, ConfigError};
use crate::method::RestMethod;
use crate::request::{ApiRequest, CommonParams, RequestBody};

/// `POST [/{index}]/_search`.
///
/// The query DSL goes in the body; `q` is the Lucene query-string shortcut.
#[derive(Debug, Clone, Default)]
pub struct Search {
    index: Vec<String>,
    body: Option<RequestBody>,
    allow_no_indices: Option<bool>,
    allow_partial_search_results: Option<bool>,
    analyzer: Option<String>,
    default_operator: Option<String>,
    df: Option<String>,
    expand_wildcards: Vec<String>,
    from: Option<i64>,
    ignore_unavailable: Option<bool>,
    preference: Option<String>,
    q: Option<String>,
    request_cache: Option<bool>,
    routing: Vec<String>,
    scroll: Option<Duration>,
    search_type: Option<String>,
    size: Option<i64>,
    sort: Vec<String>,
    source: Option<String>,
    source_excludes: Vec<String>,
    source_includes: Vec<String>,
    terminate_after: Option<i64>,
    timeout: Option<Duration>,
    track_total_hits: Option<String>,
    common: CommonParams,
}

impl Search {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices to search; all indices when unset.
    pub fn index<I, S>(mut self, index: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index = to_strings(index);
        self
    }

    /// Query DSL body.
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn allow_no_indices(mut self, allow: bool) -> Self {
        self.allow_no_indices = Some(allow);
        self
    }

    pub fn allow_partial_search_results(mut self, allow: bool) -> Self {
        self.allow_partial_search_results = Some(allow);
        self
    }

    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    /// `AND` or `OR`, for `q`.
    pub fn default_operator(mut self, operator: impl Into<String>) -> Self {
        self.default_operator = Some(operator.into());
        self
    }

    /// Default field for `q`.
    pub fn df(mut self, field: impl Into<String>) -> Self {
        self.df = Some(field.into());
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

    /// Offset of the first hit.
    pub fn from(mut self, from: i64) -> Self {
        self.from = Some(from);
        self
    }

    pub fn ignore_unavailable(mut self, ignore: bool) -> Self {
        self.ignore_unavailable = Some(ignore);
        self
    }

    pub fn preference(mut self, preference: impl Into<String>) -> Self {
        self.preference = Some(preference.into());
        self
    }

    /// Lucene query string.
    pub fn q(mut self, query: impl Into<String>) -> Self {
        self.q = Some(query.into());
        self
    }

    pub fn request_cache(mut self, enabled: bool) -> Self {
        self.request_cache = Some(enabled);
        self
    }

    pub fn routing<I, S>(mut self, routing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routing = to_strings(routing);
        self
    }

    /// Keep the search context alive this long for scrolling.
    pub fn scroll(mut self, keep_alive: Duration) -> Self {
        self.scroll = Some(keep_alive);
        self
    }

    pub fn search_type(mut self, search_type: impl Into<String>) -> Self {
        self.search_type = Some(search_type.into());
        self
    }

    /// Number of hits to return.
    pub fn size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// `field:direction` pairs.
    pub fn sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = to_strings(sort);
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn source_excludes<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_excludes = to_strings(fields);
        self
    }

    pub fn source_includes<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_includes = to_strings(fields);
        self
    }

    pub fn terminate_after(mut self, count: i64) -> Self {
        self.terminate_after = Some(count);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `true`, `false` or an exact-count threshold.
    pub fn track_total_hits(mut self, track: impl Into<String>) -> Self {
        self.track_total_hits = Some(track.into());
        self
    }
}

common_params!(Search);

impl Endpoint for Search {
    const NAME: &'static str = "search";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        let mut request = ApiRequest::new(RestMethod::Post)
            .path_list("index", &self.index)
            .segment("_search");

        let query = &mut request.query;
        query.flag("allow_no_indices", self.allow_no_indices);
        query.flag(
            "allow_partial_search_results",
            self.allow_partial_search_results,
        );
        query.string("analyzer", self.analyzer.as_deref());
        query.string("default_operator", self.default_operator.as_deref());
        query.string("df", self.df.as_deref());
        query.list("expand_wildcards", &self.expand_wildcards);
        query.int("from", self.from);
        query.flag("ignore_unavailable", self.ignore_unavailable);
        query.string("preference", self.preference.as_deref());
        query.string("q", self.q.as_deref());
        query.flag("request_cache", self.request_cache);
        query.list("routing", &self.routing);
        query.duration("scroll", self.scroll);
        query.string("search_type", self.search_type.as_deref());
        query.int("size", self.size);
        query.list("sort", &self.sort);
        query.string("_source", self.source.as_deref());
        query.list("_source_excludes", &self.source_excludes);
        query.list("_source_includes", &self.source_includes);
        query.int("terminate_after", self.terminate_after);
        query.duration("timeout", self.timeout);
        query.string("track_total_hits", self.track_total_hits.as_deref());

        if let Some(body) = self.body {
            request = request.body(body)?;
        }
        self.common.apply(&mut request)?;
        Ok(request)
    }
}

/// `POST [/{index}]/_count` - number of documents matching a query.
#[derive(Debug, Clone, Default)]
pub struct Count {
    index: Vec<String>,
    body: Option<RequestBody>,
    analyzer: Option<String>,
    default_operator: Option<String>,
    df: Option<String>,
    expand_wildcards: Vec<String>,
    ignore_unavailable: Option<bool>,
    min_score: Option<f64>,
    preference: Option<String>,
    q: Option<String>,
    routing: Vec<String>,
    terminate_after: Option<i64>,
    common: CommonParams,
}

impl Count {
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

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn default_operator(mut self, operator: impl Into<String>) -> Self {
        self.default_operator = Some(operator.into());
        self
    }

    pub fn df(mut self, field: impl Into<String>) -> Self {
        self.df = Some(field.into());
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

    /// Only count documents scoring at least this much.
    pub fn min_score(mut self, score: f64) -> Self {
        self.min_score = Some(score);
        self
    }

    pub fn preference(mut self, preference: impl Into<String>) -> Self {
        self.preference = Some(preference.into());
        self
    }

    pub fn q(mut self, query: impl Into<String>) -> Self {
        self.q = Some(query.into());
        self
    }

    pub fn routing<I, S>(mut self, routing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routing = to_strings(routing);
        self
    }

    pub fn terminate_after(mut self, count: i64) -> Self {
        self.terminate_after = Some(count);
        self
    }
}

common_params!(Count);

impl Endpoint for Count {
    const NAME: &'static str = "count";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        let mut request = ApiRequest::new(RestMethod::Post)
            .path_list("index", &self.index)
            .segment("_count");

        let query = &mut request.query;
        query.string("analyzer", self.analyzer.as_deref());
        query.string("default_operator", self.default_operator.as_deref());
        query.string("df", self.df.as_deref());
        query.list("expand_wildcards", &self.expand_wildcards);
        query.flag("ignore_unavailable", self.ignore_unavailable);
        query.int("min_score", self.min_score);
        query.string("preference", self.preference.as_deref());
        query.string("q", self.q.as_deref());
        query.list("routing", &self.routing);
        query.int("terminate_after", self.terminate_after);

        if let Some(body) = self.body {
            request = request.body(body)?;
        }
        self.common.apply(&mut request)?;
        Ok(request)
    }
}

/// `POST [/{index}]/_bulk` - many index, create, update and delete
/// operations in one NDJSON request.
///
/// ## Examples
///
/// ```rust,ignore
/// use serde_json::json;
/// use sonar_lib::endpoints::Bulk;
///
/// let bulk = Bulk::new()
///     .index("books")
///     .operation(json!({"index": {"_id": "1"}}))
///     .operation(json!({"title": "Dune"}))
///     .operation(json!({"delete": {"_id": "2"}}));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Bulk {
    index: Option<String>,
    lines: Vec<serde_json::Value>,
    pipeline: Option<String>,
    refresh: Option<String>,
    require_alias: Option<bool>,
    routing: Option<String>,
    source: Option<String>,
    source_excludes: Vec<String>,
    source_includes: Vec<String>,
    timeout: Option<Duration>,
    wait_for_active_shards: Option<String>,
    common: CommonParams,
}

impl Bulk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default index for operations that do not name one.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into()).filter(|index| !index.is_empty());
        self
    }

    /// Appends one NDJSON line: an action or a document source.
    pub fn operation(mut self, line: serde_json::Value) -> Self {
        self.lines.push(line);
        self
    }

    /// Appends many NDJSON lines.
    pub fn operations(mut self, lines: impl IntoIterator<Item = serde_json::Value>) -> Self {
        self.lines.extend(lines);
        self
    }

    pub fn pipeline(mut self, pipeline: impl Into<String>) -> Self {
        self.pipeline = Some(pipeline.into());
        self
    }

    pub fn refresh(mut self, refresh: impl Into<String>) -> Self {
        self.refresh = Some(refresh.into());
        self
    }

    pub fn require_alias(mut self, require: bool) -> Self {
        self.require_alias = Some(require);
        self
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn source_excludes<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_excludes = to_strings(fields);
        self
    }

    pub fn source_includes<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_includes = to_strings(fields);
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

common_params!(Bulk);

impl Endpoint for Bulk {
    const NAME: &'static str = "bulk";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        if self.lines.is_empty() {
            return Err(ConfigError::missing_field("body").into());
        }

        let mut request = ApiRequest::new(RestMethod::Post);
        if let Some(index) = self.index {
            request = request.path_part("index", index);
        }
        request = request.segment("_bulk");

        let query = &mut request.query;
        query.string("pipeline", self.pipeline.as_deref());
        query.string("refresh", self.refresh.as_deref());
        query.flag("require_alias", self.require_alias);
        query.string("routing", self.routing.as_deref());
        query.string("_source", self.source.as_deref());
        query.list("_source_excludes", &self.source_excludes);
        query.list("_source_includes", &self.source_includes);
        query.duration("timeout", self.timeout);
        query.string("wait_for_active_shards", self.wait_for_active_shards.as_deref());

        let mut request = request.body(RequestBody::NdJson(self.lines))?;
        self.common.apply(&mut request)?;
        Ok(request)
    }
}
