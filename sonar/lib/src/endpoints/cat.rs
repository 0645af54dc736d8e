//! Compact, column-oriented `_cat` endpoints.

use std::time::Duration;

use super::{Endpoint, common_params, to_strings};
use crate::error::ApiError;
use crate::method::RestMethod;
use crate::request::{ApiRequest, CommonParams};

/// `GET /_cat/nodeattrs` - custom node attributes.
#[derive(Debug, Clone, Default)]
pub struct CatNodeattrs {
    format: Option<String>,
    h: Vec<String>,
    help: Option<bool>,
    local: Option<bool>,
    master_timeout: Option<Duration>,
    s: Vec<String>,
    v: Option<bool>,
    common: CommonParams,
}

impl CatNodeattrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response format: `text`, `json`, `yaml`, ...
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Column names to display.
    pub fn h<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.h = to_strings(columns);
        self
    }

    /// Return help information instead of data.
    pub fn help(mut self, help: bool) -> Self {
        self.help = Some(help);
        self
    }

    /// Read from the local node only.
    pub fn local(mut self, local: bool) -> Self {
        self.local = Some(local);
        self
    }

    /// Timeout for connecting to the master node.
    pub fn master_timeout(mut self, timeout: Duration) -> Self {
        self.master_timeout = Some(timeout);
        self
    }

    /// Columns to sort by.
    pub fn s<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.s = to_strings(columns);
        self
    }

    /// Include column headings.
    pub fn v(mut self, verbose: bool) -> Self {
        self.v = Some(verbose);
        self
    }
}

common_params!(CatNodeattrs);

impl Endpoint for CatNodeattrs {
    const NAME: &'static str = "cat.nodeattrs";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        let mut request = ApiRequest::new(RestMethod::Get)
            .segment("_cat")
            .segment("nodeattrs");

        let query = &mut request.query;
        query.string("format", self.format.as_deref());
        query.list("h", &self.h);
        query.flag("help", self.help);
        query.flag("local", self.local);
        query.duration("master_timeout", self.master_timeout);
        query.list("s", &self.s);
        query.flag("v", self.v);

        self.common.apply(&mut request)?;
        Ok(request)
    }
}

/// `GET /_cat/indices[/{index}]` - one row per index.
#[derive(Debug, Clone, Default)]
pub struct CatIndices {
    index: Vec<String>,
    bytes: Option<String>,
    expand_wildcards: Vec<String>,
    format: Option<String>,
    h: Vec<String>,
    health: Option<String>,
    help: Option<bool>,
    include_unloaded_segments: Option<bool>,
    master_timeout: Option<Duration>,
    pri: Option<bool>,
    s: Vec<String>,
    time: Option<String>,
    v: Option<bool>,
    common: CommonParams,
}

impl CatIndices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the output to these indices.
    pub fn index<I, S>(mut self, index: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index = to_strings(index);
        self
    }

    /// Unit used to display byte values, e.g. `kb`.
    pub fn bytes(mut self, unit: impl Into<String>) -> Self {
        self.bytes = Some(unit.into());
        self
    }

    /// Which index states wildcard expressions expand to.
    pub fn expand_wildcards<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expand_wildcards = to_strings(states);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn h<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.h = to_strings(columns);
        self
    }

    /// Only show indices with this health: `green`, `yellow` or `red`.
    pub fn health(mut self, health: impl Into<String>) -> Self {
        self.health = Some(health.into());
        self
    }

    pub fn help(mut self, help: bool) -> Self {
        self.help = Some(help);
        self
    }

    pub fn include_unloaded_segments(mut self, include: bool) -> Self {
        self.include_unloaded_segments = Some(include);
        self
    }

    pub fn master_timeout(mut self, timeout: Duration) -> Self {
        self.master_timeout = Some(timeout);
        self
    }

    /// Show primary shard stats only.
    pub fn pri(mut self, pri: bool) -> Self {
        self.pri = Some(pri);
        self
    }

    pub fn s<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.s = to_strings(columns);
        self
    }

    /// Unit used to display time values, e.g. `ms`.
    pub fn time(mut self, unit: impl Into<String>) -> Self {
        self.time = Some(unit.into());
        self
    }

    pub fn v(mut self, verbose: bool) -> Self {
        self.v = Some(verbose);
        self
    }
}

common_params!(CatIndices);

impl Endpoint for CatIndices {
    const NAME: &'static str = "cat.indices";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        let mut request = ApiRequest::new(RestMethod::Get)
            .segment("_cat")
            .segment("indices")
            .path_list("index", &self.index);

        let query = &mut request.query;
        query.string("bytes", self.bytes.as_deref());
        query.list("expand_wildcards", &self.expand_wildcards);
        query.string("format", self.format.as_deref());
        query.list("h", &self.h);
        query.string("health", self.health.as_deref());
        query.flag("help", self.help);
        query.flag("include_unloaded_segments", self.include_unloaded_segments);
        query.duration("master_timeout", self.master_timeout);
        query.flag("pri", self.pri);
        query.list("s", &self.s);
        query.string("time", self.time.as_deref());
        query.flag("v", self.v);

        self.common.apply(&mut request)?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodeattrs_defaults() {
        let request = CatNodeattrs::new().into_request().unwrap();
        assert_eq!(request.method, RestMethod::Get);
        assert_eq!(request.path_string(), "/_cat/nodeattrs");
        assert!(request.query.is_empty());
        assert!(request.path_parts.is_empty());
    }

    #[test]
    fn test_nodeattrs_all_options() {
        let request = CatNodeattrs::new()
            .format("json")
            .h(["node", "attr", "value"])
            .help(false)
            .local(true)
            .master_timeout(Duration::from_secs(10))
            .s(["node:desc"])
            .v(true)
            .into_request()
            .unwrap();

        let pairs: Vec<_> = request.query.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("format", "json"),
                ("h", "node,attr,value"),
                ("help", "false"),
                ("local", "true"),
                ("master_timeout", "10000ms"),
                ("s", "node:desc"),
                ("v", "true"),
            ]
        );
    }

    #[test]
    fn test_indices_with_index_list() {
        let request = CatIndices::new()
            .index(["logs-*", "metrics"])
            .health("yellow")
            .pri(true)
            .into_request()
            .unwrap();
        assert_eq!(request.path_string(), "/_cat/indices/logs-*,metrics");
        assert_eq!(request.path_parts, vec![("index", "logs-*,metrics".to_string())]);
        assert_eq!(request.query.get("health"), Some("yellow"));
        assert_eq!(request.query.get("pri"), Some("true"));
        assert!(!request.query.contains("bytes"));
    }

    #[test]
    fn test_indices_ignores_empty_index_names() {
        let request = CatIndices::new().index([""]).into_request().unwrap();
        assert_eq!(request.path_string(), "/_cat/indices");
        assert!(request.path_parts.is_empty());
    }

    #[test]
    fn test_indices_without_index() {
        let request = CatIndices::new().into_request().unwrap();
        assert_eq!(request.path_string(), "/_cat/indices");
    }
}
