//! Cluster-level endpoints: health and voting configuration exclusions.

use std::time::Duration;

use super::{Endpoint, common_params, to_strings};
use crate::error::ApiError;
use crate::method::RestMethod;
use crate::request::{ApiRequest, CommonParams};

/// `GET /_cluster/health[/{index}]`.
#[derive(Debug, Clone, Default)]
pub struct ClusterHealth {
    index: Vec<String>,
    expand_wildcards: Vec<String>,
    level: Option<String>,
    local: Option<bool>,
    master_timeout: Option<Duration>,
    timeout: Option<Duration>,
    wait_for_active_shards: Option<String>,
    wait_for_events: Option<String>,
    wait_for_no_initializing_shards: Option<bool>,
    wait_for_no_relocating_shards: Option<bool>,
    wait_for_nodes: Option<String>,
    wait_for_status: Option<String>,
    common: CommonParams,
}

impl ClusterHealth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the health report to these indices.
    pub fn index<I, S>(mut self, index: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index = to_strings(index);
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

    /// Detail level: `cluster`, `indices` or `shards`.
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = Some(local);
        self
    }

    pub fn master_timeout(mut self, timeout: Duration) -> Self {
        self.master_timeout = Some(timeout);
        self
    }

    /// How long the server waits for the `wait_for_*` conditions.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Number of active shards to wait for, or `all`.
    pub fn wait_for_active_shards(mut self, shards: impl Into<String>) -> Self {
        self.wait_for_active_shards = Some(shards.into());
        self
    }

    /// Wait until all queued events of this priority are processed.
    pub fn wait_for_events(mut self, priority: impl Into<String>) -> Self {
        self.wait_for_events = Some(priority.into());
        self
    }

    pub fn wait_for_no_initializing_shards(mut self, wait: bool) -> Self {
        self.wait_for_no_initializing_shards = Some(wait);
        self
    }

    pub fn wait_for_no_relocating_shards(mut self, wait: bool) -> Self {
        self.wait_for_no_relocating_shards = Some(wait);
        self
    }

    /// Node count expression, e.g. `>=3`.
    pub fn wait_for_nodes(mut self, nodes: impl Into<String>) -> Self {
        self.wait_for_nodes = Some(nodes.into());
        self
    }

    /// Wait until the cluster reaches this status.
    pub fn wait_for_status(mut self, status: impl Into<String>) -> Self {
        self.wait_for_status = Some(status.into());
        self
    }
}

common_params!(ClusterHealth);

impl Endpoint for ClusterHealth {
    const NAME: &'static str = "cluster.health";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        let mut request = ApiRequest::new(RestMethod::Get)
            .segment("_cluster")
            .segment("health")
            .path_list("index", &self.index);

        let query = &mut request.query;
        query.list("expand_wildcards", &self.expand_wildcards);
        query.string("level", self.level.as_deref());
        query.flag("local", self.local);
        query.duration("master_timeout", self.master_timeout);
        query.duration("timeout", self.timeout);
        query.string("wait_for_active_shards", self.wait_for_active_shards.as_deref());
        query.string("wait_for_events", self.wait_for_events.as_deref());
        query.flag(
            "wait_for_no_initializing_shards",
            self.wait_for_no_initializing_shards,
        );
        query.flag(
            "wait_for_no_relocating_shards",
            self.wait_for_no_relocating_shards,
        );
        query.string("wait_for_nodes", self.wait_for_nodes.as_deref());
        query.string("wait_for_status", self.wait_for_status.as_deref());

        self.common.apply(&mut request)?;
        Ok(request)
    }
}

/// `POST /_cluster/voting_config_exclusions`.
///
/// Excludes master-eligible nodes from the voting configuration, typically
/// before taking them out of the cluster. Nodes are named either by ID or by
/// name.
#[derive(Debug, Clone, Default)]
pub struct ClusterPostVotingConfigExclusions {
    node_ids: Vec<String>,
    node_names: Vec<String>,
    timeout: Option<Duration>,
    master_timeout: Option<Duration>,
    common: CommonParams,
}

impl ClusterPostVotingConfigExclusions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node_ids = to_strings(ids);
        self
    }

    pub fn node_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node_names = to_strings(names);
        self
    }

    /// How long to wait for the exclusions to take effect.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn master_timeout(mut self, timeout: Duration) -> Self {
        self.master_timeout = Some(timeout);
        self
    }
}

common_params!(ClusterPostVotingConfigExclusions);

impl Endpoint for ClusterPostVotingConfigExclusions {
    const NAME: &'static str = "cluster.post_voting_config_exclusions";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        let mut request = ApiRequest::new(RestMethod::Post)
            .segment("_cluster")
            .segment("voting_config_exclusions");

        let query = &mut request.query;
        query.list("node_ids", &self.node_ids);
        query.list("node_names", &self.node_names);
        query.duration("timeout", self.timeout);
        query.duration("master_timeout", self.master_timeout);

        self.common.apply(&mut request)?;
        Ok(request)
    }
}

/// `DELETE /_cluster/voting_config_exclusions`.
#[derive(Debug, Clone, Default)]
pub struct ClusterDeleteVotingConfigExclusions {
    wait_for_removal: Option<bool>,
    master_timeout: Option<Duration>,
    common: CommonParams,
}

impl ClusterDeleteVotingConfigExclusions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the excluded nodes to leave the cluster before clearing.
    pub fn wait_for_removal(mut self, wait: bool) -> Self {
        self.wait_for_removal = Some(wait);
        self
    }

    pub fn master_timeout(mut self, timeout: Duration) -> Self {
        self.master_timeout = Some(timeout);
        self
    }
}

common_params!(ClusterDeleteVotingConfigExclusions);

impl Endpoint for ClusterDeleteVotingConfigExclusions {
    const NAME: &'static str = "cluster.delete_voting_config_exclusions";

    fn into_request(self) -> Result<ApiRequest, ApiError> {
        let mut request = ApiRequest::new(RestMethod::Delete)
            .segment("_cluster")
            .segment("voting_config_exclusions");

        request.query.flag("wait_for_removal", self.wait_for_removal);
        request.query.duration("master_timeout", self.master_timeout);

        self.common.apply(&mut request)?;
        Ok(request)
    }
}
