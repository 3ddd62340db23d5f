use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::github::graphql::graphql_types::IssueNodesData;
use crate::github::graphql::issue::issue_nodes_query;
use crate::github::{Requester, ResponseEnvelope};
use crate::types::{IssueDetail, IssueNodesResult, PartialIssue};

/// Node ids per request against github.com. Larger batches time out.
pub const GITHUB_COM_BATCH_SIZE: usize = 20;
/// Node ids per request against GHE, whose rate limit counts requests rather than cost.
pub const GHE_BATCH_SIZE: usize = 34;
/// Delay between dispatching consecutive batches.
pub const BATCH_STAGGER: Duration = Duration::from_secs(1);

/// Refreshes issues and pull requests by GraphQL node id.
pub struct IssueNodeClient<R> {
    requester: R,
}

impl<R: Requester> IssueNodeClient<R> {
    pub fn new(requester: R) -> Self {
        Self { requester }
    }

    pub fn batch_size(&self) -> usize {
        if self.requester.is_github_com() {
            GITHUB_COM_BATCH_SIZE
        } else {
            GHE_BATCH_SIZE
        }
    }

    /// Fetches every requested node, batching ids and running the batches concurrently.
    ///
    /// Requests with an empty node id are ignored. Any failed batch fails the
    /// whole call with the first error in batch order.
    pub async fn fetch_issues_by_node_ids(
        &self,
        requests: &[PartialIssue],
    ) -> Result<IssueNodesResult> {
        let valid: Vec<&PartialIssue> = requests.iter().filter(|r| !r.node_id.is_empty()).collect();
        if valid.is_empty() {
            return Ok(IssueNodesResult::default());
        }

        let batch_size = self.batch_size();
        let staggered = valid.len() > batch_size;
        info!(
            "Fetching {} nodes in {} batches of up to {}",
            valid.len(),
            valid.len().div_ceil(batch_size),
            batch_size
        );

        let batches = valid.chunks(batch_size).enumerate().map(move |(index, batch)| async move {
            if staggered && index > 0 {
                tokio::time::sleep(BATCH_STAGGER * index as u32).await;
            }
            self.fetch_batch(batch)
                .await
                .with_context(|| format!("Failed to fetch node batch {}", index))
        });

        let mut result = IssueNodesResult::default();
        for batch_result in join_all(batches).await {
            let batch = batch_result?;
            result.issues.extend(batch.issues);
            result.not_found.extend(batch.not_found);
            result.partial_errors.extend(batch.partial_errors);
        }
        Ok(result)
    }

    async fn fetch_batch(&self, batch: &[&PartialIssue]) -> Result<IssueNodesResult> {
        let node_ids: Vec<&str> = batch.iter().map(|r| r.node_id.as_str()).collect();
        let query = issue_nodes_query(&node_ids, self.requester.ghe_version_context())?;

        let ResponseEnvelope {
            result,
            partial_errors,
            ..
        } = self
            .requester
            .execute::<IssueNodesData>("issue_nodes", &query)
            .await;
        let data = result?;

        let nodes: Vec<_> = data.nodes.into_iter().flatten().collect();
        let found: HashSet<&str> = nodes.iter().map(|n| n.node_id.as_str()).collect();
        let not_found: Vec<PartialIssue> = batch
            .iter()
            .filter(|r| !found.contains(r.node_id.as_str()))
            .map(|r| (*r).clone())
            .collect();
        if !not_found.is_empty() {
            let urls: Vec<&str> = not_found.iter().map(|r| r.html_url.as_str()).collect();
            error!(count = not_found.len(), urls = ?urls, "Issues not found by node id");
        }

        let mut issues = Vec::with_capacity(nodes.len());
        for node in nodes {
            let node_id = node.node_id.clone();
            match IssueDetail::try_from(node) {
                Ok(issue) => issues.push(issue),
                Err(e) => warn!("Skipping node {}: {}", node_id, e),
            }
        }
        debug!("Fetched {} of {} nodes in batch", issues.len(), batch.len());

        Ok(IssueNodesResult {
            issues,
            not_found,
            partial_errors,
        })
    }
}
