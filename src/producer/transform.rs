//! Reshape the GraphQL response into dashboard issue buckets.

use std::collections::BTreeMap;

use super::api_types::{ApiIssueNode, ApiProjectItem, ApiTitled, ApiUserData};
use crate::feed::Issue;

/// Bucket for project items without a status value
pub const NO_STATUS: &str = "No Status";

/// Keep issues that sit on `project_filter` with a sprint assigned, grouped by
/// status. Order within a bucket follows the response.
pub fn transform(data: ApiUserData, project_filter: &str) -> BTreeMap<String, Vec<Issue>> {
  let mut grouped: BTreeMap<String, Vec<Issue>> = BTreeMap::new();

  let nodes = data.user.map(|u| u.issues.nodes).unwrap_or_default();

  for node in nodes {
    if let Some(issue) = to_issue(node, project_filter) {
      let bucket = if issue.status.is_empty() {
        NO_STATUS.to_string()
      } else {
        issue.status.clone()
      };
      grouped.entry(bucket).or_default().push(issue);
    }
  }

  grouped
}

fn to_issue(node: ApiIssueNode, project_filter: &str) -> Option<Issue> {
  let ApiIssueNode {
    title,
    repository,
    projects,
  } = node;

  let item = projects
    .nodes
    .into_iter()
    .find(|item| matches_project(item, project_filter))?;

  Some(Issue {
    title,
    repository: repository.map(|r| r.name_with_owner).unwrap_or_default(),
    sprint: titled(item.sprint),
    status: item.status.and_then(|s| s.value).unwrap_or_default(),
    hours: item.hours.and_then(|h| h.number),
    project: titled(item.project),
    activity: item.activity.and_then(|a| a.value),
  })
}

fn matches_project(item: &ApiProjectItem, project_filter: &str) -> bool {
  let project = item.project.as_ref().and_then(|p| p.title.as_deref());
  let sprint = item.sprint.as_ref().and_then(|s| s.title.as_deref());
  project == Some(project_filter) && sprint.is_some()
}

fn titled(value: Option<ApiTitled>) -> Option<String> {
  value.and_then(|v| v.title)
}
