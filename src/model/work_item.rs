use super::{ProcessId, WorkItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a work item is addressed: directly to a user, or to everyone holding a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Assignment {
    Assignee(String),
    Group(String),
    Permission(String),
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assignment::Assignee(user) => write!(f, "assignee={}", user),
            Assignment::Group(group) => write!(f, "group={}", group),
            Assignment::Permission(permission) => write!(f, "permission={}", permission),
        }
    }
}

/// A unit of work bound to one occurrence of a task node within a process instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: WorkItemId,
    pub process_id: ProcessId,
    pub node_code: String,
    pub assignee: Option<String>,
    pub group: Option<String>,
    pub permission: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// The fields a store needs to create a work item. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkItem {
    pub process_id: ProcessId,
    pub node_code: String,
    pub assignment: Option<Assignment>,
    pub created_at: DateTime<Utc>,
}

impl NewWorkItem {
    pub fn new(process_id: ProcessId, node_code: &str, assignment: Option<Assignment>) -> Self {
        Self {
            process_id,
            node_code: node_code.to_string(),
            assignment,
            created_at: Utc::now(),
        }
    }

    pub fn into_work_item(self, id: WorkItemId) -> WorkItem {
        let (assignee, group, permission) = match self.assignment {
            Some(Assignment::Assignee(user)) => (Some(user), None, None),
            Some(Assignment::Group(group)) => (None, Some(group), None),
            Some(Assignment::Permission(permission)) => (None, None, Some(permission)),
            None => (None, None, None),
        };
        WorkItem {
            id,
            process_id: self.process_id,
            node_code: self.node_code,
            assignee,
            group,
            permission,
            completed: false,
            created_at: self.created_at,
            finished_at: None,
        }
    }
}

impl WorkItem {
    /// Records the completion. The completing actor becomes the assignee.
    pub fn complete(&mut self, actor_id: &str, at: DateTime<Utc>) {
        self.completed = true;
        self.assignee = Some(actor_id.to_string());
        self.finished_at = Some(at);
    }
}
