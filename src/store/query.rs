use crate::model::{ProcessId, WorkItem};
use ahash::AHashSet;

/// Selects the incomplete work items an actor may see.
///
/// An item matches when it is addressed to the actor directly, or its group or
/// permission is one of the actor's roles. The three strategies are OR-combined,
/// optionally narrowed to one process instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityQuery {
    pub actor_id: String,
    pub roles: AHashSet<String>,
    pub process_id: Option<ProcessId>,
}

impl VisibilityQuery {
    pub fn new(actor_id: &str, roles: AHashSet<String>) -> Self {
        Self {
            actor_id: actor_id.to_string(),
            roles,
            process_id: None,
        }
    }

    pub fn in_process(mut self, process_id: Option<ProcessId>) -> Self {
        self.process_id = process_id;
        self
    }

    pub fn matches(&self, work_item: &WorkItem) -> bool {
        if work_item.completed {
            return false;
        }
        if self
            .process_id
            .is_some_and(|process_id| process_id != work_item.process_id)
        {
            return false;
        }

        let has_role = |role: &Option<String>| {
            role.as_ref()
                .is_some_and(|role| self.roles.contains(role.as_str()))
        };
        work_item.assignee.as_deref() == Some(self.actor_id.as_str())
            || has_role(&work_item.group)
            || has_role(&work_item.permission)
    }
}
