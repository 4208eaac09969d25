use super::ConditionValue;
use crate::model::ProcessId;
use ahash::AHashMap;
use std::fmt;
use std::sync::Arc;

/// Defines the contract for a named gateway predicate.
///
/// The engine treats conditions as opaque: it hands over the process id and
/// matches whatever comes back against the branch tags of the gateway.
pub trait Condition: Send + Sync {
    fn evaluate(&self, process_id: ProcessId) -> ConditionValue;
}

/// Adapts a plain closure into a `Condition`.
pub struct FnCondition<F>(pub F);

impl<F> Condition for FnCondition<F>
where
    F: Fn(ProcessId) -> ConditionValue + Send + Sync,
{
    fn evaluate(&self, process_id: ProcessId) -> ConditionValue {
        (self.0)(process_id)
    }
}

/// A condition that always yields the same value.
pub struct ConstantCondition(pub ConditionValue);

impl Condition for ConstantCondition {
    fn evaluate(&self, _process_id: ProcessId) -> ConditionValue {
        self.0.clone()
    }
}

/// A condition resolved by name at graph construction time.
#[derive(Clone)]
pub struct ConditionRef {
    pub name: String,
    predicate: Arc<dyn Condition>,
}

impl ConditionRef {
    pub fn evaluate(&self, process_id: ProcessId) -> ConditionValue {
        self.predicate.evaluate(process_id)
    }
}

impl fmt::Debug for ConditionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionRef")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Named conditions available to graph construction.
#[derive(Clone, Default)]
pub struct ConditionRegistry {
    conditions: AHashMap<String, Arc<dyn Condition>>,
}

impl ConditionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, condition: impl Condition + 'static) {
        self.conditions
            .insert(name.to_string(), Arc::new(condition));
    }

    pub fn register_fn<F>(&mut self, name: &str, f: F)
    where
        F: Fn(ProcessId) -> ConditionValue + Send + Sync + 'static,
    {
        self.register(name, FnCondition(f));
    }

    pub fn merge(&mut self, other: &ConditionRegistry) {
        self.conditions.extend(
            other
                .conditions
                .iter()
                .map(|(name, predicate)| (name.clone(), Arc::clone(predicate))),
        );
    }

    pub fn resolve(&self, name: &str) -> Option<ConditionRef> {
        self.conditions.get(name).map(|predicate| ConditionRef {
            name: name.to_string(),
            predicate: Arc::clone(predicate),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.conditions.contains_key(name)
    }
}

impl fmt::Debug for ConditionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.conditions.keys()).finish()
    }
}
