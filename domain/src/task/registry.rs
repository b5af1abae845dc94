//! Task registry keyed by task name

use super::{Gsm8kTask, ReasoningTask};
use crate::core::error::ConfigError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Maps task names to their implementations
///
/// # Example
///
/// ```
/// use tq_domain::task::TaskRegistry;
///
/// let registry = TaskRegistry::with_builtin();
/// assert!(registry.get("gsm8k").is_ok());
/// assert!(registry.get("crosswords").is_err());
/// ```
#[derive(Clone, Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, Arc<dyn ReasoningTask>>,
}

impl TaskRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in task
    pub fn with_builtin() -> Self {
        Self::new().register(Arc::new(Gsm8kTask::new()))
    }

    /// Add (or replace) a task under its own name
    pub fn register(mut self, task: Arc<dyn ReasoningTask>) -> Self {
        self.tasks.insert(task.name().to_string(), task);
        self
    }

    /// Look up a task; unknown names are a configuration error
    pub fn get(&self, name: &str) -> Result<Arc<dyn ReasoningTask>, ConfigError> {
        self.tasks
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownTask(name.to_string()))
    }

    /// Registered task names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("tasks", &self.tasks.keys().collect::<Vec<_>>())
            .finish()
    }
}
