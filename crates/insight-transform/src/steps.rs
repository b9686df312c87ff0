//! Ordered record of the transformations applied to a table.

use std::fmt;

/// Append-only log of step identifiers, in application order.
///
/// Used for auditability only; no stage branches on its contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepLog {
    steps: Vec<String>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: impl Into<String>) {
        self.steps.push(step.into());
    }

    /// Record `name:<a,b,...>` when `columns` is non-empty.
    pub fn push_columns(&mut self, name: &str, columns: &[String]) {
        if !columns.is_empty() {
            self.steps.push(format!("{name}:{}", columns.join(",")));
        }
    }

    pub fn extend(&mut self, other: StepLog) {
        self.steps.extend(other.steps);
    }

    pub fn contains(&self, step: &str) -> bool {
        self.steps.iter().any(|existing| existing == step)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.steps
    }
}

impl fmt::Display for StepLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.steps.join(" -> "))
    }
}
