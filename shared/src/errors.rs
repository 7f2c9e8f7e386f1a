//! Shared error types for catalog and identity validation

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Invalid {kind} value: {value:?}")]
    InvalidValue { kind: &'static str, value: String },

    #[error("Invalid distribution: {value:?}")]
    InvalidDistribution { value: String },
}

pub type SharedResult<T> = Result<T, SharedError>;

impl SharedError {
    pub fn invalid(kind: &'static str, value: impl Into<String>) -> Self {
        SharedError::InvalidValue {
            kind,
            value: value.into(),
        }
    }
}

/// A single offending cell found while validating a catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogIssue {
    pub pool: String,
    /// 1-based row number inside the pool
    pub row: usize,
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} row {} field '{}' = {:?}: {}",
            self.pool, self.row, self.field, self.value, self.reason
        )
    }
}

/// Every issue collected from one catalog load
#[derive(Error, Debug, Clone, Default, PartialEq)]
#[error("catalog has {} invalid cell(s): {}", .issues.len(), summarize(.issues))]
pub struct CatalogErrors {
    pub issues: Vec<CatalogIssue>,
}

impl CatalogErrors {
    pub fn push(&mut self, issue: CatalogIssue) {
        self.issues.push(issue);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Ok when nothing was collected, otherwise the whole list
    pub fn into_result(self) -> Result<(), CatalogErrors> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn summarize(issues: &[CatalogIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
