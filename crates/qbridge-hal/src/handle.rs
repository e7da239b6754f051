//! Result handles and circuit status.
//!
//! Circuits run synchronously, so a handle only exists once its result is
//! stored and its status is always `Completed`. A handle that was never
//! issued, or whose result was popped, is reported as `HandleNotFound`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier correlating a submitted circuit with its result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultHandle(pub String);

impl ResultHandle {
    /// A fresh random (UUID v4) handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The handle as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ResultHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResultHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ResultHandle {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ResultHandle {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// State of a submitted circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    /// Finished; the result can be fetched.
    Completed,
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusKind::Completed => f.write_str("Completed"),
        }
    }
}

/// Status of a submitted circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitStatus {
    /// Current state.
    pub status: StatusKind,
    /// Human-readable detail.
    pub message: String,
    /// When the result was stored.
    pub completed_at: DateTime<Utc>,
}

impl CircuitStatus {
    /// A completed circuit, timestamped now.
    pub fn completed() -> Self {
        Self::completed_at(Utc::now())
    }

    /// A circuit that completed at `time`.
    pub fn completed_at(time: DateTime<Utc>) -> Self {
        Self {
            status: StatusKind::Completed,
            message: "Circuit has completed.".into(),
            completed_at: time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique() {
        let a = ResultHandle::new();
        let b = ResultHandle::new();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_completed_status() {
        let before = Utc::now();
        let status = CircuitStatus::completed();
        assert_eq!(status.status, StatusKind::Completed);
        assert!(status.completed_at >= before);
        assert_eq!(status.status.to_string(), "Completed");
    }

    #[test]
    fn test_status_serializes_kind_by_name() {
        let time = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z").unwrap().with_timezone(&Utc);
        let status = CircuitStatus::completed_at(time);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "Completed");
        assert_eq!(serde_json::from_value::<CircuitStatus>(json).unwrap(), status);
    }
}
