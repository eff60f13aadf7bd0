//! The unit of work flowing through the dispatch pool.

use core::fmt;

/// A unit of work carrying an identifier and an opaque payload.
///
/// Jobs are immutable once constructed and fire-and-forget: the pool does not
/// track their state beyond their physical location (queue vs. a worker's
/// hands), and no result is delivered back to the submitter.
///
/// Neither field is validated: duplicate or negative ids and empty payloads
/// are accepted. The id is purely caller-assigned diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Job {
    id: i64,
    payload: String,
}

impl Job {
    /// Creates a new job from a caller-assigned id and an opaque payload.
    pub fn new(id: i64, payload: impl Into<String>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    /// The caller-assigned identifier. Not guaranteed unique.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The opaque payload. The pool never interprets it.
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl fmt::Display for Job {
    /// Fixed-format rendering used only for diagnostics, never parsed back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Job{{ID: {}, Payload: {}}}", self.id, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_fixed_format() {
        let job = Job::new(123, "test-data");
        assert_eq!(job.to_string(), "Job{ID: 123, Payload: test-data}");
    }

    #[test]
    fn accepts_unvalidated_inputs() {
        let negative = Job::new(-7, "");
        assert_eq!(negative.id(), -7);
        assert_eq!(negative.payload(), "");

        // Duplicate ids across jobs are allowed; equality is structural.
        let a = Job::new(1, "same");
        let b = Job::new(1, "same");
        assert_eq!(a, b);
    }
}
