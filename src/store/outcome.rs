use tracing::warn;

use super::StoreError;

/// Result of a read that may have been served with some pieces missing.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<T> {
    /// Every read succeeded.
    Complete(T),
    /// Optional reads failed and were replaced with fallbacks.
    Partial { value: T, failures: Vec<StoreError> },
    /// A read the value cannot be built without failed.
    Failed(StoreError),
}

impl<T> ReadOutcome<T> {
    pub fn is_partial(&self) -> bool {
        matches!(self, ReadOutcome::Partial { .. })
    }

    /// The value and whether it was degraded, or the error that prevented it.
    pub fn into_result(self) -> Result<(T, bool), StoreError> {
        match self {
            ReadOutcome::Complete(value) => Ok((value, false)),
            ReadOutcome::Partial { value, .. } => Ok((value, true)),
            ReadOutcome::Failed(err) => Err(err),
        }
    }
}

/// Collects failures from optional reads while a value is being assembled.
#[derive(Debug, Default)]
pub struct PartialRead {
    failures: Vec<StoreError>,
}

impl PartialRead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the read value, or logs the failure and substitutes `fallback`.
    pub fn or_fallback<T>(
        &mut self,
        what: &'static str,
        result: Result<T, StoreError>,
        fallback: impl FnOnce() -> T,
    ) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                warn!(read = what, error = %err, "Serving degraded data");
                self.failures.push(err);
                fallback()
            }
        }
    }

    pub fn finish<T>(self, value: T) -> ReadOutcome<T> {
        if self.failures.is_empty() {
            ReadOutcome::Complete(value)
        } else {
            ReadOutcome::Partial {
                value,
                failures: self.failures,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_reads_succeeding_is_complete() {
        let mut read = PartialRead::new();
        let players = read.or_fallback("players", Ok(4), || 0);

        let outcome = read.finish(players);
        assert_eq!(outcome, ReadOutcome::Complete(4));
        assert_eq!(outcome.into_result(), Ok((4, false)));
    }

    #[test]
    fn test_failed_optional_read_uses_fallback() {
        let mut read = PartialRead::new();
        let players = read.or_fallback(
            "players",
            Err(StoreError::Unavailable("timeout".into())),
            || 7,
        );

        let outcome = read.finish(players);
        assert!(outcome.is_partial());
        assert_eq!(outcome.into_result(), Ok((7, true)));
    }

    #[test]
    fn test_failed_outcome_surfaces_error() {
        let outcome: ReadOutcome<u64> = ReadOutcome::Failed(StoreError::Unavailable("down".into()));
        assert!(!outcome.is_partial());
        assert!(outcome.into_result().is_err());
    }
}
