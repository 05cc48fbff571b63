//! Result type alias for Chainsink

use super::errors::SinkError;

/// Result type alias for Chainsink operations
///
/// # Examples
///
/// ```
/// use chainsink::domain::result::Result;
/// use chainsink::domain::errors::SinkError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SinkError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(SinkError::PoolClosed);
        assert!(result.is_err());
    }
}
