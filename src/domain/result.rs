//! Result type alias for the exporter

use super::errors::BdtError;

/// Result type alias for exporter operations
///
/// # Examples
///
/// ```
/// use bdt_export::domain::result::Result;
/// use bdt_export::domain::errors::BdtError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(BdtError::InvalidChart("patient.id is missing".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, BdtError>;

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
}
