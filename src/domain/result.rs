//! Result type alias for Caretrail

use super::errors::CareTrailError;

/// Result type alias for Caretrail operations
///
/// # Examples
///
/// ```
/// use caretrail::domain::result::Result;
/// use caretrail::domain::errors::CareTrailError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CareTrailError::InvalidArgument("age must be a number".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CareTrailError>;
