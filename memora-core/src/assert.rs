use crate::{MemoError, MemoResult};

/// Checks that a call received at least `required` arguments.
///
/// # Examples
///
/// ```
/// use memora_core::assert_required_args;
///
/// assert!(assert_required_args(2, 2).is_ok());
///
/// let err = assert_required_args(1, 0).unwrap_err();
/// assert_eq!(err.to_string(), "1 argument required, but none received");
/// ```
pub fn assert_required_args(required: usize, received: usize) -> MemoResult<()> {
    if received < required {
        return Err(MemoError::ArgumentCount { required, received });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enough_arguments() {
        assert!(assert_required_args(0, 0).is_ok());
        assert!(assert_required_args(2, 5).is_ok());
    }

    #[test]
    fn test_missing_arguments() {
        match assert_required_args(2, 1) {
            Err(MemoError::ArgumentCount { required, received }) => {
                assert_eq!(required, 2);
                assert_eq!(received, 1);
            }
            other => panic!("expected ArgumentCount, got {:?}", other),
        }
    }
}
