//! 业务断言
//!
//! 条件不成立时直接构造对应的业务错误，配合 `?` 使用。

use crate::errors::{Result, WorkflowError};

/// 条件为假时返回 `Validation` 错误
pub fn assert_valid(cond: bool, msg: impl Into<String>) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(WorkflowError::validation(msg))
    }
}

/// 值不存在时返回 `NotFound` 错误
pub fn assert_found<T>(value: Option<T>, msg: impl Into<String>) -> Result<T> {
    value.ok_or_else(|| WorkflowError::not_found(msg))
}

/// 条件为假时返回 `Authorization` 错误
pub fn assert_authorized(cond: bool, msg: impl Into<String>) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(WorkflowError::authorization(msg))
    }
}

/// 条件为假时返回 `InvalidState` 错误
pub fn assert_state(cond: bool, msg: impl Into<String>) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(WorkflowError::invalid_state(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_valid() {
        assert!(assert_valid(true, "unused").is_ok());
        assert_eq!(
            assert_valid(false, "content must not be empty"),
            Err(WorkflowError::validation("content must not be empty"))
        );
    }

    #[test]
    fn test_assert_found() {
        assert_eq!(assert_found(Some(7), "missing"), Ok(7));
        assert_eq!(
            assert_found::<i64>(None, "No assignment with this id was found"),
            Err(WorkflowError::not_found("No assignment with this id was found"))
        );
    }

    #[test]
    fn test_assert_authorized_and_state() {
        assert_eq!(
            assert_authorized(false, "nope").unwrap_err().code(),
            "E013"
        );
        assert_eq!(assert_state(false, "nope").unwrap_err().code(), "E014");
    }
}
