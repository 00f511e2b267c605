#[cfg(test)]
mod error_tests {
    use gemprompt::{GemPromptError, Result};
    use serde_json::json;

    #[test]
    fn test_invalid_directive_error() {
        let err = GemPromptError::InvalidDirective("model foo does not support a reasoning budget".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid directive: model foo does not support a reasoning budget"
        );
    }

    #[test]
    fn test_provider_failure_error() {
        let err = GemPromptError::ProviderFailure("Failed to get response from Gemini: boom".to_string());
        assert_eq!(
            format!("{}", err),
            "Provider failure: Failed to get response from Gemini: boom"
        );
    }

    #[test]
    fn test_api_error() {
        let err = GemPromptError::ApiError("API connection failed".to_string());
        assert_eq!(format!("{}", err), "API error: API connection failed");
    }

    #[test]
    fn test_timeout_error() {
        assert_eq!(format!("{}", GemPromptError::Timeout), "Timeout error");
        assert_eq!(GemPromptError::Timeout, GemPromptError::Timeout);
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_value::<String>(json!(42)).unwrap_err();

        let err: GemPromptError = json_err.into();

        match err {
            GemPromptError::JsonError(_) => {}
            other => panic!("Expected JsonError, got {:?}", other),
        }
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            GemPromptError::ProviderFailure("x".into()),
            GemPromptError::ProviderFailure("x".into())
        );
        assert_ne!(
            GemPromptError::ProviderFailure("x".into()),
            GemPromptError::ApiError("x".into())
        );

        let a: GemPromptError = serde_json::from_str::<u8>("[]").unwrap_err().into();
        let b: GemPromptError = serde_json::from_str::<u8>("[]").unwrap_err().into();
        assert_ne!(a, b);
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert_eq!(ok_result, Ok(42));

        let err_result: Result<i32> = Err(GemPromptError::Timeout);
        assert!(err_result.is_err());
    }
}
