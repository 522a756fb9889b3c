//! Unit tests for JsError and ErrorKind

use core_types::{ErrorKind, JsError, Value};

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn test_error_kind_clone() {
        let kind1 = ErrorKind::TypeError;
        let kind2 = kind1.clone();
        assert!(matches!(kind2, ErrorKind::TypeError));
    }

    #[test]
    fn test_error_kind_equality() {
        assert_eq!(ErrorKind::RangeError, ErrorKind::RangeError);
        assert_ne!(ErrorKind::TypeError, ErrorKind::Thrown);
    }
}

#[cfg(test)]
mod js_error_tests {
    use super::*;

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(JsError::type_error("a").kind, ErrorKind::TypeError);
        assert_eq!(JsError::range_error("a").kind, ErrorKind::RangeError);
        assert_eq!(JsError::internal("a").kind, ErrorKind::InternalError);
        assert_eq!(JsError::new(ErrorKind::Error, "a").kind, ErrorKind::Error);
    }

    #[test]
    fn test_display_format() {
        let error = JsError::type_error("undefined is not a function");
        assert_eq!(error.to_string(), "TypeError: undefined is not a function");
    }

    #[test]
    fn test_implements_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(JsError::internal("oops"));
        assert_eq!(error.to_string(), "InternalError: oops");
    }

    #[test]
    fn test_throw_string_keeps_value() {
        let error = JsError::throw(Value::from("x"));
        assert_eq!(error.kind, ErrorKind::Thrown);
        assert_eq!(error.message, "x");
        assert_eq!(error.into_value(), Value::from("x"));
    }

    #[test]
    fn test_error_value_survives_rethrow() {
        let reason = Value::from(JsError::type_error("first"));
        let rethrown = JsError::from_value(reason.clone());
        let again = JsError::from_value(rethrown.into_value());
        assert_eq!(again.kind, ErrorKind::TypeError);
        assert_eq!(again.into_value(), reason);
    }

    #[test]
    fn test_clone_is_equal() {
        let error = JsError::range_error("too big");
        assert_eq!(error.clone(), error);
    }
}
