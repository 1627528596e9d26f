//! Method channel messages.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named operation with its argument bag, as received from the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodCall {
    /// Operation name.
    pub method: String,
    /// Named arguments.
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl MethodCall {
    /// Create a call without arguments.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Map::new(),
        }
    }

    /// Add an argument.
    #[must_use]
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Optional argument `key`.
    ///
    /// Absent and `null` arguments yield `None`; so does a value of the wrong
    /// type, which is logged.
    #[must_use]
    pub fn argument<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.arguments.get(key).filter(|value| !value.is_null())?;
        match T::deserialize(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("{}: ignoring argument `{key}`: {e}", self.method);
                None
            }
        }
    }

    /// Required argument `key`.
    ///
    /// # Panics
    /// Panics if the argument is absent, `null` or of the wrong type. Hosts
    /// always send required arguments, so a missing one is a bug in the caller.
    #[must_use]
    pub fn required<T: DeserializeOwned>(&self, key: &str) -> T {
        let Some(value) = self.arguments.get(key).filter(|value| !value.is_null()) else {
            panic!("{}: missing required argument `{key}`", self.method);
        };
        T::deserialize(value).unwrap_or_else(|e| {
            panic!("{}: malformed required argument `{key}`: {e}", self.method)
        })
    }
}

/// The reply to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResult {
    /// The operation succeeded.
    Success {
        /// Result payload.
        value: Value,
    },
    /// The operation failed with a coded, recoverable error.
    Error {
        /// Machine-readable error code.
        code: String,
        /// Human-readable label.
        message: String,
        /// Extra context, if any.
        details: Option<Value>,
    },
    /// No operation has this name.
    NotImplemented,
}

impl MethodResult {
    /// A successful reply carrying `value`.
    #[must_use]
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success {
            value: value.into(),
        }
    }

    /// A coded failure without details.
    #[must_use]
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Whether this is a [`MethodResult::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The success payload, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Success { value } => Some(value),
            _ => None,
        }
    }

    /// The error code, if this is a failure.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Error { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_arguments() {
        let call = MethodCall::new("vibrate")
            .arg("vibration_duration", 120)
            .arg("nothing", Value::Null)
            .arg("text", "abc");

        assert_eq!(call.argument::<u64>("vibration_duration"), Some(120));
        assert_eq!(call.argument::<u64>("missing"), None);
        assert_eq!(call.argument::<u64>("nothing"), None);
        assert_eq!(call.argument::<u64>("text"), None);
    }

    #[test]
    fn integers_read_as_doubles() {
        let call = MethodCall::new("volumeSetLevel").arg("volume_value", 1);
        assert_eq!(call.required::<f64>("volume_value"), 1.0);
    }

    #[test]
    #[should_panic(expected = "missing required argument `show_volume_ui`")]
    fn missing_required_argument_panics() {
        let _: i32 = MethodCall::new("volumeSetMuteLevel").required("show_volume_ui");
    }

    #[test]
    #[should_panic(expected = "malformed required argument `vibration_pattern`")]
    fn malformed_required_argument_panics() {
        let _: Vec<u64> = MethodCall::new("vibratePattern")
            .arg("vibration_pattern", "fast")
            .required("vibration_pattern");
    }

    #[test]
    fn calls_parse_from_json() {
        let call: MethodCall = serde_json::from_value(json!({
            "method": "volumeGetCurrentLevel",
            "arguments": { "stream_type": 3 }
        }))
        .unwrap();
        assert_eq!(call.argument::<i32>("stream_type"), Some(3));

        let bare: MethodCall = serde_json::from_value(json!({ "method": "vibrationCancel" })).unwrap();
        assert!(bare.arguments.is_empty());
    }

    #[test]
    fn results_serialize_with_status() {
        assert_eq!(
            serde_json::to_value(MethodResult::error("801", "Bad Stream Type")).unwrap(),
            json!({ "status": "error", "code": "801", "message": "Bad Stream Type", "details": null })
        );
        assert_eq!(
            serde_json::to_value(MethodResult::success(0.5)).unwrap(),
            json!({ "status": "success", "value": 0.5 })
        );
        assert_eq!(
            serde_json::to_value(MethodResult::NotImplemented).unwrap(),
            json!({ "status": "not_implemented" })
        );
    }
}
