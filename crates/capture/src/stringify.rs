//! Console argument formatting.

use common::TraceResult;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A value passed to a console reporting call.
#[derive(Clone, Debug)]
pub enum ConsoleArg {
    /// String argument, used verbatim.
    Text(String),
    /// Number, boolean, undefined or symbol, already in its string form.
    Primitive(String),
    /// An error value.
    Error(ErrorValue),
    /// Any other object.
    Object(Arc<dyn Inspect>),
}

impl ConsoleArg {
    pub fn object(value: impl Inspect + 'static) -> Self {
        ConsoleArg::Object(Arc::new(value))
    }
}

impl From<&str> for ConsoleArg {
    fn from(text: &str) -> Self {
        ConsoleArg::Text(text.to_string())
    }
}

impl From<String> for ConsoleArg {
    fn from(text: String) -> Self {
        ConsoleArg::Text(text)
    }
}

impl From<ErrorValue> for ConsoleArg {
    fn from(error: ErrorValue) -> Self {
        ConsoleArg::Error(error)
    }
}

impl From<Value> for ConsoleArg {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => ConsoleArg::Text(text),
            Value::Bool(b) => ConsoleArg::Primitive(b.to_string()),
            Value::Number(n) => ConsoleArg::Primitive(n.to_string()),
            other => ConsoleArg::object(other),
        }
    }
}

/// An error value: message plus optional stack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorValue {
    pub message: String,
    pub stack: Option<String>,
}

impl ErrorValue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// Structural view of a captured object.
pub trait Inspect: fmt::Debug + Send + Sync {
    /// Serialize the object structurally. Fails on e.g. cyclic references.
    fn to_json(&self) -> TraceResult<String>;

    /// Component stack attached by an error boundary, if any.
    fn component_stack(&self) -> Option<&str> {
        None
    }

    /// Plain string coercion.
    fn coerce(&self) -> String {
        "[object Object]".to_string()
    }
}

impl Inspect for Value {
    fn to_json(&self) -> TraceResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn component_stack(&self) -> Option<&str> {
        self.get("componentStack")
            .and_then(Value::as_str)
            .filter(|stack| !stack.is_empty())
    }

    fn coerce(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Null => String::new(),
                    other => other.coerce(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
            other => other.to_string(),
        }
    }
}

/// Render one argument. Never fails: objects that cannot be serialized
/// fall back to string coercion.
pub fn safe_stringify(arg: &ConsoleArg) -> String {
    match arg {
        ConsoleArg::Text(text) | ConsoleArg::Primitive(text) => text.clone(),
        ConsoleArg::Error(error) => error
            .stack
            .as_deref()
            .filter(|stack| !stack.is_empty())
            .unwrap_or(error.message.as_str())
            .to_string(),
        ConsoleArg::Object(object) => {
            if let Some(stack) = object.component_stack() {
                return format!("\nComponent Stack:\n{}", stack);
            }
            match object.to_json() {
                Ok(json) => json,
                Err(err) => {
                    tracing::debug!(error = %err, "falling back to string coercion");
                    object.coerce()
                }
            }
        }
    }
}

/// Join console arguments with single spaces.
pub fn format_args(args: &[ConsoleArg]) -> String {
    args.iter().map(safe_stringify).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::TraceError;
    use serde_json::json;

    #[derive(Debug)]
    struct Cyclic;

    impl Inspect for Cyclic {
        fn to_json(&self) -> TraceResult<String> {
            Err(TraceError::serialization("Converting circular structure to JSON"))
        }

        fn coerce(&self) -> String {
            "[object Cyclic]".to_string()
        }
    }

    #[test]
    fn test_format_primitives() {
        let args = vec![
            ConsoleArg::from("count:"),
            ConsoleArg::from(json!(3)),
            ConsoleArg::from(json!(true)),
        ];
        assert_eq!(format_args(&args), "count: 3 true");
    }

    #[test]
    fn test_error_prefers_stack() {
        let with_stack = ErrorValue::new("boom").with_stack("Error: boom\n    at App.jsx:3");
        let without_stack = ErrorValue::new("boom");

        assert_eq!(safe_stringify(&with_stack.into()), "Error: boom\n    at App.jsx:3");
        assert_eq!(safe_stringify(&without_stack.into()), "boom");
    }

    #[test]
    fn test_component_stack() {
        let arg = ConsoleArg::from(json!({ "componentStack": "\n    at Cart\n    at App" }));
        assert_eq!(
            safe_stringify(&arg),
            "\nComponent Stack:\n\n    at Cart\n    at App"
        );
    }

    #[test]
    fn test_object_serialized_as_json() {
        let arg = ConsoleArg::from(json!({ "id": 7 }));
        assert_eq!(safe_stringify(&arg), r#"{"id":7}"#);
        assert_eq!(safe_stringify(&ConsoleArg::from(Value::Null)), "null");
    }

    #[test]
    fn test_serialization_failure_falls_back() {
        let args = vec![ConsoleArg::from("state"), ConsoleArg::object(Cyclic)];
        assert_eq!(format_args(&args), "state [object Cyclic]");
    }

    #[test]
    fn test_format_args_joins_with_single_spaces() {
        assert_eq!(format_args(&[]), "");
        let args = [ConsoleArg::from("a"), ConsoleArg::from(""), ConsoleArg::from(ErrorValue::new("b"))];
        assert_eq!(format_args(&args), "a  b");
    }
}
