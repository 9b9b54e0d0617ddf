//! Error types for JSONPath parsing and evaluation

use std::fmt;
use thiserror::Error;

/// Errors raised while parsing or evaluating a JSONPath expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JsonPathError {
    /// Malformed input the parser could not make sense of
    #[error("Parse error at position {position}: {message}")]
    Parse {
        message: String,
        position: usize,
        input: String,
    },

    /// A specific token was expected but something else was found
    #[error("Syntax error at position {position}: {message}")]
    Syntax {
        message: String,
        position: usize,
        input: String,
        expected: Vec<String>,
        found: String,
    },

    /// Operand of the wrong JSON type inside a filter
    #[error("Type mismatch: expected {expected}, found {found} in {context}")]
    TypeMismatch {
        expected: String,
        found: String,
        context: String,
    },

    /// A filter could not be evaluated (bad regex, etc.)
    #[error("Filter evaluation failed: {message}")]
    FilterEvaluation { message: String, filter: String },

    /// Unknown function or wrong arity
    #[error("Function error: {function}() - {message}")]
    Function { function: String, message: String },

    /// Runtime failure while walking the document
    #[error("Execution error: {message}")]
    Execution { message: String, path: String },

    /// Syntax that is recognised but not supported
    #[error("Unsupported feature: {feature}")]
    Unsupported {
        feature: String,
        alternative: Option<String>,
    },
}

/// Severity of a JSONPath error, used when reporting to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Warning,
    Error,
}

impl JsonPathError {
    pub fn parse(message: impl Into<String>, position: usize, input: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            position,
            input: input.into(),
        }
    }

    pub fn syntax(
        message: impl Into<String>,
        position: usize,
        input: impl Into<String>,
        expected: &[&str],
        found: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
            input: input.into(),
            expected: expected.iter().map(|s| s.to_string()).collect(),
            found: found.into(),
        }
    }

    pub fn type_mismatch(
        expected: impl Into<String>,
        found: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
            context: context.into(),
        }
    }

    pub fn filter_evaluation(message: impl Into<String>, filter: impl Into<String>) -> Self {
        Self::FilterEvaluation {
            message: message.into(),
            filter: filter.into(),
        }
    }

    pub fn function(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Function {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn execution(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn unsupported(feature: impl Into<String>, alternative: Option<&str>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
            alternative: alternative.map(str::to_string),
        }
    }

    /// Message with the offending input and a caret under the failing position
    pub fn detailed_message(&self) -> String {
        match self {
            Self::Parse {
                position, input, ..
            } => format!("{}{}", self, caret_line(input, *position)),
            Self::Syntax {
                position,
                input,
                expected,
                found,
                ..
            } => format!(
                "{}\nExpected one of: {}\nFound: {}{}",
                self,
                expected.join(", "),
                found,
                caret_line(input, *position)
            ),
            Self::Unsupported {
                alternative: Some(alternative),
                ..
            } => format!("{}\nTry: {}", self, alternative),
            _ => self.to_string(),
        }
    }

    /// Hints for fixing the expression
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            Self::Parse { .. } | Self::Syntax { .. } => vec![
                "Check for unclosed brackets or quotes".to_string(),
                "Quote member names with special characters: $['my key']".to_string(),
            ],
            Self::TypeMismatch { expected, .. } => {
                vec![format!("Ensure the operand is of type {}", expected)]
            }
            Self::FilterEvaluation { .. } => {
                vec!["Check the filter's regular expression and property references".to_string()]
            }
            Self::Function { .. } => vec![
                "Supported functions: length(), size(), type(), keys(), values()".to_string(),
            ],
            Self::Unsupported {
                alternative: Some(alternative),
                ..
            } => vec![format!("Use {} instead", alternative)],
            _ => vec!["Check JSONPath expression syntax".to_string()],
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TypeMismatch { .. } | Self::Execution { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Source expression the error refers to, when known
    pub fn input(&self) -> Option<&str> {
        match self {
            Self::Parse { input, .. } | Self::Syntax { input, .. } => Some(input),
            Self::Execution { path, .. } => Some(path),
            _ => None,
        }
    }
}

fn caret_line(input: &str, position: usize) -> String {
    if input.is_empty() {
        return String::new();
    }
    let column = input
        .char_indices()
        .take_while(|(offset, _)| *offset < position)
        .count();
    format!("\nInput: {}\n       {}^", input, " ".repeat(column))
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

impl From<JsonPathError> for crate::Error {
    fn from(err: JsonPathError) -> Self {
        crate::Error::Path {
            message: err.to_string(),
            path: err.input().unwrap_or_default().to_string(),
            source: Some(err),
        }
    }
}
