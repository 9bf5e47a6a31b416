use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateErrorKind {
    /// The template itself is malformed or exceeds a structural limit.
    InvalidTemplate,
    /// A per-call input (URI or bound value) exceeds a configured limit.
    InputTooLong,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    Uri,
    Value { name: String },
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Uri => f.write_str("URI"),
            InputKind::Value { name } => write!(f, "value of variable '{name}'"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,
    #[error("template exceeds maximum length of {max} bytes (got {len})")]
    TemplateTooLong { len: usize, max: usize },
    #[error("unclosed template expression starting at byte {start}")]
    UnclosedExpression { start: usize },
    #[error("template expression at byte {start} has no variable names")]
    EmptyExpression { start: usize },
    #[error("template expression at byte {start} uses unsupported operator '{operator}'")]
    UnsupportedOperator { start: usize, operator: char },
    #[error("template has more than {max} expressions")]
    TooManyExpressions { max: usize },
    #[error("variable name at byte {start} exceeds maximum length of {max} bytes (got {len})")]
    VariableNameTooLong { start: usize, len: usize, max: usize },
    #[error("generated pattern exceeds maximum length of {max} bytes (got {len})")]
    PatternTooLong { len: usize, max: usize },
    #[error("generated pattern failed to compile: {message}")]
    PatternCompile { message: String },
    #[error("{input} exceeds maximum length of {max} bytes (got {len})")]
    InputTooLong {
        input: InputKind,
        len: usize,
        max: usize,
    },
}

impl TemplateError {
    pub fn kind(&self) -> TemplateErrorKind {
        match self {
            TemplateError::InputTooLong { .. } => TemplateErrorKind::InputTooLong,
            TemplateError::Empty
            | TemplateError::TemplateTooLong { .. }
            | TemplateError::UnclosedExpression { .. }
            | TemplateError::EmptyExpression { .. }
            | TemplateError::UnsupportedOperator { .. }
            | TemplateError::TooManyExpressions { .. }
            | TemplateError::VariableNameTooLong { .. }
            | TemplateError::PatternTooLong { .. }
            | TemplateError::PatternCompile { .. } => TemplateErrorKind::InvalidTemplate,
        }
    }

    pub fn is_invalid_template(&self) -> bool {
        self.kind() == TemplateErrorKind::InvalidTemplate
    }

    pub fn is_input_too_long(&self) -> bool {
        self.kind() == TemplateErrorKind::InputTooLong
    }
}

pub type TemplateResult<T> = Result<T, TemplateError>;
