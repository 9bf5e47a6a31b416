use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_TEMPLATE_LENGTH: usize = 1_000_000;
pub const DEFAULT_MAX_VARIABLE_LENGTH: usize = 1_000_000;
pub const DEFAULT_MAX_EXPRESSIONS: usize = 10_000;
pub const DEFAULT_MAX_PATTERN_LENGTH: usize = 1_000_000;
pub const DEFAULT_MAX_URI_LENGTH: usize = 1_000_000;
pub const DEFAULT_MAX_COMPILED_SIZE: usize = 256 * 1024 * 1024;

/// Size bounds applied to templates and to per-call inputs.
///
/// All lengths are measured in bytes. `max_compiled_size` caps the heap used by the
/// compiled matcher and its lazy DFA cache, which grow with expression count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct TemplateLimits {
    pub max_template_length: usize,
    pub max_variable_length: usize,
    pub max_expressions: usize,
    pub max_pattern_length: usize,
    pub max_uri_length: usize,
    pub max_compiled_size: usize,
}

impl Default for TemplateLimits {
    fn default() -> Self {
        Self {
            max_template_length: DEFAULT_MAX_TEMPLATE_LENGTH,
            max_variable_length: DEFAULT_MAX_VARIABLE_LENGTH,
            max_expressions: DEFAULT_MAX_EXPRESSIONS,
            max_pattern_length: DEFAULT_MAX_PATTERN_LENGTH,
            max_uri_length: DEFAULT_MAX_URI_LENGTH,
            max_compiled_size: DEFAULT_MAX_COMPILED_SIZE,
        }
    }
}

impl TemplateLimits {
    pub fn builder() -> TemplateLimitsBuilder {
        TemplateLimitsBuilder::default()
    }

    pub fn validate(&self) -> Result<(), LimitsError> {
        let checks = [
            ("max_template_length", self.max_template_length),
            ("max_variable_length", self.max_variable_length),
            ("max_expressions", self.max_expressions),
            ("max_pattern_length", self.max_pattern_length),
            ("max_uri_length", self.max_uri_length),
            ("max_compiled_size", self.max_compiled_size),
        ];
        for (field, value) in checks {
            if value == 0 {
                return Err(LimitsError::ZeroLimit { field });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct TemplateLimitsBuilder {
    limits: TemplateLimits,
}

impl TemplateLimitsBuilder {
    pub fn max_template_length(mut self, value: usize) -> Self {
        self.limits.max_template_length = value;
        self
    }

    pub fn max_variable_length(mut self, value: usize) -> Self {
        self.limits.max_variable_length = value;
        self
    }

    pub fn max_expressions(mut self, value: usize) -> Self {
        self.limits.max_expressions = value;
        self
    }

    pub fn max_pattern_length(mut self, value: usize) -> Self {
        self.limits.max_pattern_length = value;
        self
    }

    pub fn max_uri_length(mut self, value: usize) -> Self {
        self.limits.max_uri_length = value;
        self
    }

    pub fn max_compiled_size(mut self, value: usize) -> Self {
        self.limits.max_compiled_size = value;
        self
    }

    pub fn build(self) -> Result<TemplateLimits, LimitsError> {
        let limits = self.limits;
        limits.validate()?;
        Ok(limits)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LimitsError {
    #[error("{field} must be at least 1")]
    ZeroLimit { field: &'static str },
}
