mod ast;
mod compiled;
mod encoding;
mod error;
mod expander;
mod parser;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use hashbrown::HashSet as FastHashSet;

pub use ast::{Expression, Operator, Segment, Sequence, VariableNames};
pub use compiled::{CaptureSlot, CompiledTemplate, compile_sequence};
pub use encoding::{decode_value, encode_reserved, encode_strict};
pub use error::{InputKind, TemplateError, TemplateErrorKind, TemplateResult};
pub use expander::expand_sequence;
pub use parser::{is_template_like, parse_template};

use crate::options::TemplateLimits;
use crate::values::{MatchResult, VariableSource};

/// A parsed and compiled RFC 6570 URI template.
///
/// Parsing and pattern compilation happen once in the constructor; every other
/// operation is a read-only traversal, so a template can be shared across threads.
#[derive(Debug, Clone)]
pub struct UriTemplate {
    raw: String,
    sequence: Sequence,
    compiled: CompiledTemplate,
    limits: TemplateLimits,
}

impl UriTemplate {
    pub fn new(template: &str) -> TemplateResult<Self> {
        Self::with_limits(template, TemplateLimits::default())
    }

    #[tracing::instrument(
        level = "trace",
        skip(template, limits),
        fields(template_len = template.len() as u64)
    )]
    pub fn with_limits(template: &str, limits: TemplateLimits) -> TemplateResult<Self> {
        let built = parse_template(template, &limits).and_then(|sequence| {
            let compiled = compile_sequence(&sequence, &limits)?;
            Ok((sequence, compiled))
        });

        match built {
            Ok((sequence, compiled)) => Ok(Self {
                raw: template.to_string(),
                sequence,
                compiled,
                limits,
            }),
            Err(err) => {
                tracing::event!(
                    tracing::Level::DEBUG,
                    operation = "parse",
                    template_len = template.len() as u64,
                    error = %err,
                    "template rejected"
                );
                Err(err)
            }
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn limits(&self) -> &TemplateLimits {
        &self.limits
    }

    /// Anchored regular expression used for matching.
    pub fn pattern(&self) -> &str {
        self.compiled.as_str()
    }

    pub fn variable_names(&self) -> Vec<&str> {
        let mut seen = FastHashSet::new();
        self.sequence
            .expressions()
            .flat_map(|expr| expr.variables.iter().map(String::as_str))
            .filter(|name| seen.insert(*name))
            .collect()
    }

    pub fn expand<V>(&self, variables: &V) -> TemplateResult<String>
    where
        V: VariableSource + ?Sized,
    {
        expand_sequence(&self.sequence, variables, &self.limits)
    }

    pub fn matches(&self, uri: &str) -> TemplateResult<bool> {
        self.check_uri(uri)?;
        Ok(self.compiled.is_match(uri))
    }

    /// Extracts variable bindings from `uri`, or `None` when it does not conform.
    #[tracing::instrument(
        level = "trace",
        skip(self, uri),
        fields(template_len = self.raw.len() as u64, uri_len = uri.len() as u64)
    )]
    pub fn match_uri(&self, uri: &str) -> TemplateResult<Option<MatchResult>> {
        self.check_uri(uri)?;
        Ok(self.compiled.captures(uri))
    }

    pub fn is_template_like(input: &str) -> bool {
        is_template_like(input)
    }

    fn check_uri(&self, uri: &str) -> TemplateResult<()> {
        if uri.len() > self.limits.max_uri_length {
            tracing::event!(
                tracing::Level::DEBUG,
                operation = "match",
                uri_len = uri.len() as u64,
                max = self.limits.max_uri_length as u64,
                "uri too long"
            );
            return Err(TemplateError::InputTooLong {
                input: InputKind::Uri,
                len: uri.len(),
                max: self.limits.max_uri_length,
            });
        }
        Ok(())
    }
}

impl PartialEq for UriTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for UriTemplate {}

impl Hash for UriTemplate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for UriTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for UriTemplate {
    type Error = TemplateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
