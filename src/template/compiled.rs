use regex::{Regex, RegexBuilder, escape};

use super::ast::{Expression, Operator, Segment, Sequence};
use super::encoding::decode_value;
use super::{TemplateError, TemplateResult};
use crate::options::TemplateLimits;
use crate::values::{MatchResult, MatchValue};

const SEGMENT_ONE: &str = "([^/,]+)";
const SEGMENT_LIST: &str = "([^/]+(?:,[^/]+)*)";
const FRAGMENT: &str = "(.+)";
const QUERY_VALUE: &str = "([^&]+)";

/// Capture group bookkeeping: group `i + 1` belongs to `slots[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSlot {
    pub name: String,
    pub exploded: bool,
}

#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    regex: Regex,
    slots: Vec<CaptureSlot>,
}

impl CompiledTemplate {
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn slots(&self) -> &[CaptureSlot] {
        &self.slots
    }

    pub fn is_match(&self, uri: &str) -> bool {
        self.regex.is_match(uri)
    }

    #[tracing::instrument(
        level = "trace",
        skip(self, uri),
        fields(uri_len = uri.len() as u64, slots = self.slots.len() as u64)
    )]
    pub fn captures(&self, uri: &str) -> Option<MatchResult> {
        let caps = self.regex.captures(uri)?;
        let mut out = MatchResult::with_capacity(self.slots.len());
        for (idx, slot) in self.slots.iter().enumerate() {
            let Some(m) = caps.get(idx + 1) else {
                continue;
            };
            let text = m.as_str();
            let value = if slot.exploded && text.contains(',') {
                MatchValue::List(text.split(',').map(decode_value).collect())
            } else {
                MatchValue::Scalar(decode_value(text))
            };
            out.insert(slot.name.clone(), value);
        }
        Some(out)
    }
}

#[tracing::instrument(level = "trace", skip_all, fields(segments = sequence.len() as u64))]
pub fn compile_sequence(
    sequence: &Sequence,
    limits: &TemplateLimits,
) -> TemplateResult<CompiledTemplate> {
    let mut source = String::from("^");
    let mut slots = Vec::new();
    let mut query_emitted = false;

    for segment in sequence {
        match segment {
            Segment::Literal(text) => {
                source.push_str(&escape(text));
                query_emitted |= text.contains('?');
            }
            Segment::Expression(expr) if expr.operator.is_query() => {
                compile_query(expr, &mut query_emitted, &mut source, &mut slots);
            }
            Segment::Expression(expr) => {
                compile_expression(expr, &mut source, &mut slots);
            }
        }
        if source.len() > limits.max_pattern_length {
            return Err(pattern_too_long(source.len(), limits));
        }
    }
    source.push('$');
    if source.len() > limits.max_pattern_length {
        return Err(pattern_too_long(source.len(), limits));
    }

    // the compiled program grows with expression count, not source length
    let regex = RegexBuilder::new(&source)
        .size_limit(limits.max_compiled_size)
        .dfa_size_limit(limits.max_compiled_size)
        .build()
        .map_err(|err| TemplateError::PatternCompile {
            message: err.to_string(),
        })?;

    Ok(CompiledTemplate { regex, slots })
}

fn pattern_too_long(len: usize, limits: &TemplateLimits) -> TemplateError {
    TemplateError::PatternTooLong {
        len,
        max: limits.max_pattern_length,
    }
}

fn compile_query(
    expr: &Expression,
    query_emitted: &mut bool,
    source: &mut String,
    slots: &mut Vec<CaptureSlot>,
) {
    for name in &expr.variables {
        if *query_emitted || expr.operator == Operator::QueryContinuation {
            source.push('&');
        } else {
            source.push_str(r"\?");
        }
        *query_emitted = true;
        source.push_str(&escape(name));
        source.push('=');
        source.push_str(QUERY_VALUE);
        slots.push(CaptureSlot {
            name: name.clone(),
            exploded: expr.exploded,
        });
    }
}

fn compile_expression(expr: &Expression, source: &mut String, slots: &mut Vec<CaptureSlot>) {
    let group = match expr.operator {
        Operator::Simple | Operator::Reserved | Operator::PathSegment if expr.exploded => {
            SEGMENT_LIST
        }
        Operator::Fragment => FRAGMENT,
        _ => SEGMENT_ONE,
    };

    for (idx, name) in expr.variables.iter().enumerate() {
        if idx == 0 {
            if let Some(prefix) = expr.operator.prefix() {
                source.push_str(&escape(prefix.encode_utf8(&mut [0u8; 4])));
            }
        } else {
            source.push(',');
        }
        source.push_str(group);
        slots.push(CaptureSlot {
            name: name.clone(),
            exploded: expr.exploded,
        });
    }
}
