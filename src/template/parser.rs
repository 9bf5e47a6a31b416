use memchr::memchr;
use smallvec::SmallVec;

use super::ast::{Expression, Operator, Segment, Sequence};
use super::{TemplateError, TemplateResult};
use crate::options::TemplateLimits;

#[tracing::instrument(
    level = "trace",
    skip(template, limits),
    fields(template_len = template.len() as u64)
)]
pub fn parse_template(template: &str, limits: &TemplateLimits) -> TemplateResult<Sequence> {
    if template.trim().is_empty() {
        return Err(TemplateError::Empty);
    }
    if template.len() > limits.max_template_length {
        return Err(TemplateError::TemplateTooLong {
            len: template.len(),
            max: limits.max_template_length,
        });
    }

    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0usize;
    let mut expression_count = 0usize;

    while let Some(rel) = memchr(b'{', &bytes[literal_start..]) {
        let open = literal_start + rel;
        if open > literal_start {
            segments.push(Segment::Literal(template[literal_start..open].to_string()));
        }

        let close = match memchr(b'}', &bytes[open + 1..]) {
            Some(rel) => open + 1 + rel,
            None => return Err(TemplateError::UnclosedExpression { start: open }),
        };

        expression_count += 1;
        if expression_count > limits.max_expressions {
            return Err(TemplateError::TooManyExpressions {
                max: limits.max_expressions,
            });
        }

        let expr = parse_expression(&template[open + 1..close], open, limits)?;
        segments.push(Segment::Expression(expr));
        literal_start = close + 1;
    }

    if literal_start < template.len() {
        segments.push(Segment::Literal(template[literal_start..].to_string()));
    }

    Ok(Sequence::new(segments))
}

fn parse_expression(
    body: &str,
    start: usize,
    limits: &TemplateLimits,
) -> TemplateResult<Expression> {
    let first = match body.chars().next() {
        Some(ch) if !body.trim().is_empty() => ch,
        _ => return Err(TemplateError::EmptyExpression { start }),
    };

    if Operator::is_unsupported(first) {
        return Err(TemplateError::UnsupportedOperator {
            start,
            operator: first,
        });
    }

    let (operator, names) = match Operator::from_char(first) {
        Some(op) => (op, &body[first.len_utf8()..]),
        None => (Operator::Simple, body),
    };

    let exploded = names.contains('*');
    let mut variables = SmallVec::new();
    for raw in names.split(',') {
        let name = raw.replace('*', "");
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if name.len() > limits.max_variable_length {
            return Err(TemplateError::VariableNameTooLong {
                start,
                len: name.len(),
                max: limits.max_variable_length,
            });
        }
        variables.push(name.to_string());
    }

    if variables.is_empty() {
        return Err(TemplateError::EmptyExpression { start });
    }

    Ok(Expression::new(operator, variables, exploded))
}

/// Cheap check for at least one `{` followed by one or more non-whitespace characters and a `}`.
///
/// Whitespace follows `char::is_whitespace`. A `{` may appear inside the body.
pub fn is_template_like(input: &str) -> bool {
    let mut rest = input;
    while let Some(open) = memchr(b'{', rest.as_bytes()) {
        let body = &rest[open + 1..];
        let mut stop = body.len();
        let mut closed = false;
        for (idx, ch) in body.char_indices() {
            if ch == '}' {
                stop = idx;
                closed = true;
                break;
            }
            if ch.is_whitespace() {
                stop = idx;
                break;
            }
        }
        if closed && stop > 0 {
            return true;
        }
        // any `{` before `stop` would end at the same place
        rest = &body[stop..];
    }
    false
}
