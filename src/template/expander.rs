use super::ast::{Expression, Operator, Segment, Sequence};
use super::encoding::{encode_strict, encode_value};
use super::error::InputKind;
use super::{TemplateError, TemplateResult};
use crate::options::TemplateLimits;
use crate::values::{TemplateValue, VariableSource};

#[tracing::instrument(level = "trace", skip_all, fields(segments = sequence.len() as u64))]
pub fn expand_sequence<V>(
    sequence: &Sequence,
    variables: &V,
    limits: &TemplateLimits,
) -> TemplateResult<String>
where
    V: VariableSource + ?Sized,
{
    let mut out = String::new();
    let mut query_emitted = false;

    for segment in sequence {
        match segment {
            Segment::Literal(text) => {
                out.push_str(text);
                query_emitted |= text.contains('?');
            }
            Segment::Expression(expr) if expr.operator.is_query() => {
                query_emitted |= expand_query(expr, variables, limits, query_emitted, &mut out)?;
            }
            Segment::Expression(expr) if expr.variables.len() > 1 => {
                expand_multiple(expr, variables, limits, &mut out)?;
            }
            Segment::Expression(expr) => {
                expand_single(expr, variables, limits, &mut out)?;
            }
        }
    }

    Ok(out)
}

fn bound<'v, V>(
    variables: &'v V,
    name: &str,
    limits: &TemplateLimits,
) -> TemplateResult<Option<&'v TemplateValue>>
where
    V: VariableSource + ?Sized,
{
    let Some(value) = variables.lookup(name).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    if let Some(len) = value
        .iter()
        .map(str::len)
        .find(|len| *len > limits.max_variable_length)
    {
        tracing::event!(
            tracing::Level::DEBUG,
            operation = "expand",
            variable = %name,
            len = len as u64,
            "bound value too long"
        );
        return Err(TemplateError::InputTooLong {
            input: InputKind::Value {
                name: name.to_string(),
            },
            len,
            max: limits.max_variable_length,
        });
    }
    Ok(Some(value))
}

fn expand_query<V>(
    expr: &Expression,
    variables: &V,
    limits: &TemplateLimits,
    query_emitted: bool,
    out: &mut String,
) -> TemplateResult<bool>
where
    V: VariableSource + ?Sized,
{
    let mut pairs = 0usize;
    for name in &expr.variables {
        let Some(value) = bound(variables, name, limits)? else {
            continue;
        };

        let lead = match (pairs, expr.operator) {
            (0, Operator::Query) if !query_emitted => '?',
            _ => '&',
        };
        out.push(lead);
        out.push_str(name);
        out.push('=');
        for (idx, item) in value.iter().enumerate() {
            if idx > 0 {
                out.push(',');
            }
            out.push_str(&encode_strict(item));
        }
        pairs += 1;
    }
    Ok(pairs > 0)
}

fn expand_multiple<V>(
    expr: &Expression,
    variables: &V,
    limits: &TemplateLimits,
    out: &mut String,
) -> TemplateResult<()>
where
    V: VariableSource + ?Sized,
{
    let mut emitted = 0usize;
    for name in &expr.variables {
        let Some(first) = bound(variables, name, limits)?.and_then(TemplateValue::first) else {
            continue;
        };
        if emitted == 0 {
            if let Some(prefix) = expr.operator.prefix() {
                out.push(prefix);
            }
        } else {
            out.push(',');
        }
        out.push_str(&encode_value(first, expr.operator));
        emitted += 1;
    }
    Ok(())
}

fn expand_single<V>(
    expr: &Expression,
    variables: &V,
    limits: &TemplateLimits,
    out: &mut String,
) -> TemplateResult<()>
where
    V: VariableSource + ?Sized,
{
    let Some(name) = expr.variables.first() else {
        return Ok(());
    };
    let Some(value) = bound(variables, name, limits)? else {
        return Ok(());
    };

    if let Some(prefix) = expr.operator.prefix() {
        out.push(prefix);
    }
    let separator = expr.operator.list_separator();
    for (idx, item) in value.iter().enumerate() {
        if idx > 0 {
            out.push(separator);
        }
        out.push_str(&encode_value(item, expr.operator));
    }
    Ok(())
}
