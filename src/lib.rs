pub mod options;
pub mod template;
pub mod values;

pub use options::{LimitsError, TemplateLimits, TemplateLimitsBuilder};
pub use template::{
    InputKind, Operator, Segment, Sequence, TemplateError, TemplateErrorKind, TemplateResult,
    UriTemplate,
};
pub use values::{MatchResult, MatchValue, TemplateValue, VariableSource};
