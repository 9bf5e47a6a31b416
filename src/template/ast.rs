use smallvec::SmallVec;

pub type VariableNames = SmallVec<[String; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    #[default]
    Simple,
    Reserved,
    Fragment,
    Label,
    PathSegment,
    Query,
    QueryContinuation,
}

impl Operator {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Self::Reserved),
            '#' => Some(Self::Fragment),
            '.' => Some(Self::Label),
            '/' => Some(Self::PathSegment),
            '?' => Some(Self::Query),
            '&' => Some(Self::QueryContinuation),
            _ => None,
        }
    }

    /// RFC 6570 operators reserved for Level 4 or future extensions.
    pub fn is_unsupported(ch: char) -> bool {
        matches!(ch, ';' | '=' | '!' | '@' | '|')
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Simple => None,
            Self::Reserved => Some('+'),
            Self::Fragment => Some('#'),
            Self::Label => Some('.'),
            Self::PathSegment => Some('/'),
            Self::Query => Some('?'),
            Self::QueryContinuation => Some('&'),
        }
    }

    /// Literal emitted in front of a non-query expansion.
    pub fn prefix(&self) -> Option<char> {
        match self {
            Self::Fragment | Self::Label | Self::PathSegment => self.as_char(),
            _ => None,
        }
    }

    /// Separator between the elements of a single list-valued variable.
    pub fn list_separator(&self) -> char {
        match self {
            Self::Label => '.',
            Self::PathSegment => '/',
            _ => ',',
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query | Self::QueryContinuation)
    }

    pub fn allows_reserved(&self) -> bool {
        matches!(self, Self::Reserved | Self::Fragment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub operator: Operator,
    pub variables: VariableNames,
    pub exploded: bool,
}

impl Expression {
    pub fn new(operator: Operator, variables: VariableNames, exploded: bool) -> Self {
        Self {
            operator,
            variables,
            exploded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence {
    pub segments: Vec<Segment>,
}

impl Sequence {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn expressions(&self) -> impl Iterator<Item = &Expression> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Expression(expr) => Some(expr),
            Segment::Literal(_) => None,
        })
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
