//! Path query AST.

/// Selector types.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Named selector for property access: `.name`, `['key']`
    Name(String),
    /// Index selector for array element access: `[0]`, `[-1]`
    Index(isize),
    /// Slice selector: `[start:end:step]`
    Slice {
        start: Option<isize>,
        end: Option<isize>,
        step: Option<isize>,
    },
    /// Wildcard selector: `.*`, `[*]`
    Wildcard,
}

/// Path segment containing one or more selectors.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub selectors: Vec<Selector>,
    /// Whether this is a recursive descent segment (`..`).
    pub recursive: bool,
}

impl PathSegment {
    pub fn new(selectors: Vec<Selector>, recursive: bool) -> Self {
        Self {
            selectors,
            recursive,
        }
    }
}

/// A parsed query.
#[derive(Debug, Clone, PartialEq)]
pub struct PathQuery {
    pub segments: Vec<PathSegment>,
}

impl PathQuery {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

/// A component of a normalized path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathComponent {
    Key(String),
    Index(usize),
}

impl std::fmt::Display for PathComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathComponent::Key(key) => write!(f, "{key}"),
            PathComponent::Index(idx) => write!(f, "{idx}"),
        }
    }
}

/// One query hit: the matched node and its normalized path from the
/// evaluation start.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<N> {
    pub path: Vec<PathComponent>,
    pub node: N,
}
