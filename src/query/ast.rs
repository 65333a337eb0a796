//! Query AST structures
//!
//! A query references exactly one dataset. Filter fields are stored
//! unqualified (the record field name); COLUMNS, GROUP, APPLY targets and
//! ORDER keys are stored fully qualified (`datasetId_field`) because those
//! stages operate on result rows.

/// Numeric comparison body: one field against one literal
#[derive(Debug, Clone, PartialEq)]
pub struct MComparison {
    /// Record field name (numeric)
    pub field: String,
    /// Literal to compare against
    pub value: f64,
}

/// String comparison body: one field against one pattern
///
/// The pattern may carry `*` as its first and/or last character only.
#[derive(Debug, Clone, PartialEq)]
pub struct SComparison {
    /// Record field name (string)
    pub field: String,
    /// Literal or wildcard pattern
    pub pattern: String,
}

/// A WHERE predicate tree
///
/// Closed union: every concrete node the grammar allows has a variant here,
/// so both validation and evaluation match exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    LessThan(MComparison),
    GreaterThan(MComparison),
    Equal(MComparison),
    Is(SComparison),
    Not(Box<Filter>),
}

/// Aggregation operator of an APPLY rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyToken {
    Max,
    Min,
    Avg,
    Count,
    Sum,
}

impl ApplyToken {
    /// Parse a wire token
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "MAX" => Some(ApplyToken::Max),
            "MIN" => Some(ApplyToken::Min),
            "AVG" => Some(ApplyToken::Avg),
            "COUNT" => Some(ApplyToken::Count),
            "SUM" => Some(ApplyToken::Sum),
            _ => None,
        }
    }

    /// Wire spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyToken::Max => "MAX",
            ApplyToken::Min => "MIN",
            ApplyToken::Avg => "AVG",
            ApplyToken::Count => "COUNT",
            ApplyToken::Sum => "SUM",
        }
    }
}

/// One APPLY rule: a caller-chosen output column computed over each group
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyRule {
    /// Apply key: output column name, never contains `_`
    pub name: String,
    /// Aggregation operator
    pub token: ApplyToken,
    /// Qualified dataset key the aggregate reads
    pub key: String,
}

/// GROUP + APPLY stage
#[derive(Debug, Clone, PartialEq)]
pub struct Transformations {
    /// Qualified keys whose value tuple identifies a group
    pub group: Vec<String>,
    /// Aggregates computed per group, in rule order
    pub apply: Vec<ApplyRule>,
}

/// Sort direction for a `{dir, keys}` ORDER
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Parse a wire direction
    pub fn parse(dir: &str) -> Option<Self> {
        match dir {
            "UP" => Some(Direction::Up),
            "DOWN" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// ORDER clause
#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    /// Bare key: ascending sort on one column
    Key(String),
    /// Multi-key sort with a uniform direction
    Advanced { dir: Direction, keys: Vec<String> },
}

/// A fully validated query, ready for execution
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    /// The single dataset every key in the query references
    pub dataset_id: String,
    /// WHERE tree; `None` is the empty filter and matches every row
    pub filter: Option<Filter>,
    /// COLUMNS, in requested order
    pub columns: Vec<String>,
    /// Optional ORDER
    pub order: Option<Order>,
    /// Optional GROUP/APPLY stage
    pub transformations: Option<Transformations>,
}
