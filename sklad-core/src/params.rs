//! Query parameters for collection and entity requests.
//!
//! [`Params`] only accumulates options; rendering into query pairs happens in
//! [`Params::to_query`]. Unset options are not rendered at all.

use std::fmt;

/// Separator between filter conditions (logical AND).
pub const FILTER_SEPARATOR: &str = ";";

/// Comparison operator of a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `>=`
    GreaterOrEq,
    /// `<=`
    LessOrEq,
    /// `~` (substring match)
    Like,
    /// `~=` (prefix match)
    StartsWith,
    /// `=~` (suffix match)
    EndsWith,
    /// `!~` (no substring match)
    NotLike,
}

impl FilterOp {
    /// Operator as written in the `filter` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Greater => ">",
            Self::Less => "<",
            Self::GreaterOrEq => ">=",
            Self::LessOrEq => "<=",
            Self::Like => "~",
            Self::StartsWith => "~=",
            Self::EndsWith => "=~",
            Self::NotLike => "!~",
        }
    }
}

/// A single `field<op>value` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Field name or attribute href.
    pub field: String,
    /// Comparison operator.
    pub op: FilterOp,
    /// Right-hand side.
    pub value: String,
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.field, self.op.as_str(), self.value)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Ascending (the server default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// Sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Field to sort by.
    pub field: String,
    /// Sort direction.
    pub direction: Direction,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Asc => f.write_str(&self.field),
            Direction::Desc => write!(f, "{},desc", self.field),
        }
    }
}

/// Accumulated request options.
///
/// # Example
///
/// ```
/// use sklad_core::{Direction, FilterOp, Params};
///
/// let params = Params::new()
///     .with_filter("archived", FilterOp::Eq, "false")
///     .with_expand("agent")
///     .with_order("name", Direction::Desc)
///     .with_limit(100);
///
/// let query = params.to_query();
/// assert_eq!(query[0], ("filter", "archived=false".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    filters: Vec<Filter>,
    expand: Vec<String>,
    order: Vec<Order>,
    limit: Option<u32>,
    offset: Option<u32>,
    fields: Vec<String>,
    search: Option<String>,
    is_async: bool,
}

impl Params {
    /// Create empty params.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition; conditions are combined with AND.
    #[must_use]
    pub fn with_filter(
        mut self,
        field: impl Into<String>,
        op: FilterOp,
        value: impl ToString,
    ) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op,
            value: value.to_string(),
        });
        self
    }

    /// Add an equality condition.
    #[must_use]
    pub fn with_filter_eq(self, field: impl Into<String>, value: impl ToString) -> Self {
        self.with_filter(field, FilterOp::Eq, value)
    }

    /// Match any of `values` on one field.
    ///
    /// Rendered as repeated `field=value` conditions, which the server
    /// combines with OR when they target the same field.
    #[must_use]
    pub fn with_filter_any<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let field = field.into();
        for value in values {
            self = self.with_filter(field.clone(), FilterOp::Eq, value);
        }
        self
    }

    /// Inline a related entity given by a dotted path (e.g. `positions.assortment`).
    #[must_use]
    pub fn with_expand(mut self, path: impl Into<String>) -> Self {
        self.expand.push(path.into());
        self
    }

    /// Add a sort key.
    #[must_use]
    pub fn with_order(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order.push(Order {
            field: field.into(),
            direction,
        });
        self
    }

    /// Set the page size.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the page offset.
    #[must_use]
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Restrict the response to the given fields.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Set the full-text search string.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Request asynchronous execution.
    #[must_use]
    pub fn with_async(mut self) -> Self {
        self.is_async = true;
        self
    }

    /// Configured page size.
    #[must_use]
    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// Configured page offset.
    #[must_use]
    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    /// Whether asynchronous execution is requested.
    #[must_use]
    pub fn is_async(&self) -> bool {
        self.is_async
    }

    /// Accumulated filter conditions.
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Render into query pairs, in a fixed order.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();

        if !self.filters.is_empty() {
            let rendered: Vec<String> = self.filters.iter().map(ToString::to_string).collect();
            query.push(("filter", rendered.join(FILTER_SEPARATOR)));
        }
        if !self.expand.is_empty() {
            query.push(("expand", self.expand.join(",")));
        }
        if !self.order.is_empty() {
            let rendered: Vec<String> = self.order.iter().map(ToString::to_string).collect();
            query.push(("order", rendered.join(";")));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        if !self.fields.is_empty() {
            query.push(("fields", self.fields.join(",")));
        }
        if let Some(ref search) = self.search {
            query.push(("search", search.clone()));
        }
        if self.is_async {
            query.push(("async", "true".to_string()));
        }

        query
    }
}
