//! Filter-driven SELECT composition shared by the list endpoints.
//!
//! A listing starts from a caller supplied base statement and appends one
//! predicate per filter that is actually present, then an optional
//! `ORDER BY`, then pagination. Column expressions are `&'static str`
//! provided by the repo; request values are only ever bound as parameters.
//!
//! ```ignore
//! let mut q = FilterQuery::new("SELECT id, name FROM users", Connective::And);
//! q.filter("id", MatchMode::Exact, filter.user_id.as_deref())
//!     .filter("name", MatchMode::Contains, filter.name.as_deref())
//!     .order_by("created_at", filter.created_at);
//! let rows: Vec<UserRow> = q.paginate(filter.page).fetch_all(db).await?;
//! ```
use sqlx::{PgPool, postgres::PgRow};

/// Keyword placed between two predicates of the same query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    fn as_sql(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// `col = $n`
    Exact,
    /// `col LIKE 'value%'`
    Prefix,
    /// `col LIKE '%value%'`
    Contains,
    /// `LOWER(col) LIKE '%lower(value)%'`
    ContainsIgnoreCase,
}

impl MatchMode {
    fn predicate(self, column: &str, placeholder: usize) -> String {
        match self {
            MatchMode::Exact => format!("{column} = ${placeholder}"),
            MatchMode::Prefix | MatchMode::Contains => format!("{column} LIKE ${placeholder}"),
            MatchMode::ContainsIgnoreCase => format!("LOWER({column}) LIKE ${placeholder}"),
        }
    }

    fn bind_value(self, value: &str) -> String {
        match self {
            MatchMode::Exact => value.to_string(),
            MatchMode::Prefix => format!("{}%", escape_like(value)),
            MatchMode::Contains => format!("%{}%", escape_like(value)),
            MatchMode::ContainsIgnoreCase => format!("%{}%", escape_like(&value.to_lowercase())),
        }
    }
}

/// Escape LIKE metacharacters so user input only ever matches literally.
/// Postgres uses `\` as the default LIKE escape character.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Only the exact strings `asc` and `desc` are recognised.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    /// `createdAt` query parameter: absent or empty sorts newest first,
    /// an unrecognised value disables sorting.
    pub fn from_param(raw: Option<&str>) -> Option<Self> {
        match raw {
            None | Some("") => Some(SortDirection::Desc),
            Some(raw) => Self::parse(raw),
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Pagination window. Always bound last, offset then limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 5;

    /// Lenient parsing of `offset` / `limit` query parameters.
    ///
    /// Missing, unparseable or negative values fall back to the defaults,
    /// and so does `limit=0`.
    pub fn from_params(offset: Option<&str>, limit: Option<&str>) -> Self {
        let offset = offset
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v >= 0)
            .unwrap_or(0);
        let limit = limit
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(Self::DEFAULT_LIMIT);

        Self { offset, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Int(i64),
}

/// Builder for a filtered listing query.
#[derive(Debug)]
pub struct FilterQuery {
    sql: String,
    connective: Connective,
    fragments: usize,
    binds: Vec<BindValue>,
    order: Option<(&'static str, SortDirection)>,
}

impl FilterQuery {
    pub fn new(base: &str, connective: Connective) -> Self {
        Self {
            sql: base.trim().to_string(),
            connective,
            fragments: 0,
            binds: Vec::new(),
            order: None,
        }
    }

    fn push_bind(&mut self, value: BindValue) -> usize {
        self.binds.push(value);
        self.binds.len()
    }

    /// Append `column <mode> $n` when `value` is present and non-empty.
    ///
    /// The keyword is written together with its predicate, so the statement
    /// never ends in a dangling `WHERE` / `AND` / `OR`.
    pub fn filter(&mut self, column: &'static str, mode: MatchMode, value: Option<&str>) -> &mut Self {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return self;
        };

        let keyword = if self.fragments == 0 {
            "WHERE"
        } else {
            self.connective.as_sql()
        };
        let placeholder = self.push_bind(BindValue::Text(mode.bind_value(value)));

        self.sql.push(' ');
        self.sql.push_str(keyword);
        self.sql.push(' ');
        self.sql.push_str(&mode.predicate(column, placeholder));
        self.fragments += 1;
        self
    }

    /// Sort by `column` when a direction is given. Written after every filter.
    pub fn order_by(&mut self, column: &'static str, direction: Option<SortDirection>) -> &mut Self {
        self.order = direction.map(|d| (column, d));
        self
    }

    pub fn paginate(mut self, page: Page) -> ComposedQuery {
        if let Some((column, direction)) = self.order {
            self.sql.push_str(" ORDER BY ");
            self.sql.push_str(column);
            self.sql.push(' ');
            self.sql.push_str(direction.as_sql());
        }

        let offset = self.push_bind(BindValue::Int(page.offset));
        let limit = self.push_bind(BindValue::Int(page.limit));
        self.sql
            .push_str(&format!(" OFFSET ${offset} LIMIT ${limit}"));

        ComposedQuery {
            sql: self.sql,
            binds: self.binds,
            fragments: self.fragments,
        }
    }
}

/// Final statement plus its positional parameters.
#[derive(Debug, Clone)]
pub struct ComposedQuery {
    sql: String,
    binds: Vec<BindValue>,
    fragments: usize,
}

impl ComposedQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    /// Number of filter predicates; always `binds().len() - 2`.
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// Execute and map every row. No rows is an empty `Vec`, not an error.
    pub async fn fetch_all<T>(self, db: &PgPool) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let ComposedQuery { sql, binds, .. } = self;

        let mut query = sqlx::query_as::<_, T>(&sql);
        for value in binds {
            query = match value {
                BindValue::Text(v) => query.bind(v),
                BindValue::Int(v) => query.bind(v),
            };
        }

        query.fetch_all(db).await
    }
}
