//! Query assembly.
//!
//! [`QueryBuilder`] stitches caller-supplied clauses and compiled AGQL
//! fragments into one MySQL statement:
//!
//! ```text
//! SELECT <select> FROM <table> [WHERE <filter> [AND <extra>]] [ORDER BY <order>] [<limit>]
//! ```

use serde::Serialize;

// =============================================================================
// Query
// =============================================================================

/// A bind parameter for a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Parameter {
    Int(i64),
    Float(f64),
    Text(String),
}

/// An executable SQL statement with its positional parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub sql: String,
    pub parameters: Vec<Parameter>,
}

impl Query {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            parameters: Vec::new(),
        }
    }

    /// Number of `?` placeholders outside string literals and quoted
    /// identifiers.
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        scan(&self.sql, |_, c, _| {
            if c == '?' {
                count += 1;
            }
            true
        });
        count
    }

    /// Whether every placeholder has exactly one parameter.
    pub fn is_aligned(&self) -> bool {
        self.placeholder_count() == self.parameters.len()
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql)
    }
}

// =============================================================================
// Condition
// =============================================================================

/// A compiled WHERE condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub sql: String,
    /// The top-level connective is `OR`.
    pub disjunction: bool,
}

impl Condition {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            disjunction: false,
        }
    }

    pub fn disjunction(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            disjunction: true,
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Fluent builder for a [`Query`].
#[derive(Debug, Clone, Default)]
#[must_use = "builders have no effect until used"]
pub struct QueryBuilder {
    select: String,
    from: String,
    filter: Option<Condition>,
    extra_where: Option<String>,
    order_by: Vec<String>,
    limit: Option<String>,
    parameters: Vec<Parameter>,
}

impl QueryBuilder {
    pub fn new(select: &str, from: &str) -> Self {
        Self {
            select: select.into(),
            from: from.into(),
            ..Self::default()
        }
    }

    /// Set the compiled filter. A blank condition is ignored.
    pub fn filter(mut self, condition: Condition) -> Self {
        if condition.sql.trim().is_empty() {
            self.filter = None;
        } else {
            self.filter = Some(condition);
        }
        self
    }

    /// Add a raw SQL condition AND-ed with the filter. Never parsed.
    pub fn extra_where(mut self, sql: Option<&str>) -> Self {
        self.extra_where = non_blank(sql);
        self
    }

    pub fn order_by_all(mut self, terms: impl IntoIterator<Item = String>) -> Self {
        self.order_by.extend(terms);
        self
    }

    /// Set the raw LIMIT clause, e.g. `LIMIT 1,1`. A blank clause is ignored.
    pub fn limit(mut self, clause: Option<&str>) -> Self {
        self.limit = non_blank(clause);
        self
    }

    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn build(self) -> Query {
        let mut sql = format!("SELECT {} FROM {}", self.select, self.from);

        match (&self.filter, &self.extra_where) {
            (Some(filter), Some(extra)) => {
                let filter = if filter.disjunction {
                    format!("({})", filter.sql)
                } else {
                    filter.sql.clone()
                };
                let extra = if is_enclosed(extra) {
                    extra.clone()
                } else {
                    format!("({})", extra)
                };
                sql.push_str(&format!(" WHERE {} AND {}", filter, extra));
            }
            (Some(filter), None) => {
                sql.push_str(" WHERE ");
                sql.push_str(&filter.sql);
            }
            (None, Some(extra)) => {
                sql.push_str(" WHERE ");
                sql.push_str(extra);
            }
            (None, None) => {}
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        if let Some(limit) = &self.limit {
            sql.push(' ');
            sql.push_str(limit);
        }

        Query {
            sql,
            parameters: self.parameters,
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

// =============================================================================
// Lexical helpers
// =============================================================================

/// Walk `sql`, calling `visit(index, char, depth)` for every character
/// outside quotes. Stops early when `visit` returns false.
fn scan(sql: &str, mut visit: impl FnMut(usize, char, usize) -> bool) {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in sql.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if !visit(i, c, depth) {
            return;
        }
    }
}

/// Whether one balanced pair of parentheses encloses all of `sql`.
pub fn is_enclosed(sql: &str) -> bool {
    let sql = sql.trim();
    if !sql.starts_with('(') || !sql.ends_with(')') {
        return false;
    }
    let last = sql.len() - 1;
    let mut enclosed = true;
    let mut closed_at = None;
    scan(sql, |i, c, depth| {
        if c == ')' && depth == 0 {
            closed_at = Some(i);
            if i != last {
                enclosed = false;
                return false;
            }
        }
        true
    });
    enclosed && closed_at == Some(last)
}
