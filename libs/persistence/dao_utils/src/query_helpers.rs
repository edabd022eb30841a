use tokio_postgres::types::ToSql;

// Type aliases for PostgreSQL parameter types
pub type PgParam = dyn ToSql + Sync;
pub type PgSendParam = dyn ToSql + Sync + Send;
pub type PgParamBox = Box<PgSendParam>;
pub type PgParamVec = Vec<PgParamBox>;

/// Escapes `LIKE` wildcards so user text matches literally.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Accumulates `AND`-joined predicates with positional `$n` parameters.
///
/// Each clause marks its parameter slot with `{}`; the slot is rewritten to
/// the next free placeholder, so callers never count parameters by hand.
#[derive(Default)]
pub struct FilterBuilder {
    clauses: Vec<String>,
    params: PgParamVec,
}

impl FilterBuilder {
    pub fn new() -> Self { Self::default() }

    /// Number of positional parameters bound so far.
    pub fn len(&self) -> usize { self.params.len() }

    pub fn is_empty(&self) -> bool { self.clauses.is_empty() }

    pub fn push<P>(&mut self, clause: &str, param: P) -> &mut Self
    where
        P: ToSql + Sync + Send + 'static,
    {
        self.params.push(Box::new(param));
        let placeholder = format!("${}", self.params.len());
        self.clauses.push(clause.replace("{}", &placeholder));
        self
    }

    pub fn push_opt<P>(&mut self, clause: &str, param: Option<P>) -> &mut Self
    where
        P: ToSql + Sync + Send + 'static,
    {
        if let Some(param) = param {
            self.push(clause, param);
        }
        self
    }

    /// `" WHERE a AND b"`, or an empty string when nothing was pushed.
    pub fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            return String::new();
        }
        format!(" WHERE {}", self.clauses.join(" AND "))
    }

    pub fn params(&self) -> Vec<&PgParam> {
        self.params.iter().map(|p| p.as_ref() as &PgParam).collect()
    }
}
