//! Object identifiers, schema-qualified names, and quoting helpers.

/// Catalog object identifier.
pub type Oid = u32;

/// A schema-qualified catalog object (table, sequence, view, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Relation {
    pub schema_oid: Oid,
    pub relation_oid: Oid,
    pub schema_name: String,
    pub relation_name: String,
}

impl Relation {
    /// A relation with only names filled in; oids are zero.
    pub fn basic(schema_name: &str, relation_name: &str) -> Self {
        Self {
            schema_name: schema_name.to_string(),
            relation_name: relation_name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_oids(mut self, schema_oid: Oid, relation_oid: Oid) -> Self {
        self.schema_oid = schema_oid;
        self.relation_oid = relation_oid;
        self
    }

    /// Quoted `schema.name`
    pub fn fqn(&self) -> String {
        make_fqn(&self.schema_name, &self.relation_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub schema_oid: Oid,
    pub schema_name: String,
}

impl Schema {
    pub fn new(schema_oid: Oid, schema_name: &str) -> Self {
        Self {
            schema_oid,
            schema_name: schema_name.to_string(),
        }
    }

    pub fn quoted_name(&self) -> String {
        quote_ident(&self.schema_name)
    }
}

/// Quote SQL identifier if needed
///
/// Unquoted identifiers fold to lower case, so anything other than a plain
/// lower-case name (or a reserved word) is wrapped in double quotes.
pub fn quote_ident(name: &str) -> String {
    let mut chars = name.chars();
    let plain = match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
        }
        _ => false,
    };

    if plain && !is_reserved_word(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

pub fn make_fqn(schema_name: &str, object_name: &str) -> String {
    format!("{}.{}", quote_ident(schema_name), quote_ident(object_name))
}

/// Double single quotes for use inside a string literal
pub fn escape_literal(text: &str) -> String {
    text.replace('\'', "''")
}

fn is_reserved_word(word: &str) -> bool {
    const RESERVED: &[&str] = &[
        "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric", "both",
        "case", "cast", "check", "collate", "column", "constraint", "create", "current_catalog",
        "current_date", "current_role", "current_time", "current_timestamp", "current_user",
        "default", "deferrable", "desc", "distinct", "do", "else", "end", "except", "false",
        "fetch", "for", "foreign", "from", "grant", "group", "having", "in", "initially",
        "intersect", "into", "lateral", "leading", "limit", "localtime", "localtimestamp", "not",
        "null", "offset", "on", "only", "or", "order", "placing", "primary", "references",
        "returning", "select", "session_user", "some", "symmetric", "table", "then", "to",
        "trailing", "true", "union", "unique", "user", "using", "variadic", "when", "where",
        "window", "with",
    ];
    RESERVED.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("tablename"), "tablename");
        assert_eq!(quote_ident("_col1"), "_col1");
        assert_eq!(quote_ident("WowZa"), "\"WowZa\"");
        assert_eq!(quote_ident("1abc"), "\"1abc\"");
        assert_eq!(quote_ident("has space"), "\"has space\"");
        assert_eq!(quote_ident("select"), "\"select\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(quote_ident(""), "\"\"");
    }

    #[test]
    fn test_fqn() {
        assert_eq!(Relation::basic("public", "WowZa").fqn(), "public.\"WowZa\"");
        assert_eq!(make_fqn("shamwow", "shazam"), "shamwow.shazam");
        assert_eq!(Schema::new(1, "Mixed").quoted_name(), "\"Mixed\"");
    }

    #[test]
    fn test_escape_literal() {
        assert_eq!(escape_literal("it's"), "it''s");
        assert_eq!(escape_literal("plain"), "plain");
    }
}
