//! Ownership, comments and privileges attached to catalog objects
//!
//! Every object kind shares the same trailer after its definition: a
//! `COMMENT ON` block, an `ALTER ... OWNER TO` block and a block of
//! `REVOKE`/`GRANT` statements. Each block is omitted entirely when the
//! corresponding field is empty.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use super::error::Result;
use super::relation::{escape_literal, quote_ident, Oid};

/// Kinds of objects that carry metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Table,
    View,
    Sequence,
    Schema,
    Language,
    Index,
    Function,
    Database,
    Protocol,
}

impl ObjectKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ObjectKind::Table => "TABLE",
            ObjectKind::View => "VIEW",
            ObjectKind::Sequence => "SEQUENCE",
            ObjectKind::Schema => "SCHEMA",
            ObjectKind::Language => "LANGUAGE",
            ObjectKind::Index => "INDEX",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::Database => "DATABASE",
            ObjectKind::Protocol => "PROTOCOL",
        }
    }

    /// Keyword used with `ALTER ... OWNER TO`; sequences and views are
    /// altered as tables.
    fn owner_keyword(self) -> &'static str {
        match self {
            ObjectKind::Sequence | ObjectKind::View => "TABLE",
            other => other.keyword(),
        }
    }

    /// `GRANT ... ON <target>` prefix. There is no `ON VIEW` form.
    fn privilege_target(self, name: &str) -> String {
        match self {
            ObjectKind::View => name.to_string(),
            other => format!("{} {}", other.keyword(), name),
        }
    }

    /// Everything the owner holds on a freshly created object of this kind.
    pub fn default_privileges(self) -> &'static [Privilege] {
        use Privilege::*;
        match self {
            ObjectKind::Table | ObjectKind::View => {
                &[Select, Insert, Update, Delete, Truncate, References, Trigger]
            }
            ObjectKind::Sequence => &[Select, Update, Usage],
            ObjectKind::Schema => &[Usage, Create],
            ObjectKind::Language => &[Usage],
            ObjectKind::Function => &[Execute],
            ObjectKind::Database => &[Create, Temporary, Connect],
            ObjectKind::Protocol => &[Select, Insert],
            ObjectKind::Index => &[],
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A single grantable capability, listed in the order verbs are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Privilege {
    Select,
    Insert,
    Update,
    Delete,
    Truncate,
    References,
    Trigger,
    Usage,
    Execute,
    Create,
    Temporary,
    Connect,
}

impl Privilege {
    pub const ALL: [Privilege; 12] = [
        Privilege::Select,
        Privilege::Insert,
        Privilege::Update,
        Privilege::Delete,
        Privilege::Truncate,
        Privilege::References,
        Privilege::Trigger,
        Privilege::Usage,
        Privilege::Execute,
        Privilege::Create,
        Privilege::Temporary,
        Privilege::Connect,
    ];

    pub fn verb(self) -> &'static str {
        match self {
            Privilege::Select => "SELECT",
            Privilege::Insert => "INSERT",
            Privilege::Update => "UPDATE",
            Privilege::Delete => "DELETE",
            Privilege::Truncate => "TRUNCATE",
            Privilege::References => "REFERENCES",
            Privilege::Trigger => "TRIGGER",
            Privilege::Usage => "USAGE",
            Privilege::Execute => "EXECUTE",
            Privilege::Create => "CREATE",
            Privilege::Temporary => "TEMPORARY",
            Privilege::Connect => "CONNECT",
        }
    }
}

/// One grantee's capabilities on an object. An empty grantee is `PUBLIC`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Acl {
    pub grantee: String,
    pub select: bool,
    pub insert: bool,
    pub update: bool,
    pub delete: bool,
    pub truncate: bool,
    pub references: bool,
    pub trigger: bool,
    pub usage: bool,
    pub execute: bool,
    pub create: bool,
    pub temporary: bool,
    pub connect: bool,
}

impl Acl {
    pub fn new(grantee: &str) -> Self {
        Self {
            grantee: grantee.to_string(),
            ..Default::default()
        }
    }

    /// An entry holding every default privilege of `kind`.
    pub fn default_for_kind(grantee: &str, kind: ObjectKind) -> Self {
        let mut acl = Acl::new(grantee);
        for &privilege in kind.default_privileges() {
            acl.set(privilege, true);
        }
        acl
    }

    pub fn has(&self, privilege: Privilege) -> bool {
        match privilege {
            Privilege::Select => self.select,
            Privilege::Insert => self.insert,
            Privilege::Update => self.update,
            Privilege::Delete => self.delete,
            Privilege::Truncate => self.truncate,
            Privilege::References => self.references,
            Privilege::Trigger => self.trigger,
            Privilege::Usage => self.usage,
            Privilege::Execute => self.execute,
            Privilege::Create => self.create,
            Privilege::Temporary => self.temporary,
            Privilege::Connect => self.connect,
        }
    }

    pub fn set(&mut self, privilege: Privilege, value: bool) {
        let flag = match privilege {
            Privilege::Select => &mut self.select,
            Privilege::Insert => &mut self.insert,
            Privilege::Update => &mut self.update,
            Privilege::Delete => &mut self.delete,
            Privilege::Truncate => &mut self.truncate,
            Privilege::References => &mut self.references,
            Privilege::Trigger => &mut self.trigger,
            Privilege::Usage => &mut self.usage,
            Privilege::Execute => &mut self.execute,
            Privilege::Create => &mut self.create,
            Privilege::Temporary => &mut self.temporary,
            Privilege::Connect => &mut self.connect,
        };
        *flag = value;
    }

    pub fn is_public(&self) -> bool {
        self.grantee.is_empty()
    }

    fn grantee_sql(&self) -> String {
        if self.is_public() {
            "PUBLIC".to_string()
        } else {
            quote_ident(&self.grantee)
        }
    }

    /// Privileges held that apply to `kind`; flags outside the kind are ignored.
    pub fn granted(&self, kind: ObjectKind) -> Vec<Privilege> {
        Privilege::ALL
            .iter()
            .copied()
            .filter(|p| kind.default_privileges().contains(p) && self.has(*p))
            .collect()
    }

    /// `ALL` when the full default set is held, otherwise the verb list.
    /// `None` when nothing applicable is held.
    fn grant_list(&self, kind: ObjectKind) -> Option<String> {
        let granted = self.granted(kind);
        if granted.is_empty() {
            None
        } else if granted.len() == kind.default_privileges().len() {
            Some("ALL".to_string())
        } else {
            let verbs: Vec<&str> = granted.iter().map(|p| p.verb()).collect();
            Some(verbs.join(","))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectMetadata {
    pub privileges: Vec<Acl>,
    pub owner: String,
    pub comment: String,
}

pub type MetadataMap = HashMap<Oid, ObjectMetadata>;

static EMPTY_METADATA: ObjectMetadata = ObjectMetadata {
    privileges: Vec::new(),
    owner: String::new(),
    comment: String::new(),
};

/// Metadata recorded for `oid`, or an empty record.
pub fn lookup(map: &MetadataMap, oid: Oid) -> &ObjectMetadata {
    map.get(&oid).unwrap_or(&EMPTY_METADATA)
}

impl ObjectMetadata {
    pub fn comment_statement(&self, object_name: &str, kind: ObjectKind) -> String {
        if self.comment.is_empty() {
            return String::new();
        }
        format!(
            "\n\nCOMMENT ON {} {} IS '{}';\n",
            kind,
            object_name,
            escape_literal(&self.comment)
        )
    }

    pub fn owner_statement(&self, object_name: &str, kind: ObjectKind) -> String {
        if self.owner.is_empty() {
            return String::new();
        }
        format!(
            "\n\nALTER {} {} OWNER TO {};\n",
            kind.owner_keyword(),
            object_name,
            quote_ident(&self.owner)
        )
    }

    /// Revoke everything a fresh object starts with, then grant back exactly
    /// what the catalog recorded. `PUBLIC` grants come last.
    ///
    /// Kinds with no grantable privileges (indexes) never get a block.
    pub fn privileges_statements(&self, object_name: &str, kind: ObjectKind) -> String {
        if self.privileges.is_empty() || kind.default_privileges().is_empty() {
            return String::new();
        }

        let target = kind.privilege_target(object_name);
        let mut statements = vec![format!("REVOKE ALL ON {} FROM PUBLIC;", target)];
        if !self.owner.is_empty() {
            statements.push(format!(
                "REVOKE ALL ON {} FROM {};",
                target,
                quote_ident(&self.owner)
            ));
        }

        let (public, named): (Vec<&Acl>, Vec<&Acl>) =
            self.privileges.iter().partition(|acl| acl.is_public());
        for acl in named.into_iter().chain(public) {
            if let Some(grants) = acl.grant_list(kind) {
                statements.push(format!(
                    "GRANT {} ON {} TO {};",
                    grants,
                    target,
                    acl.grantee_sql()
                ));
            }
        }

        format!("\n\n{}\n", statements.join("\n"))
    }

    /// Non-empty blocks in output order: comment, owner, privileges.
    pub fn statements(&self, object_name: &str, kind: ObjectKind) -> Vec<String> {
        [
            self.comment_statement(object_name, kind),
            self.owner_statement(object_name, kind),
            self.privileges_statements(object_name, kind),
        ]
        .into_iter()
        .filter(|block| !block.is_empty())
        .collect()
    }

    pub fn render(&self, object_name: &str, kind: ObjectKind) -> String {
        self.statements(object_name, kind).concat()
    }
}

pub fn print_object_metadata<W: Write>(
    out: &mut W,
    metadata: &ObjectMetadata,
    object_name: &str,
    kind: ObjectKind,
) -> Result<()> {
    for block in metadata.statements(object_name, kind) {
        out.write_all(block.as_bytes())?;
    }
    Ok(())
}

/// Fixture: oid 1 owned by `testrole` with full default privileges and a comment.
#[cfg(test)]
pub(crate) fn default_metadata_map(kind: ObjectKind) -> MetadataMap {
    let lower = kind.keyword().to_lowercase();
    let article = match lower.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    };
    let mut map = MetadataMap::new();
    map.insert(
        1,
        ObjectMetadata {
            privileges: vec![Acl::default_for_kind("testrole", kind)],
            owner: "testrole".to_string(),
            comment: format!("This is {} {} comment.", article, lower),
        },
    );
    map
}
