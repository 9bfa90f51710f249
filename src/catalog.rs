//! Catalog row types
//!
//! These are the values handed over by the catalog query layer. Every field is
//! assumed populated; nothing here validates rows.

use std::collections::HashMap;

use super::error::Error;
use super::relation::{Oid, Relation};

/// A function referenced by id from a language or protocol.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionInfo {
    pub qualified_name: String,
    /// Argument signature without parentheses, e.g. `internal` or `oid`
    pub arguments: String,
    /// Built in to the server, no DDL needed to recreate it
    pub is_internal: bool,
}

impl FunctionInfo {
    pub fn new(qualified_name: &str, arguments: &str, is_internal: bool) -> Self {
        Self {
            qualified_name: qualified_name.to_string(),
            arguments: arguments.to_string(),
            is_internal,
        }
    }
}

pub type FunctionInfoMap = HashMap<Oid, FunctionInfo>;

/// Current state of a sequence, as read from the sequence relation itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceDefinition {
    pub last_value: i64,
    pub increment: i64,
    pub max_value: i64,
    pub min_value: i64,
    pub cache_value: i64,
    pub is_cycled: bool,
    pub is_called: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub relation: Relation,
    pub definition: SequenceDefinition,
}

impl Sequence {
    pub fn new(relation: Relation, definition: SequenceDefinition) -> Self {
        Self { relation, definition }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProceduralLanguage {
    pub oid: Oid,
    pub name: String,
    pub owner: String,
    pub trusted: bool,
    /// Zero when absent
    pub handler: Oid,
    pub inline: Oid,
    pub validator: Oid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDefinition {
    pub oid: Oid,
    pub schema_name: String,
    pub view_name: String,
    /// Complete `SELECT`, used verbatim
    pub definition: String,
}

impl ViewDefinition {
    pub fn new(oid: Oid, schema_name: &str, view_name: &str, definition: &str) -> Self {
        Self {
            oid,
            schema_name: schema_name.to_string(),
            view_name: view_name.to_string(),
            definition: definition.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProtocol {
    pub name: String,
    pub owner: String,
    pub trusted: bool,
    pub read_function: Oid,
    pub write_function: Oid,
    pub validator: Oid,
}

impl ExternalProtocol {
    pub fn new(
        name: &str,
        owner: &str,
        trusted: bool,
        read: Oid,
        write: Oid,
        validator: Oid,
    ) -> Self {
        Self {
            name: name.to_string(),
            owner: owner.to_string(),
            trusted,
            read_function: read,
            write_function: write,
            validator,
        }
    }
}

/// An index, rule, or trigger whose full definition the server already renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleDefinition {
    pub oid: Oid,
    pub name: String,
    pub owning_schema: String,
    pub owning_table: String,
    pub definition: String,
    pub comment: String,
}

impl SimpleDefinition {
    pub fn new(
        oid: Oid,
        name: &str,
        owning_schema: &str,
        owning_table: &str,
        definition: &str,
    ) -> Self {
        Self {
            oid,
            name: name.to_string(),
            owning_schema: owning_schema.to_string(),
            owning_table: owning_table.to_string(),
            definition: definition.to_string(),
            comment: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Unique,
    PrimaryKey,
    ForeignKey,
    Check,
}

impl TryFrom<char> for ConstraintKind {
    type Error = Error;

    /// Maps `pg_constraint.contype`
    fn try_from(code: char) -> Result<Self, Self::Error> {
        match code {
            'u' => Ok(ConstraintKind::Unique),
            'p' => Ok(ConstraintKind::PrimaryKey),
            'f' => Ok(ConstraintKind::ForeignKey),
            'c' => Ok(ConstraintKind::Check),
            other => Err(Error::UnknownConstraintKind(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub name: String,
    pub kind: ConstraintKind,
    /// e.g. `PRIMARY KEY (i, j)`
    pub definition: String,
    pub comment: String,
}

impl Constraint {
    pub fn new(name: &str, kind: ConstraintKind, definition: &str, comment: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            definition: definition.to_string(),
            comment: comment.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_kind_from_contype() {
        assert_eq!(ConstraintKind::try_from('u').unwrap(), ConstraintKind::Unique);
        assert_eq!(ConstraintKind::try_from('p').unwrap(), ConstraintKind::PrimaryKey);
        assert_eq!(ConstraintKind::try_from('f').unwrap(), ConstraintKind::ForeignKey);
        assert_eq!(ConstraintKind::try_from('c').unwrap(), ConstraintKind::Check);
        match ConstraintKind::try_from('x') {
            Err(Error::UnknownConstraintKind('x')) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
