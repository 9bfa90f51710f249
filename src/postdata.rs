//! Post-data DDL: indexes, rules and triggers, restored after table data
//!
//! The server renders these definitions itself, so each one only needs a
//! terminating semicolon. None of them reference each other, so the final
//! output is ordered by statement text rather than by dependency. This keeps
//! repeated backups of the same catalog byte-for-byte identical.

use std::io::Write;

use tracing::debug;

use crate::catalog::SimpleDefinition;
use crate::error::Result;
use crate::metadata::{lookup, MetadataMap, ObjectKind};
use crate::options::DumpOptions;
use crate::relation::{escape_literal, make_fqn, quote_ident};

fn terminated(definition: &str) -> String {
    if definition.trim_end().ends_with(';') {
        definition.to_string()
    } else {
        format!("{};", definition)
    }
}

fn index_definition(index: &SimpleDefinition, index_metadata: &MetadataMap) -> String {
    let mut ddl = format!("\n\n{}", terminated(&index.definition));
    ddl.push_str(&lookup(index_metadata, index.oid).render(&index.name, ObjectKind::Index));
    ddl
}

/// Writes indexes in catalog order, each followed by its metadata.
pub fn print_create_index_statements<W: Write>(
    out: &mut W,
    indexes: &[SimpleDefinition],
    index_metadata: &MetadataMap,
) -> Result<()> {
    debug!("Writing CREATE INDEX statements for {} indexes", indexes.len());
    for index in indexes {
        out.write_all(index_definition(index, index_metadata).as_bytes())?;
    }
    Ok(())
}

pub fn get_index_definitions(
    indexes: &[SimpleDefinition],
    index_metadata: &MetadataMap,
) -> Vec<String> {
    indexes
        .iter()
        .map(|index| index_definition(index, index_metadata))
        .collect()
}

fn commented_definition(object: &SimpleDefinition, keyword: &str, with_comment: bool) -> String {
    let mut ddl = format!("\n\n{}", terminated(&object.definition));
    if with_comment && !object.comment.is_empty() {
        ddl.push_str(&format!(
            "\nCOMMENT ON {} {} ON {} IS '{}';",
            keyword,
            quote_ident(&object.name),
            make_fqn(&object.owning_schema, &object.owning_table),
            escape_literal(&object.comment)
        ));
    }
    ddl
}

/// Rule comments are written only when `options.rule_comments` is set.
pub fn get_rule_definitions(rules: &[SimpleDefinition], options: &DumpOptions) -> Vec<String> {
    rules
        .iter()
        .map(|rule| commented_definition(rule, "RULE", options.rule_comments))
        .collect()
}

/// Trigger comments are written only when `options.trigger_comments` is set.
pub fn get_trigger_definitions(
    triggers: &[SimpleDefinition],
    options: &DumpOptions,
) -> Vec<String> {
    triggers
        .iter()
        .map(|trigger| commented_definition(trigger, "TRIGGER", options.trigger_comments))
        .collect()
}

/// Sorts statements byte-wise and joins them with newlines.
pub fn aggregate(mut statements: Vec<String>) -> String {
    statements.sort();
    statements.join("\n")
}

/// Sorts statements byte-wise and writes each on its own line.
pub fn print_postdata_create_statements<W: Write>(
    out: &mut W,
    mut statements: Vec<String>,
) -> Result<()> {
    statements.sort();
    for statement in &statements {
        writeln!(out, "{}", statement)?;
    }
    Ok(())
}
