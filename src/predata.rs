//! Pre-data DDL: objects that must exist before table data is restored
//!
//! Output layout for every object follows the same convention: the
//! definition is preceded by a blank line, and the metadata trailer from
//! [`crate::metadata`] follows it.

use std::collections::HashMap;
use std::io::Write;

use tracing::debug;

use crate::catalog::{
    ExternalProtocol, FunctionInfo, FunctionInfoMap, ProceduralLanguage, Sequence, ViewDefinition,
};
use crate::error::{Error, Result};
use crate::metadata::{lookup, print_object_metadata, MetadataMap, ObjectKind};
use crate::options::DumpOptions;
use crate::relation::{escape_literal, make_fqn, quote_ident, Oid, Schema};

/// Catalog value of an unbounded ascending sequence's maximum.
pub const SEQ_MAXVALUE: i64 = i64::MAX;
/// Catalog value of an unbounded descending sequence's minimum.
pub const SEQ_MINVALUE: i64 = i64::MIN + 1;

// ============================================================================
// SCHEMAS
// ============================================================================
pub fn print_create_schema_statements<W: Write>(
    out: &mut W,
    schemas: &[Schema],
    schema_metadata: &MetadataMap,
    options: &DumpOptions,
) -> Result<()> {
    debug!("Writing CREATE SCHEMA statements for {} schemas", schemas.len());
    for schema in schemas {
        let name = schema.quoted_name();
        writeln!(out)?;
        if schema.schema_name != options.public_schema {
            write!(out, "\nCREATE SCHEMA {};", name)?;
        }
        let metadata = lookup(schema_metadata, schema.schema_oid);
        print_object_metadata(out, metadata, &name, ObjectKind::Schema)?;
    }
    Ok(())
}

// ============================================================================
// SEQUENCES
// ============================================================================

/// `true` when `MAXVALUE` is the type's implicit bound and must print as
/// `NO MAXVALUE`.
pub fn is_default_max_value(max_value: i64, increment: i64) -> bool {
    (max_value == SEQ_MAXVALUE && increment > 0) || (max_value == -1 && increment < 0)
}

pub fn is_default_min_value(min_value: i64, increment: i64) -> bool {
    (min_value == SEQ_MINVALUE && increment < 0) || (min_value == 1 && increment > 0)
}

/// Renders `CREATE SEQUENCE`, the `setval` call restoring its position, and
/// the optional `OWNED BY` clause.
///
/// `column_owners` maps a sequence FQN to its already-quoted owning column.
pub fn sequence_definition(sequence: &Sequence, column_owners: &HashMap<String, String>) -> String {
    let def = &sequence.definition;
    let fqn = sequence.relation.fqn();
    let mut ddl = format!("\n\nCREATE SEQUENCE {}\n", fqn);

    if !def.is_called {
        ddl.push_str(&format!("\tSTART WITH {}\n", def.last_value));
    }
    ddl.push_str(&format!("\tINCREMENT BY {}\n", def.increment));

    if is_default_max_value(def.max_value, def.increment) {
        ddl.push_str("\tNO MAXVALUE\n");
    } else {
        ddl.push_str(&format!("\tMAXVALUE {}\n", def.max_value));
    }
    if is_default_min_value(def.min_value, def.increment) {
        ddl.push_str("\tNO MINVALUE\n");
    } else {
        ddl.push_str(&format!("\tMINVALUE {}\n", def.min_value));
    }

    let cycle = if def.is_cycled { "\n\tCYCLE" } else { "" };
    ddl.push_str(&format!("\tCACHE {}{};", def.cache_value, cycle));

    ddl.push_str(&format!(
        "\n\nSELECT pg_catalog.setval('{}', {}, {});\n",
        escape_literal(&fqn),
        def.last_value,
        def.is_called
    ));

    if let Some(owning_column) = column_owners.get(&fqn) {
        ddl.push_str(&format!("\n\nALTER SEQUENCE {} OWNED BY {};\n", fqn, owning_column));
    }
    ddl
}

pub fn print_create_sequence_statements<W: Write>(
    out: &mut W,
    sequences: &[Sequence],
    column_owners: &HashMap<String, String>,
    sequence_metadata: &MetadataMap,
) -> Result<()> {
    debug!("Writing CREATE SEQUENCE statements for {} sequences", sequences.len());
    for sequence in sequences {
        out.write_all(sequence_definition(sequence, column_owners).as_bytes())?;
        print_object_metadata(
            out,
            lookup(sequence_metadata, sequence.relation.relation_oid),
            &sequence.relation.fqn(),
            ObjectKind::Sequence,
        )?;
    }
    Ok(())
}

// ============================================================================
// PROCEDURAL LANGUAGES
// ============================================================================
fn resolve_function(func_info: &FunctionInfoMap, oid: Oid) -> Result<&FunctionInfo> {
    func_info.get(&oid).ok_or(Error::UnknownFunction(oid))
}

/// Support functions are owned by the language's owner, not by whoever
/// created them.
pub fn print_create_language_statements<W: Write>(
    out: &mut W,
    languages: &[ProceduralLanguage],
    func_info: &FunctionInfoMap,
    language_metadata: &MetadataMap,
) -> Result<()> {
    debug!("Writing CREATE LANGUAGE statements for {} languages", languages.len());
    for language in languages {
        let owner = quote_ident(&language.owner);
        let name = quote_ident(&language.name);
        let trusted = if language.trusted { "TRUSTED " } else { "" };
        write!(out, "\n\nCREATE {}PROCEDURAL LANGUAGE {};", trusted, name)?;

        for oid in [language.handler, language.inline, language.validator] {
            if oid == 0 {
                continue;
            }
            let function = resolve_function(func_info, oid)?;
            write!(
                out,
                "\nALTER FUNCTION {}({}) OWNER TO {};",
                function.qualified_name, function.arguments, owner
            )?;
        }

        let metadata = lookup(language_metadata, language.oid);
        print_object_metadata(out, metadata, &name, ObjectKind::Language)?;
        writeln!(out)?;
    }
    Ok(())
}

// ============================================================================
// VIEWS
// ============================================================================
pub fn print_create_view_statements<W: Write>(
    out: &mut W,
    views: &[ViewDefinition],
    view_metadata: &MetadataMap,
) -> Result<()> {
    debug!("Writing CREATE VIEW statements for {} views", views.len());
    for view in views {
        let fqn = make_fqn(&view.schema_name, &view.view_name);
        write!(out, "\n\nCREATE VIEW {} AS {}\n", fqn, view.definition)?;
        print_object_metadata(out, lookup(view_metadata, view.oid), &fqn, ObjectKind::View)?;
    }
    Ok(())
}

// ============================================================================
// EXTERNAL PROTOCOLS
// ============================================================================

/// A protocol needs DDL only if at least one of its functions is user
/// defined. Ids missing from the map do not count as user defined.
pub fn has_user_defined_function(protocol: &ExternalProtocol, func_info: &FunctionInfoMap) -> bool {
    [protocol.read_function, protocol.write_function, protocol.validator]
        .iter()
        .any(|oid| func_info.get(oid).is_some_and(|f| !f.is_internal))
}

pub fn print_create_external_protocol_statements<W: Write>(
    out: &mut W,
    protocols: &[ExternalProtocol],
    func_info: &FunctionInfoMap,
) -> Result<()> {
    debug!("Writing CREATE PROTOCOL statements for {} protocols", protocols.len());
    for protocol in protocols {
        if !has_user_defined_function(protocol, func_info) {
            debug!("Skipping protocol {}: all functions are internal", protocol.name);
            continue;
        }

        let mut functions = Vec::new();
        for (label, oid) in [
            ("readfunc", protocol.read_function),
            ("writefunc", protocol.write_function),
            ("validatorfunc", protocol.validator),
        ] {
            if oid != 0 {
                let function = resolve_function(func_info, oid)?;
                functions.push(format!("{} = {}", label, function.qualified_name));
            }
        }

        let name = quote_ident(&protocol.name);
        let trusted = if protocol.trusted { "TRUSTED " } else { "" };
        write!(out, "\n\nCREATE {}PROTOCOL {} ({});", trusted, name, functions.join(", "))?;

        if !protocol.owner.is_empty() {
            let owner = quote_ident(&protocol.owner);
            write!(out, "\n\nALTER PROTOCOL {} OWNER TO {};\n", name, owner)?;
        }
    }
    Ok(())
}
