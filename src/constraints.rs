//! Table constraints
//!
//! There is no server-side function that renders a whole constraint
//! statement, so they are assembled here. Foreign keys may reference a
//! primary key or unique constraint on any other table, so they are kept in
//! a separate group that is written after every other constraint.

use std::collections::HashMap;
use std::io::Write;

use tracing::debug;

use crate::catalog::{Constraint, ConstraintKind};
use crate::error::Result;
use crate::relation::{escape_literal, quote_ident, Oid, Relation};

/// Renders each constraint of `table`, returning `(ordinary, foreign_keys)`.
/// Per-table order is preserved within each group.
pub fn process_constraints(
    table: &Relation,
    constraints: &[Constraint],
) -> (Vec<String>, Vec<String>) {
    let table_fqn = table.fqn();
    let mut cons = Vec::new();
    let mut fk_cons = Vec::new();

    for constraint in constraints {
        let name = quote_ident(&constraint.name);
        let mut statement = format!(
            "\n\nALTER TABLE ONLY {} ADD CONSTRAINT {} {};",
            table_fqn, name, constraint.definition
        );
        if !constraint.comment.is_empty() {
            statement.push_str(&format!(
                "\n\nCOMMENT ON CONSTRAINT {} ON {} IS '{}';",
                name,
                table_fqn,
                escape_literal(&constraint.comment)
            ));
        }

        match constraint.kind {
            ConstraintKind::ForeignKey => fk_cons.push(statement),
            ConstraintKind::Unique | ConstraintKind::PrimaryKey | ConstraintKind::Check => {
                cons.push(statement)
            }
        }
    }
    (cons, fk_cons)
}

/// Runs [`process_constraints`] for every table and concatenates the groups.
/// `constraints_by_table` is keyed by table oid; tables without an entry
/// contribute nothing.
pub fn construct_constraints_for_all_tables(
    tables: &[Relation],
    constraints_by_table: &HashMap<Oid, Vec<Constraint>>,
) -> (Vec<String>, Vec<String>) {
    let mut all_cons = Vec::new();
    let mut all_fk_cons = Vec::new();
    for table in tables {
        let Some(constraints) = constraints_by_table.get(&table.relation_oid) else {
            continue;
        };
        let (cons, fk_cons) = process_constraints(table, constraints);
        all_cons.extend(cons);
        all_fk_cons.extend(fk_cons);
    }
    debug!(
        "Built {} constraints and {} foreign key constraints for {} tables",
        all_cons.len(),
        all_fk_cons.len(),
        tables.len()
    );
    (all_cons, all_fk_cons)
}

/// Writes every ordinary constraint, then every foreign key, each group in
/// byte-wise order.
pub fn print_constraint_statements<W: Write>(
    out: &mut W,
    mut constraints: Vec<String>,
    mut fk_constraints: Vec<String>,
) -> Result<()> {
    constraints.sort();
    fk_constraints.sort();
    for constraint in constraints.iter().chain(fk_constraints.iter()) {
        writeln!(out, "{}", constraint)?;
    }
    Ok(())
}
