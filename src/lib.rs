// MIT License
//
// Copyright (c) 2021 Hajime Nakagami<nakagami@gmail.com>
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Catalog metadata to DDL for PostgreSQL/Greenplum backups
//!
//! Turns catalog rows (schemas, sequences, views, languages, protocols,
//! constraints, indexes, rules, triggers and their privileges) into an
//! ordered stream of DDL that recreates them in an empty database.
//!
//! # Example
//!
//! ```
//! use pgmetadump::{write_predata, CatalogSnapshot, DumpOptions, Schema};
//!
//! let catalog = CatalogSnapshot {
//!     schemas: vec![Schema::new(1, "sales")],
//!     ..Default::default()
//! };
//! let mut out = Vec::new();
//! write_predata(&mut out, &catalog, &DumpOptions::default())?;
//! assert_eq!(String::from_utf8(out).unwrap(), "\n\nCREATE SCHEMA sales;");
//! # Ok::<(), pgmetadump::Error>(())
//! ```

mod catalog;
mod constraints;
mod dump;
mod error;
mod metadata;
mod options;
mod postdata;
mod predata;
mod relation;
mod topo_sort;

pub use catalog::{
    Constraint, ConstraintKind, ExternalProtocol, FunctionInfo, FunctionInfoMap, ProceduralLanguage,
    Sequence, SequenceDefinition, SimpleDefinition, ViewDefinition,
};
pub use constraints::{
    construct_constraints_for_all_tables, print_constraint_statements, process_constraints,
};
pub use dump::{write_postdata, write_predata, CatalogSnapshot};
pub use error::{Error, Result};
pub use metadata::{
    lookup, print_object_metadata, Acl, MetadataMap, ObjectKind, ObjectMetadata, Privilege,
};
pub use options::DumpOptions;
pub use postdata::{
    aggregate, get_index_definitions, get_rule_definitions, get_trigger_definitions,
    print_create_index_statements, print_postdata_create_statements,
};
pub use predata::{
    has_user_defined_function, is_default_max_value, is_default_min_value,
    print_create_external_protocol_statements, print_create_language_statements,
    print_create_schema_statements, print_create_sequence_statements, print_create_view_statements,
    sequence_definition, SEQ_MAXVALUE, SEQ_MINVALUE,
};
pub use relation::{escape_literal, make_fqn, quote_ident, Oid, Relation, Schema};
pub use topo_sort::{sort_objects, Graph};
