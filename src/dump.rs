//! Full predata/postdata passes over a catalog snapshot
//!
//! The object kinds are written in the order they must be recreated:
//! schemas first, constraints last, and everything that depends on table
//! data deferred to the post-data pass.

use std::collections::HashMap;
use std::io::Write;

use tracing::info;

use crate::catalog::{
    Constraint, ExternalProtocol, FunctionInfoMap, ProceduralLanguage, Sequence, SimpleDefinition,
    ViewDefinition,
};
use crate::constraints::{construct_constraints_for_all_tables, print_constraint_statements};
use crate::error::Result;
use crate::metadata::MetadataMap;
use crate::options::DumpOptions;
use crate::postdata::{
    get_index_definitions, get_rule_definitions, get_trigger_definitions,
    print_postdata_create_statements,
};
use crate::predata::{
    print_create_external_protocol_statements, print_create_language_statements,
    print_create_schema_statements, print_create_sequence_statements, print_create_view_statements,
};
use crate::relation::{Oid, Relation, Schema};
use crate::topo_sort::sort_objects;

/// Everything the catalog query layer hands over for one backup run.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub schemas: Vec<Schema>,
    pub schema_metadata: MetadataMap,

    pub languages: Vec<ProceduralLanguage>,
    pub language_metadata: MetadataMap,
    pub functions: FunctionInfoMap,

    pub protocols: Vec<ExternalProtocol>,

    pub sequences: Vec<Sequence>,
    /// Sequence FQN to already-quoted owning column
    pub sequence_owners: HashMap<String, String>,
    pub sequence_metadata: MetadataMap,

    pub views: Vec<ViewDefinition>,
    /// `(from, to)`: view `from` must exist before view `to`
    pub view_dependencies: Vec<(Oid, Oid)>,
    pub view_metadata: MetadataMap,

    pub tables: Vec<Relation>,
    /// Keyed by table oid
    pub constraints: HashMap<Oid, Vec<Constraint>>,

    pub indexes: Vec<SimpleDefinition>,
    pub index_metadata: MetadataMap,
    pub rules: Vec<SimpleDefinition>,
    pub triggers: Vec<SimpleDefinition>,
}

/// Writes every object that must exist before table data is loaded.
pub fn write_predata<W: Write>(
    out: &mut W,
    catalog: &CatalogSnapshot,
    options: &DumpOptions,
) -> Result<()> {
    info!("Writing pre-data metadata");

    print_create_schema_statements(out, &catalog.schemas, &catalog.schema_metadata, options)?;
    print_create_language_statements(
        out,
        &catalog.languages,
        &catalog.functions,
        &catalog.language_metadata,
    )?;
    print_create_external_protocol_statements(out, &catalog.protocols, &catalog.functions)?;
    print_create_sequence_statements(
        out,
        &catalog.sequences,
        &catalog.sequence_owners,
        &catalog.sequence_metadata,
    )?;

    let views = sort_objects(catalog.views.clone(), &catalog.view_dependencies, |view| view.oid)?;
    print_create_view_statements(out, &views, &catalog.view_metadata)?;

    let (constraints, fk_constraints) =
        construct_constraints_for_all_tables(&catalog.tables, &catalog.constraints);
    print_constraint_statements(out, constraints, fk_constraints)?;

    info!("Pre-data metadata complete");
    Ok(())
}

/// Writes indexes, rules and triggers through the sorted aggregator.
pub fn write_postdata<W: Write>(
    out: &mut W,
    catalog: &CatalogSnapshot,
    options: &DumpOptions,
) -> Result<()> {
    info!("Writing post-data metadata");

    let mut statements = get_index_definitions(&catalog.indexes, &catalog.index_metadata);
    statements.extend(get_rule_definitions(&catalog.rules, options));
    statements.extend(get_trigger_definitions(&catalog.triggers, options));
    print_postdata_create_statements(out, statements)?;

    info!("Post-data metadata complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    use crate::catalog::{ConstraintKind, FunctionInfo, SequenceDefinition};
    use crate::error::Error;
    use crate::metadata::{default_metadata_map, ObjectKind};
    use maplit::hashmap;

    fn snapshot() -> CatalogSnapshot {
        let table = Relation::basic("public", "orders").with_oids(2200, 100);
        CatalogSnapshot {
            schemas: vec![Schema::new(2200, "public"), Schema::new(1, "sales")],
            schema_metadata: default_metadata_map(ObjectKind::Schema),
            languages: vec![ProceduralLanguage {
                oid: 7,
                name: "plpythonu".to_string(),
                owner: "gpadmin".to_string(),
                trusted: false,
                handler: 1,
                inline: 0,
                validator: 0,
            }],
            functions: hashmap! {
                1 => FunctionInfo::new("pg_catalog.plpython_call_handler", "", true),
                2 => FunctionInfo::new("public.read_s3", "", false),
            },
            protocols: vec![ExternalProtocol::new("s3", "gpadmin", false, 2, 0, 0)],
            sequences: vec![Sequence::new(
                Relation::basic("public", "orders_id_seq").with_oids(2200, 101),
                SequenceDefinition {
                    last_value: 1,
                    increment: 1,
                    max_value: i64::MAX,
                    min_value: 1,
                    cache_value: 1,
                    is_cycled: false,
                    is_called: false,
                },
            )],
            sequence_owners: hashmap! {
                "public.orders_id_seq".to_string() => "public.orders.id".to_string(),
            },
            views: vec![
                ViewDefinition::new(
                    201,
                    "sales",
                    "top_orders",
                    "SELECT * FROM sales.all_orders LIMIT 10;",
                ),
                ViewDefinition::new(200, "sales", "all_orders", "SELECT * FROM public.orders;"),
            ],
            view_dependencies: vec![(200, 201)],
            tables: vec![table],
            constraints: hashmap! {
                100 => vec![
                    Constraint::new(
                        "orders_customer_fkey",
                        ConstraintKind::ForeignKey,
                        "FOREIGN KEY (customer) REFERENCES customers(id)",
                        "",
                    ),
                    Constraint::new(
                        "orders_pkey",
                        ConstraintKind::PrimaryKey,
                        "PRIMARY KEY (id)",
                        "",
                    ),
                ],
            },
            indexes: vec![SimpleDefinition::new(
                300,
                "orders_date_idx",
                "public",
                "orders",
                "CREATE INDEX orders_date_idx ON public.orders USING btree(order_date)",
            )],
            rules: vec![SimpleDefinition::new(
                301,
                "orders_notify",
                "public",
                "orders",
                "CREATE RULE orders_notify AS ON UPDATE TO public.orders DO NOTIFY orders;",
            )
            .with_comment("notifies listeners")],
            ..Default::default()
        }
    }

    fn position(text: &str, needle: &str) -> usize {
        text.find(needle).unwrap_or_else(|| panic!("missing {:?} in output", needle))
    }

    #[test]
    fn test_predata_order() {
        let mut buffer = Vec::new();
        write_predata(&mut buffer, &snapshot(), &DumpOptions::default()).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(!text.contains("CREATE SCHEMA public;"));
        let schema = position(&text, "CREATE SCHEMA sales;");
        let language = position(&text, "CREATE PROCEDURAL LANGUAGE plpythonu;");
        let protocol = position(&text, "CREATE PROTOCOL s3 (readfunc = public.read_s3);");
        let sequence = position(&text, "CREATE SEQUENCE public.orders_id_seq\n\tSTART WITH 1\n");
        let owned = position(
            &text,
            "ALTER SEQUENCE public.orders_id_seq OWNED BY public.orders.id;",
        );
        let base_view = position(&text, "CREATE VIEW sales.all_orders AS");
        let top_view = position(&text, "CREATE VIEW sales.top_orders AS");
        let pkey = position(&text, "ADD CONSTRAINT orders_pkey PRIMARY KEY (id);");
        let fkey = position(&text, "ADD CONSTRAINT orders_customer_fkey");

        assert!(schema < language);
        assert!(language < protocol);
        assert!(protocol < sequence && sequence < owned);
        assert!(owned < base_view && base_view < top_view);
        assert!(top_view < pkey && pkey < fkey);
    }

    #[test]
    fn test_predata_view_cycle_is_an_error() {
        let mut catalog = snapshot();
        catalog.view_dependencies.push((201, 200));
        let mut buffer = Vec::new();
        let result = write_predata(&mut buffer, &catalog, &DumpOptions::default());
        assert!(matches!(result, Err(Error::DependencyCycle { .. })));
    }

    #[test]
    fn test_predata_view_depending_on_a_table() {
        let mut catalog = snapshot();
        // all_orders reads public.orders, which is a table and not in `views`.
        catalog.view_dependencies.push((100, 200));
        let mut buffer = Vec::new();
        write_predata(&mut buffer, &catalog, &DumpOptions::default()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let base_view = position(&text, "CREATE VIEW sales.all_orders AS");
        let top_view = position(&text, "CREATE VIEW sales.top_orders AS");
        assert!(base_view < top_view);
    }

    #[test]
    fn test_postdata() {
        let mut buffer = Vec::new();
        let options = DumpOptions::default().rule_comments(true);
        write_postdata(&mut buffer, &snapshot(), &options).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "

CREATE INDEX orders_date_idx ON public.orders USING btree(order_date);


CREATE RULE orders_notify AS ON UPDATE TO public.orders DO NOTIFY orders;
COMMENT ON RULE orders_notify ON public.orders IS 'notifies listeners';
"
        );
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_errors_abort() {
        let result = write_predata(&mut FailingWriter, &snapshot(), &DumpOptions::default());
        assert!(matches!(result, Err(Error::Io(_))));
        let result = write_postdata(&mut FailingWriter, &snapshot(), &DumpOptions::default());
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
