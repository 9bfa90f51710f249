//! pgmetadump Demo
//!
//! Builds a small in-memory catalog and prints its pre-data and post-data DDL.
//! Run with: cargo run
//! Set RUST_LOG=debug to see per-object-kind progress on stderr.

use std::collections::HashMap;
use std::io::{self, Write};
use std::process::ExitCode;

use pgmetadump::{
    write_postdata, write_predata, Acl, CatalogSnapshot, Constraint, ConstraintKind, DumpOptions,
    ExternalProtocol, FunctionInfo, ObjectKind, ObjectMetadata, ProceduralLanguage, Relation,
    Schema, Sequence, SequenceDefinition, SimpleDefinition, ViewDefinition,
};
use tracing_subscriber::EnvFilter;

fn sample_catalog() -> CatalogSnapshot {
    let orders = Relation::basic("sales", "orders").with_oids(16384, 16400);
    let customers = Relation::basic("sales", "Customers").with_oids(16384, 16410);

    let mut reader = Acl::new("reporting");
    reader.select = true;

    let mut schema_metadata = HashMap::new();
    schema_metadata.insert(
        16384,
        ObjectMetadata {
            privileges: vec![Acl::default_for_kind("gpadmin", ObjectKind::Schema)],
            owner: "gpadmin".to_string(),
            comment: "Sales data".to_string(),
        },
    );

    let mut view_metadata = HashMap::new();
    view_metadata.insert(
        16501,
        ObjectMetadata {
            privileges: vec![Acl::default_for_kind("gpadmin", ObjectKind::View), reader],
            owner: "gpadmin".to_string(),
            comment: String::new(),
        },
    );

    let mut functions = HashMap::new();
    functions.insert(1, FunctionInfo::new("pg_catalog.plpgsql_call_handler", "", true));
    functions.insert(2, FunctionInfo::new("pg_catalog.plpgsql_inline_handler", "internal", true));
    functions.insert(3, FunctionInfo::new("pg_catalog.plpgsql_validator", "oid", true));
    functions.insert(4, FunctionInfo::new("sales.read_from_s3", "", false));
    functions.insert(5, FunctionInfo::new("pg_catalog.gphdfs_import", "", true));

    let mut constraints = HashMap::new();
    constraints.insert(
        16400,
        vec![
            Constraint::new("orders_pkey", ConstraintKind::PrimaryKey, "PRIMARY KEY (id)", ""),
            Constraint::new(
                "orders_customer_fkey",
                ConstraintKind::ForeignKey,
                "FOREIGN KEY (customer_id) REFERENCES sales.\"Customers\"(id)",
                "",
            ),
            Constraint::new(
                "orders_total_check",
                ConstraintKind::Check,
                "CHECK (total >= 0)",
                "Totals can't go negative",
            ),
        ],
    );
    constraints.insert(
        16410,
        vec![Constraint::new("customers_pkey", ConstraintKind::PrimaryKey, "PRIMARY KEY (id)", "")],
    );

    let mut sequence_owners = HashMap::new();
    sequence_owners.insert("sales.orders_id_seq".to_string(), "sales.orders.id".to_string());

    CatalogSnapshot {
        schemas: vec![Schema::new(2200, "public"), Schema::new(16384, "sales")],
        schema_metadata,
        languages: vec![ProceduralLanguage {
            oid: 13000,
            name: "plpgsql".to_string(),
            owner: "gpadmin".to_string(),
            trusted: true,
            handler: 1,
            inline: 2,
            validator: 3,
        }],
        functions,
        protocols: vec![
            ExternalProtocol::new("s3", "gpadmin", true, 4, 0, 0),
            ExternalProtocol::new("gphdfs", "gpadmin", false, 5, 0, 0),
        ],
        sequences: vec![Sequence::new(
            Relation::basic("sales", "orders_id_seq").with_oids(16384, 16401),
            SequenceDefinition {
                last_value: 1042,
                increment: 1,
                max_value: i64::MAX,
                min_value: 1,
                cache_value: 1,
                is_cycled: false,
                is_called: true,
            },
        )],
        sequence_owners,
        views: vec![
            ViewDefinition::new(
                16501,
                "sales",
                "big_orders",
                "SELECT * FROM sales.recent_orders WHERE total > 1000;",
            ),
            ViewDefinition::new(
                16500,
                "sales",
                "recent_orders",
                "SELECT * FROM sales.orders WHERE placed > now() - '30 days'::interval;",
            ),
        ],
        view_dependencies: vec![(16500, 16501)],
        view_metadata,
        tables: vec![orders, customers],
        constraints,
        indexes: vec![SimpleDefinition::new(
            16600,
            "orders_placed_idx",
            "sales",
            "orders",
            "CREATE INDEX orders_placed_idx ON sales.orders USING btree (placed)",
        )],
        triggers: vec![SimpleDefinition::new(
            16700,
            "orders_audit",
            "sales",
            "orders",
            "CREATE TRIGGER orders_audit AFTER INSERT ON sales.orders \
             FOR EACH ROW EXECUTE PROCEDURE sales.audit()",
        )
        .with_comment("Audit trail")],
        ..Default::default()
    }
}

fn run() -> pgmetadump::Result<()> {
    let catalog = sample_catalog();
    let options = DumpOptions::new().trigger_comments(true);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "-- predata")?;
    write_predata(&mut out, &catalog, &options)?;
    writeln!(out, "\n\n-- postdata")?;
    write_postdata(&mut out, &catalog, &options)?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("dump failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
