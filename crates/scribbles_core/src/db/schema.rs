//! Declarative record-store schema and one-time initialization.
//!
//! # Responsibility
//! - Describe record stores (name, primary key path, columns, secondary
//!   indexes) as data rather than hand-written DDL.
//! - Apply pending schema creation atomically, mirrored to
//!   `PRAGMA user_version`.
//!
//! # Invariants
//! - `DB_VERSION` only ever increases, and only for additive changes.
//! - Initializing at the committed version is a no-op.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Schema version committed by this build. Bumped only for additive changes.
pub const DB_VERSION: u32 = 1;

/// One column of a declared record store.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSchema {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub not_null: bool,
}

/// Secondary index declaration: name, indexed key path, uniqueness flag.
#[derive(Debug, Clone, Copy)]
pub struct StoreIndexSchema {
    pub name: &'static str,
    pub key_path: &'static str,
    pub unique: bool,
}

/// Declarative description of one keyed record store.
///
/// The scribbles store declares no secondary indexes, but the generator
/// honors arbitrary declarations.
#[derive(Debug, Clone, Copy)]
pub struct ObjectStoreSchema {
    pub name: &'static str,
    /// Column holding the primary key.
    pub key_path: &'static str,
    /// When true the key is an engine-assigned increasing integer.
    pub auto_increment: bool,
    pub columns: &'static [ColumnSchema],
    pub indexes: &'static [StoreIndexSchema],
}

/// The one store used by the engine: scribbles keyed by their string id.
pub const SCRIBBLES_SCHEMA: ObjectStoreSchema = ObjectStoreSchema {
    name: "scribbles",
    key_path: "id",
    auto_increment: false,
    columns: &[
        ColumnSchema {
            name: "id",
            sql_type: "TEXT",
            not_null: true,
        },
        ColumnSchema {
            name: "content",
            sql_type: "TEXT",
            not_null: false,
        },
        ColumnSchema {
            name: "drawing",
            sql_type: "TEXT",
            not_null: false,
        },
        ColumnSchema {
            name: "timestamp",
            sql_type: "INTEGER",
            not_null: true,
        },
    ],
    indexes: &[],
};

/// Creates all declared stores if this database has not yet been
/// initialized at `DB_VERSION`.
///
/// # Contract
/// - Re-running at the committed version is a no-op.
/// - A database stamped with a newer version is rejected with
///   `DbError::UnsupportedSchemaVersion`.
/// - Creation of all stores and indexes is one transaction; the version
///   stamp commits with it or not at all.
pub fn init_db(conn: &mut Connection, stores: &[ObjectStoreSchema]) -> DbResult<()> {
    let current_version = current_user_version(conn)?;

    if current_version > DB_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: DB_VERSION,
        });
    }

    if current_version == DB_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for store in stores {
        tx.execute_batch(&create_store_sql(store)?)?;
        for index in store.indexes {
            tx.execute_batch(&create_index_sql(store, index))?;
        }
    }
    tx.execute_batch(&format!("PRAGMA user_version = {DB_VERSION};"))?;
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn create_store_sql(store: &ObjectStoreSchema) -> DbResult<String> {
    if !store
        .columns
        .iter()
        .any(|column| column.name == store.key_path)
    {
        return Err(DbError::InvalidSchema(format!(
            "store `{}` key path `{}` is not a declared column",
            store.name, store.key_path
        )));
    }

    let mut definitions = Vec::with_capacity(store.columns.len() + 1);
    for column in store.columns {
        let mut definition = format!("\"{}\" {}", column.name, column.sql_type);
        if store.auto_increment && column.name == store.key_path {
            definition.push_str(" PRIMARY KEY AUTOINCREMENT");
        }
        if column.not_null {
            definition.push_str(" NOT NULL");
        }
        definitions.push(definition);
    }

    if !store.auto_increment {
        definitions.push(format!("PRIMARY KEY (\"{}\")", store.key_path));
    }

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" (\n    {}\n);",
        store.name,
        definitions.join(",\n    ")
    ))
}

fn create_index_sql(store: &ObjectStoreSchema, index: &StoreIndexSchema) -> String {
    let unique = if index.unique { "UNIQUE " } else { "" };
    format!(
        "CREATE {unique}INDEX IF NOT EXISTS \"{}\" ON \"{}\" (\"{}\");",
        index.name, store.name, index.key_path
    )
}

#[cfg(test)]
mod tests {
    use super::{create_store_sql, ColumnSchema, ObjectStoreSchema, SCRIBBLES_SCHEMA};
    use crate::db::DbError;

    #[test]
    fn scribbles_store_ddl_declares_string_primary_key() {
        let sql = create_store_sql(&SCRIBBLES_SCHEMA).unwrap();
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS \"scribbles\""));
        assert!(sql.contains("PRIMARY KEY (\"id\")"));
        assert!(!sql.contains("AUTOINCREMENT"));
    }

    #[test]
    fn undeclared_key_path_is_rejected() {
        const BROKEN: ObjectStoreSchema = ObjectStoreSchema {
            name: "broken",
            key_path: "missing",
            auto_increment: false,
            columns: &[ColumnSchema {
                name: "id",
                sql_type: "TEXT",
                not_null: true,
            }],
            indexes: &[],
        };

        let err = create_store_sql(&BROKEN).unwrap_err();
        assert!(matches!(err, DbError::InvalidSchema(_)));
    }
}
