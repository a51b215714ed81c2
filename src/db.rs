use anyhow::{Result, bail};
use sea_orm::{
    ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, EntityTrait, Schema, Statement,
};
use std::path::PathBuf;
use tokio::fs;

use crate::entity::{
    AuditLogs, FarmerDetails, LandImages, LandRequests, Lands, ProductImages, ProductRequests,
    Products, Profiles, Users,
};

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let conn = Database::connect(database_url).await?;
    Ok(conn)
}

/// Bring the schema up to date for whichever backend the connection points at.
pub async fn prepare_schema(conn: &DatabaseConnection) -> Result<()> {
    match conn.get_database_backend() {
        DatabaseBackend::Postgres => run_migrations(conn).await,
        DatabaseBackend::Sqlite => create_schema(conn).await,
        other => bail!("unsupported database backend: {other:?}"),
    }
}

/// Minimal migration runner that executes SQL files in `migrations/` in filename order.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    let mut entries = fs::read_dir("migrations").await?;
    let mut files: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();

    let backend = conn.get_database_backend();
    for file in files {
        tracing::debug!(file = %file.display(), "applying migration");
        let sql = fs::read_to_string(&file).await?;
        // Postgres prepared statements cannot contain multiple commands,
        // so split the migration file and run each statement individually.
        for stmt in sql.split(';') {
            let stmt = stmt.trim();
            if stmt.is_empty() {
                continue;
            }
            let statement = format!("{stmt};");
            conn.execute(Statement::from_string(backend, statement))
                .await?;
        }
    }

    Ok(())
}

/// Creates every table straight from the entity definitions.
/// Used for SQLite, where the Postgres migration files do not apply.
pub async fn create_schema(conn: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(conn.get_database_backend());
    // Parents before children so foreign keys resolve in order.
    create_table(conn, &schema, Users).await?;
    create_table(conn, &schema, Profiles).await?;
    create_table(conn, &schema, FarmerDetails).await?;
    create_table(conn, &schema, Lands).await?;
    create_table(conn, &schema, LandImages).await?;
    create_table(conn, &schema, LandRequests).await?;
    create_table(conn, &schema, Products).await?;
    create_table(conn, &schema, ProductImages).await?;
    create_table(conn, &schema, ProductRequests).await?;
    create_table(conn, &schema, AuditLogs).await?;
    Ok(())
}

async fn create_table<E>(conn: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let backend = conn.get_database_backend();
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    conn.execute(backend.build(&stmt)).await?;
    Ok(())
}
