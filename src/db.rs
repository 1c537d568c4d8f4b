// ==========================================
// Portal de Bolsas - Conexão SQLite
// ==========================================
// - PRAGMA e busy_timeout iguais para toda conexão aberta
// - Criação idempotente das tabelas usadas pelo pipeline
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// busy_timeout padrão (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Versão de schema criada por `init_schema`
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Variável de ambiente que força o caminho do banco
pub const DB_PATH_ENV: &str = "PORTAL_BOLSAS_DB_PATH";

/// Caminho padrão do banco
///
/// Ordem: `PORTAL_BOLSAS_DB_PATH` → diretório de dados do usuário → `./portal_bolsas.db`
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./portal_bolsas.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("portal-bolsas");
        // Sem diretório utilizável, fica o caminho local
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("portal_bolsas.db");
        }
    }

    path.to_string_lossy().to_string()
}

/// Aplica os PRAGMA padrão à conexão
///
/// foreign_keys e busy_timeout valem por conexão.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Abre a conexão com a configuração padrão
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Cria as tabelas se não existirem
///
/// - config_kv: configuração chave-valor (scope global)
/// - scholar: identidades cadastradas (CPF/email)
/// - import_batch: histórico de prévias de importação
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS scholar (
            scholar_id TEXT PRIMARY KEY,
            organization_id TEXT,
            nome TEXT,
            cpf TEXT,
            email TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_scholar_org ON scholar(organization_id);

        CREATE TABLE IF NOT EXISTS import_batch (
            batch_id TEXT PRIMARY KEY,
            organization_id TEXT,
            file_name TEXT NOT NULL,
            import_type TEXT NOT NULL,
            total_rows INTEGER NOT NULL,
            valid_rows INTEGER NOT NULL,
            invalid_rows INTEGER NOT NULL,
            new_rows INTEGER NOT NULL,
            duplicate_rows INTEGER NOT NULL,
            conflict_rows INTEGER NOT NULL,
            duplicate_check TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_import_batch_created_at
            ON import_batch(created_at DESC);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Lê a versão do schema (None se a tabela não existir)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
