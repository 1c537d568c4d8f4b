// ==========================================
// Portal de Bolsas - Gerenciador de configuração
// ==========================================
// Armazenamento: tabela config_kv (key-value + scope)
// Valor ausente ou ilegível → padrão (com aviso no log)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::schema::DEFAULT_MODALITY_CODES;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Escopo global (único escopo usado hoje)
pub const GLOBAL_SCOPE: &str = "global";

/// Limite padrão de upload (10 MB)
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// A partir de conexão compartilhada
    ///
    /// Reaplica os PRAGMA padrão (idempotente).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Lê um valor do escopo global
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Grava (upsert) um valor no escopo global
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
            ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// Todas as chaves globais (para exibição/diagnóstico)
    pub fn get_config_snapshot(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let snapshot = stmt
            .query_map(params![GLOBAL_SCOPE], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(snapshot)
    }

    fn read_raw(&self, key: &str) -> ImportResult<Option<String>> {
        self.get_global_config_value(key)
            .map_err(|e| ImportError::ConfigReadError {
                key: key.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_max_file_size_bytes(&self) -> ImportResult<u64> {
        let key = config_keys::MAX_FILE_SIZE_BYTES;
        Ok(match self.read_raw(key)? {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(v) if v > 0 => v,
                _ => {
                    warn!(config_key = key, value = %raw, "valor inválido, usando padrão");
                    DEFAULT_MAX_FILE_SIZE_BYTES
                }
            },
            None => DEFAULT_MAX_FILE_SIZE_BYTES,
        })
    }

    async fn get_modality_codes(&self) -> ImportResult<Vec<String>> {
        let key = config_keys::MODALITY_CODES;
        let parsed: Vec<String> = self
            .read_raw(key)?
            .map(|raw| {
                raw.split(',')
                    .map(|c| c.trim().to_uppercase())
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if parsed.is_empty() {
            Ok(DEFAULT_MODALITY_CODES.iter().map(|c| c.to_string()).collect())
        } else {
            Ok(parsed)
        }
    }

    async fn is_duplicate_check_enabled(&self) -> ImportResult<bool> {
        let key = config_keys::DUPLICATE_CHECK_ENABLED;
        Ok(match self.read_raw(key)? {
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "sim" | "yes" => true,
                "0" | "false" | "nao" | "não" | "no" => false,
                _ => {
                    warn!(config_key = key, value = %raw, "valor inválido, usando padrão");
                    true
                }
            },
            None => true,
        })
    }
}

// ==========================================
// Chaves de configuração
// ==========================================
pub mod config_keys {
    pub const MAX_FILE_SIZE_BYTES: &str = "max_file_size_bytes";
    pub const MODALITY_CODES: &str = "modality_codes";
    pub const DUPLICATE_CHECK_ENABLED: &str = "duplicate_check_enabled";
}
