// ==========================================
// Portal de Bolsas - Repository do histórico de importação
// ==========================================
// Tabela: import_batch
// Somente CRUD; o resumo chega pronto do ImportPreview
// ==========================================

use crate::domain::import::{ImportBatch, ImportSummary};
use crate::domain::types::{DuplicateCheckStatus, ImportType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

pub struct ImportBatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ImportBatchRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Registra um lote de prévia
    pub fn insert_batch(&self, batch: &ImportBatch) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let s = &batch.summary;
        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, organization_id, file_name, import_type,
                total_rows, valid_rows, invalid_rows,
                new_rows, duplicate_rows, conflict_rows,
                duplicate_check, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                batch.batch_id,
                batch.organization_id,
                batch.file_name,
                batch.import_type.as_str(),
                s.total_rows as i64,
                s.valid_rows as i64,
                s.invalid_rows as i64,
                s.new_rows as i64,
                s.duplicate_rows as i64,
                s.conflict_rows as i64,
                batch.duplicate_check.to_string(),
                batch.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;
        Ok(())
    }

    /// Lotes mais recentes primeiro
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<ImportBatch>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, organization_id, file_name, import_type,
                   total_rows, valid_rows, invalid_rows,
                   new_rows, duplicate_rows, conflict_rows,
                   duplicate_check, created_at
            FROM import_batch
            ORDER BY created_at DESC, batch_id
            LIMIT ?1
            "#,
        )?;

        let raw = stmt
            .query_map(params![limit as i64], RawBatchRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter().map(RawBatchRow::into_batch).collect()
    }
}

/// Linha lida do SQLite antes da conversão de enums/datas
struct RawBatchRow {
    batch_id: String,
    organization_id: Option<String>,
    file_name: String,
    import_type: String,
    counts: [i64; 6],
    duplicate_check: String,
    created_at: String,
}

impl RawBatchRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            batch_id: row.get(0)?,
            organization_id: row.get(1)?,
            file_name: row.get(2)?,
            import_type: row.get(3)?,
            counts: [
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
                row.get(9)?,
            ],
            duplicate_check: row.get(10)?,
            created_at: row.get(11)?,
        })
    }

    fn into_batch(self) -> RepositoryResult<ImportBatch> {
        let import_type: ImportType =
            self.import_type
                .parse()
                .map_err(|message| RepositoryError::FieldValueError {
                    field: "import_type".to_string(),
                    message,
                })?;
        let duplicate_check: DuplicateCheckStatus =
            self.duplicate_check
                .parse()
                .map_err(|message| RepositoryError::FieldValueError {
                    field: "duplicate_check".to_string(),
                    message,
                })?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| RepositoryError::FieldValueError {
                field: "created_at".to_string(),
                message: e.to_string(),
            })?
            .with_timezone(&Utc);

        let [total, valid, invalid, new, duplicate, conflict] = self.counts;
        Ok(ImportBatch {
            batch_id: self.batch_id,
            organization_id: self.organization_id,
            file_name: self.file_name,
            import_type,
            summary: ImportSummary {
                total_rows: total.max(0) as usize,
                valid_rows: valid.max(0) as usize,
                invalid_rows: invalid.max(0) as usize,
                new_rows: new.max(0) as usize,
                duplicate_rows: duplicate.max(0) as usize,
                conflict_rows: conflict.max(0) as usize,
            },
            duplicate_check,
            created_at,
        })
    }
}
