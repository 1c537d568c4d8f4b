// ==========================================
// Portal de Bolsas - API de importação
// ==========================================
// Recebe o caminho do arquivo enviado, gera a prévia e registra
// o lote no histórico. Nada é gravado nas tabelas de negócio.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ImportConfigReader};
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::import::{ImportBatch, ImportContext, ImportPreview};
use crate::domain::types::ImportType;
use crate::importer::{
    DuplicateCheckerImpl, ImportPreviewer, ImportPreviewerImpl, UniversalFileParser,
};
use crate::repository::error::RepositoryError;
use crate::repository::{IdentityRepositoryImpl, ImportBatchRepository};
use chrono::Utc;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Resposta de `preview_file`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreviewResponse {
    /// Lote registrado no histórico (None se o registro falhou)
    pub batch_id: Option<String>,
    pub preview: ImportPreview,
    pub elapsed_ms: i64,
}

pub struct ImportApi {
    previewer: ImportPreviewerImpl<ConfigManager>,
    batch_repo: ImportBatchRepository,
}

impl ImportApi {
    /// Abre o banco, garante o schema e monta o pipeline
    pub fn new(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path).map_err(RepositoryError::from)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// Todos os componentes compartilham a mesma conexão
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
            init_schema(&guard).map_err(RepositoryError::from)?;
        }

        let config = ConfigManager::from_connection(conn.clone())?;
        let identity_repo = Arc::new(IdentityRepositoryImpl::from_connection(conn.clone()));
        let checker = DuplicateCheckerImpl::new(identity_repo);

        Ok(Self {
            previewer: ImportPreviewerImpl::new(config, Some(Box::new(checker))),
            batch_repo: ImportBatchRepository::from_connection(conn),
        })
    }

    /// Gera a prévia de um arquivo em disco
    ///
    /// # Erros
    /// - UnsupportedFormat: extensão diferente de .csv/.xlsx/.xls
    /// - FileNotFound / FileTooLarge
    /// - ImportError: arquivo vazio ou ilegível
    #[instrument(skip(self, file_path, ctx), fields(path = %file_path.as_ref().display()))]
    pub async fn preview_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        import_type: ImportType,
        ctx: &ImportContext,
    ) -> ApiResult<ImportPreviewResponse> {
        let started = std::time::Instant::now();
        let path = file_path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ApiError::InvalidInput(format!("caminho inválido: {}", path.display())))?
            .to_string();

        if !UniversalFileParser::is_supported(&file_name) {
            return Err(ApiError::UnsupportedFormat(file_name));
        }

        let metadata = tokio::fs::metadata(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ApiError::FileNotFound(path.display().to_string()),
            _ => ApiError::ImportError(e.to_string()),
        })?;
        let max = self.previewer.config().get_max_file_size_bytes().await?;
        if metadata.len() > max {
            return Err(ApiError::FileTooLarge {
                size: metadata.len(),
                max,
            });
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ApiError::ImportError(e.to_string()))?;
        let preview = self
            .previewer
            .preview(&file_name, &bytes, import_type, ctx)
            .await?;

        let batch = ImportBatch {
            batch_id: Uuid::new_v4().to_string(),
            organization_id: ctx.organization_id.clone(),
            file_name,
            import_type,
            summary: preview.summary(),
            duplicate_check: preview.duplicate_check(),
            created_at: Utc::now(),
        };
        // Histórico é auxiliar: falha ao gravar não invalida a prévia
        let batch_id = match self.batch_repo.insert_batch(&batch) {
            Ok(()) => Some(batch.batch_id),
            Err(e) => {
                warn!(error = %e, "Falha ao registrar lote de importação");
                None
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as i64;
        info!(batch_id = ?batch_id, elapsed_ms, "Prévia concluída");

        Ok(ImportPreviewResponse {
            batch_id,
            preview,
            elapsed_ms,
        })
    }

    /// Histórico recente (mais novo primeiro)
    pub fn list_batches(&self, limit: usize) -> ApiResult<Vec<ImportBatch>> {
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit deve ser maior que zero".to_string()));
        }
        Ok(self.batch_repo.list_recent(limit)?)
    }
}
