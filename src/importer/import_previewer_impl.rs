// ==========================================
// Portal de Bolsas - Gerador de prévia de importação
// ==========================================
// Fluxo: decodificar → mapear → validar → duplicidade → ImportPreview
// Erros de arquivo interrompem; problemas de linha ficam na linha
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::import::{ImportContext, ImportPreview, ParsedRow};
use crate::domain::types::{DuplicateCheckStatus, ImportType};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper as FieldMapperImpl;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::import_pipeline_trait::{
    DuplicateChecker, FieldMapper, ImportPreviewer, RowValidator as RowValidatorTrait,
};
use crate::importer::row_validator::RowValidator;
use crate::importer::schema::ImportSchema;
use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

// ==========================================
// ImportPreviewerImpl
// ==========================================
pub struct ImportPreviewerImpl<C>
where
    C: ImportConfigReader,
{
    config: C,
    file_parser: UniversalFileParser,
    field_mapper: Box<dyn FieldMapper>,
    // None: nenhuma fonte de identidades configurada
    duplicate_checker: Option<Box<dyn DuplicateChecker>>,
}

impl<C> ImportPreviewerImpl<C>
where
    C: ImportConfigReader,
{
    pub fn new(config: C, duplicate_checker: Option<Box<dyn DuplicateChecker>>) -> Self {
        Self {
            config,
            file_parser: UniversalFileParser,
            field_mapper: Box::new(FieldMapperImpl),
            duplicate_checker,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Etapa 3; devolve o status registrado na prévia
    async fn run_duplicate_check(
        &self,
        rows: Vec<ParsedRow>,
        import_type: ImportType,
        ctx: &ImportContext,
    ) -> ImportResult<(Vec<ParsedRow>, DuplicateCheckStatus)> {
        if !ImportSchema::for_type(import_type).supports_duplicate_check {
            return Ok((rows, DuplicateCheckStatus::Skipped));
        }
        if !self.config.is_duplicate_check_enabled().await? {
            debug!("Verificação de duplicidade desabilitada na configuração");
            return Ok((rows, DuplicateCheckStatus::Skipped));
        }

        match &self.duplicate_checker {
            Some(checker) => {
                let outcome = checker.check(rows, ctx).await;
                Ok((outcome.rows, outcome.status))
            }
            None => {
                debug!("Sem fonte de identidades; verificação de duplicidade ignorada");
                Ok((rows, DuplicateCheckStatus::Skipped))
            }
        }
    }
}

#[async_trait]
impl<C> ImportPreviewer for ImportPreviewerImpl<C>
where
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, bytes, ctx), fields(size = bytes.len()))]
    async fn preview(
        &self,
        file_name: &str,
        bytes: &[u8],
        import_type: ImportType,
        ctx: &ImportContext,
    ) -> ImportResult<ImportPreview> {
        let start_time = Instant::now();
        info!("Gerando prévia de importação");

        // === Etapa 0: decodificação ===
        let decoded = self.file_parser.decode(file_name, bytes).map_err(|e| {
            error!(error = %e, "Falha ao decodificar arquivo");
            e
        })?;
        debug!(
            headers = decoded.headers.len(),
            records = decoded.records.len(),
            "Arquivo decodificado"
        );

        // === Etapa 1: cabeçalhos canônicos ===
        let headers = self
            .field_mapper
            .canonical_headers(&decoded.headers, import_type);

        // === Etapa 2: validação por linha ===
        let validator = RowValidator::new(self.config.get_modality_codes().await?);
        let rows: Vec<ParsedRow> = decoded
            .records
            .into_iter()
            .map(|record| {
                let mut row = self.field_mapper.map_record(record, import_type);
                let validation = validator.validate(&row, import_type);
                row.set_validation(validation.errors, validation.warnings);
                row
            })
            .collect();
        debug!(
            invalid = rows.iter().filter(|r| !r.is_valid()).count(),
            "Validação concluída"
        );

        // === Etapa 3: duplicidade ===
        let (rows, duplicate_check) = self.run_duplicate_check(rows, import_type, ctx).await?;

        let preview =
            ImportPreview::from_rows(file_name, import_type, headers, rows, duplicate_check);
        let summary = preview.summary();
        info!(
            total = summary.total_rows,
            valid = summary.valid_rows,
            invalid = summary.invalid_rows,
            duplicate_check = %duplicate_check,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Prévia gerada"
        );

        Ok(preview)
    }
}
