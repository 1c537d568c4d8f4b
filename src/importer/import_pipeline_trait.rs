// ==========================================
// Portal de Bolsas - Traits do pipeline de importação
// ==========================================
// Fluxo: FileParser → FieldMapper → RowValidator → DuplicateChecker
// Orquestração: ImportPreviewer
// ==========================================

use crate::domain::import::{ImportContext, ImportPreview, ParsedRow};
use crate::domain::types::ImportType;
use crate::importer::duplicate_checker::DuplicateCheckOutcome;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{DecodedFile, RawRecord};
use crate::importer::row_validator::RowValidation;
use async_trait::async_trait;

// ==========================================
// ImportPreviewer Trait
// ==========================================
// Implementação: ImportPreviewerImpl
#[async_trait]
pub trait ImportPreviewer: Send + Sync {
    /// Gera a prévia de importação de um arquivo enviado
    ///
    /// # Parâmetros
    /// - file_name: nome original (a extensão escolhe o decodificador)
    /// - bytes: conteúdo do arquivo
    /// - import_type: schema a aplicar
    /// - ctx: contexto explícito (organização)
    ///
    /// # Retorno
    /// - Ok(ImportPreview): todas as linhas, válidas ou não
    /// - Err: falha de arquivo (vazio, formato ilegível)
    async fn preview(
        &self,
        file_name: &str,
        bytes: &[u8],
        import_type: ImportType,
        ctx: &ImportContext,
    ) -> ImportResult<ImportPreview>;
}

// ==========================================
// FileParser Trait (etapa 0)
// ==========================================
// Implementações: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// Decodifica o conteúdo em registros brutos
    ///
    /// # Erros
    /// - EmptyFile: sem cabeçalho ou sem linhas de dados
    /// - CsvParseError / ExcelParseError: conteúdo ilegível
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<DecodedFile>;
}

// ==========================================
// FieldMapper Trait (etapa 1)
// ==========================================
pub trait FieldMapper: Send + Sync {
    /// Cabeçalhos normalizados/canônicos, sem repetição, na ordem original
    fn canonical_headers(&self, headers: &[String], import_type: ImportType) -> Vec<String>;

    /// Registro bruto → ParsedRow com chaves canônicas
    fn map_record(&self, record: RawRecord, import_type: ImportType) -> ParsedRow;
}

// ==========================================
// RowValidator Trait (etapa 2)
// ==========================================
pub trait RowValidator: Send + Sync {
    /// Valida uma linha (somente regras intra-linha)
    fn validate(&self, row: &ParsedRow, import_type: ImportType) -> RowValidation;
}

// ==========================================
// DuplicateChecker Trait (etapa 3)
// ==========================================
#[async_trait]
pub trait DuplicateChecker: Send + Sync {
    /// Classifica as linhas válidas em new/duplicate/conflict
    ///
    /// Nunca falha: se a busca de registros existentes falhar, devolve as
    /// linhas inalteradas com status `Unavailable`.
    async fn check(&self, rows: Vec<ParsedRow>, ctx: &ImportContext) -> DuplicateCheckOutcome;
}
