// ==========================================
// Portal de Bolsas - Camada de importação
// ==========================================
// Entrada: CSV / Excel enviados pelo operador
// Saída: ImportPreview (nada é gravado nas tabelas de negócio)
// ==========================================

pub mod data_cleaner;
pub mod duplicate_checker;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod import_pipeline_trait;
pub mod import_previewer_impl;
pub mod row_validator;
pub mod schema;

// Reexportações
pub use data_cleaner::DataCleaner;
pub use duplicate_checker::{DuplicateCheckOutcome, DuplicateCheckerImpl, IdentityIndex};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{normalize_header, FieldMapper as FieldMapperImpl};
pub use file_parser::{CsvParser, DecodedFile, ExcelParser, RawRecord, UniversalFileParser};
pub use import_previewer_impl::ImportPreviewerImpl;
pub use row_validator::{RowValidation, RowValidator as RowValidatorImpl};
pub use schema::{FieldRule, ImportSchema, Severity, DEFAULT_MODALITY_CODES};

// Traits do pipeline
pub use import_pipeline_trait::{
    DuplicateChecker, FieldMapper, FileParser, ImportPreviewer, RowValidator,
};
