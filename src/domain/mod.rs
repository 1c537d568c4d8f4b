// ==========================================
// Portal de Bolsas - Camada de domínio
// ==========================================
// Responsabilidade: tipos e entidades do pipeline de importação
// Sem acesso a dados, sem regras de validação
// ==========================================

pub mod identity;
pub mod import;
pub mod types;

// Reexportações
pub use identity::ExistingIdentity;
pub use import::{
    DuplicateInfo, ImportBatch, ImportContext, ImportPreview, ImportSummary, ParsedRow,
};
pub use types::{CellValue, DuplicateAction, DuplicateCheckStatus, DuplicateStatus, ImportType};
