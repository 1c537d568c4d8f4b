// ==========================================
// Portal de Bolsas - Camada de API
// ==========================================
// Ponto de entrada usado pela CLI
// ==========================================

pub mod error;
pub mod import_api;

pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportPreviewResponse};
