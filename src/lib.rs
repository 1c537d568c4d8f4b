// ==========================================
// Portal de Bolsas - Biblioteca principal
// ==========================================
// Pipeline de prévia de importação de planilhas
// (bolsistas, contas bancárias, projetos, vínculos)
// Stack: Rust + SQLite
// ==========================================

// Inicializa a internacionalização
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// Módulos
// ==========================================

// Domínio - tipos e entidades
pub mod domain;

// Repositório - acesso a dados
pub mod repository;

// Importação - decodificação, validação, duplicidade
pub mod importer;

// Configuração - config_kv
pub mod config;

// Infraestrutura SQLite (conexão, PRAGMA, schema)
pub mod db;

// Logs
pub mod logging;

// Internacionalização
pub mod i18n;

// API - ponto de entrada da CLI
pub mod api;

// ==========================================
// Reexportações
// ==========================================

pub use domain::types::{
    CellValue, DuplicateAction, DuplicateCheckStatus, DuplicateStatus, ImportType,
};

pub use domain::{
    DuplicateInfo, ExistingIdentity, ImportBatch, ImportContext, ImportPreview, ImportSummary,
    ParsedRow,
};

pub use importer::{ImportError, ImportPreviewer, ImportPreviewerImpl, ImportResult};

pub use api::{ApiError, ImportApi};

// ==========================================
// Constantes
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Portal de Bolsas";
