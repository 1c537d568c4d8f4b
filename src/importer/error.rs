// ==========================================
// Portal de Bolsas - Erros do módulo de importação
// ==========================================
// Erros de arquivo interrompem a prévia inteira.
// Problemas de linha NUNCA viram erro: ficam registrados na própria linha.
// ==========================================

use thiserror::Error;

/// Erros de importação (nível de arquivo)
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== Arquivo =====
    #[error("Arquivo não encontrado: {0}")]
    FileNotFound(String),

    #[error("Formato de arquivo não suportado: {0} (apenas .csv/.xlsx/.xls)")]
    UnsupportedFormat(String),

    #[error("Falha ao ler arquivo: {0}")]
    FileReadError(String),

    #[error("Arquivo vazio: {0}")]
    EmptyFile(String),

    #[error("Falha ao interpretar planilha Excel: {0}")]
    ExcelParseError(String),

    #[error("Falha ao interpretar CSV: {0}")]
    CsvParseError(String),

    // ===== Configuração =====
    #[error("Falha ao ler configuração (chave: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== Genérico =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ImportError::FileNotFound(err.to_string()),
            _ => ImportError::FileReadError(err.to_string()),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Alias de Result
pub type ImportResult<T> = Result<T, ImportError>;
