// ==========================================
// Portal de Bolsas - Tipos de domínio
// ==========================================
// Tipos enumerados compartilhados pelo pipeline de importação
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Tipo de importação (Import Type)
// ==========================================
// Seleciona o schema de campos e as regras de validação.
// Imutável durante uma sessão de importação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportType {
    Scholars,     // Bolsistas
    BankAccounts, // Contas bancárias
    Projects,     // Projetos
    Enrollments,  // Vínculos bolsista x projeto
}

impl ImportType {
    pub const ALL: [ImportType; 4] = [
        ImportType::Scholars,
        ImportType::BankAccounts,
        ImportType::Projects,
        ImportType::Enrollments,
    ];

    /// Tag usada em arquivos, banco e CLI
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportType::Scholars => "scholars",
            ImportType::BankAccounts => "bank_accounts",
            ImportType::Projects => "projects",
            ImportType::Enrollments => "enrollments",
        }
    }

    /// Nome exibido ao operador
    pub fn label(&self) -> &'static str {
        match self {
            ImportType::Scholars => "Bolsistas",
            ImportType::BankAccounts => "Contas bancárias",
            ImportType::Projects => "Projetos",
            ImportType::Enrollments => "Vínculos",
        }
    }
}

impl fmt::Display for ImportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ImportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scholars" => Ok(ImportType::Scholars),
            "bank_accounts" => Ok(ImportType::BankAccounts),
            "projects" => Ok(ImportType::Projects),
            "enrollments" => Ok(ImportType::Enrollments),
            other => Err(format!("Tipo de importação desconhecido: {}", other)),
        }
    }
}

// ==========================================
// Valor bruto de célula (Cell Value)
// ==========================================
// CSV produz apenas texto; planilhas podem produzir números.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Null,
}

impl CellValue {
    /// Texto vazio/só espaços vira Null
    pub fn from_text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            CellValue::Null
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Representação textual usada pelas regras de validação
    ///
    /// Números inteiros perdem a parte fracionária (ex.: CPF lido como
    /// número de planilha: 11144477735.0 → "11144477735").
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(format_number(*n)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ==========================================
// Classificação de duplicidade
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateStatus {
    New,       // Nenhuma chave encontrada
    Duplicate, // CPF já cadastrado
    Conflict,  // Email já cadastrado sob outro CPF
}

impl fmt::Display for DuplicateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateStatus::New => write!(f, "new"),
            DuplicateStatus::Duplicate => write!(f, "duplicate"),
            DuplicateStatus::Conflict => write!(f, "conflict"),
        }
    }
}

// ==========================================
// Ação proposta para a linha
// ==========================================
// Apenas sugestão: o verificador não aplica a ação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateAction {
    Import,
    Skip,
}

impl DuplicateAction {
    /// Ação padrão por classificação: somente registros novos são importados
    pub fn default_for(status: DuplicateStatus) -> Self {
        match status {
            DuplicateStatus::New => DuplicateAction::Import,
            DuplicateStatus::Duplicate | DuplicateStatus::Conflict => DuplicateAction::Skip,
        }
    }
}

impl fmt::Display for DuplicateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateAction::Import => write!(f, "import"),
            DuplicateAction::Skip => write!(f, "skip"),
        }
    }
}

// ==========================================
// Situação da verificação de duplicidade na prévia
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateCheckStatus {
    Checked,     // Verificação executada
    Skipped,     // Tipo não suporta ou verificação desabilitada
    Unavailable, // Falha ao buscar registros existentes (fail-open)
}

impl fmt::Display for DuplicateCheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateCheckStatus::Checked => write!(f, "checked"),
            DuplicateCheckStatus::Skipped => write!(f, "skipped"),
            DuplicateCheckStatus::Unavailable => write!(f, "unavailable"),
        }
    }
}

impl std::str::FromStr for DuplicateCheckStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checked" => Ok(DuplicateCheckStatus::Checked),
            "skipped" => Ok(DuplicateCheckStatus::Skipped),
            "unavailable" => Ok(DuplicateCheckStatus::Unavailable),
            other => Err(format!("Status de verificação desconhecido: {}", other)),
        }
    }
}
