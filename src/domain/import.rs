// ==========================================
// Portal de Bolsas - Modelo de importação
// ==========================================
// ParsedRow: uma linha do arquivo (Decoder → Validator → Duplicate Checker)
// ImportPreview: agregado somente-leitura exibido ao operador
// ==========================================

use crate::domain::types::{
    CellValue, DuplicateAction, DuplicateCheckStatus, DuplicateStatus, ImportType,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ==========================================
// ImportContext - contexto explícito da sessão
// ==========================================
// A organização selecionada é passada explicitamente a quem precisa dela.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportContext {
    pub organization_id: Option<String>,
}

impl ImportContext {
    pub fn for_organization(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: Some(organization_id.into()),
        }
    }
}

// ==========================================
// DuplicateInfo - resultado da verificação de duplicidade
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateInfo {
    pub status: DuplicateStatus,
    pub existing_id: Option<String>,    // id do registro existente
    pub existing_cpf: Option<String>,   // CPF do registro existente
    pub existing_email: Option<String>, // email do registro existente
    pub reason: String,
    pub action: DuplicateAction, // ação proposta (padrão)
}

impl DuplicateInfo {
    pub fn new_record() -> Self {
        Self {
            status: DuplicateStatus::New,
            existing_id: None,
            existing_cpf: None,
            existing_email: None,
            reason: "Novo registro".to_string(),
            action: DuplicateAction::default_for(DuplicateStatus::New),
        }
    }
}

// ==========================================
// ParsedRow - linha do arquivo
// ==========================================
// Invariante: is_valid ⇔ errors vazio (mantido pelos métodos de mutação)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRow {
    /// Posição visual da linha no arquivo (cabeçalho = linha 1)
    pub row_number: usize,
    /// Campo normalizado → valor bruto
    pub data: BTreeMap<String, CellValue>,
    errors: Vec<String>,
    warnings: Vec<String>,
    is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    duplicate_info: Option<DuplicateInfo>,
}

impl ParsedRow {
    pub fn new(row_number: usize, data: BTreeMap<String, CellValue>) -> Self {
        Self {
            row_number,
            data,
            errors: Vec::new(),
            warnings: Vec::new(),
            is_valid: true,
            duplicate_info: None,
        }
    }

    /// Valor textual não vazio do campo
    pub fn text(&self, field: &str) -> Option<String> {
        self.data
            .get(field)
            .and_then(|v| v.as_text())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn duplicate_info(&self) -> Option<&DuplicateInfo> {
        self.duplicate_info.as_ref()
    }

    /// Registra o resultado da validação (substitui o anterior)
    pub fn set_validation(&mut self, errors: Vec<String>, warnings: Vec<String>) {
        self.errors = errors;
        self.warnings = warnings;
        self.is_valid = self.errors.is_empty();
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Anexa a classificação de duplicidade (apenas linhas válidas)
    pub fn attach_duplicate_info(&mut self, info: DuplicateInfo) {
        if self.is_valid {
            self.duplicate_info = Some(info);
        }
    }
}

// ==========================================
// ImportSummary - contadores da prévia
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub new_rows: usize,
    pub duplicate_rows: usize,
    pub conflict_rows: usize,
}

impl ImportSummary {
    pub fn from_rows(rows: &[ParsedRow]) -> Self {
        rows.iter().fold(ImportSummary::default(), |mut acc, row| {
            acc.total_rows += 1;
            if row.is_valid() {
                acc.valid_rows += 1;
            } else {
                acc.invalid_rows += 1;
            }
            match row.duplicate_info().map(|d| d.status) {
                Some(DuplicateStatus::New) => acc.new_rows += 1,
                Some(DuplicateStatus::Duplicate) => acc.duplicate_rows += 1,
                Some(DuplicateStatus::Conflict) => acc.conflict_rows += 1,
                None => {}
            }
            acc
        })
    }
}

// ==========================================
// ImportPreview - prévia de um arquivo enviado
// ==========================================
// Construída uma vez por upload; somente leitura depois disso.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportPreview {
    file_name: String,
    import_type: ImportType,
    headers: Vec<String>,
    summary: ImportSummary,
    duplicate_check: DuplicateCheckStatus,
    rows: Vec<ParsedRow>,
}

impl ImportPreview {
    pub fn from_rows(
        file_name: impl Into<String>,
        import_type: ImportType,
        headers: Vec<String>,
        rows: Vec<ParsedRow>,
        duplicate_check: DuplicateCheckStatus,
    ) -> Self {
        let summary = ImportSummary::from_rows(&rows);
        Self {
            file_name: file_name.into(),
            import_type,
            headers,
            summary,
            duplicate_check,
            rows,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn import_type(&self) -> ImportType {
        self.import_type
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn summary(&self) -> ImportSummary {
        self.summary
    }

    pub fn duplicate_check(&self) -> DuplicateCheckStatus {
        self.duplicate_check
    }

    pub fn rows(&self) -> &[ParsedRow] {
        &self.rows
    }

    pub fn row(&self, row_number: usize) -> Option<&ParsedRow> {
        self.rows.iter().find(|r| r.row_number == row_number)
    }

    /// Linhas que seriam importadas
    ///
    /// Ação efetiva por linha válida: override do operador (por número de
    /// linha) > ação proposta > `import` quando não houve verificação.
    /// Linhas inválidas nunca entram.
    pub fn rows_to_import(&self, overrides: &HashMap<usize, DuplicateAction>) -> Vec<&ParsedRow> {
        self.rows
            .iter()
            .filter(|row| row.is_valid())
            .filter(|row| {
                let action = overrides
                    .get(&row.row_number)
                    .copied()
                    .or_else(|| row.duplicate_info().map(|d| d.action))
                    .unwrap_or(DuplicateAction::Import);
                action == DuplicateAction::Import
            })
            .collect()
    }
}

// ==========================================
// ImportBatch - histórico de prévias geradas
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,
    pub organization_id: Option<String>,
    pub file_name: String,
    pub import_type: ImportType,
    pub summary: ImportSummary,
    pub duplicate_check: DuplicateCheckStatus,
    pub created_at: DateTime<Utc>,
}
