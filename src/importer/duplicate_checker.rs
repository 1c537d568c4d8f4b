// ==========================================
// Portal de Bolsas - Verificador de duplicidade
// ==========================================
// Etapa 3: cruza linhas válidas com identidades já cadastradas
// Chaves: CPF (somente dígitos) e email (minúsculas)
// Precedência: CPF encontrado → duplicate, mesmo com email diferente;
//              só email encontrado → conflict; nenhum → new
// ==========================================

use crate::domain::identity::ExistingIdentity;
use crate::domain::import::{DuplicateInfo, ImportContext, ParsedRow};
use crate::domain::types::{DuplicateAction, DuplicateCheckStatus, DuplicateStatus};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::import_pipeline_trait::DuplicateChecker as DuplicateCheckerTrait;
use crate::repository::identity_repo::IdentityRepository;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Saída da verificação
#[derive(Debug, Clone)]
pub struct DuplicateCheckOutcome {
    pub rows: Vec<ParsedRow>,
    pub status: DuplicateCheckStatus,
}

// ==========================================
// IdentityIndex - índices de busca em memória
// ==========================================
pub struct IdentityIndex {
    cleaner: DataCleaner,
    by_cpf: HashMap<String, ExistingIdentity>,
    by_email: HashMap<String, ExistingIdentity>,
}

impl IdentityIndex {
    /// Monta os dois índices; em colisão vale o primeiro registro
    pub fn build(identities: Vec<ExistingIdentity>) -> Self {
        let cleaner = DataCleaner;
        let mut by_cpf = HashMap::new();
        let mut by_email = HashMap::new();

        for identity in identities {
            if let Some(cpf) = identity.cpf.as_deref().map(|c| cleaner.digits_only(c)) {
                if !cpf.is_empty() {
                    by_cpf.entry(cpf).or_insert_with(|| identity.clone());
                }
            }
            if let Some(email) = identity.email.as_deref().map(|e| cleaner.normalize_email(e)) {
                if !email.is_empty() {
                    by_email.entry(email).or_insert_with(|| identity.clone());
                }
            }
        }

        Self {
            cleaner,
            by_cpf,
            by_email,
        }
    }

    pub fn key_counts(&self) -> (usize, usize) {
        (self.by_cpf.len(), self.by_email.len())
    }

    /// CPF normalizado ("" se ausente)
    fn cpf_key(&self, row: &ParsedRow) -> String {
        row.text("cpf")
            .map(|c| self.cleaner.digits_only(&c))
            .unwrap_or_default()
    }

    /// Email normalizado ("" se ausente)
    fn email_key(&self, row: &ParsedRow) -> String {
        row.text("email")
            .map(|e| self.cleaner.normalize_email(&e))
            .unwrap_or_default()
    }

    /// Classifica uma linha
    pub fn classify(&self, row: &ParsedRow) -> DuplicateInfo {
        let cpf = self.cpf_key(row);
        let email = self.email_key(row);

        let by_cpf = if cpf.is_empty() {
            None
        } else {
            self.by_cpf.get(&cpf)
        };
        if let Some(existing) = by_cpf {
            return Self::matched(DuplicateStatus::Duplicate, existing, "CPF já cadastrado");
        }

        let by_email = if email.is_empty() {
            None
        } else {
            self.by_email.get(&email)
        };
        if let Some(existing) = by_email {
            return Self::matched(
                DuplicateStatus::Conflict,
                existing,
                "Email já cadastrado para outro CPF",
            );
        }

        DuplicateInfo::new_record()
    }

    fn matched(status: DuplicateStatus, existing: &ExistingIdentity, reason: &str) -> DuplicateInfo {
        DuplicateInfo {
            status,
            existing_id: Some(existing.id.clone()),
            existing_cpf: existing.cpf.clone(),
            existing_email: existing.email.clone(),
            reason: reason.to_string(),
            action: DuplicateAction::default_for(status),
        }
    }

    /// Classifica todas as linhas válidas, preservando a ordem
    ///
    /// Também avisa quando CPF/email de uma linha nova já apareceu numa
    /// linha válida anterior do mesmo arquivo (a classificação não muda).
    pub fn classify_rows(&self, rows: Vec<ParsedRow>) -> Vec<ParsedRow> {
        let mut seen_cpf: HashMap<String, usize> = HashMap::new();
        let mut seen_email: HashMap<String, usize> = HashMap::new();

        rows.into_iter()
            .map(|mut row| {
                if !row.is_valid() {
                    return row;
                }

                let info = self.classify(&row);
                let cpf = self.cpf_key(&row);
                let email = self.email_key(&row);

                if info.status == DuplicateStatus::New {
                    if let Some(first) = (!cpf.is_empty()).then(|| seen_cpf.get(&cpf)).flatten() {
                        row.push_warning(format!("CPF repetido no arquivo (linha {})", first));
                    }
                    if let Some(first) =
                        (!email.is_empty()).then(|| seen_email.get(&email)).flatten()
                    {
                        row.push_warning(format!("Email repetido no arquivo (linha {})", first));
                    }
                }

                if !cpf.is_empty() {
                    seen_cpf.entry(cpf).or_insert(row.row_number);
                }
                if !email.is_empty() {
                    seen_email.entry(email).or_insert(row.row_number);
                }

                row.attach_duplicate_info(info);
                row
            })
            .collect()
    }
}

// ==========================================
// DuplicateCheckerImpl
// ==========================================
pub struct DuplicateCheckerImpl {
    identity_repo: Arc<dyn IdentityRepository>,
}

impl DuplicateCheckerImpl {
    pub fn new(identity_repo: Arc<dyn IdentityRepository>) -> Self {
        Self { identity_repo }
    }
}

#[async_trait]
impl DuplicateCheckerTrait for DuplicateCheckerImpl {
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn check(&self, rows: Vec<ParsedRow>, ctx: &ImportContext) -> DuplicateCheckOutcome {
        // Uma única busca em lote antes de percorrer as linhas
        let identities = match self.identity_repo.fetch_all_identities(ctx).await {
            Ok(identities) => identities,
            Err(e) => {
                warn!(error = %e, "Falha ao buscar registros existentes; verificação de duplicidade ignorada");
                return DuplicateCheckOutcome {
                    rows,
                    status: DuplicateCheckStatus::Unavailable,
                };
            }
        };

        let index = IdentityIndex::build(identities);
        let (cpf_keys, email_keys) = index.key_counts();
        debug!(cpf_keys, email_keys, "Índices de identidade montados");

        let rows = index.classify_rows(rows);

        info!(
            duplicates = rows
                .iter()
                .filter(|r| r.duplicate_info().map(|d| d.status) == Some(DuplicateStatus::Duplicate))
                .count(),
            conflicts = rows
                .iter()
                .filter(|r| r.duplicate_info().map(|d| d.status) == Some(DuplicateStatus::Conflict))
                .count(),
            "Verificação de duplicidade concluída"
        );

        DuplicateCheckOutcome {
            rows,
            status: DuplicateCheckStatus::Checked,
        }
    }
}
