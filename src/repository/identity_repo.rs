// ==========================================
// Portal de Bolsas - Repository Trait de identidades
// ==========================================
// Responsabilidade: leitura dos bolsistas já cadastrados
// Sem regra de negócio: a classificação fica no DuplicateChecker
// ==========================================

use crate::domain::identity::ExistingIdentity;
use crate::domain::import::ImportContext;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// IdentityRepository Trait
// ==========================================
// Implementação: IdentityRepositoryImpl (rusqlite)
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Lista as identidades visíveis no contexto
    ///
    /// # Parâmetros
    /// - ctx: organização corrente; None = todas
    ///
    /// # Retorno
    /// - Ok(Vec): pode ser vazio
    /// - Err: falha de conexão/consulta (o chamador decide o fallback)
    async fn fetch_all_identities(
        &self,
        ctx: &ImportContext,
    ) -> RepositoryResult<Vec<ExistingIdentity>>;
}
