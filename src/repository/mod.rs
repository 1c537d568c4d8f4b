// ==========================================
// Portal de Bolsas - Camada de repositório
// ==========================================
// Regra: repositório não contém regra de negócio
// Todas as consultas são parametrizadas
// ==========================================

pub mod error;
pub mod identity_repo;
pub mod identity_repo_impl;
pub mod import_batch_repo;

// Reexportações
pub use error::{RepositoryError, RepositoryResult};
pub use identity_repo::IdentityRepository;
pub use identity_repo_impl::IdentityRepositoryImpl;
pub use import_batch_repo::ImportBatchRepository;
