// ==========================================
// Portal de Bolsas - Identidades cadastradas
// ==========================================
// Registro existente usado pela verificação de duplicidade
// ==========================================

use serde::{Deserialize, Serialize};

/// Identidade já cadastrada (bolsista)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingIdentity {
    pub id: String,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub nome: Option<String>,
}
