// ==========================================
// Portal de Bolsas - Trait de leitura de configuração da importação
// ==========================================
// Somente leitura; a escrita fica no ConfigManager
// ==========================================

use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// Implementação: ConfigManager (tabela config_kv)
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// Tamanho máximo do arquivo enviado
    ///
    /// # Padrão
    /// - 10485760 (10 MB)
    async fn get_max_file_size_bytes(&self) -> ImportResult<u64>;

    /// Códigos de modalidade reconhecidos (lista separada por vírgula)
    ///
    /// # Padrão
    /// - IC, ITI, DTI, EXP, PD, AT, MS, DR
    async fn get_modality_codes(&self) -> ImportResult<Vec<String>>;

    /// Verificação de duplicidade habilitada
    ///
    /// # Padrão
    /// - true
    async fn is_duplicate_check_enabled(&self) -> ImportResult<bool>;
}
