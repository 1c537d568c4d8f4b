// ==========================================
// Portal de Bolsas - Camada de configuração
// ==========================================
// Armazenamento: tabela config_kv
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

pub use config_manager::{config_keys, ConfigManager, DEFAULT_MAX_FILE_SIZE_BYTES};
pub use import_config_trait::ImportConfigReader;
