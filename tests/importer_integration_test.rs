// ==========================================
// Testes de integração do pipeline de importação
// ==========================================
// ImportPreviewerImpl + ConfigManager (SQLite) + repositórios

use async_trait::async_trait;
use portal_bolsas::config::{config_keys, ConfigManager};
use portal_bolsas::domain::{
    DuplicateCheckStatus, DuplicateStatus, ExistingIdentity, ImportContext, ImportType,
};
use portal_bolsas::importer::{
    DuplicateCheckerImpl, FileParser, ImportPreviewer, ImportPreviewerImpl, UniversalFileParser,
};
use portal_bolsas::logging;
use portal_bolsas::repository::{
    IdentityRepository, IdentityRepositoryImpl, RepositoryError, RepositoryResult,
};
use std::sync::Arc;

use test_helpers::{create_test_db, seed_identities};

/// Repositório que sempre falha (banco indisponível)
struct UnreachableRepo;

#[async_trait]
impl IdentityRepository for UnreachableRepo {
    async fn fetch_all_identities(
        &self,
        _ctx: &ImportContext,
    ) -> RepositoryResult<Vec<ExistingIdentity>> {
        Err(RepositoryError::DatabaseConnectionError(
            "connection refused".to_string(),
        ))
    }
}

fn previewer_with(
    db_path: &str,
    repo: Arc<dyn IdentityRepository>,
) -> ImportPreviewerImpl<ConfigManager> {
    let config = ConfigManager::new(db_path).unwrap();
    ImportPreviewerImpl::new(config, Some(Box::new(DuplicateCheckerImpl::new(repo))))
}

#[tokio::test]
async fn test_duplicate_check_fails_open() {
    logging::init_test();
    let (_db, db_path) = create_test_db().unwrap();
    let previewer = previewer_with(&db_path, Arc::new(UnreachableRepo));

    let csv = "nome,email,cpf\nAna Silva,ana@x.com,11144477735\nBruno,bruno@x.com,123\n";
    let preview = previewer
        .preview(
            "bolsistas.csv",
            csv.as_bytes(),
            ImportType::Scholars,
            &ImportContext::default(),
        )
        .await
        .unwrap();

    assert_eq!(preview.duplicate_check(), DuplicateCheckStatus::Unavailable);
    assert_eq!(preview.rows().len(), 2);
    assert!(preview.rows().iter().all(|r| r.duplicate_info().is_none()));
    // Validação continua valendo
    assert!(preview.rows()[0].is_valid());
    assert!(!preview.rows()[1].is_valid());
}

#[tokio::test]
async fn test_duplicate_check_disabled_by_config() {
    let (_db, db_path) = create_test_db().unwrap();
    seed_identities(&db_path, None, &[("s1", "11144477735", "ana@x.com")]).unwrap();
    ConfigManager::new(&db_path)
        .unwrap()
        .set_global_config_value(config_keys::DUPLICATE_CHECK_ENABLED, "false")
        .unwrap();

    let repo = Arc::new(IdentityRepositoryImpl::new(&db_path).unwrap());
    let previewer = previewer_with(&db_path, repo);
    let preview = previewer
        .preview(
            "bolsistas.csv",
            b"nome,email,cpf\nAna Silva,ana@x.com,11144477735\n",
            ImportType::Scholars,
            &ImportContext::default(),
        )
        .await
        .unwrap();

    assert_eq!(preview.duplicate_check(), DuplicateCheckStatus::Skipped);
    assert_eq!(preview.summary().duplicate_rows, 0);
}

#[tokio::test]
async fn test_row_numbers_follow_physical_lines() {
    let (_db, db_path) = create_test_db().unwrap();
    let repo = Arc::new(IdentityRepositoryImpl::new(&db_path).unwrap());
    let previewer = previewer_with(&db_path, repo);

    // Linha 3 em branco é ignorada sem renumerar as seguintes
    let csv = "nome,email,cpf\nAna,ana@x.com,11144477735\n,,\nBruno,bruno@x.com,22233344405\n";
    let preview = previewer
        .preview(
            "bolsistas.csv",
            csv.as_bytes(),
            ImportType::Scholars,
            &ImportContext::default(),
        )
        .await
        .unwrap();

    let numbers: Vec<usize> = preview.rows().iter().map(|r| r.row_number).collect();
    assert_eq!(numbers, vec![2, 4]);
    assert_eq!(preview.rows()[0].text("nome").as_deref(), Some("Ana"));
}

#[tokio::test]
async fn test_repeated_cpf_in_file_is_warned() {
    let (_db, db_path) = create_test_db().unwrap();
    let repo = Arc::new(IdentityRepositoryImpl::new(&db_path).unwrap());
    let previewer = previewer_with(&db_path, repo);

    let csv = "nome,email,cpf\n\
               Ana,ana@x.com,11144477735\n\
               Ana B,ana.b@x.com,111.444.777-35\n";
    let preview = previewer
        .preview(
            "bolsistas.csv",
            csv.as_bytes(),
            ImportType::Scholars,
            &ImportContext::default(),
        )
        .await
        .unwrap();

    let second = preview.row(3).unwrap();
    assert_eq!(second.warnings(), &["CPF repetido no arquivo (linha 2)"]);
    assert_eq!(
        second.duplicate_info().map(|d| d.status),
        Some(DuplicateStatus::New)
    );
    assert!(second.is_valid());
}

#[tokio::test]
async fn test_enrollments_with_custom_modalities() {
    let (_db, db_path) = create_test_db().unwrap();
    ConfigManager::new(&db_path)
        .unwrap()
        .set_global_config_value(config_keys::MODALITY_CODES, "IC,DTI")
        .unwrap();
    let repo = Arc::new(IdentityRepositoryImpl::new(&db_path).unwrap());
    let previewer = previewer_with(&db_path, repo);

    let csv = "CPF,Projeto,Valor Mensal,Número de Parcelas,Modalidade\n\
               11144477735,Projeto Alfa,\"700,00\",12,dti\n\
               22233344405,Projeto Alfa,700,0,MS\n";
    let preview = previewer
        .preview(
            "vinculos.csv",
            csv.as_bytes(),
            ImportType::Enrollments,
            &ImportContext::default(),
        )
        .await
        .unwrap();

    let first = preview.row(2).unwrap();
    assert!(first.is_valid());
    assert!(first.warnings().is_empty());

    let second = preview.row(3).unwrap();
    assert_eq!(
        second.errors(),
        &["Número de parcelas deve ser um inteiro positivo"]
    );
    assert_eq!(second.warnings(), &["Modalidade não reconhecida: MS"]);
    assert_eq!(preview.duplicate_check(), DuplicateCheckStatus::Skipped);
}

#[test]
fn test_decoding_is_idempotent() {
    let csv = "Nome Completo;E-mail;CPF\n\"Silva, Ana\";ana@x.com;11144477735\n";
    let parser = UniversalFileParser;

    let first = parser.decode("a.csv", csv.as_bytes()).unwrap();
    let second = parser.decode("a.csv", csv.as_bytes()).unwrap();

    assert_eq!(first.headers, second.headers);
    assert_eq!(first.records.len(), 1);
    assert_eq!(
        first.records[0].values,
        second.records[0].values
    );
}

#[test]
fn test_csv_parser_trait_object() {
    let parser: Box<dyn FileParser> = Box::new(portal_bolsas::importer::CsvParser);
    let decoded = parser.parse_bytes(b"\xEF\xBB\xBFnome,email\nAna,ana@x.com\n").unwrap();
    assert_eq!(decoded.headers, vec!["nome", "email"]);
}
