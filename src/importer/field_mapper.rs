// ==========================================
// Portal de Bolsas - Mapeamento de campos
// ==========================================
// Etapa 1: cabeçalho original → chave canônica do schema
// Regra: minúsculas, sem acentos, espaços → '_', apenas [a-z0-9_]
// ==========================================

use crate::domain::import::ParsedRow;
use crate::domain::types::{CellValue, ImportType};
use crate::importer::file_parser::RawRecord;
use crate::importer::import_pipeline_trait::FieldMapper as FieldMapperTrait;
use crate::importer::schema::ImportSchema;
use std::collections::BTreeMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normaliza um cabeçalho
///
/// "E-mail" → "email", "Data de Início" → "data_de_inicio"
pub fn normalize_header(raw: &str) -> String {
    let without_accents: String = raw
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    without_accents
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

pub struct FieldMapper;

impl FieldMapper {
    /// Cabeçalho original → campo canônico ("" se nada sobrar)
    fn canonical_key(&self, header: &str, schema: &ImportSchema) -> String {
        let normalized = normalize_header(header);
        schema.canonical_field(&normalized).to_string()
    }
}

impl FieldMapperTrait for FieldMapper {
    fn canonical_headers(&self, headers: &[String], import_type: ImportType) -> Vec<String> {
        let schema = ImportSchema::for_type(import_type);
        let mut result: Vec<String> = Vec::with_capacity(headers.len());

        for header in headers {
            let key = self.canonical_key(header, schema);
            if !key.is_empty() && !result.contains(&key) {
                result.push(key);
            }
        }

        result
    }

    fn map_record(&self, record: RawRecord, import_type: ImportType) -> ParsedRow {
        let schema = ImportSchema::for_type(import_type);
        let mut data: BTreeMap<String, CellValue> = BTreeMap::new();

        for (header, value) in record.values {
            let key = self.canonical_key(&header, schema);
            if key.is_empty() {
                continue;
            }

            // Duas colunas com a mesma chave: vale o primeiro valor não vazio
            let occupied = data.get(&key).map_or(false, |existing| !existing.is_empty());
            if !occupied {
                data.insert(key, value);
            }
        }

        ParsedRow::new(record.row_number, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(values: &[(&str, &str)]) -> RawRecord {
        RawRecord {
            row_number: 2,
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), CellValue::from_text(v)))
                .collect(),
        }
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("E-mail"), "email");
        assert_eq!(normalize_header("Email "), "email");
        assert_eq!(normalize_header("e_mail"), "e_mail");
        assert_eq!(normalize_header("Data de Início"), "data_de_inicio");
        assert_eq!(normalize_header("  Nº   Parcelas "), "n_parcelas");
        assert_eq!(normalize_header("Instituição"), "instituicao");
        assert_eq!(normalize_header("CPF"), "cpf");
    }

    #[test]
    fn test_canonical_headers_apply_aliases_and_dedup() {
        let mapper = FieldMapper;
        let headers = vec![
            "Nome".to_string(),
            "E-mail".to_string(),
            "e_mail".to_string(),
            "CPF".to_string(),
            "###".to_string(),
        ];

        assert_eq!(
            mapper.canonical_headers(&headers, ImportType::Scholars),
            vec!["nome", "email", "cpf"]
        );
    }

    #[test]
    fn test_map_record_basic() {
        let mapper = FieldMapper;
        let row = mapper.map_record(
            raw(&[("Nome", "Ana Silva"), ("E-mail", "ana@x.com"), ("CPF", "11144477735")]),
            ImportType::Scholars,
        );

        assert_eq!(row.row_number, 2);
        assert_eq!(row.text("nome"), Some("Ana Silva".to_string()));
        assert_eq!(row.text("email"), Some("ana@x.com".to_string()));
        assert_eq!(row.text("cpf"), Some("11144477735".to_string()));
        assert!(row.errors().is_empty());
    }

    #[test]
    fn test_map_record_first_non_empty_wins() {
        let mapper = FieldMapper;
        let row = mapper.map_record(
            raw(&[("Email", ""), ("e_mail", "ana@x.com"), ("mail", "outro@x.com")]),
            ImportType::Scholars,
        );

        assert_eq!(row.text("email"), Some("ana@x.com".to_string()));
    }

    #[test]
    fn test_map_record_alias_per_type() {
        let mapper = FieldMapper;
        let row = mapper.map_record(
            raw(&[("Data Início", "2024-01-01"), ("Data Término", "2024-12-31")]),
            ImportType::Projects,
        );

        assert_eq!(row.text("start_date"), Some("2024-01-01".to_string()));
        assert_eq!(row.text("end_date"), Some("2024-12-31".to_string()));
    }
}
