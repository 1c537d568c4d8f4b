// ==========================================
// Portal de Bolsas - Validador de linhas
// ==========================================
// Etapa 2: campos obrigatórios + regras de formato do schema
// Apenas intra-linha: sem comparação entre linhas, sem banco.
// ==========================================

use crate::domain::import::ParsedRow;
use crate::domain::types::ImportType;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::import_pipeline_trait::RowValidator as RowValidatorTrait;
use crate::importer::schema::{FieldRule, ImportSchema, Severity, DEFAULT_MODALITY_CODES};

/// Resultado da validação de uma linha
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowValidation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl RowValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn report(mut self, severity: Severity, message: String) -> Self {
        match severity {
            Severity::Error => self.errors.push(message),
            Severity::Warning => self.warnings.push(message),
        }
        self
    }
}

pub struct RowValidator {
    cleaner: DataCleaner,
    modality_codes: Vec<String>, // maiúsculas
}

impl RowValidator {
    pub fn new(modality_codes: Vec<String>) -> Self {
        Self {
            cleaner: DataCleaner,
            modality_codes: modality_codes
                .into_iter()
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    fn check_required(&self, acc: RowValidation, row: &ParsedRow, field: &str) -> RowValidation {
        if row.text(field).is_some() {
            acc
        } else {
            acc.report(Severity::Error, format!("Campo obrigatório ausente: {}", field))
        }
    }

    /// Aplica uma regra; campos ausentes são ignorados (já cobertos pelos obrigatórios)
    fn apply_rule(&self, acc: RowValidation, row: &ParsedRow, rule: &FieldRule) -> RowValidation {
        match *rule {
            FieldRule::Email { field } => match row.text(field) {
                Some(value) if !self.cleaner.is_valid_email(&value) => {
                    acc.report(Severity::Error, "Email inválido".to_string())
                }
                _ => acc,
            },

            FieldRule::DigitCount {
                field,
                digits,
                severity,
                message,
            } => match row.text(field) {
                Some(value) if self.cleaner.digits_only(&value).len() != digits => {
                    acc.report(severity, message.to_string())
                }
                _ => acc,
            },

            FieldRule::DateOrder { start, end } => {
                let start_raw = row.text(start);
                let end_raw = row.text(end);
                let start_date = start_raw.as_deref().map(|v| self.cleaner.parse_date(v));
                let end_date = end_raw.as_deref().map(|v| self.cleaner.parse_date(v));

                let mut acc = acc;
                if let Some(None) = start_date {
                    acc = acc.report(Severity::Error, format!("Data inválida: {}", start));
                }
                if let Some(None) = end_date {
                    acc = acc.report(Severity::Error, format!("Data inválida: {}", end));
                }
                if let (Some(Some(s)), Some(Some(e))) = (start_date, end_date) {
                    if s >= e {
                        acc = acc.report(
                            Severity::Error,
                            "Data de início deve ser anterior à data de término".to_string(),
                        );
                    }
                }
                acc
            }

            FieldRule::PositiveNumber { field, message } => match row.text(field) {
                Some(value)
                    if !self
                        .cleaner
                        .parse_decimal(&value)
                        .map_or(false, |v| v > 0.0) =>
                {
                    acc.report(Severity::Error, message.to_string())
                }
                _ => acc,
            },

            FieldRule::PositiveInteger { field, message } => match row.text(field) {
                Some(value) if self.cleaner.parse_positive_integer(&value).is_none() => {
                    acc.report(Severity::Error, message.to_string())
                }
                _ => acc,
            },

            FieldRule::ModalityCode { field } => match row.text(field) {
                Some(value) if !self.modality_codes.contains(&value.to_uppercase()) => acc
                    .report(
                        Severity::Warning,
                        format!("Modalidade não reconhecida: {}", value),
                    ),
                _ => acc,
            },
        }
    }
}

impl Default for RowValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MODALITY_CODES.iter().map(|c| c.to_string()).collect())
    }
}

impl RowValidatorTrait for RowValidator {
    fn validate(&self, row: &ParsedRow, import_type: ImportType) -> RowValidation {
        let schema = ImportSchema::for_type(import_type);

        let acc = schema
            .required
            .iter()
            .fold(RowValidation::default(), |acc, field| {
                self.check_required(acc, row, field)
            });

        schema
            .rules
            .iter()
            .fold(acc, |acc, rule| self.apply_rule(acc, row, rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CellValue;
    use std::collections::BTreeMap;

    fn row(values: &[(&str, &str)]) -> ParsedRow {
        let data: BTreeMap<String, CellValue> = values
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::from_text(v)))
            .collect();
        ParsedRow::new(2, data)
    }

    fn validate(values: &[(&str, &str)], import_type: ImportType) -> RowValidation {
        RowValidator::default().validate(&row(values), import_type)
    }

    // ===== scholars =====

    #[test]
    fn test_scholar_valid() {
        let result = validate(
            &[("nome", "Ana Silva"), ("email", "ana@x.com"), ("cpf", "11144477735")],
            ImportType::Scholars,
        );
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scholar_cpf_short() {
        let result = validate(
            &[("nome", "Ana Silva"), ("email", "ana@x.com"), ("cpf", "123")],
            ImportType::Scholars,
        );
        assert!(!result.is_valid());
        assert_eq!(result.errors, vec!["CPF deve ter 11 dígitos"]);
    }

    #[test]
    fn test_scholar_formatted_cpf_is_accepted() {
        let result = validate(
            &[("nome", "Ana"), ("email", "ana@x.com"), ("cpf", "111.444.777-35")],
            ImportType::Scholars,
        );
        assert!(result.is_valid());
    }

    #[test]
    fn test_scholar_invalid_email() {
        let result = validate(
            &[("nome", "Ana"), ("email", "ana.x.com"), ("cpf", "11144477735")],
            ImportType::Scholars,
        );
        assert_eq!(result.errors, vec!["Email inválido"]);
    }

    #[test]
    fn test_missing_required_field_is_named() {
        let result = validate(&[("nome", "Ana"), ("email", "  ")], ImportType::Scholars);

        assert!(result.errors.iter().any(|e| e.contains("email")));
        assert!(result.errors.iter().any(|e| e.contains("cpf")));
        // Campo ausente não dispara regra de formato
        assert!(!result.errors.iter().any(|e| e == "Email inválido"));
        assert_eq!(result.errors.len(), 2);
    }

    // ===== bank_accounts =====

    #[test]
    fn test_bank_code_is_warning_only() {
        let result = validate(
            &[
                ("email", "ana@x.com"),
                ("banco", "1"),
                ("agencia", "1234"),
                ("conta", "56789-0"),
            ],
            ImportType::BankAccounts,
        );
        assert!(result.is_valid());
        assert_eq!(result.warnings, vec!["Código do banco deve ter 3 dígitos"]);
    }

    #[test]
    fn test_bank_invalid_email_is_error() {
        let result = validate(
            &[
                ("email", "ana@"),
                ("banco", "001"),
                ("agencia", "1234"),
                ("conta", "56789-0"),
            ],
            ImportType::BankAccounts,
        );
        assert_eq!(result.errors, vec!["Email inválido"]);
        assert!(result.warnings.is_empty());
    }

    // ===== projects =====

    fn project(start: &str, end: &str, valor: &str) -> Vec<(&'static str, String)> {
        vec![
            ("nome", "Projeto Alfa".to_string()),
            ("start_date", start.to_string()),
            ("end_date", end.to_string()),
            ("valor_total", valor.to_string()),
            ("empresa_parceira", "ACME".to_string()),
        ]
    }

    fn validate_owned(values: Vec<(&'static str, String)>, import_type: ImportType) -> RowValidation {
        let borrowed: Vec<(&str, &str)> = values.iter().map(|(k, v)| (*k, v.as_str())).collect();
        validate(&borrowed, import_type)
    }

    #[test]
    fn test_project_start_after_end() {
        let result = validate_owned(
            project("2024-06-01", "2024-01-01", "1000"),
            ImportType::Projects,
        );
        assert_eq!(
            result.errors,
            vec!["Data de início deve ser anterior à data de término"]
        );
    }

    #[test]
    fn test_project_same_day_is_rejected() {
        let result = validate_owned(
            project("2024-06-01", "01/06/2024", "1000"),
            ImportType::Projects,
        );
        assert!(!result.is_valid());
    }

    #[test]
    fn test_project_valid_with_brazilian_formats() {
        let result = validate_owned(
            project("01/01/2024", "31/12/2024", "R$ 150.000,00"),
            ImportType::Projects,
        );
        assert!(result.is_valid(), "{:?}", result.errors);
    }

    #[test]
    fn test_project_invalid_date_and_value() {
        let result = validate_owned(project("ontem", "2024-12-31", "0"), ImportType::Projects);
        assert!(result
            .errors
            .contains(&"Data inválida: start_date".to_string()));
        assert!(result
            .errors
            .contains(&"Valor total deve ser um número positivo".to_string()));
    }

    #[test]
    fn test_project_missing_partner_company() {
        let mut values = project("2024-01-01", "2024-12-31", "1000");
        values.retain(|(k, _)| *k != "empresa_parceira");
        let result = validate_owned(values, ImportType::Projects);
        assert_eq!(
            result.errors,
            vec!["Campo obrigatório ausente: empresa_parceira"]
        );
    }

    // ===== enrollments =====

    #[test]
    fn test_enrollment_valid() {
        let result = validate(
            &[
                ("cpf", "11144477735"),
                ("projeto", "Projeto Alfa"),
                ("valor_bolsa", "700,00"),
                ("parcelas", "12"),
                ("modalidade", "dti"),
            ],
            ImportType::Enrollments,
        );
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_enrollment_rules() {
        let result = validate(
            &[
                ("cpf", "11144477735"),
                ("projeto", "Projeto Alfa"),
                ("valor_bolsa", "-5"),
                ("parcelas", "2.5"),
                ("modalidade", "XYZ"),
            ],
            ImportType::Enrollments,
        );
        assert_eq!(
            result.errors,
            vec![
                "Valor da bolsa deve ser um número positivo",
                "Número de parcelas deve ser um inteiro positivo",
            ]
        );
        assert_eq!(result.warnings, vec!["Modalidade não reconhecida: XYZ"]);
    }

    #[test]
    fn test_enrollment_integral_parcelas_agree_between_text_and_number() {
        let base = [
            ("cpf", "11144477735"),
            ("projeto", "Projeto Alfa"),
            ("valor_bolsa", "700"),
            ("modalidade", "IC"),
        ];

        // CSV entrega texto
        let mut values = base.to_vec();
        values.push(("parcelas", "12.0"));
        assert!(validate(&values, ImportType::Enrollments).is_valid());

        // Excel entrega número
        let mut from_excel = row(&base);
        from_excel
            .data
            .insert("parcelas".to_string(), CellValue::Number(12.0));
        let result = RowValidator::default().validate(&from_excel, ImportType::Enrollments);
        assert!(result.is_valid());
    }

    #[test]
    fn test_custom_modality_list() {
        let validator = RowValidator::new(vec!["xyz".to_string()]);
        let result = validator.validate(
            &row(&[
                ("cpf", "11144477735"),
                ("projeto", "Projeto Alfa"),
                ("valor_bolsa", "700"),
                ("parcelas", "12"),
                ("modalidade", "XYZ"),
            ]),
            ImportType::Enrollments,
        );
        assert!(result.warnings.is_empty());
    }
}
