// ==========================================
// Portal de Bolsas - Limpeza e interpretação de valores
// ==========================================
// Normalização de chaves (CPF/email) e leitura de números e datas
// nos formatos usados em planilhas brasileiras.
// ==========================================

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("regex de email inválida")
});

pub struct DataCleaner;

impl DataCleaner {
    /// TRIM + valor vazio → None
    pub fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// Mantém apenas dígitos (CPF, código de banco)
    pub fn digits_only(&self, value: &str) -> String {
        value.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Chave de comparação de email: TRIM + minúsculas
    pub fn normalize_email(&self, value: &str) -> String {
        value.trim().to_lowercase()
    }

    /// Formato básico local@dominio.tld
    pub fn is_valid_email(&self, value: &str) -> bool {
        EMAIL_RE.is_match(value.trim())
    }

    /// Interpreta valores monetários
    ///
    /// Aceita "1234.56", "1234,56", "1.234,56", "1,234.56" e prefixo "R$".
    /// Com os dois separadores, o último é o decimal; só vírgula é decimal.
    pub fn parse_decimal(&self, value: &str) -> Option<f64> {
        let cleaned: String = value
            .trim()
            .trim_start_matches("R$")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if cleaned.is_empty() {
            return None;
        }

        let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
            (Some(comma), Some(dot)) if dot > comma => cleaned.replace(',', ""),
            (Some(_), _) => cleaned.replace('.', "").replace(',', "."),
            (None, _) => cleaned,
        };

        normalized.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Inteiro estritamente positivo ("12" e "12.0" valem o mesmo)
    pub fn parse_positive_integer(&self, value: &str) -> Option<u32> {
        self.parse_decimal(value)
            .filter(|v| *v > 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
    }

    /// Datas: YYYY-MM-DD, DD/MM/YYYY ou YYYYMMDD (hora, se houver, é ignorada)
    pub fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        let date_part = value
            .trim()
            .split(|c: char| c == 'T' || c.is_whitespace())
            .next()
            .unwrap_or_default();

        ["%Y-%m-%d", "%d/%m/%Y", "%Y%m%d"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
    }
}
