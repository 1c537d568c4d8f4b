// ==========================================
// Portal de Bolsas - Schemas de importação
// ==========================================
// Por tipo de importação: campos obrigatórios/opcionais, aliases de
// cabeçalho e a lista de regras de formato aplicada pelo validador.
// ==========================================

use crate::domain::types::ImportType;

/// Modalidades de bolsa reconhecidas quando não há configuração
pub const DEFAULT_MODALITY_CODES: [&str; 8] = ["IC", "ITI", "DTI", "EXP", "PD", "AT", "MS", "DR"];

/// Gravidade de uma regra violada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,   // bloqueia a linha
    Warning, // apenas aviso
}

/// Regra de formato de um campo (intra-linha)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Formato básico local@dominio.tld
    Email { field: &'static str },
    /// Quantidade exata de dígitos após remover não-dígitos
    DigitCount {
        field: &'static str,
        digits: usize,
        severity: Severity,
        message: &'static str,
    },
    /// Início estritamente anterior ao término
    DateOrder {
        start: &'static str,
        end: &'static str,
    },
    /// Número > 0
    PositiveNumber {
        field: &'static str,
        message: &'static str,
    },
    /// Inteiro > 0
    PositiveInteger {
        field: &'static str,
        message: &'static str,
    },
    /// Código pertencente à lista de modalidades (aviso)
    ModalityCode { field: &'static str },
}

/// Schema de um tipo de importação
#[derive(Debug)]
pub struct ImportSchema {
    pub import_type: ImportType,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    /// (cabeçalho normalizado alternativo, campo canônico)
    pub aliases: &'static [(&'static str, &'static str)],
    pub rules: &'static [FieldRule],
    /// Linhas identificam pessoas por CPF/email
    pub supports_duplicate_check: bool,
}

static SCHOLARS: ImportSchema = ImportSchema {
    import_type: ImportType::Scholars,
    required: &["nome", "email", "cpf"],
    optional: &["telefone", "data_nascimento", "instituicao", "curso", "matricula"],
    aliases: &[
        ("nome_completo", "nome"),
        ("name", "nome"),
        ("e_mail", "email"),
        ("mail", "email"),
        ("documento", "cpf"),
        ("cpf_do_bolsista", "cpf"),
        ("fone", "telefone"),
        ("celular", "telefone"),
        ("nascimento", "data_nascimento"),
        ("data_de_nascimento", "data_nascimento"),
        ("universidade", "instituicao"),
    ],
    rules: &[
        FieldRule::Email { field: "email" },
        FieldRule::DigitCount {
            field: "cpf",
            digits: 11,
            severity: Severity::Error,
            message: "CPF deve ter 11 dígitos",
        },
    ],
    supports_duplicate_check: true,
};

static BANK_ACCOUNTS: ImportSchema = ImportSchema {
    import_type: ImportType::BankAccounts,
    required: &["email", "banco", "agencia", "conta"],
    optional: &["cpf", "tipo_conta", "chave_pix"],
    aliases: &[
        ("e_mail", "email"),
        ("mail", "email"),
        ("codigo_banco", "banco"),
        ("codigo_do_banco", "banco"),
        ("bank_code", "banco"),
        ("agencia_bancaria", "agencia"),
        ("numero_conta", "conta"),
        ("numero_da_conta", "conta"),
        ("conta_corrente", "conta"),
        ("pix", "chave_pix"),
    ],
    rules: &[
        FieldRule::Email { field: "email" },
        FieldRule::DigitCount {
            field: "banco",
            digits: 3,
            severity: Severity::Warning,
            message: "Código do banco deve ter 3 dígitos",
        },
    ],
    supports_duplicate_check: false,
};

static PROJECTS: ImportSchema = ImportSchema {
    import_type: ImportType::Projects,
    required: &["nome", "start_date", "end_date", "valor_total", "empresa_parceira"],
    optional: &["descricao", "coordenador"],
    aliases: &[
        ("nome_do_projeto", "nome"),
        ("projeto", "nome"),
        ("data_inicio", "start_date"),
        ("data_de_inicio", "start_date"),
        ("inicio", "start_date"),
        ("data_fim", "end_date"),
        ("data_termino", "end_date"),
        ("data_de_termino", "end_date"),
        ("termino", "end_date"),
        ("valor", "valor_total"),
        ("orcamento", "valor_total"),
        ("empresa", "empresa_parceira"),
        ("parceiro", "empresa_parceira"),
    ],
    rules: &[
        FieldRule::DateOrder {
            start: "start_date",
            end: "end_date",
        },
        FieldRule::PositiveNumber {
            field: "valor_total",
            message: "Valor total deve ser um número positivo",
        },
    ],
    supports_duplicate_check: false,
};

static ENROLLMENTS: ImportSchema = ImportSchema {
    import_type: ImportType::Enrollments,
    required: &["cpf", "projeto", "valor_bolsa", "parcelas", "modalidade"],
    optional: &["email", "data_inicio"],
    aliases: &[
        ("cpf_bolsista", "cpf"),
        ("cpf_do_bolsista", "cpf"),
        ("e_mail", "email"),
        ("nome_projeto", "projeto"),
        ("nome_do_projeto", "projeto"),
        ("valor", "valor_bolsa"),
        ("valor_mensal", "valor_bolsa"),
        ("numero_parcelas", "parcelas"),
        ("numero_de_parcelas", "parcelas"),
        ("num_parcelas", "parcelas"),
        ("quantidade_parcelas", "parcelas"),
        ("modalidade_bolsa", "modalidade"),
    ],
    rules: &[
        FieldRule::PositiveNumber {
            field: "valor_bolsa",
            message: "Valor da bolsa deve ser um número positivo",
        },
        FieldRule::PositiveInteger {
            field: "parcelas",
            message: "Número de parcelas deve ser um inteiro positivo",
        },
        FieldRule::ModalityCode {
            field: "modalidade",
        },
    ],
    supports_duplicate_check: false,
};

impl ImportSchema {
    pub fn for_type(import_type: ImportType) -> &'static ImportSchema {
        match import_type {
            ImportType::Scholars => &SCHOLARS,
            ImportType::BankAccounts => &BANK_ACCOUNTS,
            ImportType::Projects => &PROJECTS,
            ImportType::Enrollments => &ENROLLMENTS,
        }
    }

    /// Resolve aliases; cabeçalhos desconhecidos são mantidos como estão
    pub fn canonical_field<'a>(&self, normalized: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(alias, _)| *alias == normalized)
            .map(|(_, canonical)| *canonical)
            .unwrap_or(normalized)
    }

    pub fn is_known_field(&self, field: &str) -> bool {
        self.required
            .iter()
            .chain(self.optional.iter())
            .any(|known| *known == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_schema() {
        for import_type in ImportType::ALL {
            let schema = ImportSchema::for_type(import_type);
            assert_eq!(schema.import_type, import_type);
            assert!(!schema.required.is_empty());
        }
    }

    #[test]
    fn test_aliases_point_to_known_fields() {
        for import_type in ImportType::ALL {
            let schema = ImportSchema::for_type(import_type);
            for (alias, canonical) in schema.aliases {
                assert!(
                    schema.is_known_field(canonical),
                    "{}: alias {} aponta para campo desconhecido {}",
                    import_type,
                    alias,
                    canonical
                );
            }
        }
    }

    #[test]
    fn test_canonical_field() {
        let schema = ImportSchema::for_type(ImportType::Scholars);
        assert_eq!(schema.canonical_field("e_mail"), "email");
        assert_eq!(schema.canonical_field("email"), "email");
        assert_eq!(schema.canonical_field("coluna_extra"), "coluna_extra");
    }

    #[test]
    fn test_only_scholars_check_duplicates() {
        assert!(ImportSchema::for_type(ImportType::Scholars).supports_duplicate_check);
        assert!(!ImportSchema::for_type(ImportType::Projects).supports_duplicate_check);
    }
}
