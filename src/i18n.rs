// ==========================================
// Portal de Bolsas - Internacionalização (i18n)
// ==========================================
// rust-i18n; pt-BR (padrão) e en
// O macro rust_i18n::i18n! é inicializado em lib.rs
// ==========================================

/// Idiomas disponíveis
pub const AVAILABLE_LOCALES: [&str; 2] = ["pt-BR", "en"];

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Define o idioma; códigos desconhecidos caem no padrão (pt-BR)
pub fn set_locale(locale: &str) {
    if AVAILABLE_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        rust_i18n::set_locale(AVAILABLE_LOCALES[0]);
    }
}

/// Traduz uma chave sem parâmetros
///
/// # Exemplo
/// ```no_run
/// use portal_bolsas::i18n::t;
/// let msg = t("report.title");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Traduz uma chave substituindo `%{nome}`
///
/// # Exemplo
/// ```no_run
/// use portal_bolsas::i18n::t_with_args;
/// let msg = t_with_args("report.row_header", &[("row", "2")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter()
        .fold(rust_i18n::t!(key).to_string(), |acc, (k, v)| {
            acc.replace(&format!("%{{{}}}", k), v)
        })
}
