// ==========================================
// Portal de Bolsas - CLI de prévia de importação
// ==========================================
// Uso:
//   portal-bolsas <arquivo> --type <tipo> [--db <caminho>] [--org <id>] [--json] [--locale <pt-BR|en>]
//   portal-bolsas --history <n>
// ==========================================

use anyhow::{bail, Context, Result};
use clap::Parser;
use portal_bolsas::api::{ImportApi, ImportPreviewResponse};
use portal_bolsas::domain::{DuplicateCheckStatus, ImportBatch, ImportContext, ImportType};
use portal_bolsas::i18n::{set_locale, t, t_with_args};
use portal_bolsas::{db, logging};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "portal-bolsas")]
#[command(version, about = "Prévia de importação de planilhas do Portal de Bolsas")]
struct Cli {
    /// Arquivo .csv, .xlsx ou .xls
    file: Option<PathBuf>,

    /// scholars | bank_accounts | projects | enrollments
    #[arg(long = "type", short = 't')]
    import_type: Option<ImportType>,

    /// Banco SQLite (padrão: PORTAL_BOLSAS_DB_PATH ou diretório de dados)
    #[arg(long)]
    db: Option<String>,

    /// Organização usada na verificação de duplicidade
    #[arg(long)]
    org: Option<String>,

    /// Imprime a prévia completa em JSON
    #[arg(long)]
    json: bool,

    #[arg(long, default_value = "pt-BR")]
    locale: String,

    /// Lista os últimos N lotes em vez de gerar prévia
    #[arg(long, value_name = "N")]
    history: Option<usize>,

    /// Logs em JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }
    set_locale(&cli.locale);

    if let Err(e) = run(cli).await {
        eprintln!("{}", t_with_args("cli.failed", &[("message", format!("{:#}", e).as_str())]));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let db_path = cli.db.clone().unwrap_or_else(db::get_default_db_path);
    tracing::info!(
        "{}",
        t_with_args("app.starting", &[("version", portal_bolsas::VERSION)])
    );
    tracing::info!("{}", t_with_args("app.using_database", &[("path", db_path.as_str())]));

    let api = ImportApi::new(&db_path).context("falha ao abrir o banco de dados")?;

    if let Some(limit) = cli.history {
        let batches = api.list_batches(limit)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&batches)?);
        } else {
            print_history(&batches);
        }
        return Ok(());
    }

    let (file, import_type) = match (cli.file, cli.import_type) {
        (Some(file), Some(import_type)) => (file, import_type),
        (None, _) => bail!("informe o arquivo a importar (ou --history <N>)"),
        (Some(_), None) => bail!("informe o tipo de importação com --type"),
    };

    let ctx = cli
        .org
        .map(ImportContext::for_organization)
        .unwrap_or_default();
    let response = api.preview_file(&file, import_type, &ctx).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_report(&response);
    }
    Ok(())
}

fn print_report(response: &ImportPreviewResponse) {
    let preview = &response.preview;
    let summary = preview.summary();
    let count = |key: &str, n: usize| t_with_args(key, &[("count", n.to_string().as_str())]);

    println!("{}", t("report.title"));
    println!("{}", t_with_args("report.file", &[("file", preview.file_name())]));
    println!(
        "{}",
        t_with_args("report.import_type", &[("import_type", preview.import_type().label())])
    );
    match &response.batch_id {
        Some(batch_id) => println!("{}", t_with_args("report.batch", &[("batch_id", batch_id.as_str())])),
        None => println!("{}", t("report.batch_not_recorded")),
    }
    println!(
        "{}",
        t_with_args("report.headers", &[("headers", preview.headers().join(", ").as_str())])
    );

    println!();
    println!("{}", t("report.summary"));
    println!("  {}", count("report.total_rows", summary.total_rows));
    println!("  {}", count("report.valid_rows", summary.valid_rows));
    println!("  {}", count("report.invalid_rows", summary.invalid_rows));
    if preview.duplicate_check() == DuplicateCheckStatus::Checked {
        println!("  {}", count("report.new_rows", summary.new_rows));
        println!("  {}", count("report.duplicate_rows", summary.duplicate_rows));
        println!("  {}", count("report.conflict_rows", summary.conflict_rows));
    }
    println!(
        "  {}",
        count(
            "report.to_import",
            preview.rows_to_import(&HashMap::new()).len()
        )
    );
    let check_key = match preview.duplicate_check() {
        DuplicateCheckStatus::Checked => "report.duplicate_check_checked",
        DuplicateCheckStatus::Skipped => "report.duplicate_check_skipped",
        DuplicateCheckStatus::Unavailable => "report.duplicate_check_unavailable",
    };
    println!("  {}", t(check_key));

    let mut any_issue = false;
    for row in preview.rows() {
        let duplicate = row.duplicate_info().filter(|d| d.existing_id.is_some());
        if row.errors().is_empty() && row.warnings().is_empty() && duplicate.is_none() {
            continue;
        }
        if !any_issue {
            println!();
            any_issue = true;
        }

        println!(
            "{}",
            t_with_args("report.row_header", &[("row", row.row_number.to_string().as_str())])
        );
        for error in row.errors() {
            println!("  {}", t_with_args("report.error", &[("message", error.as_str())]));
        }
        for warning in row.warnings() {
            println!("  {}", t_with_args("report.warning", &[("message", warning.as_str())]));
        }
        if let Some(info) = duplicate {
            println!(
                "  {}",
                t_with_args(
                    "report.duplicate",
                    &[
                        ("status", info.status.to_string().as_str()),
                        ("reason", info.reason.as_str()),
                        ("action", info.action.to_string().as_str()),
                    ],
                )
            );
        }
    }

    if !any_issue {
        println!();
        println!("{}", t("report.no_issues"));
    }
}

fn print_history(batches: &[ImportBatch]) {
    println!("{}", t("history.title"));
    if batches.is_empty() {
        println!("  {}", t("history.empty"));
        return;
    }

    for batch in batches {
        println!(
            "  {}",
            t_with_args(
                "history.entry",
                &[
                    ("created_at", batch.created_at.format("%Y-%m-%d %H:%M").to_string().as_str()),
                    ("import_type", batch.import_type.as_str()),
                    ("file", batch.file_name.as_str()),
                    ("valid", batch.summary.valid_rows.to_string().as_str()),
                    ("total", batch.summary.total_rows.to_string().as_str()),
                ],
            )
        );
    }
}
