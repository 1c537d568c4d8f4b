// ==========================================
// Portal de Bolsas - Decodificador de arquivos
// ==========================================
// Etapa 0: bytes do upload → registros brutos (cabeçalho → valor)
// Suporta: CSV (.csv) / Excel (.xlsx/.xls)
// Não conhece a semântica dos campos de negócio.
// ==========================================

use crate::domain::types::CellValue;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::import_pipeline_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Extensões aceitas
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

// ==========================================
// Estruturas de saída
// ==========================================

/// Registro bruto: cabeçalhos originais na ordem das colunas
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Linha visual no arquivo (cabeçalho = 1)
    pub row_number: usize,
    pub values: Vec<(String, CellValue)>,
}

/// Resultado da decodificação
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFile {
    /// Cabeçalhos originais (colunas sem nome descartadas)
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

fn build_record(row_number: usize, headers: &[String], cells: Vec<CellValue>) -> Option<RawRecord> {
    let values: Vec<(String, CellValue)> = headers
        .iter()
        .zip(cells.into_iter().chain(std::iter::repeat(CellValue::Null)))
        .filter(|(header, _)| !header.is_empty())
        .map(|(header, value)| (header.clone(), value))
        .collect();

    // Linhas completamente vazias são ignoradas
    if values.iter().all(|(_, v)| v.is_empty()) {
        return None;
    }

    Some(RawRecord { row_number, values })
}

fn finish(headers: Vec<String>, records: Vec<RawRecord>) -> ImportResult<DecodedFile> {
    let headers: Vec<String> = headers.into_iter().filter(|h| !h.is_empty()).collect();
    if headers.is_empty() {
        return Err(ImportError::EmptyFile("cabeçalho não encontrado".to_string()));
    }
    if records.is_empty() {
        return Err(ImportError::EmptyFile("nenhuma linha de dados".to_string()));
    }
    Ok(DecodedFile { headers, records })
}

/// Converte offsets de bytes em linhas físicas (1-based)
///
/// `Position::line()` do csv não acompanha CRLF nem linhas vazias, então a
/// linha é contada a partir do offset. Os offsets chegam em ordem crescente.
struct LineTracker<'a> {
    bytes: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineTracker<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            line: 1,
        }
    }

    /// Linha do primeiro byte do registro que começa em `byte`
    fn record_start_line(&mut self, byte: usize) -> usize {
        // O offset do registro pode incluir o terminador anterior e linhas vazias
        let mut start = byte.min(self.bytes.len());
        while start < self.bytes.len() && matches!(self.bytes[start], b'\r' | b'\n') {
            start += 1;
        }

        if start < self.offset {
            self.offset = 0;
            self.line = 1;
        }
        self.line += self.bytes[self.offset..start]
            .iter()
            .filter(|b| **b == b'\n')
            .count();
        self.offset = start;
        self.line
    }
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// Decodifica texto: UTF-8 (sem BOM) ou, se inválido, Windows-1252
    fn decode_text(bytes: &[u8]) -> String {
        match std::str::from_utf8(bytes) {
            Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
            Err(_) => {
                debug!("CSV não é UTF-8 válido, decodificando como Windows-1252");
                let (text, _, _) = WINDOWS_1252.decode(bytes);
                text.into_owned()
            }
        }
    }

    /// Detecta o separador (',' ou ';') pela linha de cabeçalho
    ///
    /// Conta apenas ocorrências fora de aspas; empate fica com vírgula.
    pub fn detect_delimiter(header_line: &str) -> u8 {
        let mut in_quotes = false;
        let mut commas = 0usize;
        let mut semicolons = 0usize;

        for ch in header_line.chars() {
            match ch {
                '"' => in_quotes = !in_quotes,
                ',' if !in_quotes => commas += 1,
                ';' if !in_quotes => semicolons += 1,
                _ => {}
            }
        }

        if semicolons > commas {
            b';'
        } else {
            b','
        }
    }
}

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<DecodedFile> {
        let text = Self::decode_text(bytes);
        if text.trim().is_empty() {
            return Err(ImportError::EmptyFile("arquivo sem conteúdo".to_string()));
        }

        let header_line = text.lines().next().unwrap_or_default();
        let delimiter = Self::detect_delimiter(header_line);

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // linhas com quantidade de colunas diferente
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut lines = LineTracker::new(text.as_bytes());
        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row_number = match record.position() {
                Some(pos) => lines.record_start_line(pos.byte() as usize),
                None => records.len() + 2,
            };
            let cells = record.iter().map(CellValue::from_text).collect();

            if let Some(raw) = build_record(row_number, &headers, cells) {
                records.push(raw);
            }
        }

        debug!(
            delimiter = %(delimiter as char),
            columns = headers.len(),
            rows = records.len(),
            "CSV decodificado"
        );

        finish(headers, records)
    }
}

// ==========================================
// Excel Parser
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// Converte a célula para o valor exibido (texto, número ou nulo)
    pub fn cell_to_value(cell: &Data) -> CellValue {
        match cell {
            Data::Empty | Data::Error(_) => CellValue::Null,
            Data::String(s) => CellValue::from_text(s),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Text(b.to_string()),
            Data::DateTime(_) | Data::DateTimeIso(_) => cell
                .as_date()
                .map(|d| CellValue::Text(d.format("%Y-%m-%d").to_string()))
                .unwrap_or_else(|| CellValue::from_text(&cell.to_string())),
            Data::DurationIso(s) => CellValue::from_text(s),
            #[allow(unreachable_patterns)]
            _ => CellValue::from_text(&cell.to_string()),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<DecodedFile> {
        // xlsx e xls são detectados pelo conteúdo
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        // Apenas a primeira aba
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::EmptyFile("planilha sem abas".to_string()))??;

        // Linha (0-based) onde começa a área usada
        let (start_row, _) = range.start().unwrap_or((0, 0));

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::EmptyFile("planilha sem linhas".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| Self::cell_to_value(cell).to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for (offset, data_row) in rows.enumerate() {
            // Cabeçalho na linha visual start_row + 1
            let row_number = start_row as usize + offset + 2;
            let cells = data_row.iter().map(Self::cell_to_value).collect();

            if let Some(raw) = build_record(row_number, &headers, cells) {
                records.push(raw);
            }
        }

        debug!(
            columns = headers.len(),
            rows = records.len(),
            "Planilha decodificada"
        );

        finish(headers, records)
    }
}

// ==========================================
// Decodificador universal (escolhe pela extensão)
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// Extensão em minúsculas ("" se ausente)
    pub fn extension_of(file_name: &str) -> String {
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
    }

    pub fn is_supported(file_name: &str) -> bool {
        SUPPORTED_EXTENSIONS.contains(&Self::extension_of(file_name).as_str())
    }

    /// Decodifica um buffer conforme a extensão do nome do arquivo
    pub fn decode(&self, file_name: &str, bytes: &[u8]) -> ImportResult<DecodedFile> {
        let ext = Self::extension_of(file_name);
        match ext.as_str() {
            "csv" => CsvParser.parse_bytes(bytes),
            "xlsx" | "xls" => ExcelParser.parse_bytes(bytes),
            _ => Err(ImportError::UnsupportedFormat(if ext.is_empty() {
                file_name.to_string()
            } else {
                ext
            })),
        }
    }

    /// Lê o arquivo do disco e decodifica
    pub fn decode_path<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<DecodedFile> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let bytes = std::fs::read(path)?;
        self.decode(&file_name, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn values(record: &RawRecord) -> Vec<(&str, CellValue)> {
        record
            .values
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect()
    }

    #[test]
    fn test_csv_basic() {
        let decoded = CsvParser
            .parse_bytes(b"nome,email,cpf\nAna Silva,ana@x.com,11144477735\n")
            .unwrap();

        assert_eq!(decoded.headers, vec!["nome", "email", "cpf"]);
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].row_number, 2);
        assert_eq!(
            values(&decoded.records[0]),
            vec![
                ("nome", CellValue::Text("Ana Silva".to_string())),
                ("email", CellValue::Text("ana@x.com".to_string())),
                ("cpf", CellValue::Text("11144477735".to_string())),
            ]
        );
    }

    #[test]
    fn test_csv_semicolon_and_quotes() {
        let csv = "nome;valor_total;descricao\r\n\
                   \"Silva; Ana\";\"1.234,56\";\"diz \"\"olá\"\"\"\r\n";
        let decoded = CsvParser.parse_bytes(csv.as_bytes()).unwrap();

        let record = &decoded.records[0];
        assert_eq!(record.values[0].1, CellValue::Text("Silva; Ana".to_string()));
        assert_eq!(record.values[1].1, CellValue::Text("1.234,56".to_string()));
        assert_eq!(
            record.values[2].1,
            CellValue::Text("diz \"olá\"".to_string())
        );
    }

    #[test]
    fn test_csv_detect_delimiter() {
        assert_eq!(CsvParser::detect_delimiter("a,b,c"), b',');
        assert_eq!(CsvParser::detect_delimiter("a;b;c"), b';');
        assert_eq!(CsvParser::detect_delimiter("\"a,b\";c;d"), b';');
        assert_eq!(CsvParser::detect_delimiter("abc"), b',');
    }

    fn row_numbers(decoded: &DecodedFile) -> Vec<usize> {
        decoded.records.iter().map(|r| r.row_number).collect()
    }

    #[test]
    fn test_csv_skips_empty_field_rows_and_keeps_line_numbers() {
        let csv = "nome,email\nAna,ana@x.com\n,\nBruno,bruno@x.com\n";
        let decoded = CsvParser.parse_bytes(csv.as_bytes()).unwrap();
        assert_eq!(row_numbers(&decoded), vec![2, 4]);
    }

    #[test]
    fn test_csv_crlf_line_numbers() {
        let csv = b"nome,email,cpf\r\nAna Silva,ana@x.com,11144477735\r\nB,b@x.com,1\r\nC,c@x.com,2\r\n";
        let decoded = CsvParser.parse_bytes(csv).unwrap();
        assert_eq!(row_numbers(&decoded), vec![2, 3, 4]);
    }

    #[test]
    fn test_csv_empty_lines_keep_physical_line_numbers() {
        let decoded = CsvParser
            .parse_bytes(b"nome,email\nAna,a@x.com\n\nB,b@x.com\n")
            .unwrap();
        assert_eq!(row_numbers(&decoded), vec![2, 4]);

        let decoded = CsvParser
            .parse_bytes(b"nome,email\n\n\nAna,a@x.com\nB,b@x.com\n")
            .unwrap();
        assert_eq!(row_numbers(&decoded), vec![4, 5]);

        let decoded = CsvParser
            .parse_bytes(b"nome;email\r\n\r\nAna;a@x.com\r\n\r\nB;b@x.com")
            .unwrap();
        assert_eq!(row_numbers(&decoded), vec![3, 5]);
    }

    #[test]
    fn test_csv_multiline_quoted_cell_line_numbers() {
        let csv = "nome,descricao\nAna,\"linha um\nlinha dois\"\nBruno,curta\n";
        let decoded = CsvParser.parse_bytes(csv.as_bytes()).unwrap();

        assert_eq!(row_numbers(&decoded), vec![2, 4]);
        assert_eq!(
            decoded.records[0].values[1].1,
            CellValue::Text("linha um\nlinha dois".to_string())
        );
    }

    #[test]
    fn test_csv_short_row_fills_null() {
        let decoded = CsvParser.parse_bytes(b"nome,email,cpf\nAna\n").unwrap();
        assert_eq!(decoded.records[0].values[2].1, CellValue::Null);
    }

    #[test]
    fn test_csv_windows_1252_fallback() {
        // "João" em Windows-1252
        let bytes = b"nome,email\nJo\xe3o,joao@x.com\n";
        let decoded = CsvParser.parse_bytes(bytes).unwrap();
        assert_eq!(
            decoded.records[0].values[0].1,
            CellValue::Text("João".to_string())
        );
    }

    #[test]
    fn test_csv_utf8_bom_stripped() {
        let decoded = CsvParser
            .parse_bytes("\u{feff}nome,email\nAna,ana@x.com\n".as_bytes())
            .unwrap();
        assert_eq!(decoded.headers[0], "nome");
    }

    #[test]
    fn test_csv_empty_file() {
        assert!(matches!(
            CsvParser.parse_bytes(b""),
            Err(ImportError::EmptyFile(_))
        ));
        assert!(matches!(
            CsvParser.parse_bytes(b"nome,email\n"),
            Err(ImportError::EmptyFile(_))
        ));
    }

    #[test]
    fn test_csv_decode_is_deterministic() {
        let csv = b"Nome;E-mail\nAna;ana@x.com\nBruno;bruno@x.com\n";
        let first = CsvParser.parse_bytes(csv).unwrap();
        let second = CsvParser.parse_bytes(csv).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_excel_cell_to_value() {
        assert_eq!(ExcelParser::cell_to_value(&Data::Empty), CellValue::Null);
        assert_eq!(
            ExcelParser::cell_to_value(&Data::String("  Ana ".to_string())),
            CellValue::Text("Ana".to_string())
        );
        assert_eq!(
            ExcelParser::cell_to_value(&Data::Float(11144477735.0)),
            CellValue::Number(11144477735.0)
        );
        assert_eq!(
            ExcelParser::cell_to_value(&Data::Int(12)),
            CellValue::Number(12.0)
        );
        assert_eq!(
            ExcelParser::cell_to_value(&Data::Bool(true)),
            CellValue::Text("true".to_string())
        );
    }

    #[test]
    fn test_excel_invalid_bytes() {
        let result = ExcelParser.parse_bytes(b"isto nao e uma planilha");
        assert!(matches!(result, Err(ImportError::ExcelParseError(_))));
    }

    #[test]
    fn test_universal_unsupported_format() {
        let result = UniversalFileParser.decode("dados.pdf", b"%PDF");
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "pdf"));
    }

    #[test]
    fn test_universal_decode_path() {
        let mut temp_file = Builder::new().suffix(".CSV").tempfile().unwrap();
        writeln!(temp_file, "nome,email,cpf").unwrap();
        writeln!(temp_file, "Ana Silva,ana@x.com,11144477735").unwrap();

        let decoded = UniversalFileParser.decode_path(temp_file.path()).unwrap();
        assert_eq!(decoded.records.len(), 1);
    }

    #[test]
    fn test_universal_file_not_found() {
        let result = UniversalFileParser.decode_path("inexistente.csv");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
