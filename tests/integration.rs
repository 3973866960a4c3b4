//! End-to-end tests for the VR engine.
//!
//! Each test writes a full set of `.xlsx` extracts into a temporary
//! directory (or zip archive), runs the engine over them, and checks the
//! payout table and validation report, both as returned values and as the
//! workbooks written to disk. The scenarios cover:
//! - Full-period, admission, early-termination and vacation pro-ration
//! - Exclusion lists and director detection
//! - Rate fallback for unmapped or missing states
//! - Archive loading, reload and failure semantics
//! - The HTTP API

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use calamine::{Data, Reader, open_workbook_auto};
use rust_decimal::Decimal;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use zip::write::SimpleFileOptions;

use vr_engine::api::{AppState, create_router};
use vr_engine::config::EngineConfig;
use vr_engine::error::EngineError;
use vr_engine::models::PayoutRow;
use vr_engine::service::VrService;

// =============================================================================
// Fixture Helpers
// =============================================================================

#[derive(Clone)]
enum Val {
    Num(f64),
    Text(&'static str),
    Date(u16, u8, u8),
    Empty,
}

use Val::{Date, Empty, Num, Text};

fn write_sheet(path: &Path, headers: &[&str], rows: &[Vec<Val>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (c, value) in row.iter().enumerate() {
            let c = c as u16;
            match value {
                Num(n) => {
                    worksheet.write_number(r, c, *n).unwrap();
                }
                Text(s) => {
                    worksheet.write_string(r, c, *s).unwrap();
                }
                Date(y, m, d) => {
                    let date = ExcelDateTime::from_ymd(*y, *m, *d).unwrap();
                    worksheet
                        .write_datetime_with_format(r, c, &date, &date_format)
                        .unwrap();
                }
                Empty => {}
            }
        }
    }
    workbook.save(path).unwrap();
}

const SP: &str = "SINDPD SP - SIND.TRAB.EM PROC DADOS";
const RS: &str = "SINDPPD RS - SINDICATO";
const PR: &str = "SITEPD PR";
const RJ: &str = "SINDPD RJ";
const NO_STATE: &str = "SINDICATO GERAL";
const NOT_IN_CALENDAR: &str = "SINDPD MG";

/// Writes the ten extracts for the standard ten-employee scenario.
fn write_standard_extracts(dir: &Path) {
    write_sheet(
        &dir.join("ATIVOS.xlsx"),
        &["MATRICULA", "EMPRESA", "TITULO DO CARGO", "DESC. SITUACAO", "Sindicato"],
        &[
            vec![Num(1001.0), Num(1410.0), Text("ANALISTA"), Text("Trabalhando"), Text(SP)],
            vec![Num(1002.0), Num(1410.0), Text("ANALISTA"), Text("Trabalhando"), Text(RS)],
            vec![Num(1003.0), Num(1410.0), Text("DIRETOR FINANCEIRO"), Text("Trabalhando"), Text(SP)],
            vec![Num(1004.0), Num(1410.0), Text("APRENDIZ"), Text("Trabalhando"), Text(SP)],
            vec![Num(1005.0), Num(1410.0), Text("ESTAGIARIO"), Text("Trabalhando"), Text(SP)],
            vec![Num(1006.0), Num(1410.0), Text("ANALISTA"), Text("Trabalhando"), Text(PR)],
            vec![Num(1007.0), Num(1410.0), Text("ANALISTA"), Text("Trabalhando"), Text(SP)],
            vec![Num(1008.0), Num(1410.0), Text("ANALISTA"), Text("Trabalhando"), Text(RJ)],
            vec![Num(1009.0), Num(1410.0), Text("ANALISTA"), Text("Trabalhando"), Text(NO_STATE)],
            vec![Num(1010.0), Num(1410.0), Text("ANALISTA"), Text("Trabalhando"), Text(NOT_IN_CALENDAR)],
        ],
    );
    write_sheet(
        &dir.join("ADMISSÃO ABRIL.xlsx"),
        &["MATRICULA", "Admissão", "Cargo"],
        &[vec![Num(1007.0), Date(2025, 4, 22), Text("ANALISTA")]],
    );
    write_sheet(
        &dir.join("DESLIGADOS.xlsx"),
        &["MATRICULA", "DATA DEMISSÃO ", "COMUNICADO DE DESLIGAMENTO"],
        &[vec![Num(1008.0), Text("30/05/2025"), Text("10/05/2025")]],
    );
    write_sheet(
        &dir.join("FÉRIAS.xlsx"),
        &["MATRICULA", "DESC. SITUACAO", "DIAS DE FÉRIAS"],
        &[vec![Num(1007.0), Text("Férias"), Num(5.0)]],
    );
    write_sheet(
        &dir.join("AFASTAMENTOS.xlsx"),
        &["MATRICULA", "DESC. SITUACAO"],
        &[vec![Num(1004.0), Text("Licença Maternidade")]],
    );
    write_sheet(
        &dir.join("APRENDIZ.xlsx"),
        &["MATRICULA", "TITULO DO CARGO"],
        &[vec![Num(1004.0), Text("APRENDIZ")]],
    );
    write_sheet(
        &dir.join("ESTÁGIO.xlsx"),
        &["MATRICULA", "TITULO DO CARGO"],
        &[vec![Num(1005.0), Text("ESTAGIARIO")], vec![Empty, Text("ESTAGIARIO")]],
    );
    write_sheet(
        &dir.join("EXTERIOR.xlsx"),
        &["Cadastro", "Valor", "OBS"],
        &[vec![Num(1006.0), Num(0.0), Text("Expatriado")]],
    );
    write_sheet(
        &dir.join("Base dias uteis.xlsx"),
        &["SINDICADO", "DIAS UTEIS "],
        &[
            vec![Text(SP), Num(22.0)],
            vec![Text(RS), Num(21.0)],
            vec![Text(PR), Num(22.0)],
            vec![Text(RJ), Num(21.0)],
            vec![Text(NO_STATE), Num(20.0)],
        ],
    );
    write_sheet(
        &dir.join("Base sindicato x valor.xlsx"),
        &["ESTADO", "VALOR"],
        &[
            vec![Text("São Paulo"), Num(37.5)],
            vec![Text("Rio Grande do Sul"), Text("36,00")],
            vec![Text("Paraná"), Num(35.0)],
            vec![Text("Rio de Janeiro"), Num(35.0)],
            vec![Text("Minas Gerais"), Num(40.0)],
        ],
    );
}

/// A temporary workspace: `extracts/` holds the sources and `out/` is the
/// configured data directory receiving the outputs.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("extracts")).unwrap();
        write_standard_extracts(&dir.path().join("extracts"));
        Self { dir }
    }

    fn extracts(&self) -> PathBuf {
        self.dir.path().join("extracts")
    }

    fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn service(&self) -> VrService {
        let mut config = EngineConfig::default();
        config.paths.data_dir = self.out();
        VrService::new(config)
    }

    /// Packs every extract into a zip archive under a wrapping folder.
    fn archive(&self) -> PathBuf {
        let zip_path = self.dir.path().join("Desafio 4 - Dados.zip");
        let mut writer = zip::ZipWriter::new(File::create(&zip_path).unwrap());
        let mut entries: Vec<_> = fs::read_dir(self.extracts())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        entries.sort();
        for entry in entries {
            let name = format!(
                "Desafio 4 - Dados/{}",
                entry.file_name().unwrap().to_string_lossy()
            );
            writer.start_file(name, SimpleFileOptions::default()).unwrap();
            writer.write_all(&fs::read(&entry).unwrap()).unwrap();
        }
        writer.finish().unwrap();
        zip_path
    }
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn row_for(rows: &[PayoutRow], id: i64) -> &PayoutRow {
    rows.iter()
        .find(|r| r.employee_id == id)
        .unwrap_or_else(|| panic!("employee {} missing from payout", id))
}

// =============================================================================
// Pipeline Tests
// =============================================================================

#[test]
fn test_consolidate_reports_row_counts() {
    let ws = Workspace::new();
    let service = ws.service();

    let summary = service.consolidate(Some(&ws.extracts())).unwrap();
    let text = summary.to_string();
    assert!(text.starts_with("Sources loaded successfully. Summary: {ativos: 10, admis: 1"));
    // The blank-ID intern row is kept by the reader; it only drops fully blank rows
    assert!(text.contains("estagio: 2"));
    assert!(text.ends_with("dias_uteis: 5, sind_valor: 5}"));
    assert!(service.is_loaded());
}

#[test]
fn test_payout_rows_excludes_and_prorates() {
    let ws = Workspace::new();
    let service = ws.service();
    service.consolidate(Some(&ws.extracts())).unwrap();

    let rows = service.payout_rows().unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.employee_id).collect();
    assert_eq!(ids, vec![1001, 1002, 1007, 1008, 1009, 1010]);

    // Full period at the São Paulo rate
    let full = row_for(&rows, 1001);
    assert_eq!(full.eligible_days, 22);
    assert_eq!(full.daily_rate, decimal("37.50"));
    assert_eq!(full.total, decimal("825.00"));
    assert_eq!(full.employer_share, decimal("660.00"));
    assert_eq!(full.employee_share, decimal("165.00"));
    assert_eq!(full.union, SP);
    assert_eq!(full.admission_date, None);

    // Text rate in Brazilian notation
    let rs = row_for(&rows, 1002);
    assert_eq!(rs.eligible_days, 21);
    assert_eq!(rs.total, decimal("756.00"));
    assert_eq!(rs.employer_share, decimal("604.80"));
    assert_eq!(rs.employee_share, decimal("151.20"));

    // Admitted 22 April: 18/23 × 22 = 17.2 → 17, minus 5 vacation days
    let admitted = row_for(&rows, 1007);
    assert_eq!(admitted.eligible_days, 12);
    assert_eq!(admitted.total, decimal("450.00"));
    assert_eq!(
        admitted.admission_date,
        chrono::NaiveDate::from_ymd_opt(2025, 4, 22)
    );

    // Notice on 10 May zeroes the period
    let zeroed = row_for(&rows, 1008);
    assert_eq!(zeroed.eligible_days, 0);
    assert_eq!(zeroed.total, Decimal::ZERO);

    // No state code: fallback rate
    let fallback = row_for(&rows, 1009);
    assert_eq!(fallback.daily_rate, decimal("35.00"));
    assert_eq!(fallback.total, decimal("700.00"));

    // Union missing from the calendar; MG is not mapped even though rated
    let unknown = row_for(&rows, 1010);
    assert_eq!(unknown.eligible_days, 0);
    assert_eq!(unknown.daily_rate, decimal("35.00"));

    for row in &rows {
        assert_eq!(
            row.competence,
            chrono::NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
        );
        let diff = (row.employer_share + row.employee_share - row.total).abs();
        assert!(diff <= decimal("0.01"));
    }
}

#[test]
fn test_payout_traces_record_warnings() {
    let ws = Workspace::new();
    let service = ws.service();
    service.consolidate(Some(&ws.extracts())).unwrap();

    let computations = service.payout_computations().unwrap();
    let unknown = computations
        .iter()
        .find(|c| c.row.employee_id == 1010)
        .unwrap();
    let codes: Vec<&str> = unknown
        .audit_trace
        .warnings
        .iter()
        .map(|w| w.code.as_str())
        .collect();
    assert_eq!(codes, vec!["UNION_NOT_IN_CALENDAR", "RATE_FALLBACK"]);

    let zeroed = computations
        .iter()
        .find(|c| c.row.employee_id == 1008)
        .unwrap();
    assert_eq!(zeroed.audit_trace.steps[0].rule_id, "early_termination_notice");
}

#[test]
fn test_validation_rows_cover_whole_roster() {
    let ws = Workspace::new();
    let service = ws.service();
    service.consolidate(Some(&ws.extracts())).unwrap();

    let rows = service.validation_rows().unwrap();
    let texts: Vec<(i64, &str)> = rows
        .iter()
        .map(|r| (r.employee_id, r.text.as_str()))
        .collect();
    assert_eq!(
        texts,
        vec![
            (1001, "Sem ajustes"),
            (1002, "Sem ajustes"),
            (1003, "Diretor"),
            (1004, "Aprendiz; Afastamento"),
            (1005, "Estagiário"),
            (1006, "Exterior"),
            (1007, "Férias 5 dias"),
            (1008, "Comunicado até 15/05 → zerado"),
            (1009, "Sem ajustes"),
            (1010, "Sem ajustes"),
        ]
    );
}

#[test]
fn test_calculate_and_validate_write_workbooks() {
    let ws = Workspace::new();
    let service = ws.service();
    service.consolidate(Some(&ws.extracts())).unwrap();

    let result_path = service.calculate().unwrap();
    assert_eq!(result_path, ws.out().join("VR_MENSAL_05_2025_RESULTADO.xlsx"));
    let validation_path = service.validate().unwrap();
    assert_eq!(
        validation_path,
        ws.out().join("VR_MENSAL_05_2025_VALIDACAO.xlsx")
    );

    let mut workbook = open_workbook_auto(&result_path).unwrap();
    let range = workbook.worksheet_range("Resultado").unwrap();
    assert_eq!(range.height(), 7);
    assert_eq!(
        range.get_value((0, 5)),
        Some(&Data::String("VALOR DIÁRIO VR".to_string()))
    );
    assert_eq!(range.get_value((3, 0)), Some(&Data::Float(1007.0)));
    assert_eq!(range.get_value((3, 4)), Some(&Data::Float(12.0)));
    assert_eq!(range.get_value((3, 6)), Some(&Data::Float(450.0)));
    assert!(matches!(range.get_value((3, 1)), Some(Data::DateTime(_))));
    assert!(matches!(range.get_value((1, 3)), Some(Data::DateTime(_))));

    let mut workbook = open_workbook_auto(&validation_path).unwrap();
    let sheet = workbook.sheet_names()[0].clone();
    let range = workbook.worksheet_range(&sheet).unwrap();
    assert_eq!(range.height(), 11);
    assert_eq!(
        range.get_value((4, 1)),
        Some(&Data::String("Aprendiz; Afastamento".to_string()))
    );
}

#[test]
fn test_calculate_is_idempotent() {
    let ws = Workspace::new();
    let service = ws.service();
    service.consolidate(Some(&ws.extracts())).unwrap();

    let first = service.payout_rows().unwrap();
    service.calculate().unwrap();
    let second = service.payout_rows().unwrap();
    service.calculate().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_consolidate_from_archive() {
    let ws = Workspace::new();
    let archive = ws.archive();
    let service = ws.service();

    let summary = service.consolidate(Some(&archive)).unwrap();
    assert!(summary.to_string().contains("ativos: 10"));
    assert_eq!(service.payout_rows().unwrap().len(), 6);
}

#[test]
fn test_consolidate_defaults_to_data_directory() {
    let ws = Workspace::new();
    let mut config = EngineConfig::default();
    config.paths.data_dir = ws.extracts();
    let service = VrService::new(config);

    service.consolidate(None).unwrap();
    assert_eq!(service.payout_rows().unwrap().len(), 6);
}

#[test]
fn test_reload_replaces_previous_sources() {
    let ws = Workspace::new();
    let service = ws.service();
    service.consolidate(Some(&ws.extracts())).unwrap();
    assert_eq!(service.payout_rows().unwrap().len(), 6);

    let second = tempfile::tempdir().unwrap();
    write_standard_extracts(second.path());
    write_sheet(
        &second.path().join("ATIVOS.xlsx"),
        &["MATRICULA", "TITULO DO CARGO", "Sindicato"],
        &[vec![Num(2001.0), Text("ANALISTA"), Text(SP)]],
    );

    service.consolidate(Some(second.path())).unwrap();
    let rows = service.payout_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].employee_id, 2001);
}

#[test]
fn test_failed_consolidate_keeps_previous_sources() {
    let ws = Workspace::new();
    let service = ws.service();
    service.consolidate(Some(&ws.extracts())).unwrap();

    let broken = tempfile::tempdir().unwrap();
    write_standard_extracts(broken.path());
    fs::remove_file(broken.path().join("EXTERIOR.xlsx")).unwrap();

    match service.consolidate(Some(broken.path())) {
        Err(EngineError::SourceNotFound { path }) => assert!(path.ends_with("EXTERIOR.xlsx")),
        other => panic!("Expected SourceNotFound, got {:?}", other),
    }
    assert_eq!(service.payout_rows().unwrap().len(), 6);
}

#[test]
fn test_corrupt_extract_is_malformed() {
    let ws = Workspace::new();
    fs::write(ws.extracts().join("FÉRIAS.xlsx"), b"not a workbook").unwrap();
    let service = ws.service();

    assert!(matches!(
        service.consolidate(Some(&ws.extracts())),
        Err(EngineError::SourceMalformed { .. })
    ));
    assert!(!service.is_loaded());
}

#[test]
fn test_rate_table_without_state_column_fails_calculation() {
    let ws = Workspace::new();
    write_sheet(
        &ws.extracts().join("Base sindicato x valor.xlsx"),
        &["UF", "VALOR"],
        &[vec![Text("SP"), Num(37.5)]],
    );
    let service = ws.service();
    service.consolidate(Some(&ws.extracts())).unwrap();

    match service.calculate() {
        Err(EngineError::JoinKeyUnresolved { source_name, .. }) => {
            assert_eq!(source_name, "sind_valor")
        }
        other => panic!("Expected JoinKeyUnresolved, got {:?}", other),
    }
    assert!(!ws.out().join("VR_MENSAL_05_2025_RESULTADO.xlsx").exists());
}

// =============================================================================
// HTTP API Tests
// =============================================================================

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_api_full_cycle() {
    let ws = Workspace::new();
    let router = create_router(AppState::new(ws.service()));

    let (status, body) = post(
        router.clone(),
        "/consolidate",
        json!({ "source_location": ws.archive() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["row_counts"]["active"], 10);
    assert!(body["summary"].as_str().unwrap().contains("ativos: 10"));

    let (status, body) = post(router.clone(), "/calculate", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["row_count"], 6);
    assert_eq!(body["totals"]["total"], "2731.00");
    assert_eq!(body["totals"]["employer_share"], "2184.80");
    assert_eq!(body["totals"]["employee_share"], "546.20");
    assert_eq!(body["payouts"][2]["row"]["employee_id"], 1007);
    assert_eq!(body["payouts"][2]["row"]["eligible_days"], 12);
    assert!(
        !body["payouts"][0]["audit_trace"]["steps"]
            .as_array()
            .unwrap()
            .is_empty()
    );
    let output_path = PathBuf::from(body["output_path"].as_str().unwrap());
    assert!(output_path.exists());

    let (status, body) = post(router, "/validate", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[3]["text"], "Aprendiz; Afastamento");
    assert_eq!(rows[3]["reasons"][0]["code"], "apprentice");
}

#[tokio::test]
async fn test_api_calculate_before_consolidate() {
    let ws = Workspace::new();
    let router = create_router(AppState::new(ws.service()));

    let (status, body) = post(router, "/calculate", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "SOURCES_NOT_LOADED");
}

#[tokio::test]
async fn test_api_join_key_error_is_unprocessable() {
    let ws = Workspace::new();
    write_sheet(
        &ws.extracts().join("ATIVOS.xlsx"),
        &["ID", "Sindicato"],
        &[vec![Num(1.0), Text(SP)]],
    );
    let router = create_router(AppState::new(ws.service()));

    let (status, _) = post(
        router.clone(),
        "/consolidate",
        json!({ "source_location": ws.extracts() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(router, "/validate", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "JOIN_KEY_UNRESOLVED");
}
