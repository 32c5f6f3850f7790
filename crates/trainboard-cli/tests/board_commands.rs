//! CLI integration tests: run the built binary against a board file and
//! check the rendered output. Date values in the fixture deliberately mix
//! the serialized `Date(y,m,d)` form, ISO and canonical encodings, as the
//! real feed does.

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

const BOARD_JSON: &str = r#"{
  "records": [
    {
      "rowIndex": 2,
      "cliente": "Acme",
      "segmento": "Retail",
      "campana": "Acme Retail",
      "desarrollador": "Ana Gómez",
      "desarrollo": "Evolutivo",
      "nombre": "Inducción",
      "estado": "En Proceso",
      "fechaInicio": "2024-03-01",
      "fechaFin": "05/03/2024"
    },
    {
      "rowIndex": 3,
      "cliente": "Banca",
      "segmento": "Norte",
      "campana": "Banca Norte",
      "desarrollo": "Actualizacion",
      "estado": "Pendiente",
      "fechaInicio": "Date(2024,2,4)",
      "fechaFin": "Date(2024,2,4)"
    },
    {
      "rowIndex": 4,
      "cliente": "Caos",
      "campana": "Caos",
      "fechaInicio": "pronto",
      "fechaFin": "05/03/2024"
    }
  ],
  "festivos": [
    { "festivo": "Date(2024,2,19)", "festividad": "San José" }
  ],
  "novedades": [
    {
      "desarrollador": "Ana Gómez",
      "fechaInicio": "04/03/2024",
      "fechaFin": "06/03/2024",
      "novedad": "Formación externa"
    }
  ]
}"#;

fn write_fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("board.json");
    std::fs::write(&path, BOARD_JSON).expect("write fixture");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trainboard"))
        .args(args)
        .output()
        .expect("failed to execute trainboard")
}

#[test]
fn board_renders_lanes_holidays_and_novedades() {
    let dir = TempDir::new().unwrap();
    let fixture = write_fixture(&dir);

    let output = run(&["board", fixture.to_str().unwrap(), "--month", "2024-03"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.contains("== Tablero 2024-03 =="));
    assert!(stdout.contains("Campañas activas: Acme Retail, Banca Norte"));
    // Base lane with aggregate status and a start marker on 01/03.
    assert!(stdout.contains("- Acme Retail (1 desarrollo) [En Proceso] [inicio]"));
    // Update lane: the gviz-encoded single-day event on 04/03.
    assert!(stdout.contains("^ Banca Norte (1 desarrollo) [Pendiente] [inicio] [fin]"));
    // Holiday replaces the day's lanes.
    assert!(stdout.contains("FESTIVO: San José"));
    // Anomaly window rendered independently.
    assert!(stdout.contains("~ Ana Gómez: Formación externa"));
    // The unparseable record never shows up.
    assert!(!stdout.contains("Caos"));
}

#[test]
fn board_excludes_sundays_from_the_grid() {
    let dir = TempDir::new().unwrap();
    let fixture = write_fixture(&dir);

    let output = run(&["board", fixture.to_str().unwrap(), "--month", "2024-03"]);
    let stdout = String::from_utf8(output.stdout).unwrap();

    // 03/03/2024 and 10/03/2024 are Sundays.
    assert!(!stdout.contains("03/03/2024\n"));
    assert!(!stdout.contains("10/03/2024\n"));
    // Saturdays stay.
    assert!(stdout.contains("02/03/2024"));
}

#[test]
fn campaigns_lists_sorted_names_with_colors() {
    let dir = TempDir::new().unwrap();
    let fixture = write_fixture(&dir);

    let output = run(&["campaigns", fixture.to_str().unwrap(), "--month", "2024-03"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('#') && lines[0].ends_with("Acme Retail"));
    assert!(lines[1].starts_with('#') && lines[1].ends_with("Banca Norte"));
}

#[test]
fn check_reports_records_dropped_from_views() {
    let dir = TempDir::new().unwrap();
    let fixture = write_fixture(&dir);

    let output = run(&["check", fixture.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.contains("fila 4: fechaInicio no interpretable"));
    assert!(stdout.contains("1 de 3 registros quedan fuera de las vistas por fechas"));
}

#[test]
fn rejects_malformed_month_argument() {
    let dir = TempDir::new().unwrap();
    let fixture = write_fixture(&dir);

    let output = run(&["board", fixture.to_str().unwrap(), "--month", "marzo"]);
    assert!(!output.status.success());
}

#[test]
fn missing_board_file_is_a_clean_error() {
    let output = run(&["check", "/nonexistent/board.json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("cannot load board file"));
}
