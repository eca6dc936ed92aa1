use assert_cmd::Command;
use predicates::prelude::*;

/// Two years, two deciles, the five equivalised stages, plus the cash-benefit
/// and benefits-in-kind rows the named reports depend on.
fn write_fixture(dir: &std::path::Path) -> std::path::PathBuf {
    let mut content = String::from(
        "Effects of taxes and benefits on household income\n\
         \n\
         Financial year ending,Household group,Decile group,Component,Sub-component,\u{a3} per year\n",
    );
    for year in [2018, 2019] {
        for decile in ["bottom", "top"] {
            for (component, sub) in [
                ("Original income", "Equivalised original income"),
                ("Gross income", "Equivalised gross income"),
                ("Disposable income", "Equivalised disposable income"),
                ("Post-tax income", "Equivalised post-tax income"),
                ("Final income", "Equivalised final income"),
            ] {
                content.push_str(&format!("{year},All,{decile},{component},{sub},12000\n"));
            }
            content.push_str(&format!(
                "{year},All,{decile},Gross income,Gross income,10000\n\
                 {year},All,{decile},Direct benefits in cash,Contributory,2000\n\
                 {year},All,{decile},Direct benefits in cash,Non-contributory,2700\n\
                 {year},All,{decile},Benefits in kind,Education,1000\n\
                 {year},All,{decile},Benefits in kind,National Health Service,1500\n"
            ));
        }
    }
    let path = dir.join("etb.csv");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn summary_lists_components() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(dir.path());
    Command::cargo_bin("decile")
        .unwrap()
        .args(["summary", fixture.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Benefits in kind"))
        .stdout(predicate::str::contains("FYE 2018\u{2013}2019"));
}

#[test]
fn report_stages_orders_by_progression() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(dir.path());
    Command::cargo_bin("decile")
        .unwrap()
        .args(["report", "stages", fixture.to_str().unwrap(), "--year", "2019"])
        .assert()
        .success()
        .stdout(predicate::function(|out: &str| {
            let original = out.find("Original income");
            let gross = out.find("Gross income");
            let fin = out.find("Final income");
            original < gross && gross < fin && original.is_some()
        }));
}

#[test]
fn report_stages_missing_year_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(dir.path());
    Command::cargo_bin("decile")
        .unwrap()
        .args(["report", "stages", fixture.to_str().unwrap(), "--year", "1997"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No data for financial year ending 1997"));
}

#[test]
fn report_cash_benefits_computes_shares() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(dir.path());
    // (2000 + 2700) / 10000 = 47.0%
    Command::cargo_bin("decile")
        .unwrap()
        .args(["report", "cash-benefits", fixture.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("47.0%"));
}

#[test]
fn export_composition_json() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(dir.path());
    let out = dir.path().join("composition.json");
    Command::cargo_bin("decile")
        .unwrap()
        .args([
            "export",
            "composition",
            fixture.to_str().unwrap(),
            "--year",
            "2019",
            "--json",
            "--output",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let rows: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let rows = rows.as_array().unwrap();
    // 2 deciles × 2 sub-components for 2019
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r["year"] == 2019));
    assert!(rows.iter().all(|r| r["decile"] != "all"));
}

#[test]
fn export_stages_csv() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(dir.path());
    let out = dir.path().join("stages.csv");
    Command::cargo_bin("decile")
        .unwrap()
        .args([
            "export",
            "stages",
            fixture.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).unwrap();
    // Defaults to the latest year; 2 deciles × 5 stages plus header
    assert_eq!(written.lines().count(), 11);
    assert!(written.contains("Post-tax income"));
}

#[test]
fn missing_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    std::fs::write(
        &path,
        "Financial year ending,Household group,Component,Sub-component,\u{a3} per year\n\
         2019,All,Gross income,Equivalised gross income,10000\n",
    )
    .unwrap();
    Command::cargo_bin("decile")
        .unwrap()
        .args(["summary", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing column 'Decile group'"));
}

#[test]
fn unknown_decile_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(
        &path,
        "Financial year ending,Household group,Decile group,Component,Sub-component,\u{a3} per year\n\
         2019,All,twelfth,Gross income,Equivalised gross income,10000\n",
    )
    .unwrap();
    Command::cargo_bin("decile")
        .unwrap()
        .args(["report", "stages", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("twelfth"));
}
