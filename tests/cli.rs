//! CLI 명령 실행 테스트. 표준 출력 대신 버퍼로 결과를 받는다.
use clap::Parser;
use ts_catalog::app::{self, AppError};
use ts_catalog::config::Config;
use ts_catalog::ui_cli::{escape_line, Cli};

const PLUGINS_HU: &str = include_str!("../locales/plugins_hu.ts");

fn run(args: &[&str], config: &Config) -> Result<String, AppError> {
    let cli = Cli::try_parse_from(args).expect("valid arguments");
    let mut out = Vec::new();
    app::run(&cli, config, &mut out)?;
    Ok(String::from_utf8(out).expect("utf-8 output"))
}

fn config_in(dir: &std::path::Path) -> Config {
    Config {
        language: "hu".into(),
        catalog_dir: dir.to_path_buf(),
        ..Config::default()
    }
}

#[test]
fn lookup_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plugins_hu.ts");
    std::fs::write(&path, PLUGINS_HU).expect("write");
    let file = path.to_str().expect("utf-8 path");
    let cfg = config_in(dir.path());

    let out = run(&["ts_catalog", "lookup", "--file", file, "LC_Align", "Align"], &cfg)
        .expect("lookup");
    assert_eq!(out, "Igazítás\n");

    let out = run(
        &[
            "ts_catalog",
            "lookup",
            "--file",
            file,
            "plotDialog",
            "SplinePoints",
            "--comment",
            "Plot Equation to generate 2nd spline by LC_SplinePoints",
        ],
        &cfg,
    )
    .expect("lookup");
    assert_eq!(out, "Hajlítható vonal Ponttal\n");
}

#[test]
fn lookup_uses_configured_language() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config_in(dir.path());

    let out = run(&["ts_catalog", "lookup", "LC_Gear", "Gear plugin"], &cfg).expect("lookup");
    assert_eq!(out, "Gear plugin\n");
    let out = run(&["ts_catalog", "lookup", "LC_List", "List entities"], &cfg).expect("lookup");
    assert_eq!(out, "Elemek listázása\n");

    // --lang이 설정보다 우선: 영어 팩은 없으므로 원문
    let out = run(
        &["ts_catalog", "--lang", "en", "lookup", "LC_List", "List entities"],
        &cfg,
    )
    .expect("lookup");
    assert_eq!(out, "List entities\n");
}

#[test]
fn stats_and_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config_in(dir.path());

    let out = run(&["ts_catalog", "stats"], &cfg).expect("stats");
    assert!(out.starts_with("언어: hu"));
    assert!(out.contains("메시지 225개"));

    let out = run(
        &["ts_catalog", "list", "--context", "LC_Gear", "--unfinished"],
        &cfg,
    )
    .expect("list");
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "LC_Gear\tGear creation plugin\t\tunfinished",
            "LC_Gear\tGear plugin\t\tunfinished",
        ]
    );

    let out = run(&["ts_catalog", "list", "--context", "plotDialog"], &cfg).expect("list");
    assert!(out
        .lines()
        .any(|l| l == "plotDialog\tPolyline\tVonallánc\tfinished\tPlot Equation to generate RS_Polyline"));
}

#[test]
fn stats_without_catalog_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config_in(dir.path());
    let err = run(&["ts_catalog", "--lang", "de", "stats"], &cfg).unwrap_err();
    assert!(matches!(err, AppError::NoCatalog(lang) if lang == "de"));
}

#[test]
fn check_reports_parse_failures() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config_in(dir.path());
    let good = dir.path().join("good.ts");
    let bad = dir.path().join("bad.ts");
    std::fs::write(&good, PLUGINS_HU).expect("write");
    std::fs::write(&bad, &PLUGINS_HU[..200]).expect("write");

    let out = run(&["ts_catalog", "check", good.to_str().expect("path")], &cfg).expect("check");
    assert!(out.starts_with("OK: "));

    let err = run(&["ts_catalog", "check", bad.to_str().expect("path")], &cfg).unwrap_err();
    assert!(matches!(err, AppError::Catalog(_)));
}

#[test]
fn escape_for_single_line_output() {
    assert_eq!(escape_line("a\nb\tc\\d"), "a\\nb\\tc\\\\d");
}
