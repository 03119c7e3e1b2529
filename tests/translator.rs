//! 언어 결정과 언어팩 탐색 테스트.
use ts_catalog::i18n::{normalize_lang, pack_candidates, resolve_language, Translator};

const CUSTOM_HU: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<TS version="2.1" language="hu">
<context>
    <name>LC_Align</name>
    <message>
        <source>Align</source>
        <translation>Igazít</translation>
    </message>
</context>
</TS>"#;

#[test]
fn normalize_language_codes() {
    assert_eq!(normalize_lang("hu").as_deref(), Some("hu"));
    assert_eq!(normalize_lang(" HU ").as_deref(), Some("hu"));
    assert_eq!(normalize_lang("hu_HU.UTF-8").as_deref(), Some("hu-hu"));
    assert_eq!(normalize_lang("hu-HU").as_deref(), Some("hu-hu"));
    assert_eq!(normalize_lang("de_DE@euro").as_deref(), Some("de-de"));
    assert_eq!(normalize_lang("auto"), None);
    assert_eq!(normalize_lang(""), None);
    assert_eq!(normalize_lang("C"), None);
    assert_eq!(normalize_lang("POSIX"), None);
    assert_eq!(normalize_lang("../etc"), None);
    assert_eq!(normalize_lang("h"), None);
}

#[test]
fn cli_flag_beats_config() {
    assert_eq!(resolve_language("hu", Some("de")), "hu");
    assert_eq!(resolve_language("auto", Some("hu_HU")), "hu-hu");
    assert!(!resolve_language("auto", Some("auto")).is_empty());
}

#[test]
fn candidate_file_names() {
    assert_eq!(pack_candidates("hu"), vec!["hu"]);
    assert_eq!(pack_candidates("hu-hu"), vec!["hu-hu", "hu_HU", "hu"]);
}

#[test]
fn no_catalog_returns_source() {
    let tr = Translator::new("hu");
    assert!(tr.catalog().is_none());
    assert_eq!(tr.language_code(), "hu");
    assert_eq!(tr.tr("LC_Align", "Align"), "Align");
    assert_eq!(Translator::new("auto").language_code(), "en");
}

#[test]
fn built_in_hungarian_pack() {
    let tr = Translator::new_with_pack("hu", None, "plugins");
    assert_eq!(tr.tr("LC_Align", "Align"), "Igazítás");
    assert_eq!(tr.tr("LC_Gear", "Gear creation plugin"), "Gear creation plugin");
    assert_eq!(
        tr.tr_with_comment(
            "plotDialog",
            "Polyline",
            Some("Plot Equation to generate RS_Polyline")
        ),
        "Vonallánc"
    );

    // 지역 코드가 붙어도 기본 언어로 내장 팩을 찾는다
    let regional = Translator::new_with_pack("hu_HU", None, "plugins");
    assert_eq!(regional.language_code(), "hu-hu");
    assert_eq!(regional.tr("LC_Align", "Align"), "Igazítás");
}

#[test]
fn unknown_language_or_prefix_has_no_pack() {
    let dir = tempfile::tempdir().expect("tempdir");
    let tr = Translator::new_with_pack("de", Some(dir.path()), "plugins");
    assert!(tr.catalog().is_none());
    assert_eq!(tr.tr("LC_Align", "Align"), "Align");

    let tr = Translator::new_with_pack("hu", None, "librecad");
    assert!(tr.catalog().is_none());
}

#[test]
fn pack_directory_overrides_built_in() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("plugins_hu.ts"), CUSTOM_HU).expect("write");

    let tr = Translator::new_with_pack("hu-HU", Some(dir.path()), "plugins");
    assert_eq!(tr.tr("LC_Align", "Align"), "Igazít");
    // 팩 파일에 없는 문자열은 원문 그대로 (내장 팩과 섞지 않는다)
    assert_eq!(tr.tr("textBox", "Height:"), "Height:");
}

#[test]
fn regional_file_preferred_over_base() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("plugins_hu.ts"), CUSTOM_HU).expect("write");
    std::fs::write(
        dir.path().join("plugins_hu_HU.ts"),
        CUSTOM_HU.replace("Igazít<", "Igazítás (HU)<"),
    )
    .expect("write");

    let tr = Translator::new_with_pack("hu_HU", Some(dir.path()), "plugins");
    assert_eq!(tr.tr("LC_Align", "Align"), "Igazítás (HU)");
}

#[test]
fn broken_pack_file_falls_back_to_built_in() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("plugins_hu.ts"), "<TS><context>").expect("write");

    let tr = Translator::new_with_pack("hu", Some(dir.path()), "plugins");
    assert_eq!(tr.tr("LC_Align", "Align"), "Igazítás");
}
