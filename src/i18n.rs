use std::path::Path;

use sys_locale::get_locale;
use tracing::{debug, warn};

use crate::catalog::Catalog;

/// 언어를 결정할 수 없을 때 쓰는 기본값. 원문이 영어이므로 번역 없이 동작한다.
pub const DEFAULT_LANGUAGE: &str = "en";

/// 내장 언어팩(파일이 없어도 동작하도록 빌드 시 포함).
const BUILT_IN_PLUGINS_HU: &str = include_str!("../locales/plugins_hu.ts");

/// 런타임 번역기. 카탈로그가 없으면 모든 문자열을 원문 그대로 돌려준다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: String,
    catalog: Option<Catalog>,
}

impl Translator {
    /// 카탈로그 없이 번역기를 생성한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: normalize_lang(lang_code).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            catalog: None,
        }
    }

    pub fn with_catalog(lang_code: &str, catalog: Catalog) -> Self {
        Self {
            catalog: Some(catalog),
            ..Self::new(lang_code)
        }
    }

    /// 언어 코드 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// `<dir>/<prefix>_<lang>.ts`가 없거나 깨져 있으면 기본 언어 코드, 내장 팩 순으로 시도한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&Path>, prefix: &str) -> Self {
        let lang = normalize_lang(lang_code).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let catalog = pack_dir
            .and_then(|dir| load_pack(dir, prefix, &lang))
            .or_else(|| built_in_pack(prefix, &lang));
        if catalog.is_none() {
            debug!(lang = %lang, prefix, "언어팩 없음: 원문을 그대로 사용");
        }
        Self { lang, catalog }
    }

    pub fn language_code(&self) -> &str {
        &self.lang
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// 번역을 가져온다. 번역이 없거나 미완료면 원문을 그대로 돌려준다.
    pub fn tr<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        self.tr_with_comment(context, source, None)
    }

    pub fn tr_with_comment<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> &'a str {
        match &self.catalog {
            Some(catalog) => catalog.lookup(context, source, comment),
            None => source,
        }
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// `hu_HU.UTF-8`, `hu-HU`, `HU` 같은 표기를 `hu-hu`/`hu` 형태로 맞춘다.
/// `auto`, 빈 값, C/POSIX 로케일은 None.
pub fn normalize_lang(code: &str) -> Option<String> {
    let code = code.trim();
    let code = code.split(['.', '@']).next().unwrap_or_default();
    let c = code.to_lowercase().replace('_', "-");
    match c.as_str() {
        "" | "auto" | "c" | "posix" => return None,
        _ => {}
    }
    let mut parts = c.split('-');
    let base = parts.next().unwrap_or_default();
    if !(2..=3).contains(&base.len()) || !base.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return None;
    }
    if !parts.all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_alphanumeric())) {
        return None;
    }
    Some(c)
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_lang) {
        return Some(lang);
    }
    for var in ["LC_ALL", "LANG"] {
        if let Ok(value) = std::env::var(var) {
            if let Some(code) = normalize_lang(&value) {
                return Some(code);
            }
        }
    }
    None
}

/// 언어팩 파일 이름 후보. `hu-hu` → `hu-hu`, `hu_HU`, `hu`.
pub fn pack_candidates(lang: &str) -> Vec<String> {
    let mut candidates = vec![lang.to_string()];
    if let Some((base, region)) = lang.split_once('-') {
        candidates.push(format!("{base}_{}", region.to_uppercase()));
        candidates.push(base.to_string());
    }
    candidates.dedup();
    candidates
}

fn load_pack(dir: &Path, prefix: &str, lang: &str) -> Option<Catalog> {
    for code in pack_candidates(lang) {
        let path = dir.join(format!("{prefix}_{code}.ts"));
        if !path.is_file() {
            continue;
        }
        match Catalog::load_file(&path) {
            Ok(catalog) => {
                debug!(path = %path.display(), "언어팩 로드");
                return Some(catalog);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "언어팩을 읽지 못해 건너뜀");
            }
        }
    }
    None
}

fn built_in_pack(prefix: &str, lang: &str) -> Option<Catalog> {
    let base = lang.split('-').next().unwrap_or_default();
    let source = match (prefix, base) {
        ("plugins", "hu") => BUILT_IN_PLUGINS_HU,
        _ => return None,
    };
    match Catalog::load(source) {
        Ok(catalog) => Some(catalog),
        Err(err) => {
            warn!(lang, error = %err, "내장 언어팩 파싱 실패");
            None
        }
    }
}
