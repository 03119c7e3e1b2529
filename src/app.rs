use std::io::Write;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::catalog::{Catalog, CatalogError};
use crate::config::{Config, ConfigError};
use crate::i18n::{self, Translator};
use crate::ui_cli::{self, Cli, Command};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 출력 스트림 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 카탈로그 로드 오류
    #[error("카탈로그 오류: {0}")]
    Catalog(#[from] CatalogError),
    /// 해당 언어의 언어팩이 없음
    #[error("'{0}' 언어의 번역 카탈로그를 찾을 수 없습니다")]
    NoCatalog(String),
}

/// `--file`이 있으면 그 파일을, 없으면 설정/언어로 찾은 언어팩을 쓴다.
fn open_translator(file: Option<&Path>, lang: &str, config: &Config) -> Result<Translator, AppError> {
    match file {
        Some(path) => Ok(Translator::with_catalog(lang, Catalog::load_file(path)?)),
        None => Ok(Translator::new_with_pack(
            lang,
            Some(config.catalog_dir.as_path()),
            &config.catalog_prefix,
        )),
    }
}

fn require_catalog(tr: &Translator) -> Result<&Catalog, AppError> {
    tr.catalog()
        .ok_or_else(|| AppError::NoCatalog(tr.language_code().to_string()))
}

/// 한 번의 CLI 명령을 실행하고 결과를 `out`에 쓴다.
pub fn run(cli: &Cli, config: &Config, out: &mut impl Write) -> Result<(), AppError> {
    let lang = i18n::resolve_language(&cli.lang, Some(config.language.as_str()));
    match &cli.command {
        Command::Lookup {
            file,
            context,
            source,
            comment,
        } => {
            let tr = open_translator(file.as_deref(), &lang, config)?;
            let text = tr.tr_with_comment(context, source, comment.as_deref());
            writeln!(out, "{text}")?;
        }
        Command::Stats { file } => {
            let tr = open_translator(file.as_deref(), &lang, config)?;
            ui_cli::print_stats(out, require_catalog(&tr)?)?;
        }
        Command::List {
            file,
            context,
            unfinished,
        } => {
            let tr = open_translator(file.as_deref(), &lang, config)?;
            let count =
                ui_cli::print_messages(out, require_catalog(&tr)?, context.as_deref(), *unfinished)?;
            info!(count, "메시지 출력");
        }
        Command::Check { file } => {
            let catalog = Catalog::load_file(file)?;
            writeln!(out, "OK: {}", catalog.stats())?;
        }
    }
    Ok(())
}
