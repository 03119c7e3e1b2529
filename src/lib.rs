//! Qt Linguist(.ts) 번역 카탈로그를 로드하고 (컨텍스트, 원문, 주석)으로 조회한다.
//! 조회 로직은 라이브러리로 분리하여 CLI 외의 UI 계층에서도 그대로 쓸 수 있게 한다.

pub mod app;
pub mod catalog;
pub mod config;
pub mod i18n;
pub mod logging;
pub mod parser;
pub mod ui_cli;

pub use catalog::{Catalog, CatalogError, Message, Translation, TranslationStatus};
pub use i18n::Translator;
pub use parser::ParseError;
