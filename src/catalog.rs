//! Qt Linguist(.ts) 번역 카탈로그의 데이터 모델과 조회 로직.
//!
//! 카탈로그는 한 번 로드된 뒤 변경되지 않는다. 조회 키는
//! (컨텍스트 이름, 원문, 구분 주석)이며, 같은 키가 여러 번 나오면
//! 나중에 로드된 항목이 우선한다.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::parser::{self, ParseError};

/// 번역 완료 상태. `<translation type="...">` 속성에 대응한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationStatus {
    /// type 속성 없음. 조회 시 번역문을 그대로 제공한다.
    #[default]
    Finished,
    /// `unfinished`: 번역되지 않았거나 검토 전
    Unfinished,
    /// `vanished`: 소스 코드에서 사라진 문자열
    Vanished,
    /// `obsolete`: 예전 형식의 폐기 표시
    Obsolete,
}

impl TranslationStatus {
    /// type 속성 값을 해석한다. 알 수 없는 값이면 None.
    pub fn from_type_attr(value: &str) -> Option<Self> {
        match value {
            "" => Some(Self::Finished),
            "unfinished" => Some(Self::Unfinished),
            "vanished" => Some(Self::Vanished),
            "obsolete" => Some(Self::Obsolete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Unfinished => "unfinished",
            Self::Vanished => "vanished",
            Self::Obsolete => "obsolete",
        }
    }

    /// 현재 소스에 살아있는 메시지인지(vanished/obsolete가 아닌지).
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Finished | Self::Unfinished)
    }
}

/// 번역문. 복수형 메시지는 `<numerusform>` 목록을 그대로 보관한다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Single(String),
    Numerus(Vec<String>),
    /// `<lengthvariant>` 목록. 긴 것부터 나열된다.
    Variants(Vec<String>),
}

impl Default for Translation {
    fn default() -> Self {
        Translation::Single(String::new())
    }
}

impl Translation {
    /// 대표 문자열. 복수형이나 길이 변형이면 첫 번째 것을 쓴다.
    pub fn text(&self) -> &str {
        match self {
            Translation::Single(text) => text,
            Translation::Numerus(forms) | Translation::Variants(forms) => {
                forms.first().map(String::as_str).unwrap_or("")
            }
        }
    }

    pub fn forms(&self) -> &[String] {
        match self {
            Translation::Single(text) => std::slice::from_ref(text),
            Translation::Numerus(forms) | Translation::Variants(forms) => forms,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.forms().iter().all(String::is_empty)
    }
}

/// 소스 위치 힌트(파일 + 줄). 런타임 조회에는 쓰이지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: Option<u32>,
}

/// 번역 단위 하나.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub id: Option<String>,
    pub source: String,
    /// 구분 주석. 없으면 빈 문자열.
    pub comment: String,
    pub extra_comment: Option<String>,
    pub translator_comment: Option<String>,
    pub old_source: Option<String>,
    pub old_comment: Option<String>,
    pub locations: Vec<Location>,
    pub translation: Translation,
    pub status: TranslationStatus,
    pub numerus: bool,
}

impl Message {
    pub fn is_finished(&self) -> bool {
        self.status == TranslationStatus::Finished
    }

    /// 사용자에게 보여줄 수 있는 번역문. 완료 상태이고 비어있지 않을 때만 Some.
    pub fn resolved(&self) -> Option<&str> {
        if !self.is_finished() {
            return None;
        }
        let text = self.translation.text();
        (!text.is_empty()).then_some(text)
    }
}

/// 플러그인 혹은 대화상자 단위의 메시지 묶음.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub name: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MessageRef {
    context: usize,
    message: usize,
}

/// 컨텍스트 → 원문 → 주석 순으로 내려가는 조회 인덱스.
type MessageIndex = HashMap<String, HashMap<String, HashMap<String, MessageRef>>>;

/// 로드/파일 읽기 중 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// .ts 구문 오류
    #[error("카탈로그 파싱 오류: {0}")]
    Parse(#[from] ParseError),
}

/// 카탈로그 통계. lrelease의 "finished/unfinished" 보고와 같은 항목을 센다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub contexts: usize,
    pub messages: usize,
    pub finished: usize,
    pub unfinished: usize,
    /// vanished + obsolete
    pub obsolete: usize,
    /// 조회 가능한 고유 키 수
    pub keys: usize,
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "컨텍스트 {}개, 메시지 {}개 (완료 {}, 미완료 {}, 폐기 {}, 고유 키 {})",
            self.contexts, self.messages, self.finished, self.unfinished, self.obsolete, self.keys
        )
    }
}

/// 로드된 번역 테이블 전체.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    version: Option<String>,
    language: Option<String>,
    source_language: Option<String>,
    contexts: Vec<Context>,
    index: MessageIndex,
}

impl Catalog {
    /// 파싱된 컨텍스트 목록으로 카탈로그를 만들고 조회 인덱스를 구성한다.
    pub fn from_contexts(
        version: Option<String>,
        language: Option<String>,
        source_language: Option<String>,
        contexts: Vec<Context>,
    ) -> Self {
        let mut index = MessageIndex::new();
        for (ci, context) in contexts.iter().enumerate() {
            for (mi, message) in context.messages.iter().enumerate() {
                if !message.status.is_live() {
                    continue;
                }
                let by_comment = index
                    .entry(context.name.clone())
                    .or_default()
                    .entry(message.source.clone())
                    .or_default();
                let slot = MessageRef {
                    context: ci,
                    message: mi,
                };
                if by_comment.insert(message.comment.clone(), slot).is_some() {
                    debug!(
                        context = %context.name,
                        source = %message.source,
                        comment = %message.comment,
                        "중복 메시지: 나중 항목으로 교체"
                    );
                }
            }
        }
        Self {
            version,
            language,
            source_language,
            contexts,
            index,
        }
    }

    /// .ts 문서 문자열을 파싱한다. 형식이 잘못되면 부분 결과 없이 실패한다.
    pub fn load(source: &str) -> Result<Self, ParseError> {
        let catalog = parser::parse(source)?;
        debug!(
            language = catalog.language.as_deref().unwrap_or(""),
            contexts = catalog.contexts.len(),
            keys = catalog.key_count(),
            "카탈로그 로드 완료"
        );
        Ok(catalog)
    }

    /// 파일에서 카탈로그를 읽는다.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "카탈로그 파일 읽기");
        let content = fs::read_to_string(path)?;
        Ok(Self::load(&content)?)
    }

    /// 번역문을 조회한다. 완료된 번역이 없으면 원문을 그대로 돌려준다.
    pub fn lookup<'a>(&'a self, context: &str, source: &'a str, comment: Option<&str>) -> &'a str {
        self.find(context, source, comment)
            .and_then(Message::resolved)
            .unwrap_or(source)
    }

    /// 키에 해당하는 (마지막으로 로드된) 메시지를 찾는다. 완료 여부와 무관하다.
    pub fn find(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Message> {
        let slot = self
            .index
            .get(context)?
            .get(source)?
            .get(comment.unwrap_or(""))?;
        self.contexts
            .get(slot.context)?
            .messages
            .get(slot.message)
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    /// 문서 순서 그대로의 컨텍스트 목록(중복 이름 포함).
    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    /// 모든 메시지를 (컨텍스트 이름, 메시지) 쌍으로 순회한다.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> + '_ {
        self.contexts.iter().flat_map(|context| {
            context
                .messages
                .iter()
                .map(move |message| (context.name.as_str(), message))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn key_count(&self) -> usize {
        self.index
            .values()
            .flat_map(HashMap::values)
            .map(HashMap::len)
            .sum()
    }

    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            contexts: self.contexts.len(),
            keys: self.key_count(),
            ..CatalogStats::default()
        };
        for (_, message) in self.messages() {
            stats.messages += 1;
            match message.status {
                TranslationStatus::Finished => stats.finished += 1,
                TranslationStatus::Unfinished => stats.unfinished += 1,
                TranslationStatus::Vanished | TranslationStatus::Obsolete => stats.obsolete += 1,
            }
        }
        stats
    }
}

impl FromStr for Catalog {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::load(s)
    }
}
