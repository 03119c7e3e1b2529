//! `<TS>` XML 문서를 읽어 [`Catalog`]를 만든다.
//!
//! quick-xml 이벤트 스트림 위에서 요소별로 재귀 하강한다. 알 수 없는
//! 요소는 하위 트리째 건너뛰고, 닫히지 않은 채 끝나는 문서는 실패로 처리한다.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::catalog::{Catalog, Context, Location, Message, Translation, TranslationStatus};

/// .ts 문서 파싱 오류. `position`은 입력 기준 바이트 오프셋이다.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("XML 구문 오류 (바이트 {position}): {message}")]
    Xml { position: usize, message: String },
    #[error("<TS> 루트 요소가 없습니다")]
    MissingRoot,
    #[error("루트 요소가 <TS>가 아닙니다: <{0}>")]
    UnexpectedRoot(String),
    #[error("<TS> 뒤에 다른 내용이 있습니다 (바이트 {position})")]
    TrailingContent { position: usize },
    #[error("<{open}> 요소가 닫히기 전에 문서가 끝났습니다 (바이트 {position})")]
    Truncated { open: String, position: usize },
    #[error("<context>에 <name>이 없습니다 (바이트 {position})")]
    MissingContextName { position: usize },
    #[error("'{context}' 컨텍스트의 <message>에 <source>가 없습니다 (바이트 {position})")]
    MissingSource { context: String, position: usize },
    #[error("잘못된 줄 번호 {value:?} (바이트 {position})")]
    InvalidLine { value: String, position: usize },
    #[error("알 수 없는 번역 상태 {value:?} (바이트 {position})")]
    UnknownStatus { value: String, position: usize },
    #[error("잘못된 <byte> 값 {value:?} (바이트 {position})")]
    InvalidByte { value: String, position: usize },
}

/// .ts 문서 문자열 전체를 파싱한다.
pub fn parse(input: &str) -> Result<Catalog, ParseError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    TsParser::new(input).document()
}

/// 컨텍스트 안에서 `<location>`의 생략된 파일명과 상대 줄 번호를 풀어낸다.
#[derive(Debug, Default)]
struct LocationTracker {
    last_file: Option<String>,
    last_lines: HashMap<String, u32>,
}

impl LocationTracker {
    /// 줄 번호가 `+N`/`-N`이면 같은 파일의 직전 상대 줄 기준으로 계산한다.
    /// 절대 줄 번호는 기준을 바꾸지 않는다. 범위를 벗어나거나 숫자가 아니면 None.
    fn resolve(&mut self, file: Option<String>, line: Option<&str>) -> Option<Location> {
        let file = match file {
            Some(file) => file,
            None => self.last_file.clone().unwrap_or_default(),
        };
        let line = match line.map(str::trim) {
            None => None,
            Some(raw) => {
                let delta = if let Some(rel) = raw.strip_prefix('+') {
                    Some(rel.parse::<i64>().ok()?)
                } else if raw.starts_with('-') {
                    Some(raw.parse::<i64>().ok()?)
                } else {
                    None
                };
                match delta {
                    Some(delta) => {
                        let base = i64::from(self.last_lines.get(&file).copied().unwrap_or(0));
                        let value = u32::try_from(base + delta).ok()?;
                        self.last_lines.insert(file.clone(), value);
                        Some(value)
                    }
                    None => Some(raw.parse::<u32>().ok()?),
                }
            }
        };
        self.last_file = Some(file.clone());
        Some(Location { file, line })
    }
}

struct TsParser<'a> {
    reader: Reader<&'a [u8]>,
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

impl<'a> TsParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            reader: Reader::from_str(input),
        }
    }

    fn position(&self) -> usize {
        self.reader.buffer_position() as usize
    }

    fn xml_error(&self, err: impl std::fmt::Display) -> ParseError {
        ParseError::Xml {
            position: self.position(),
            message: err.to_string(),
        }
    }

    fn truncated(&self, open: &str) -> ParseError {
        ParseError::Truncated {
            open: open.to_string(),
            position: self.position(),
        }
    }

    /// 다음 의미 있는 이벤트. 주석/처리 명령/선언은 건너뛴다.
    fn next(&mut self) -> Result<Event<'a>, ParseError> {
        loop {
            let event = self.reader.read_event().map_err(|err| self.xml_error(err))?;
            match event {
                Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => continue,
                other => return Ok(other),
            }
        }
    }

    fn attribute(&self, start: &BytesStart<'_>, key: &str) -> Result<Option<String>, ParseError> {
        for attr in start.attributes() {
            let attr = attr.map_err(|err| self.xml_error(err))?;
            if attr.key.as_ref() == key.as_bytes() {
                let value = attr.unescape_value().map_err(|err| self.xml_error(err))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn document(mut self) -> Result<Catalog, ParseError> {
        let mut catalog = None;
        loop {
            match self.next()? {
                Event::Start(start) => {
                    if catalog.is_some() {
                        return Err(ParseError::TrailingContent {
                            position: self.position(),
                        });
                    }
                    if start.name().as_ref() != b"TS" {
                        return Err(ParseError::UnexpectedRoot(element_name(&start)));
                    }
                    catalog = Some(self.root(&start, false)?);
                }
                Event::Empty(start) => {
                    if catalog.is_some() {
                        return Err(ParseError::TrailingContent {
                            position: self.position(),
                        });
                    }
                    if start.name().as_ref() != b"TS" {
                        return Err(ParseError::UnexpectedRoot(element_name(&start)));
                    }
                    catalog = Some(self.root(&start, true)?);
                }
                Event::Text(text) if is_blank(&text) => {}
                Event::Text(_) | Event::CData(_) => {
                    return Err(ParseError::TrailingContent {
                        position: self.position(),
                    });
                }
                Event::End(end) => {
                    return Err(self.xml_error(format!(
                        "짝이 없는 닫는 태그 </{}>",
                        String::from_utf8_lossy(end.name().as_ref())
                    )));
                }
                Event::Eof => return catalog.ok_or(ParseError::MissingRoot),
                _ => {}
            }
        }
    }

    fn root(&mut self, start: &BytesStart<'_>, empty: bool) -> Result<Catalog, ParseError> {
        let version = self.attribute(start, "version")?;
        let language = self.attribute(start, "language")?;
        let source_language = self.attribute(start, "sourcelanguage")?;
        let mut contexts = Vec::new();
        if !empty {
            loop {
                match self.next()? {
                    Event::Start(child) if child.name().as_ref() == b"context" => {
                        contexts.push(self.context()?);
                    }
                    Event::Start(child) => self.skip(&element_name(&child))?,
                    Event::Empty(child) if child.name().as_ref() == b"context" => {
                        return Err(ParseError::MissingContextName {
                            position: self.position(),
                        });
                    }
                    Event::End(_) => break,
                    Event::Eof => return Err(self.truncated("TS")),
                    _ => {}
                }
            }
        }
        Ok(Catalog::from_contexts(
            version,
            language,
            source_language,
            contexts,
        ))
    }

    fn context(&mut self) -> Result<Context, ParseError> {
        let start_position = self.position();
        let mut name = None;
        let mut messages = Vec::new();
        let mut locations = LocationTracker::default();
        loop {
            match self.next()? {
                Event::Start(child) => match child.name().as_ref() {
                    b"name" => name = Some(self.text("name")?),
                    b"message" => {
                        let context_name = name.clone().unwrap_or_default();
                        messages.push(self.message(&child, &context_name, &mut locations)?);
                    }
                    _ => self.skip(&element_name(&child))?,
                },
                Event::Empty(child) => match child.name().as_ref() {
                    b"name" => name = Some(String::new()),
                    b"message" => {
                        return Err(ParseError::MissingSource {
                            context: name.clone().unwrap_or_default(),
                            position: self.position(),
                        });
                    }
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof => return Err(self.truncated("context")),
                _ => {}
            }
        }
        let name = name.ok_or(ParseError::MissingContextName {
            position: start_position,
        })?;
        Ok(Context { name, messages })
    }

    fn message(
        &mut self,
        start: &BytesStart<'_>,
        context: &str,
        locations: &mut LocationTracker,
    ) -> Result<Message, ParseError> {
        let mut message = Message {
            id: self.attribute(start, "id")?,
            numerus: self.attribute(start, "numerus")?.as_deref() == Some("yes"),
            ..Message::default()
        };
        let mut source = None;
        loop {
            match self.next()? {
                Event::Start(child) => match child.name().as_ref() {
                    b"source" => source = Some(self.text("source")?),
                    b"comment" => message.comment = self.text("comment")?,
                    b"extracomment" => message.extra_comment = Some(self.text("extracomment")?),
                    b"translatorcomment" => {
                        message.translator_comment = Some(self.text("translatorcomment")?)
                    }
                    b"oldsource" => message.old_source = Some(self.text("oldsource")?),
                    b"oldcomment" => message.old_comment = Some(self.text("oldcomment")?),
                    b"location" => {
                        message.locations.push(self.location(&child, locations)?);
                        self.skip("location")?;
                    }
                    b"translation" => {
                        message.status = self.status(&child)?;
                        message.translation = self.translation(message.numerus)?;
                    }
                    _ => self.skip(&element_name(&child))?,
                },
                Event::Empty(child) => match child.name().as_ref() {
                    b"source" => source = Some(String::new()),
                    b"location" => message.locations.push(self.location(&child, locations)?),
                    b"translation" => {
                        message.status = self.status(&child)?;
                        message.translation = if message.numerus {
                            Translation::Numerus(Vec::new())
                        } else {
                            Translation::default()
                        };
                    }
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof => return Err(self.truncated("message")),
                _ => {}
            }
        }
        message.source = source.ok_or_else(|| ParseError::MissingSource {
            context: context.to_string(),
            position: self.position(),
        })?;
        Ok(message)
    }

    fn location(
        &self,
        start: &BytesStart<'_>,
        tracker: &mut LocationTracker,
    ) -> Result<Location, ParseError> {
        let file = self.attribute(start, "filename")?;
        let line = self.attribute(start, "line")?;
        tracker
            .resolve(file, line.as_deref())
            .ok_or_else(|| ParseError::InvalidLine {
                value: line.unwrap_or_default(),
                position: self.position(),
            })
    }

    fn status(&self, start: &BytesStart<'_>) -> Result<TranslationStatus, ParseError> {
        let value = self.attribute(start, "type")?.unwrap_or_default();
        TranslationStatus::from_type_attr(&value).ok_or_else(|| ParseError::UnknownStatus {
            value,
            position: self.position(),
        })
    }

    /// `<translation>` 본문. `<numerusform>` 자식이 있거나 numerus 메시지면 복수형,
    /// `<lengthvariant>` 자식이 있으면 길이 변형 목록으로 본다.
    fn translation(&mut self, numerus: bool) -> Result<Translation, ParseError> {
        let mut text = String::new();
        let mut forms = Vec::new();
        let mut variants = Vec::new();
        loop {
            match self.next()? {
                Event::Start(child) if child.name().as_ref() == b"numerusform" => {
                    forms.push(self.numerus_form()?);
                }
                Event::Start(child) if child.name().as_ref() == b"lengthvariant" => {
                    variants.push(self.text("lengthvariant")?);
                }
                Event::Empty(child) if child.name().as_ref() == b"numerusform" => {
                    forms.push(String::new());
                }
                Event::Empty(child) if child.name().as_ref() == b"lengthvariant" => {
                    variants.push(String::new());
                }
                Event::End(_) => break,
                Event::Eof => return Err(self.truncated("translation")),
                event => self.push_text(&mut text, event, "translation")?,
            }
        }
        if numerus || !forms.is_empty() {
            Ok(Translation::Numerus(forms))
        } else if !variants.is_empty() {
            Ok(Translation::Variants(variants))
        } else {
            Ok(Translation::Single(text))
        }
    }

    /// `<numerusform>` 하나. 안에 길이 변형이 있으면 첫 번째 것을 쓴다.
    fn numerus_form(&mut self) -> Result<String, ParseError> {
        let mut text = String::new();
        let mut variants = Vec::new();
        loop {
            match self.next()? {
                Event::Start(child) if child.name().as_ref() == b"lengthvariant" => {
                    variants.push(self.text("lengthvariant")?);
                }
                Event::Empty(child) if child.name().as_ref() == b"lengthvariant" => {
                    variants.push(String::new());
                }
                Event::End(_) => break,
                Event::Eof => return Err(self.truncated("numerusform")),
                event => self.push_text(&mut text, event, "numerusform")?,
            }
        }
        Ok(variants.into_iter().next().unwrap_or(text))
    }

    /// 요소의 텍스트 내용을 모은다. 엔티티는 해제하고 줄바꿈은 `\n`으로 맞춘다.
    fn text(&mut self, element: &str) -> Result<String, ParseError> {
        let mut text = String::new();
        loop {
            match self.next()? {
                Event::End(_) => break,
                Event::Eof => return Err(self.truncated(element)),
                event => self.push_text(&mut text, event, element)?,
            }
        }
        Ok(text)
    }

    fn push_text(&mut self, out: &mut String, event: Event<'a>, element: &str) -> Result<(), ParseError> {
        match event {
            Event::Text(text) => {
                let decoded = text.unescape().map_err(|err| self.xml_error(err))?;
                push_normalized(out, &decoded);
            }
            Event::CData(data) => {
                let raw = std::str::from_utf8(&data).map_err(|err| self.xml_error(err))?;
                push_normalized(out, raw);
            }
            // Qt가 제어 문자를 기록하는 방식: <byte value="x9"/>
            Event::Empty(child) if child.name().as_ref() == b"byte" => {
                out.push(self.byte_value(&child)?);
            }
            Event::Start(child) => {
                if child.name().as_ref() == b"byte" {
                    out.push(self.byte_value(&child)?);
                }
                self.skip(&element_name(&child))?;
            }
            Event::Eof => return Err(self.truncated(element)),
            _ => {}
        }
        Ok(())
    }

    fn byte_value(&self, start: &BytesStart<'_>) -> Result<char, ParseError> {
        let value = self.attribute(start, "value")?.unwrap_or_default();
        let code = match value.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => value.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .ok_or_else(|| ParseError::InvalidByte {
                value,
                position: self.position(),
            })
    }

    /// 방금 열린 요소의 하위 트리를 닫는 태그까지 소비한다.
    fn skip(&mut self, element: &str) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            match self.next()? {
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => return Ok(()),
                Event::End(_) => depth -= 1,
                Event::Eof => return Err(self.truncated(element)),
                _ => {}
            }
        }
    }
}

fn push_normalized(out: &mut String, text: &str) {
    if text.contains('\r') {
        out.push_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
    } else {
        out.push_str(text);
    }
}
