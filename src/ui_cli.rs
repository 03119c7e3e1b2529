use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::catalog::{Catalog, Message};

/// Qt Linguist(.ts) 번역 카탈로그 조회 도구
#[derive(Parser, Debug)]
#[command(name = "ts_catalog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 설정 파일 경로
    #[arg(long, value_name = "PATH", default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// 언어 코드 (auto/hu/hu-HU ...). 설정 값보다 우선한다
    #[arg(short = 'L', long, default_value = "auto")]
    pub lang: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 컨텍스트 + 원문으로 번역을 조회한다
    Lookup {
        /// 언어팩 대신 사용할 .ts 파일
        #[arg(long)]
        file: Option<PathBuf>,
        context: String,
        source: String,
        /// 구분 주석
        #[arg(long)]
        comment: Option<String>,
    },
    /// 카탈로그 통계를 출력한다
    Stats {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// 메시지를 한 줄씩 나열한다
    List {
        #[arg(long)]
        file: Option<PathBuf>,
        /// 이 컨텍스트만 출력
        #[arg(long)]
        context: Option<String>,
        /// 미완료 메시지만 출력
        #[arg(long)]
        unfinished: bool,
    },
    /// .ts 파일이 올바르게 파싱되는지 검사한다
    Check { file: PathBuf },
}

/// 여러 줄 문자열을 한 줄로 표시하기 위해 제어 문자를 이스케이프한다.
pub fn escape_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

/// `context<TAB>source<TAB>translation<TAB>status[<TAB>comment]` 형식의 한 줄.
pub fn format_message_line(context: &str, message: &Message) -> String {
    let mut line = format!(
        "{}\t{}\t{}\t{}",
        escape_line(context),
        escape_line(&message.source),
        escape_line(message.translation.text()),
        message.status.as_str()
    );
    if !message.comment.is_empty() {
        line.push('\t');
        line.push_str(&escape_line(&message.comment));
    }
    line
}

/// 카탈로그 머리 정보와 통계를 출력한다.
pub fn print_stats(out: &mut impl Write, catalog: &Catalog) -> io::Result<()> {
    writeln!(
        out,
        "언어: {}  원문 언어: {}  형식 버전: {}",
        catalog.language().unwrap_or("-"),
        catalog.source_language().unwrap_or("-"),
        catalog.version().unwrap_or("-")
    )?;
    writeln!(out, "{}", catalog.stats())
}

/// 조건에 맞는 메시지를 문서 순서대로 출력한다.
pub fn print_messages(
    out: &mut impl Write,
    catalog: &Catalog,
    context: Option<&str>,
    unfinished_only: bool,
) -> io::Result<usize> {
    let mut count = 0;
    for (name, message) in catalog.messages() {
        if context.is_some_and(|wanted| wanted != name) {
            continue;
        }
        if unfinished_only && message.resolved().is_some() {
            continue;
        }
        writeln!(out, "{}", format_message_line(name, message))?;
        count += 1;
    }
    Ok(count)
}
