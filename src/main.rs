use std::process::ExitCode;

use clap::Parser;
use ts_catalog::{app, config, logging, ui_cli::Cli};

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 명령을 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match try_run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("오류: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: &Cli) -> Result<(), app::AppError> {
    let cfg = config::load_or_default(&cli.config)?;
    logging::init(&cfg.log_filter);
    let stdout = std::io::stdout();
    app::run(cli, &cfg, &mut stdout.lock())
}
