//! CLI 명령어 구현 모듈.

pub mod analyze;
pub mod backtest;
pub mod monte_carlo;
pub mod prices;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

/// `YYYY-MM-DD` 형식의 날짜를 파싱합니다.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("잘못된 날짜 형식: {} (YYYY-MM-DD)", s))
}

/// 리포트를 JSON으로 출력합니다.
///
/// 경로가 있으면 파일에 쓰고, 없으면 stdout에 출력합니다.
pub fn write_json<T: Serialize>(report: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("리포트 직렬화 실패")?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("디렉토리 생성 실패: {}", parent.display()))?;
            }
            std::fs::write(path, json)
                .with_context(|| format!("결과 저장 실패: {}", path.display()))?;
            tracing::info!(path = %path.display(), "결과 저장 완료");
        }
        None => println!("{}", json),
    }

    Ok(())
}
