//! tracing 구독자 초기화.
//!
//! 로그는 stderr로 출력되어 stdout의 JSON 리포트와 섞이지 않습니다.
//! 레벨과 형식은 설정 파일의 `[logging]` 섹션(또는
//! `PATRIMOINE__LOGGING__LEVEL` 같은 환경 변수)에서 오며, `RUST_LOG`가
//! 있으면 레벨보다 우선합니다.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;
use crate::error::{AnalyticsError, AnalyticsResult};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 여러 줄, 색상 포함 (개발용)
    #[default]
    Pretty,
    /// 한 줄 JSON (로그 수집용)
    Json,
    /// 간결한 한 줄 형식
    Compact,
}

/// 설정의 레벨 문자열로 필터를 만듭니다.
///
/// `info`처럼 단일 레벨이나 `patrimoine_analytics=debug,warn`처럼 대상별
/// 지시문을 받습니다.
pub fn level_filter(level: &str) -> AnalyticsResult<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| AnalyticsError::Config(format!("잘못된 로그 레벨 '{}': {}", level, e)))
}

/// 전역 tracing 구독자를 설치합니다. 프로세스당 한 번만 호출할 수 있습니다.
pub fn init_logging(settings: &LoggingConfig) -> AnalyticsResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&settings.level)?,
    };

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match settings.format {
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| AnalyticsError::Config(format!("로깅 초기화 실패: {}", e)))?;

    tracing::debug!(format = ?settings.format, level = %settings.level, "로깅 초기화");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_accepts_directives() {
        assert!(level_filter("info").is_ok());
        assert!(level_filter("patrimoine_analytics=debug,warn").is_ok());
    }

    #[test]
    fn test_format_names() {
        let parsed: LogFormat = serde_json::from_str("\"compact\"").unwrap();
        assert_eq!(parsed, LogFormat::Compact);
        assert_eq!(serde_json::to_string(&LogFormat::Json).unwrap(), "\"json\"");
        assert!(serde_json::from_str::<LogFormat>("\"xml\"").is_err());
    }
}
