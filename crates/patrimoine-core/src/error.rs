//! 분석 시스템의 에러 타입.
//!
//! 통계 함수 대부분은 입력이 부족할 때 에러 대신 0.0 같은 안전한 기본값을
//! 반환합니다. 여기의 에러는 설정 오류와 잘못된 매개변수처럼 호출자가
//! 반드시 알아야 하는 경우에만 사용됩니다.

use thiserror::Error;

/// 분석 엔진 에러.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// 알 수 없는 리밸런싱 주기 문자열
    #[error("알 수 없는 리밸런싱 주기: '{0}' (mensuel, trimestriel, annuel, jamais 중 하나)")]
    UnknownRebalanceFrequency(String),

    /// 잘못된 시뮬레이션/백테스트 매개변수
    #[error("잘못된 매개변수: {0}")]
    InvalidParameter(String),

    /// 가격 데이터에 없는 종목을 참조하는 배분 (strict 모드)
    #[error("배분 종목을 가격 데이터에서 찾을 수 없음: {}", .missing.join(", "))]
    AllocationResolution {
        /// 가격 데이터가 없는 종목 목록
        missing: Vec<String>,
    },

    /// 입력 데이터 에러 (정렬되지 않은 날짜, 음수 가격 등)
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 설정 로드 에러
    #[error("설정 에러: {0}")]
    Config(String),
}

/// 분석 작업을 위한 Result 타입.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

impl AnalyticsError {
    /// 호출자 입력 문제로 인한 에러인지 확인합니다.
    ///
    /// API 계층에서 4xx/5xx 응답을 구분할 때 사용합니다.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AnalyticsError::Config(_))
    }
}

impl From<config::ConfigError> for AnalyticsError {
    fn from(err: config::ConfigError) -> Self {
        AnalyticsError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_error_lists_missing() {
        let err = AnalyticsError::AllocationResolution {
            missing: vec!["EWLD.PA".to_string(), "AGGH.PA".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("EWLD.PA, AGGH.PA"));
    }

    #[test]
    fn test_client_error() {
        assert!(AnalyticsError::InvalidParameter("years".to_string()).is_client_error());
        assert!(!AnalyticsError::Config("missing file".to_string()).is_client_error());
    }
}
