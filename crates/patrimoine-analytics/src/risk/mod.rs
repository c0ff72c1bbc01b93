//! 위험 지표 모듈
//!
//! 수익률 시계열에 대한 순수 통계 변환을 제공합니다.
//!
//! - [`metrics`]: VaR, CVaR, 베타, 추적오차, 정보비율, 왜도, 첨도

pub mod metrics;

pub use metrics::*;
