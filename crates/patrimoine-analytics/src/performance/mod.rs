//! 성과 분석 모듈
//!
//! - [`analyzer`]: 총 수익률, CAGR, 변동성, 기간별 수익률, 벤치마크 비교, 종합 리포트

pub mod analyzer;

pub use analyzer::*;
