//! 낙폭(Drawdown) 분석 모듈
//!
//! - [`analyzer`]: 최대 낙폭, 낙폭 시계열, 임계값 이상의 모든 낙폭 에피소드

pub mod analyzer;

pub use analyzer::*;
