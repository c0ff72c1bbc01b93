//! # Patrimoine Core
//!
//! 포트폴리오 분석 엔진의 핵심 도메인 타입을 제공합니다.
//!
//! 이 크레이트는 분석 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 날짜 기반 시계열 (가격, 수익률, 자산 가치)
//! - 자산 배분 비중
//! - 리밸런싱 주기
//! - 정의되지 않을 수 있는 비율 (`Ratio`)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
