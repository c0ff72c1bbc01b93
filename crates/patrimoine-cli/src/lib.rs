//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - CSV 가격 파일 로더
//! - 고정 비중 백테스트
//! - 몬테카를로 장기 전망
//! - 단일 시계열 성과/위험/낙폭 분석

pub mod commands;
