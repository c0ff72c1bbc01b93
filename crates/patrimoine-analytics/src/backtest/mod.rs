//! 백테스팅 모듈
//!
//! 고정 목표 비중 포트폴리오를 과거 가격으로 시뮬레이션합니다.
//!
//! - [`config`]: 백테스트 설정 (기간, 리밸런싱 주기, 거래 비용)
//! - [`table`]: 종목별 가격 정렬 및 수익률 테이블
//! - [`engine`]: 가치 경로 시뮬레이션과 지표 계산
//! - [`report`]: 결과 리포트

pub mod config;
pub mod engine;
pub mod report;
pub mod table;

pub use config::BacktestConfig;
pub use engine::BacktestEngine;
pub use report::{AnnualBreakdown, BacktestReport};
pub use table::ReturnTable;
