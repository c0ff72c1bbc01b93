//! 리밸런싱 주기 정의.
//!
//! 실제 달력 대신 거래일 수로 주기를 근사합니다 (월 21일, 분기 63일, 연 252일).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyticsError;

/// 리밸런싱 주기.
///
/// 외부 API와의 호환을 위해 프랑스어 문자열(`"mensuel"` 등)로 직렬화되며,
/// 대소문자를 구분합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebalanceFrequency {
    /// 매월 (21 거래일)
    Mensuel,
    /// 매 분기 (63 거래일)
    #[default]
    Trimestriel,
    /// 매년 (252 거래일)
    Annuel,
    /// 리밸런싱 없음
    Jamais,
}

impl RebalanceFrequency {
    /// 리밸런싱 간격 (거래일 수). `Jamais`는 None.
    pub fn period_days(&self) -> Option<usize> {
        match self {
            RebalanceFrequency::Mensuel => Some(21),
            RebalanceFrequency::Trimestriel => Some(63),
            RebalanceFrequency::Annuel => Some(252),
            RebalanceFrequency::Jamais => None,
        }
    }

    /// 주어진 기간 인덱스에서 리밸런싱이 발생하는지 확인합니다.
    ///
    /// 인덱스 0은 시작 시점이므로 항상 false입니다.
    pub fn triggers_at(&self, period_index: usize) -> bool {
        match self.period_days() {
            Some(period) => period_index > 0 && period_index % period == 0,
            None => false,
        }
    }

    /// API 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            RebalanceFrequency::Mensuel => "mensuel",
            RebalanceFrequency::Trimestriel => "trimestriel",
            RebalanceFrequency::Annuel => "annuel",
            RebalanceFrequency::Jamais => "jamais",
        }
    }
}

impl fmt::Display for RebalanceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RebalanceFrequency {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mensuel" => Ok(RebalanceFrequency::Mensuel),
            "trimestriel" => Ok(RebalanceFrequency::Trimestriel),
            "annuel" => Ok(RebalanceFrequency::Annuel),
            "jamais" => Ok(RebalanceFrequency::Jamais),
            other => Err(AnalyticsError::UnknownRebalanceFrequency(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(
            "mensuel".parse::<RebalanceFrequency>().unwrap(),
            RebalanceFrequency::Mensuel
        );
        assert_eq!(
            "jamais".parse::<RebalanceFrequency>().unwrap(),
            RebalanceFrequency::Jamais
        );
        assert!(matches!(
            "Trimestriel".parse::<RebalanceFrequency>(),
            Err(AnalyticsError::UnknownRebalanceFrequency(_))
        ));
        assert!("weekly".parse::<RebalanceFrequency>().is_err());
    }

    #[test]
    fn test_triggers() {
        let quarterly = RebalanceFrequency::Trimestriel;
        assert!(!quarterly.triggers_at(0));
        assert!(!quarterly.triggers_at(62));
        assert!(quarterly.triggers_at(63));
        assert!(quarterly.triggers_at(126));

        assert!(RebalanceFrequency::Mensuel.triggers_at(21));
        assert!(RebalanceFrequency::Annuel.triggers_at(252));
        assert!(!RebalanceFrequency::Jamais.triggers_at(252));
    }

    #[test]
    fn test_serde_roundtrip_uses_api_strings() {
        let json = serde_json::to_string(&RebalanceFrequency::Annuel).unwrap();
        assert_eq!(json, "\"annuel\"");
        let parsed: RebalanceFrequency = serde_json::from_str("\"trimestriel\"").unwrap();
        assert_eq!(parsed, RebalanceFrequency::Trimestriel);
    }
}
