//! 정의되지 않을 수 있는 비율.
//!
//! 하락 기간이 전혀 없는 수익률의 소르티노 비율은 수학적으로 +∞입니다.
//! `f64::INFINITY`는 JSON으로 표현할 수 없으므로 별도 변형으로 표현하고,
//! 직렬화 시 `null`로 내보냅니다.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 유한 값 또는 정의되지 않음.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    /// 유한한 비율 값
    Finite(f64),
    /// 분모가 없어 정의되지 않는 비율 (예: 하방 편차가 없는 소르티노)
    Undefined,
}

impl Ratio {
    /// 유한 값이면 반환합니다.
    pub fn value(&self) -> Option<f64> {
        match self {
            Ratio::Finite(v) => Some(*v),
            Ratio::Undefined => None,
        }
    }

    /// 정의되지 않은 비율인지 확인합니다.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Ratio::Undefined)
    }

    /// 유한 값에 함수를 적용합니다.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Ratio::Finite(v) => Ratio::Finite(f(v)),
            Ratio::Undefined => Ratio::Undefined,
        }
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Ratio::Finite(0.0)
    }
}

impl From<f64> for Ratio {
    /// 비유한 값(±∞, NaN)은 `Undefined`로 변환됩니다.
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Ratio::Finite(value)
        } else {
            Ratio::Undefined
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Finite(v) => write!(f, "{:.2}", v),
            Ratio::Undefined => f.write_str("n/a"),
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Ratio::Finite(v) => serializer.serialize_f64(*v),
            Ratio::Undefined => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?
            .map(Ratio::from)
            .unwrap_or(Ratio::Undefined))
    }
}
