/// 금액 타입
/// 모든 금액은 최소 단위(센트)의 정수로 저장한다.
// region:    --- Imports
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Amount
/// 센트 단위 금액
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct Amount(i64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount is not a number: {0}")]
    Malformed(String),

    #[error("amount must be positive")]
    NotPositive,

    #[error("amount is too large")]
    Overflow,
}

impl Amount {
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn from_whole(units: i64) -> Option<Self> {
        units.checked_mul(100).map(Self)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// 입찰 폼 입력 파싱 (정수만 허용)
    pub fn parse_whole(input: &str) -> Result<Self, AmountError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AmountError::Empty);
        }
        if !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::Malformed(input.to_string()));
        }
        let units: i64 = input.parse().map_err(|_| AmountError::Overflow)?;
        if units == 0 {
            return Err(AmountError::NotPositive);
        }
        Self::from_whole(units).ok_or(AmountError::Overflow)
    }

    /// 시작 가격 입력 파싱 (소수점 둘째 자리까지 허용)
    pub fn parse_decimal(input: &str) -> Result<Self, AmountError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AmountError::Empty);
        }
        let (whole, fraction) = match input.split_once('.') {
            Some((_, "")) => return Err(AmountError::Malformed(input.to_string())),
            Some((whole, fraction)) => (whole, fraction),
            None => (input, ""),
        };
        let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !digits_only(whole) || !digits_only(fraction) || fraction.len() > 2
        {
            return Err(AmountError::Malformed(input.to_string()));
        }

        let units: i64 = whole.parse().map_err(|_| AmountError::Overflow)?;
        let cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| AmountError::Overflow)? * 10,
            _ => fraction.parse::<i64>().map_err(|_| AmountError::Overflow)?,
        };
        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or(AmountError::Overflow)?;
        if total <= 0 {
            return Err(AmountError::NotPositive);
        }
        Ok(Self(total))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
// endregion: --- Amount
