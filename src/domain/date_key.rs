//! Canonical `YYYY-MM-DD` date keys.
//!
//! Price series, equity curves and trade lists arrive from independent
//! sources with different date encodings (`2024-01-05T10:00:00Z`,
//! `2024-01-05 10:00:00`, `2024-01-05`, ...). A [`DateKey`] is the single
//! join key between them. Normalization is purely textual: no timezone or
//! locale conversion is performed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// Rules are applied in order; the first that matches wins:
    /// 1. contains `T` → text before the first `T`
    /// 2. contains a space → text before the first space
    /// 3. already `YYYY-MM-DD` → unchanged
    /// 4. otherwise → first 10 characters
    pub fn normalize(input: &str) -> Self {
        if let Some((head, _)) = input.split_once('T') {
            return DateKey(head.to_string());
        }
        if let Some((head, _)) = input.split_once(' ') {
            return DateKey(head.to_string());
        }
        if is_canonical(input) {
            return DateKey(input.to_string());
        }
        DateKey(input.chars().take(10).collect())
    }

    /// Stringifies a non-string value before normalizing it.
    pub fn normalize_display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Self::normalize(&value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_canonical(&self) -> bool {
        is_canonical(&self.0)
    }

    /// `None` when the key is textually canonical but not a real calendar
    /// date (e.g. `2024-02-30`), or not canonical at all.
    pub fn as_naive_date(&self) -> Option<NaiveDate> {
        if !self.is_canonical() {
            return None;
        }
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").ok()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey(date.format("%Y-%m-%d").to_string())
    }
}

fn is_canonical(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
