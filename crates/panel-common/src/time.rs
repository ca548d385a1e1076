//! Model issuance times.

use std::fmt;
use std::str::FromStr;

use crate::error::{PanelError, PanelResult};

/// Timestamp identifying when a model run started, as published by the
/// issuance feed (`YYYYMMDDHH` or `YYYYMMDDHHmm`).
///
/// The text is substituted verbatim into image URL templates. Only the
/// leading `YYYYMMDDHH` part is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssuanceTime(String);

impl IssuanceTime {
    pub fn parse(raw: &str) -> PanelResult<Self> {
        let raw = raw.trim();
        let head = raw
            .get(..10)
            .ok_or_else(|| PanelError::InvalidIssuance(raw.to_string()))?;
        if !head.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PanelError::InvalidIssuance(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Extract the issuance time from a feed payload such as
    /// `"CHART_ECMWF_WRFDS_date,202602211200"`: the second comma-separated
    /// field, trimmed.
    pub fn from_feed(body: &str) -> PanelResult<Self> {
        let body = body.trim();
        match body.split(',').nth(1) {
            Some(field) => Self::parse(field),
            None => Err(PanelError::InvalidIssuance(body.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `YYYYMM`
    pub fn year_month(&self) -> &str {
        &self.0[..6]
    }

    /// `YYYYMMDDHH`
    pub fn date_hour(&self) -> &str {
        &self.0[..10]
    }

    /// Hour of day of the model run.
    pub fn hour(&self) -> u32 {
        self.0[8..10].parse().unwrap_or(0)
    }
}

impl FromStr for IssuanceTime {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for IssuanceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_components() {
        let t = IssuanceTime::parse("202602211200").unwrap();
        assert_eq!(t.year_month(), "202602");
        assert_eq!(t.date_hour(), "2026022112");
        assert_eq!(t.hour(), 12);
        assert_eq!(t.as_str(), "202602211200");
    }

    #[test]
    fn test_parse_accepts_opaque_minutes() {
        let t = IssuanceTime::parse("2024010103xx").unwrap();
        assert_eq!(t.hour(), 3);
    }

    #[test]
    fn test_parse_rejects_short_or_non_numeric() {
        assert!(IssuanceTime::parse("20240101").is_err());
        assert!(IssuanceTime::parse("").is_err());
        assert!(IssuanceTime::parse("2024-01-01T03").is_err());
    }

    #[test]
    fn test_from_feed() {
        let t = IssuanceTime::from_feed("KEY_date,202602211200\n").unwrap();
        assert_eq!(t.as_str(), "202602211200");

        let t = IssuanceTime::from_feed("  CWB_QPF_OFFICIAL , 2026022109 ").unwrap();
        assert_eq!(t.as_str(), "2026022109");
    }

    #[test]
    fn test_from_feed_without_comma() {
        let err = IssuanceTime::from_feed("202602211200").unwrap_err();
        assert!(matches!(err, PanelError::InvalidIssuance(_)));
    }
}
