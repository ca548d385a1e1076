//! Catalogue of the forecast models whose charts can be composited.
//!
//! Each model fixes three things: the feed that publishes its latest
//! issuance time, the URL template of its rain chart, and the rule that maps
//! a day offset to the forecast-step token in that URL.

use serde::{Deserialize, Serialize};

use crate::time::IssuanceTime;

/// NCDR weather map service hosting all supported charts.
pub const DEFAULT_BASE_URL: &str = "https://watch.ncdr.nat.gov.tw";

/// Supported forecast models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastModel {
    /// CWA official quantitative precipitation forecast
    CwaQpf,
    /// ECMWF driven WRF downscaling (0.25 deg)
    EcmwfWrf,
    /// NCDR two-week WRF run on GFS boundaries
    GfsFnv3,
    /// JMA GSM (0.5 deg)
    GsmAi,
}

impl ForecastModel {
    pub const ALL: [ForecastModel; 4] = [
        ForecastModel::CwaQpf,
        ForecastModel::EcmwfWrf,
        ForecastModel::GfsFnv3,
        ForecastModel::GsmAi,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ForecastModel::CwaQpf => "cwa_qpf",
            ForecastModel::EcmwfWrf => "ecmwf_wrf",
            ForecastModel::GfsFnv3 => "gfs_fnv3",
            ForecastModel::GsmAi => "gsm_ai",
        }
    }

    /// Path (relative to the service root) of the issuance-time feed.
    pub fn feed_path(&self) -> &'static str {
        match self {
            ForecastModel::CwaQpf => "/php/list_realtime_date_csv.php?v=CWB_QPF_OFFICIAL",
            ForecastModel::EcmwfWrf => "/php/list_realtime_date_csv.php?v=CHART_ECMWF_WRFDS",
            // GSM charts are published alongside the two-week WRF run and
            // share its feed.
            ForecastModel::GfsFnv3 | ForecastModel::GsmAi => {
                "/php/list_realtime_date_csv.php?v=WRF2WEEKS_RAIN"
            }
        }
    }

    /// Path template of the rain chart, see [`fill_template`] for tokens.
    pub fn image_template(&self) -> &'static str {
        match self {
            ForecastModel::CwaQpf => {
                "/00_Wxmap/5F11_CWB_QPF_OFFICIAL/{YYYYMM}/O01_{YYYYMMDDHH}_f{XX}_d12s.gif"
            }
            ForecastModel::EcmwfWrf => {
                "/00_Wxmap/2F7_ECMWF_0.25deg/{YYYYMM}/{YYYYMMDDHH}/ecwrf_rain_{YYYYMMDDHH}_f{XX}.png"
            }
            ForecastModel::GfsFnv3 => {
                "/00_Wxmap/5F24_NCDR_WRF_2WEEKS/{YYYYMM}/{YYYYMMDDHHmm}/rain_{YYYYMMDDHHmm}_f{XX}.gif"
            }
            ForecastModel::GsmAi => {
                "/00_Wxmap/2F8_JMAGSM_0.5deg/{YYYYMM}/{YYYYMMDDHH}/jmamsrn_{YYYYMMDDHH}_{XX}.png"
            }
        }
    }

    pub fn step_rule(&self) -> StepRule {
        match self {
            ForecastModel::CwaQpf => StepRule::HourGated,
            ForecastModel::EcmwfWrf | ForecastModel::GfsFnv3 | ForecastModel::GsmAi => {
                StepRule::Standard
            }
        }
    }

    pub fn feed_url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.feed_path())
    }

    /// Full chart URL for one issuance and forecast step.
    pub fn image_url(&self, base_url: &str, issuance: &IssuanceTime, step: &str) -> String {
        format!(
            "{}{}",
            base_url.trim_end_matches('/'),
            fill_template(self.image_template(), issuance, step)
        )
    }
}

impl std::fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// How a model maps a day offset to its forecast-step token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepRule {
    /// Step is the zero-padded day offset.
    Standard,
    /// Step depends on the issuance hour; some days are not produced at all.
    HourGated,
}

impl StepRule {
    /// Resolve the step token, or `None` when the model has no product for
    /// that day offset.
    pub fn resolve(&self, issuance: &IssuanceTime, day_offset: u32) -> Option<String> {
        match self {
            StepRule::Standard => Some(format!("{:02}", day_offset)),
            StepRule::HourGated => match (issuance.hour(), day_offset) {
                (3 | 21, 1) => Some("39".to_string()),
                (9 | 15, 1) => Some("15".to_string()),
                (9 | 15, 2) => Some("51".to_string()),
                _ => None,
            },
        }
    }
}

/// Substitute issuance and step tokens into a URL template.
///
/// Tokens: `{YYYYMM}`, `{YYYYMMDDHH}`, `{YYYYMMDDHHmm}` (the full issuance
/// text) and `{XX}` (the step). Tokens absent from the template are ignored.
pub fn fill_template(template: &str, issuance: &IssuanceTime, step: &str) -> String {
    template
        .replace("{YYYYMMDDHHmm}", issuance.as_str())
        .replace("{YYYYMMDDHH}", issuance.date_hour())
        .replace("{YYYYMM}", issuance.year_month())
        .replace("{XX}", step)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> IssuanceTime {
        IssuanceTime::parse(s).unwrap()
    }

    #[test]
    fn test_hour_gated_table() {
        let rule = StepRule::HourGated;
        assert_eq!(rule.resolve(&t("2024010103xx"), 1).as_deref(), Some("39"));
        assert_eq!(rule.resolve(&t("2024010103xx"), 2), None);
        assert_eq!(rule.resolve(&t("2024010121xx"), 1).as_deref(), Some("39"));
        assert_eq!(rule.resolve(&t("2024010109xx"), 1).as_deref(), Some("15"));
        assert_eq!(rule.resolve(&t("2024010109xx"), 2).as_deref(), Some("51"));
        assert_eq!(rule.resolve(&t("2024010109xx"), 3), None);
        assert_eq!(rule.resolve(&t("2024010115xx"), 1).as_deref(), Some("15"));
        assert_eq!(rule.resolve(&t("2024010115xx"), 2).as_deref(), Some("51"));
        assert_eq!(rule.resolve(&t("2024010100xx"), 1), None);
        assert_eq!(rule.resolve(&t("2024010112xx"), 2), None);
    }

    #[test]
    fn test_standard_rule_zero_pads() {
        for issuance in ["2024010100", "202401011200", "2024010121"] {
            for day in 1..=7 {
                assert_eq!(
                    StepRule::Standard.resolve(&t(issuance), day),
                    Some(format!("0{}", day))
                );
            }
        }
        assert_eq!(StepRule::Standard.resolve(&t("2024010100"), 12).as_deref(), Some("12"));
    }

    #[test]
    fn test_model_rules() {
        assert_eq!(ForecastModel::CwaQpf.step_rule(), StepRule::HourGated);
        for model in [ForecastModel::EcmwfWrf, ForecastModel::GfsFnv3, ForecastModel::GsmAi] {
            assert_eq!(model.step_rule(), StepRule::Standard);
        }
    }

    #[test]
    fn test_image_urls() {
        let issuance = t("202602211200");
        assert_eq!(
            ForecastModel::EcmwfWrf.image_url(DEFAULT_BASE_URL, &issuance, "03"),
            "https://watch.ncdr.nat.gov.tw/00_Wxmap/2F7_ECMWF_0.25deg/202602/2026022112/ecwrf_rain_2026022112_f03.png"
        );
        assert_eq!(
            ForecastModel::GfsFnv3.image_url(DEFAULT_BASE_URL, &issuance, "01"),
            "https://watch.ncdr.nat.gov.tw/00_Wxmap/5F24_NCDR_WRF_2WEEKS/202602/202602211200/rain_202602211200_f01.gif"
        );
        assert_eq!(
            ForecastModel::GsmAi.image_url("http://localhost:8080/", &issuance, "02"),
            "http://localhost:8080/00_Wxmap/2F8_JMAGSM_0.5deg/202602/2026022112/jmamsrn_2026022112_02.png"
        );
        assert_eq!(
            ForecastModel::CwaQpf.image_url(DEFAULT_BASE_URL, &t("2026022109"), "15"),
            "https://watch.ncdr.nat.gov.tw/00_Wxmap/5F11_CWB_QPF_OFFICIAL/202602/O01_2026022109_f15_d12s.gif"
        );
    }

    #[test]
    fn test_fill_template_ignores_missing_tokens() {
        let out = fill_template("/static/{YYYYMM}/chart.png", &t("2026022112"), "01");
        assert_eq!(out, "/static/202602/chart.png");
        assert_eq!(fill_template("/plain.png", &t("2026022112"), "01"), "/plain.png");
    }

    #[test]
    fn test_feed_urls() {
        assert_eq!(
            ForecastModel::CwaQpf.feed_url(DEFAULT_BASE_URL),
            "https://watch.ncdr.nat.gov.tw/php/list_realtime_date_csv.php?v=CWB_QPF_OFFICIAL"
        );
        assert_eq!(
            ForecastModel::GsmAi.feed_url(DEFAULT_BASE_URL),
            ForecastModel::GfsFnv3.feed_url(DEFAULT_BASE_URL)
        );
    }

    #[test]
    fn test_model_deserializes_from_snake_case() {
        for model in ForecastModel::ALL {
            let parsed: ForecastModel = serde_yaml::from_str(model.id()).unwrap();
            assert_eq!(parsed, model);
            assert_eq!(parsed.to_string(), model.id());
        }
        assert!(serde_yaml::from_str::<ForecastModel>("icon_eu").is_err());
    }
}
