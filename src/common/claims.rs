use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Human-readable view of the registered claims in a payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default)]
    pub is_expired: bool,
}

impl ClaimInfo {
    pub fn extract(claims: &Map<String, Value>, now: DateTime<Utc>) -> Self {
        let mut info = ClaimInfo {
            iss: string_claim(claims, "iss"),
            aud: string_claim(claims, "aud"),
            sub: string_claim(claims, "sub"),
            ..Default::default()
        };

        if let Some(exp) = time_claim(claims.get("exp")) {
            info.exp = Some(exp);
            info.exp_string = Some(format_time(&exp));
            info.is_expired = now > exp;
        }
        if let Some(iat) = time_claim(claims.get("iat")) {
            info.iat = Some(iat);
            info.iat_string = Some(format_time(&iat));
        }
        if let Some(nbf) = time_claim(claims.get("nbf")) {
            info.nbf = Some(nbf);
            info.nbf_string = Some(format_time(&nbf));
        }

        info
    }
}

/// Reads a NumericDate claim as whole seconds. Fractions are truncated.
pub fn numeric_date(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    match number.as_i64() {
        Some(secs) => Some(secs),
        None => {
            let secs = number.as_f64()?.trunc();
            // `as` saturates, so reject anything it would have to clamp
            if secs.is_finite() && secs >= i64::MIN as f64 && secs < i64::MAX as f64 {
                Some(secs as i64)
            } else {
                None
            }
        }
    }
}

pub fn time_claim(value: Option<&Value>) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(numeric_date(value?)?, 0)
}

pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format(DISPLAY_FORMAT).to_string()
}

fn string_claim(claims: &Map<String, Value>, key: &str) -> Option<String> {
    claims.get(key).and_then(Value::as_str).map(str::to_string)
}
