use serde_json::Value;

/// An untouched scorecard body, tagged with the schema it was recognised as.
///
/// Shape detection happens once, here; the normalizer only matches on the
/// variant.
#[derive(Debug, Clone, PartialEq)]
pub enum RawScorecard {
    /// Primary (NV Play) shape: `Match` + `Innings[]`
    Nv(Value),
    /// Fallback (Results Vault) shape: `MatchTeams[]` + `home_name`/`away_name`
    ResultsVault(Value),
    /// Neither key present
    Unrecognized(Value),
}

impl RawScorecard {
    pub fn classify(body: Value) -> Self {
        if body.get("Match").is_some() {
            RawScorecard::Nv(body)
        } else if body.get("MatchTeams").is_some() {
            RawScorecard::ResultsVault(body)
        } else {
            RawScorecard::Unrecognized(body)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RawScorecard::Nv(_) => "nv",
            RawScorecard::ResultsVault(_) => "results-vault",
            RawScorecard::Unrecognized(_) => "unrecognized",
        }
    }
}

/// Read a JSON field that upstreams send either as a number or a numeric string.
/// Non-finite values ("NaN", "inf") count as missing.
pub(crate) fn num(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
        .filter(|x| x.is_finite())
}

/// Render a JSON scalar as a lookup key (ids arrive as both `123` and `"123"`).
pub(crate) fn key_of(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
