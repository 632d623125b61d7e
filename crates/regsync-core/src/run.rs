//! Run identifier.
//!
//! Every process run mints one [`RunId`]. It prefixes the business key of
//! every generated document and doubles as the default search query, so a
//! run only ever sees the documents it created.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// `<prefix>-<YYYYMMDD>-<NNNN>`, e.g. `regsync-20261018-4821`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Mint a run id for today using the thread-local RNG.
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        Self::generate_with(prefix, Utc::now().date_naive(), &mut rand::rng())
    }

    /// Mint a run id for an explicit date and RNG.
    pub fn generate_with<R: Rng + ?Sized>(prefix: &str, date: NaiveDate, rng: &mut R) -> Self {
        let suffix: u16 = rng.random_range(1000..=9999);
        Self(format!("{prefix}-{}-{suffix}", date.format("%Y%m%d")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reuse the id of an earlier run.
impl FromStr for RunId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
            return Err(CoreError::Validation(format!(
                "run id '{trimmed}' must be non-empty without whitespace"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for RunId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn run_id_has_prefix_date_and_four_digits() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let run = RunId::generate_with("regsync", date, &mut rng);

        let rest = run.as_str().strip_prefix("regsync-20261018-").unwrap();
        assert_eq!(rest.len(), 4);
        let digits: u16 = rest.parse().unwrap();
        assert!((1000..=9999).contains(&digits));
    }

    #[test]
    fn earlier_run_ids_parse() {
        let run: RunId = " regsync-20261018-4821 ".parse().unwrap();
        assert_eq!(run.as_str(), "regsync-20261018-4821");
        assert!("".parse::<RunId>().is_err());
        assert!("a b".parse::<RunId>().is_err());
    }

    #[test]
    fn generated_ids_have_three_segments() {
        let run = RunId::generate("it");
        let parts: Vec<&str> = run.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "it");
        assert_eq!(parts[1].len(), 8);
    }
}
