use std::str::FromStr;

use chrono::{Datelike, NaiveDate, ParseError};
use serde::Deserialize;

/// A TOML local date, as in `founded = 1998-04-01`
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TomlDate(pub NaiveDate);

impl TomlDate {
    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl<'de> Deserialize<'de> for TomlDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
    {
        use serde::de::Error;
        let value = toml::value::Datetime::deserialize(deserializer)?;
        match (value.date, value.time) {
            (Some(_), None) => TomlDate::from_str(&value.to_string()).map_err(Error::custom),
            _ => Err(Error::custom(format!("expected a date without time, found {}", value))),
        }
    }
}

impl FromStr for TomlDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(NaiveDate::from_str(s.trim())?))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Business {
        founded: TomlDate,
    }

    #[test]
    fn test_toml_date() {
        let business: Business = toml::from_str("founded = 1998-04-01").unwrap();
        assert_eq!(business.founded, TomlDate(NaiveDate::from_ymd_opt(1998, 4, 1).unwrap()));
        assert_eq!(business.founded.year(), 1998);
    }

    #[test]
    fn test_datetime_is_rejected() {
        assert!(toml::from_str::<Business>("founded = 1998-04-01T10:00:00").is_err());
        assert!(toml::from_str::<Business>("founded = \"spring\"").is_err());
    }
}
