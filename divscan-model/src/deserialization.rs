/// Determine the `DateTime<Utc>` from the provided `Duration` since the epoch.
pub fn datetime_utc_from_epoch_duration(
    duration: std::time::Duration,
) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::from(std::time::UNIX_EPOCH + duration)
}

/// Deserialize an optional `String` as the desired type, treating `""` as `None`.
///
/// Exchanges commonly report a missing number as an empty string rather than `null`.
pub fn de_str_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::de::Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let data: Option<&str> = serde::de::Deserialize::deserialize(deserializer)?;
    match data {
        None | Some("") => Ok(None),
        Some(data) => data.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Parse a `u64` milliseconds string as `DateTime<Utc>`.
pub fn datetime_utc_from_epoch_ms_str(epoch_ms: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    epoch_ms
        .parse::<u64>()
        .ok()
        .map(|ms| datetime_utc_from_epoch_duration(std::time::Duration::from_millis(ms)))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Ticker {
        #[serde(deserialize_with = "de_str_opt", default)]
        vol: Option<f64>,
    }

    #[test]
    fn test_de_str_opt() {
        struct TestCase {
            input: &'static str,
            expected: Option<Option<f64>>,
        }

        let cases = vec![
            TestCase {
                // TC0: number as string
                input: r#"{"vol": "3.25"}"#,
                expected: Some(Some(3.25)),
            },
            TestCase {
                // TC1: empty string
                input: r#"{"vol": ""}"#,
                expected: Some(None),
            },
            TestCase {
                // TC2: absent
                input: r#"{}"#,
                expected: Some(None),
            },
            TestCase {
                // TC3: not a number
                input: r#"{"vol": "abc"}"#,
                expected: None,
            },
        ];

        for (i, test_case) in cases.into_iter().enumerate() {
            let actual = serde_json::from_str::<Ticker>(test_case.input).ok().map(|ticker| ticker.vol);
            assert_eq!(actual, test_case.expected, "Test case {} failed", i);
        }
    }

    #[test]
    fn test_datetime_utc_from_epoch_ms_str() {
        assert_eq!(
            datetime_utc_from_epoch_ms_str("1703980800000"),
            Some(Utc.timestamp_millis_opt(1703980800000).unwrap())
        );
        assert_eq!(datetime_utc_from_epoch_ms_str("-1"), None);
        assert_eq!(datetime_utc_from_epoch_ms_str("soon"), None);
    }
}
