use divscan_macro::AsUrlParams;
use serde::Serialize;

trait AsUrlParams {
    fn to_url_params(&self) -> String;
}

#[derive(Serialize, AsUrlParams)]
struct UrlParam {
    pub field1: String,
    pub field3: i32,
}

#[derive(Serialize, AsUrlParams)]
#[serde(rename_all = "camelCase")]
struct CandleParams {
    pub inst_id: String,
    #[serde(rename = "bar")]
    pub timeframe: String,
    pub limit: Option<u32>,
    pub after_ts: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_url_params() {
        let params = UrlParam {
            field1: "value1".to_string(),
            field3: 42,
        };
        let url_params = params.to_url_params();
        assert_eq!(url_params, "field1=value1&field3=42");
    }

    #[test]
    fn test_as_url_params_with_rename_and_null() {
        let params = CandleParams {
            inst_id: "BTC-USDT".to_string(),
            timeframe: "1W".to_string(),
            limit: Some(200),
            after_ts: None,
        };
        let url_params = params.to_url_params();
        assert_eq!(url_params, "instId=BTC-USDT&bar=1W&limit=200");
    }

    #[test]
    fn test_as_url_params_encodes_values() {
        struct TestCase {
            inst_id: &'static str,
            expected: &'static str,
        }

        let cases = vec![
            TestCase {
                // TC0: reserved query characters
                inst_id: "a&b=c",
                expected: "instId=a%26b%3Dc&bar=1D",
            },
            TestCase {
                // TC1: space and percent
                inst_id: "50% off",
                expected: "instId=50%25+off&bar=1D",
            },
            TestCase {
                // TC2: unreserved characters pass through
                inst_id: "ETH-USDT_v1.2",
                expected: "instId=ETH-USDT_v1.2&bar=1D",
            },
        ];

        for (i, test_case) in cases.into_iter().enumerate() {
            let params = CandleParams {
                inst_id: test_case.inst_id.to_string(),
                timeframe: "1D".to_string(),
                limit: None,
                after_ts: None,
            };
            assert_eq!(params.to_url_params(), test_case.expected, "Test case {} failed", i);
        }
    }
}
