use crate::api::ApiClient;
use crate::config::ClientConfig;

#[test]
fn test_endpoint_encodes_symbol_and_query() {
    let api = ApiClient::new("http://localhost:8000/api/");

    let url = api
        .endpoint("meeting/start", &[("symbol_key", "US:AAPL"), ("query", "AAPL 最近表現如何？")])
        .unwrap();

    assert_eq!(url.path(), "/api/meeting/start");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("symbol_key".to_string(), "US:AAPL".to_string()),
            ("query".to_string(), "AAPL 最近表現如何？".to_string()),
        ]
    );
}

#[test]
fn test_endpoint_tolerates_leading_slash() {
    let api = ApiClient::new("http://localhost:8000/api");

    let url = api.endpoint("/meeting/history", &[("symbol_key", "TW:2330")]).unwrap();

    assert_eq!(url.as_str(), "http://localhost:8000/api/meeting/history?symbol_key=TW%3A2330");
}

#[test]
fn test_endpoint_rejects_bad_base() {
    let api = ApiClient::new("not a url");

    assert!(api.endpoint("meeting/start", &[]).is_err());
}

#[test]
fn test_from_config_uses_rest_base() {
    let mut config = ClientConfig::default();
    config.base_url = "http://backend:8000/api/".to_string();

    let api = ApiClient::from_config(&config).unwrap();

    assert_eq!(api.base_url, "http://backend:8000/api");
}
