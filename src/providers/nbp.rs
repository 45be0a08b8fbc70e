use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument};

use crate::core::currency::Table;
use crate::core::error::ApiError;
use crate::core::transport::{Query, RateTable, RateTransport};

/// HTTP transport for the NBP exchange rate API.
pub struct NbpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl NbpTransport {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("nbp-rates/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(NbpTransport {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, table: Table, code: &str, query: &Query) -> String {
        format!(
            "{}/exchangerates/rates/{}/{}/{}",
            self.base_url,
            table.path_segment(),
            code.to_lowercase(),
            query
        )
    }
}

#[async_trait]
impl RateTransport for NbpTransport {
    #[instrument(
        name = "NbpRateFetch",
        skip_all,
        fields(table = %table, code = %code, query = ?query)
    )]
    async fn fetch(&self, table: Table, code: &str, query: &Query) -> Result<RateTable, ApiError> {
        let url = self.url(table, code, query);
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(format!("{url}?format=json"))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("{e} for URL: {url}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NoData(format!("{code} in table {table} ({url})")));
        }
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("{e} for URL: {url}")))?;

        serde_json::from_str(&text).map_err(|e| {
            ApiError::MalformedResponse(format!("Failed to parse JSON response for {code}: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EUR_MID: &str = r#"{
        "table": "A",
        "currency": "euro",
        "code": "EUR",
        "rates": [
            {"no": "190/A/NBP/2017", "effectiveDate": "2017-10-02", "mid": 4.3137}
        ]
    }"#;

    async fn create_mock_server(request_path: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_url_layout() {
        let transport = NbpTransport::new("http://api.test/api/").unwrap();
        assert_eq!(transport.base_url(), "http://api.test/api");

        assert_eq!(
            transport.url(Table::A, "EUR", &Query::Current),
            "http://api.test/api/exchangerates/rates/a/eur/"
        );
        assert_eq!(
            transport.url(Table::C, "usd", &Query::Today),
            "http://api.test/api/exchangerates/rates/c/usd/today"
        );
        assert_eq!(
            transport.url(Table::B, "GYD", &Query::Last(5)),
            "http://api.test/api/exchangerates/rates/b/gyd/last/5"
        );
        assert_eq!(
            transport.url(
                Table::A,
                "CHF",
                &Query::Range(ymd(2017, 10, 1), ymd(2017, 10, 14))
            ),
            "http://api.test/api/exchangerates/rates/a/chf/2017-10-01/2017-10-14"
        );
    }

    #[tokio::test]
    async fn test_successful_fetch() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/exchangerates/rates/a/eur/2017-10-02"))
            .and(query_param("format", "json"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EUR_MID))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = NbpTransport::new(&mock_server.uri()).unwrap();
        let table = transport
            .fetch(Table::A, "EUR", &Query::Date(ymd(2017, 10, 2)))
            .await
            .expect("Failed to fetch rates");

        assert_eq!(table.table, "A");
        assert_eq!(table.code, "EUR");
        assert_eq!(table.rates.len(), 1);
        assert_eq!(table.rates[0].effective_date, "2017-10-02");
        assert_eq!(table.rates[0].mid.as_ref().unwrap().to_string(), "4.3137");
    }

    #[tokio::test]
    async fn test_not_found_is_no_data() {
        let mock_server =
            create_mock_server("/exchangerates/rates/a/eur/today", 404, "404 NotFound").await;
        let transport = NbpTransport::new(&mock_server.uri()).unwrap();

        let result = transport.fetch(Table::A, "EUR", &Query::Today).await;
        assert!(matches!(result, Err(ApiError::NoData(_))));
    }

    #[tokio::test]
    async fn test_bad_request_is_http_error() {
        let mock_server =
            create_mock_server("/exchangerates/rates/a/eur/last/5", 400, "400 BadRequest").await;
        let transport = NbpTransport::new(&mock_server.uri()).unwrap();

        let result = transport.fetch(Table::A, "EUR", &Query::Last(5)).await;
        match result {
            Err(ApiError::Http { status, url }) => {
                assert_eq!(status, 400);
                assert!(url.ends_with("/exchangerates/rates/a/eur/last/5"));
            }
            other => panic!("Expected HTTP error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server(
            "/exchangerates/rates/a/eur/",
            200,
            r#"{"table": "A", "code": "EUR", "rate": []}"#,
        )
        .await;
        let transport = NbpTransport::new(&mock_server.uri()).unwrap();

        let result = transport.fetch(Table::A, "EUR", &Query::Current).await;
        match result {
            Err(ApiError::MalformedResponse(message)) => {
                assert!(message.contains("Failed to parse JSON response for EUR"));
            }
            other => panic!("Expected malformed response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // Nothing listens on port 1
        let transport = NbpTransport::new("http://127.0.0.1:1/api").unwrap();
        let result = transport.fetch(Table::A, "EUR", &Query::Current).await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
    }
}
