use std::fs;
use tracing::info;
use xrate::core::config::AppConfig;
use xrate::plugin::RatePlugin;

mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const LATEST: &str = r#"{
        "timestamp": 1700000000,
        "base": "USD",
        "rates": { "USD": 1, "CNY": 7.1, "EUR": 0.92, "JPY": 149.5 }
    }"#;

    pub async fn mount(server: &MockServer, app_id: &str, template: ResponseTemplate, calls: u64) {
        Mock::given(method("GET"))
            .and(path("/api/latest.json"))
            .and(query_param("app_id", app_id))
            .respond_with(template)
            .expect(calls)
            .mount(server)
            .await;
    }

    pub fn ok() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_string(LATEST)
    }

    pub fn write_config(server: &MockServer, app_ids: &[&str]) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let ids = app_ids
            .iter()
            .map(|id| format!("\"{id}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let config_content = format!(
            r#"
provider:
  base_url: "{}/api/latest.json?app_id="
  app_ids: [{ids}]
  request_timeout_secs: 1
timezone: "UTC"
"#,
            server.uri()
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_query_fails_over_to_working_credential() {
    let server = wiremock::MockServer::start().await;
    // Rotation begins one past the first credential.
    test_utils::mount(&server, "dead", wiremock::ResponseTemplate::new(500), 1).await;
    test_utils::mount(&server, "live", test_utils::ok(), 1).await;
    let config_file = test_utils::write_config(&server, &["live", "dead"]);

    let result = xrate::run_command(
        xrate::AppCommand::Query(vec!["usd".into(), "cny".into(), "10".into()]),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Query failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_plugin_from_config_answers_queries() {
    let server = wiremock::MockServer::start().await;
    test_utils::mount(&server, "only", test_utils::ok(), 1).await;
    let config_file = test_utils::write_config(&server, &["only"]);

    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let plugin = RatePlugin::from_config(&config).unwrap();
    plugin.start().await;

    let reply = plugin.handle("eur jpy 46*2").await;
    info!(%reply, "Rate reply");
    assert_eq!(
        reply,
        "**EUR** ➜ **JPY**\n\n`€92.00 = ¥14950.00`\n\n`Amount: 46*2 = 92`\n`Updated: 2023-11-14 22:13`"
    );

    // Served from cache.
    let reply = plugin.handle("usd").await;
    assert!(reply.contains("`$100.00 = ¥710.00`"));
    plugin.shutdown().await;
}

#[test_log::test(tokio::test)]
async fn test_slow_credential_times_out_and_fails_over() {
    let server = wiremock::MockServer::start().await;
    let slow = test_utils::ok().set_delay(std::time::Duration::from_secs(3));
    test_utils::mount(&server, "slow", slow, 1).await;
    test_utils::mount(&server, "fast", test_utils::ok(), 1).await;
    // request_timeout_secs is 1 here.
    let config_file = test_utils::write_config(&server, &["fast", "slow"]);

    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let plugin = RatePlugin::from_config(&config).unwrap();

    let reply = plugin.handle("usd").await;
    assert!(reply.contains("`$100.00 = ¥710.00`"), "unexpected reply: {reply}");
}

#[test_log::test(tokio::test)]
async fn test_total_outage_reports_api_error() {
    let server = wiremock::MockServer::start().await;
    test_utils::mount(&server, "a", wiremock::ResponseTemplate::new(503), 1).await;
    test_utils::mount(&server, "b", wiremock::ResponseTemplate::new(200).set_body_string("oops"), 1)
        .await;
    let config_file = test_utils::write_config(&server, &["a", "b"]);

    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let plugin = RatePlugin::from_config(&config).unwrap();

    // The first command forces one pass over the pool.
    assert_eq!(plugin.handle("usd").await, xrate::command::API_ERROR);
}

#[test]
fn test_config_without_credentials_is_rejected() {
    let config_file = tempfile::NamedTempFile::new().unwrap();
    fs::write(config_file.path(), "provider:\n  app_ids: []\n").unwrap();

    let err = AppConfig::load_from_path(config_file.path()).unwrap_err();
    assert!(err.to_string().contains("app_ids"));
}
