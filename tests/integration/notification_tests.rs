//! Slack webhook delivery tests

use migration_sql_checker::models::{SlackAttachment, SlackField, SlackPayload};
use migration_sql_checker::services::SlackNotifier;
use migration_sql_checker::CheckerError;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_payload() -> SlackPayload {
    SlackPayload::new("unapplied migration SQL").with_attachment(SlackAttachment {
        title: Some("20230101".to_string()),
        color: Some("danger".to_string()),
        text: Some("20230101_01_cmn_x.sql".to_string()),
        fields: vec![SlackField::short("lkweb_cmn", "20230101_01_cmn_x.sql")],
        mrkdwn_in: vec!["text".to_string(), "fields".to_string()],
    })
}

#[tokio::test]
async fn test_posts_json_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/T/B/X"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "text": "unapplied migration SQL",
            "attachments": [{
                "title": "20230101",
                "color": "danger",
                "text": "20230101_01_cmn_x.sql",
                "fields": [{
                    "title": "lkweb_cmn",
                    "value": "20230101_01_cmn_x.sql",
                    "short": true
                }],
                "mrkdwn_in": ["text", "fields"]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = SlackNotifier::new(format!("{}/services/T/B/X", server.uri()), 5).unwrap();
    notifier.deliver(&sample_payload()).await.unwrap();
}

#[tokio::test]
async fn test_error_status_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no_service"))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = SlackNotifier::new(server.uri(), 5).unwrap();
    let err = notifier.deliver(&sample_payload()).await.unwrap_err();

    match err {
        CheckerError::Notification(message) => {
            assert!(message.contains("404"));
            assert!(message.contains("no_service"));
        }
        other => panic!("expected notification error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_failure() {
    // Nothing listens on port 1
    let notifier = SlackNotifier::new("http://127.0.0.1:1/hook", 2).unwrap();
    let result = notifier.deliver(&sample_payload()).await;

    assert!(matches!(result, Err(CheckerError::Notification(_))));
}
