// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP hub client using wiremock.

#![cfg(feature = "http")]

mod common;

use std::sync::Arc;

use common::{bind_all, service};
use fibaro_sync::{
    CharacteristicKind, CharacteristicValue, Checkpoint, ConverterRegistry, HttpHubClient,
    HttpHubConfig, Poller, PollerConfig, RemoteStateClient, ServiceCategory, SubscriptionRegistry,
    TemperatureUnit, TransportError,
};
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpHubClient {
    HttpHubClient::new(server.uri()).unwrap()
}

// ============================================================================
// Change Feed Tests
// ============================================================================

mod refresh_states {
    use super::*;

    #[tokio::test]
    async fn sends_checkpoint_and_decodes_feed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/refreshStates"))
            .and(query_param("last", "1650"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "IDLE",
                "last": 1700,
                "changes": [
                    {"id": 7, "value": "75"},
                    {"id": 12, "color": "255,0,0,0"}
                ],
                "timestamp": 1_700_000_000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .refresh_states(Checkpoint::new(1650))
            .await
            .unwrap();

        assert_eq!(response.last, Some(Checkpoint::new(1700)));
        assert_eq!(response.changes.len(), 2);
        assert_eq!(response.changes[1].color.as_deref(), Some("255,0,0,0"));
    }

    #[tokio::test]
    async fn missing_changes_is_empty_feed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/refreshStates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "last": 5
            })))
            .mount(&server)
            .await;

        let response = client_for(&server)
            .refresh_states(Checkpoint::BEGINNING)
            .await
            .unwrap();
        assert!(response.changes.is_empty());
        assert_eq!(response.last, Some(Checkpoint::new(5)));
    }

    #[tokio::test]
    async fn bad_request_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/refreshStates"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .refresh_states(Checkpoint::new(99))
            .await
            .unwrap_err();
        assert!(err.is_bad_request());
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn server_error_is_not_bad_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .refresh_states(Checkpoint::BEGINNING)
            .await
            .unwrap_err();
        assert!(!err.is_bad_request());
        assert!(matches!(err, TransportError::Status(503)));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .refresh_states(Checkpoint::BEGINNING)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn credentials_are_sent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(basic_auth("admin", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "last": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).with_credentials("admin", "secret");
        client.refresh_states(Checkpoint::BEGINNING).await.unwrap();
    }
}

// ============================================================================
// Global Variable Tests
// ============================================================================

mod global_variables {
    use super::*;

    #[tokio::test]
    async fn name_is_url_encoded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/globalVariables/Garden%20Lights"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Garden Lights",
                "value": "true"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let variable = client_for(&server)
            .get_global_variable("Garden Lights")
            .await
            .unwrap();
        assert_eq!(variable.name.as_deref(), Some("Garden Lights"));
        assert_eq!(variable.value, "true");
    }

    #[tokio::test]
    async fn numeric_value_is_read_as_text() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/globalVariables/Hall"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": 42
            })))
            .mount(&server)
            .await;

        let variable = client_for(&server).get_global_variable("Hall").await.unwrap();
        assert_eq!(variable.value, "42");
    }

    #[tokio::test]
    async fn unknown_variable_is_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_global_variable("Nope")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}

// ============================================================================
// Poller over HTTP
// ============================================================================

mod end_to_end {
    use super::*;

    #[tokio::test]
    async fn fahrenheit_hub_cycle() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/refreshStates"))
            .and(query_param("last", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "last": 1700,
                "changes": [{"id": 7, "value": 75}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/globalVariables/SecuritySystem"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": "AwayArmed"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sensor = service(
            "Porch",
            ServiceCategory::TemperatureSensor,
            &[CharacteristicKind::CurrentTemperature],
        );
        let mut registry = SubscriptionRegistry::new();
        bind_all(&mut registry, 7, "value", &sensor);

        let client = HttpHubConfig::new(server.address().ip().to_string())
            .with_port(server.address().port())
            .into_client()
            .unwrap();
        let poller = Poller::new(
            client,
            Arc::new(registry),
            Arc::new(ConverterRegistry::with_defaults()),
            PollerConfig::new()
                .with_temperature_unit(TemperatureUnit::Fahrenheit)
                .with_security_system(true),
        );

        let report = poller.poll().await.unwrap();
        assert!(!report.fetch_failed);
        assert_eq!(poller.checkpoint(), Checkpoint::new(1700));

        let CharacteristicValue::Float(celsius) = sensor
            .characteristic(CharacteristicKind::CurrentTemperature)
            .unwrap()
            .value()
        else {
            panic!("temperature should be a float");
        };
        assert!((celsius - 23.89).abs() < 0.005);
    }

    #[tokio::test]
    async fn rejected_checkpoint_triggers_resync() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/refreshStates"))
            .and(query_param("last", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "last": 1700,
                "changes": []
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/refreshStates"))
            .and(query_param("last", "1700"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let poller = Poller::new(
            client_for(&server),
            Arc::new(SubscriptionRegistry::new()),
            Arc::new(ConverterRegistry::with_defaults()),
            PollerConfig::new(),
        );

        poller.poll().await.unwrap();
        assert_eq!(poller.checkpoint(), Checkpoint::new(1700));

        let report = poller.poll().await.unwrap();
        assert!(report.resynced);
        assert_eq!(poller.checkpoint(), Checkpoint::BEGINNING);

        poller.poll().await.unwrap();
        assert_eq!(poller.checkpoint(), Checkpoint::new(1700));
    }
}
