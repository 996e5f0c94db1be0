//! Weather integration tests
//!
//! Tests for the upstream client and the dashboard aggregator:
//! - Request shape, error mapping and tolerant parsing against a mock provider
//! - Partial-failure behavior when assembling a dashboard snapshot

mod common;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use common::{dec, forecast_days, location, sample_reading, FakeProvider};
use farm_weather_backend::error::{AppError, UNKNOWN_TRANSPORT_ERROR};
use farm_weather_backend::external::{WeatherClient, WeatherProvider};
use farm_weather_backend::services::WeatherService;
use mockito::Matcher;

const CURRENT_BODY: &str = r#"{
    "location": {"name": "Nakuru", "region": "Nakuru", "country": "Kenya",
                 "lat": -0.28, "lon": 36.07, "tz_id": "Africa/Nairobi",
                 "localtime": "2024-06-01 14:45"},
    "current": {"last_updated": "2024-06-01 14:30", "temp_c": 22.5, "feelslike_c": 23.4,
                "is_day": 1,
                "condition": {"text": "Partly cloudy", "icon": "//cdn/116.png", "code": 1003},
                "wind_kph": 14.4, "wind_dir": "ENE", "humidity": 48,
                "precip_mm": 0.02, "uv": 7.0}
}"#;

const FORECAST_BODY: &str = r#"{
    "location": {"name": "Nakuru"},
    "forecast": {"forecastday": [
        {"date": "2024-06-01", "day": {"maxtemp_c": 27.1, "mintemp_c": 13.9, "avgtemp_c": 20.2,
         "maxwind_kph": 18.0, "totalprecip_mm": 3.4, "avghumidity": 66,
         "daily_chance_of_rain": 84, "condition": {"text": "Patchy rain nearby",
         "icon": "//cdn/176.png", "code": 1063}, "uv": 6.0}},
        {"date": "2024-06-02", "day": {"maxtemp_c": 26.0, "mintemp_c": 12.5, "avgtemp_c": 19.0,
         "maxwind_kph": 12.0, "totalprecip_mm": 0.0, "avghumidity": 58,
         "daily_chance_of_rain": 0, "condition": {"text": "Sunny",
         "icon": "//cdn/113.png", "code": 1000}, "uv": 8.0}}
    ]},
    "alerts": {"alert": []}
}"#;

fn client_for(server: &mockito::Server) -> WeatherClient {
    WeatherClient::new(server.url(), "test-key".to_string(), Duration::from_secs(5)).unwrap()
}

// ============================================================================
// Upstream Client Tests
// ============================================================================

#[cfg(test)]
mod client_tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_current_sends_key_and_location() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/current.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "test-key".into()),
                Matcher::UrlEncoded("q".into(), "Nakuru".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(CURRENT_BODY)
            .create_async()
            .await;

        let reading = client_for(&server)
            .fetch_current(&location("Nakuru"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reading.location.name, "Nakuru");
        assert_eq!(reading.conditions.temperature_celsius, dec("22.5"));
        assert_eq!(reading.conditions.humidity_percent, 48);
        assert_eq!(reading.conditions.last_updated, "2024-06-01 14:30");
    }

    #[tokio::test]
    async fn test_fetch_forecast_requests_alerts_without_aqi() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/forecast.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Chiang Mai".into()),
                Matcher::UrlEncoded("days".into(), "5".into()),
                Matcher::UrlEncoded("alerts".into(), "yes".into()),
                Matcher::UrlEncoded("aqi".into(), "no".into()),
            ]))
            .with_status(200)
            .with_body(FORECAST_BODY)
            .create_async()
            .await;

        let days = client_for(&server)
            .fetch_forecast(&location("Chiang Mai"), 5)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].total_precipitation_mm, dec("3.4"));
        assert_eq!(days[1].chance_of_rain_percent, 0);
    }

    #[tokio::test]
    async fn test_forecast_days_are_clamped() {
        let mut server = mockito::Server::new_async().await;
        let upper = server
            .mock("GET", "/forecast.json")
            .match_query(Matcher::UrlEncoded("days".into(), "7".into()))
            .with_status(200)
            .with_body(FORECAST_BODY)
            .create_async()
            .await;
        let lower = server
            .mock("GET", "/forecast.json")
            .match_query(Matcher::UrlEncoded("days".into(), "1".into()))
            .with_status(200)
            .with_body(FORECAST_BODY)
            .create_async()
            .await;

        let client = client_for(&server);
        client.fetch_forecast(&location("Nakuru"), 30).await.unwrap();
        client.fetch_forecast(&location("Nakuru"), 0).await.unwrap();

        upper.assert_async().await;
        lower.assert_async().await;
    }

    #[tokio::test]
    async fn test_upstream_error_keeps_provider_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/current.json")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error": {"code": 1006, "message": "No matching location found."}}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch_current(&location("Atlantis"))
            .await
            .unwrap_err();

        assert_eq!(err.upstream_message(), Some("No matching location found."));
        match err {
            AppError::WeatherUpstream {
                status, message, ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Failed to fetch current weather (HTTP 400)");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upstream_error_without_json_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/alerts.json")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("<html>Service Unavailable</html>")
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch_alerts(&location("Nakuru"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::WeatherUpstream { status: 503, .. }));
        assert_eq!(err.upstream_message(), None);
    }

    #[tokio::test]
    async fn test_unreadable_body_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/current.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch_current(&location("Nakuru"))
            .await
            .unwrap_err();

        match err {
            AppError::WeatherTransport(message) => {
                assert!(message.starts_with("Failed to parse current weather response"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_alerts_block_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/alerts.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"location": {"name": "Nakuru"}}"#)
            .create_async()
            .await;

        let alerts = client_for(&server)
            .fetch_alerts(&location("Nakuru"))
            .await
            .unwrap();

        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_error() {
        let client = WeatherClient::new(
            "http://127.0.0.1:1".to_string(),
            "secret-key".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.fetch_current(&location("Nakuru")).await.unwrap_err();

        match err {
            AppError::WeatherTransport(message) => {
                assert!(!message.trim().is_empty());
                assert!(!message.contains("secret-key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stalled_provider_times_out() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/current.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(3));
                w.write_all(CURRENT_BODY.as_bytes())
            })
            .create_async()
            .await;

        let client =
            WeatherClient::new(server.url(), "test-key".to_string(), Duration::from_secs(1))
                .unwrap();
        let started = std::time::Instant::now();
        let err = client.fetch_current(&location("Nakuru")).await.unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(3));
        match err {
            AppError::WeatherTransport(message) => {
                assert_eq!(message, "Timed out after 1s fetching current weather");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_transport_message_falls_back() {
        let err = AppError::transport("   ");
        assert_eq!(err.to_string(), UNKNOWN_TRANSPORT_ERROR);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = WeatherClient::new(
            "https://api.weatherapi.com/v1/".to_string(),
            String::new(),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(client.base_url(), "https://api.weatherapi.com/v1");
    }
}

// ============================================================================
// Dashboard Aggregator Tests
// ============================================================================

#[cfg(test)]
mod aggregator_tests {
    use super::*;

    fn service(provider: FakeProvider) -> WeatherService {
        WeatherService::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn test_snapshot_shows_next_four_days() {
        let provider = Arc::new(FakeProvider::healthy());
        let service = WeatherService::new(provider.clone());

        let snapshot = service
            .get_dashboard_weather(&location("Nakuru"))
            .await
            .unwrap();

        assert_eq!(provider.requested_days(), vec![5]);
        let conditions: Vec<&str> = snapshot
            .forecast
            .iter()
            .map(|d| d.condition.as_str())
            .collect();
        assert_eq!(conditions, vec!["Day 1", "Day 2", "Day 3", "Day 4"]);
        assert_eq!(snapshot.alerts.len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_rounds_current_values() {
        let snapshot = service(FakeProvider::healthy())
            .get_dashboard_weather(&location("Nakuru"))
            .await
            .unwrap();

        assert_eq!(snapshot.current.temperature, 23);
        assert_eq!(snapshot.current.feels_like, 23);
        assert_eq!(snapshot.current.wind_speed, 14);
        assert_eq!(snapshot.current.humidity, 48);
        assert_eq!(snapshot.current.precipitation, dec("0.02"));
        assert_eq!(snapshot.last_updated, sample_reading().conditions.last_updated);
        assert_eq!(snapshot.location.unwrap().name, "Nakuru");
    }

    #[tokio::test]
    async fn test_short_forecast_is_not_padded() {
        let provider = FakeProvider {
            forecast: Some(forecast_days(2, "22", "65", "2")),
            ..FakeProvider::healthy()
        };

        let snapshot = service(provider)
            .get_dashboard_weather(&location("Nakuru"))
            .await
            .unwrap();

        assert_eq!(snapshot.forecast.len(), 1);
        assert_eq!(snapshot.forecast[0].condition, "Day 1");
    }

    #[tokio::test]
    async fn test_current_failure_fails_snapshot() {
        let provider = FakeProvider {
            current: None,
            ..FakeProvider::healthy()
        };

        let err = service(provider)
            .get_dashboard_weather(&location("Nakuru"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::WeatherTransport(_)));
    }

    #[tokio::test]
    async fn test_current_not_found_fails_snapshot_despite_other_data() {
        let provider = FakeProvider {
            current: None,
            current_status: Some(404),
            ..FakeProvider::healthy()
        };

        let err = service(provider)
            .get_dashboard_weather(&location("Atlantis"))
            .await
            .unwrap_err();

        match err {
            AppError::WeatherUpstream {
                status,
                message,
                upstream_message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Failed to fetch current weather (HTTP 404)");
                assert_eq!(upstream_message.as_deref(), Some("No matching location found."));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_forecast_failure_gives_empty_forecast() {
        let provider = FakeProvider {
            forecast: None,
            ..FakeProvider::healthy()
        };

        let snapshot = service(provider)
            .get_dashboard_weather(&location("Nakuru"))
            .await
            .unwrap();

        assert!(snapshot.forecast.is_empty());
        assert_eq!(snapshot.alerts.len(), 1);
    }

    #[tokio::test]
    async fn test_alerts_failure_gives_empty_alerts() {
        let provider = FakeProvider {
            alerts: None,
            ..FakeProvider::healthy()
        };

        let snapshot = service(provider)
            .get_dashboard_weather(&location("Nakuru"))
            .await
            .unwrap();

        assert!(snapshot.alerts.is_empty());
        assert_eq!(snapshot.forecast.len(), 4);
    }

    #[tokio::test]
    async fn test_outlook_requires_forecast() {
        let provider = FakeProvider {
            forecast: Some(Vec::new()),
            ..FakeProvider::healthy()
        };

        let err = service(provider)
            .get_farming_outlook(&location("Nakuru"), 7)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InsufficientForecast));
    }

    #[tokio::test]
    async fn test_outlook_uses_whole_forecast() {
        let provider = Arc::new(FakeProvider {
            forecast: Some(forecast_days(7, "22", "65", "2")),
            ..FakeProvider::healthy()
        });
        let service = WeatherService::new(provider.clone());

        let outlook = service
            .get_farming_outlook(&location("Nakuru"), 7)
            .await
            .unwrap();

        assert_eq!(provider.requested_days(), vec![7]);
        assert_eq!(outlook.forecast_days, 7);
        assert_eq!(outlook.aggregates.total_rainfall, dec("14"));
        assert_eq!(outlook.aggregates.avg_humidity, dec("65"));
        assert!(outlook.insights.is_good_for_planting);
    }
}
