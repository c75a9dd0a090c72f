//! End-to-end request cycles against a mocked Open-Meteo endpoint.

use meteo_core::{ClickEvent, CycleOutcome, FetchError, OpenMeteoClient, Session};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_forecast(days: usize, hours: usize) -> serde_json::Value {
    let daily_time: Vec<String> = (1..=days).map(|d| format!("2024-03-{d:02}")).collect();
    let hourly_time: Vec<String> =
        (0..hours).map(|h| format!("2024-03-{:02}T{:02}:00", 1 + h / 24, h % 24)).collect();
    let temperature: Vec<f64> = (0..hours).map(|h| 8.0 + h as f64 * 0.1).collect();

    json!({
        "latitude": 35.7,
        "longitude": 139.625,
        "timezone": "Asia/Tokyo",
        "hourly_units": { "temperature_2m": "°C", "precipitation": "mm", "windspeed_10m": "km/h" },
        "hourly": {
            "time": hourly_time,
            "temperature_2m": temperature,
            "precipitation": vec![0.0; hours],
            "weathercode": vec![2; hours],
            "windspeed_10m": vec![5.4; hours],
        },
        "daily": {
            "time": daily_time,
            "temperature_2m_max": vec![14.2; days],
            "temperature_2m_min": vec![4.1; days],
            "precipitation_sum": vec![0.3; days],
        }
    })
}

fn session_for(server: &MockServer) -> Session {
    let client = OpenMeteoClient::with_base_url(format!("{}/v1/forecast", server.uri())).unwrap();
    Session::new(Box::new(client))
}

#[tokio::test]
async fn tokyo_click_produces_tables_sized_by_time_sequences() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "35.6762"))
        .and(query_param("longitude", "139.6503"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast(7, 168)))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.click(ClickEvent {
        lat: 35.6762,
        lng: 139.6503,
    });

    let CycleOutcome::Ready(view) = session.run_cycle().await else {
        panic!("expected a successful cycle");
    };

    assert_eq!(view.daily.len(), 7);
    assert_eq!(view.hourly.len(), 168);
    assert_eq!(view.coordinate.to_string(), "latitude 35.6762, longitude 139.6503");
    assert!(view.hourly.rows().windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[tokio::test]
async fn server_error_fails_the_cycle_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "-33.8688"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "51.5074"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast(2, 5)))
        .mount(&server)
        .await;

    let mut session = session_for(&server);

    session.click(ClickEvent {
        lat: -33.8688,
        lng: 151.2093,
    });
    match session.run_cycle().await {
        CycleOutcome::Failed { error: FetchError::Status { status, .. }, .. } => {
            assert_eq!(status, 500);
        }
        other => panic!("expected HTTP 500 failure, got {other:?}"),
    }

    session.click(ClickEvent {
        lat: 51.5074,
        lng: -0.1278,
    });
    let CycleOutcome::Ready(view) = session.run_cycle().await else {
        panic!("a later click should still succeed");
    };
    assert_eq!(view.daily.len(), 2);
    assert_eq!(view.hourly.len(), 5);
}
