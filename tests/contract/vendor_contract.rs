use std::sync::Arc;

use sensorbridge_core::{
    CannedHttpClient, HobolinkAdapter, HttpError, HttpResponse, ImonnitAdapter, QueryMode,
    QueryTarget, VendorErrorKind, VendorId, VendorSource,
};

const HOBOLINK_OK: &str = r#"{"observationList":[{"logger_sn":"20581912","serial_sn":"20577501-1","channel_num":2,"data_type":"Temperature","si_value":4.5,"si_unit":"°C"}],"message":"OK"}"#;
const IMONNIT_OK: &str = r#"{"Method":"SensorList","Result":[{"SensorID":77,"SensorName":"Dock door","CurrentReading":"11.5°C"}]}"#;

struct VendorCase {
    id: VendorId,
    mode: QueryMode,
    ok_body: &'static str,
}

fn vendor_cases() -> Vec<VendorCase> {
    vec![
        VendorCase {
            id: VendorId::Hobolink,
            mode: QueryMode::PerDevice,
            ok_body: HOBOLINK_OK,
        },
        VendorCase {
            id: VendorId::Imonnit,
            mode: QueryMode::ListAll,
            ok_body: IMONNIT_OK,
        },
    ]
}

fn source(id: VendorId, client: CannedHttpClient) -> Arc<dyn VendorSource> {
    let client = Arc::new(client);
    match id {
        VendorId::Hobolink => Arc::new(HobolinkAdapter::with_http_client(
            client,
            id.default_server(),
            "user",
            "password",
            "token",
        )),
        VendorId::Imonnit => Arc::new(ImonnitAdapter::with_http_client(
            client,
            id.default_server(),
            "token",
        )),
    }
}

#[tokio::test]
async fn successful_fetch_yields_normalizable_observations_for_all_vendors() {
    for case in vendor_cases() {
        let source = source(case.id, CannedHttpClient::ok_json(case.ok_body));
        assert_eq!(source.id(), case.id);
        assert_eq!(source.query_mode(), case.mode, "vendor '{}': query mode", case.id);

        let raw = source
            .fetch(QueryTarget::All)
            .await
            .unwrap_or_else(|error| panic!("vendor '{}' fetch failed: {error}", case.id));
        assert_eq!(raw.len(), 1, "vendor '{}': observation count", case.id);

        let normalized = source.normalize(&raw[0]);
        assert!(!normalized.tags.is_empty(), "vendor '{}': base tags", case.id);
        assert!(!normalized.groups.is_empty(), "vendor '{}': reading groups", case.id);
        assert!(
            normalized.groups.iter().all(|group| !group.readings.is_empty()),
            "vendor '{}': every group has readings",
            case.id
        );
    }
}

#[tokio::test]
async fn non_success_status_is_reported_with_both_codes_for_all_vendors() {
    for status in [301_u16, 401, 404, 500, 503] {
        for case in vendor_cases() {
            let client = CannedHttpClient::new(Ok(HttpResponse::new(status, "not json at all")));
            let error = source(case.id, client)
                .fetch(QueryTarget::All)
                .await
                .expect_err("non-2xx must fail");

            assert_eq!(
                error.kind(),
                VendorErrorKind::Status {
                    received: status,
                    expected: 200
                },
                "vendor '{}' status {status}",
                case.id
            );
            assert_eq!(error.vendor(), case.id);
            assert!(error.message().contains(&status.to_string()));
        }
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error_for_all_vendors() {
    for case in vendor_cases() {
        let error = source(case.id, CannedHttpClient::ok_json("{\"unexpected\":"))
            .fetch(QueryTarget::All)
            .await
            .expect_err("malformed json must fail");

        assert_eq!(error.kind(), VendorErrorKind::Decode, "vendor '{}'", case.id);
        assert_eq!(error.code(), "vendor.decode");
    }
}

#[tokio::test]
async fn transport_timeout_is_flagged_for_all_vendors() {
    for case in vendor_cases() {
        let client = CannedHttpClient::new(Err(HttpError::timeout("deadline elapsed")));
        let error = source(case.id, client)
            .fetch(QueryTarget::All)
            .await
            .expect_err("timeout must fail");

        assert_eq!(
            error.kind(),
            VendorErrorKind::Transport { timeout: true },
            "vendor '{}'",
            case.id
        );
    }
}

#[tokio::test]
async fn connection_failure_is_a_transport_error_without_timeout_flag() {
    for case in vendor_cases() {
        let client = CannedHttpClient::new(Err(HttpError::connect("connection refused")));
        let error = source(case.id, client)
            .fetch(QueryTarget::All)
            .await
            .expect_err("connect failure must fail");

        assert_eq!(error.kind(), VendorErrorKind::Transport { timeout: false });
        assert_eq!(error.code(), "vendor.transport");
    }
}
