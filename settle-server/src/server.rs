//! Axum server setup and router configuration.

use crate::api;
use crate::state::AppState;
use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;
use settle_sdk::link::PAYMENT_PATH;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the main application router.
///
/// The success view is mounted at the configured `merchant.success_path`,
/// which is where the default redirect points. Reloads keep that path.
pub fn build_router(state: AppState) -> Router {
    let success_path = state.config.merchant.get().success_path;

    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Checkout link target and success view
        .route(PAYMENT_PATH, get(api::pages::payment_demo))
        .route(&success_path, get(api::pages::payment_success))
        // JSON API
        .nest("/api/v1", api::router())
        // Add state to all routes
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Simple health check - returns OK if the server is running.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run the server until `shutdown` completes, then drain connections.
pub async fn run_server(
    router: Router,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    serve(listener, router, shutdown).await
}

/// Serve on an already bound listener with graceful shutdown.
///
/// Open WebSocket streams only end once their session is closed, so the
/// session reaper has to observe the same shutdown for the drain to finish.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use futures_util::StreamExt;
    use rust_decimal::Decimal;
    use settle_core::config::{MerchantConfig, ServerConfig, SharedConfig, SimulatorConfig};
    use settle_core::events::SessionEvent;
    use settle_core::session::SessionReaper;
    use settle_sdk::objects::ws::WsServerMessage;
    use settle_sdk::objects::{
        CheckoutSessionResponse, DashboardStats, MockTransaction, PaymentStatus, QuoteResponse,
        SettlementSummary, TokenListing,
    };
    use std::time::Duration;
    use tokio::sync::watch;
    use tokio_tungstenite::tungstenite::Message as WsMessage;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(SharedConfig::new(
            ServerConfig {
                listen: "127.0.0.1:0".parse().unwrap(),
                public_base_url: "https://pay.example.com".parse().unwrap(),
            },
            SimulatorConfig::default(),
            MerchantConfig::new("Demo Store".into(), "pk_demo".into()),
        ))
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_owned())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(router: &Router, uri: &str) -> T {
        let (status, body) = send(router, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));
        serde_json::from_slice(&body).unwrap()
    }

    async fn post_json<T: serde::de::DeserializeOwned>(router: &Router, uri: &str, body: &str) -> T {
        let (status, body) = send(router, Method::POST, uri, Some(body)).await;
        assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let router = build_router(test_state());
        let body: serde_json::Value = get_json(&router, "/health").await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_catalog_and_quote() {
        let router = build_router(test_state());

        let tokens: Vec<TokenListing> = get_json(&router, "/api/v1/tokens").await;
        assert_eq!(tokens.len(), 5);

        let chains: serde_json::Value = get_json(&router, "/api/v1/chains").await;
        assert_eq!(chains.as_array().unwrap().len(), 5);
        assert_eq!(chains[4]["id"], "avalanche");
        assert_eq!(chains[4]["native_symbol"], "AVAX");

        let quote: QuoteResponse = get_json(&router, "/api/v1/quote?amount=150&token=ETH").await;
        assert_eq!(quote.display, "0.061224 ETH");
        assert_eq!(quote.rate.as_deref(), Some("1 ETH = $2450.00"));

        let quote: QuoteResponse = get_json(&router, "/api/v1/quote?amount=150&token=DOGE").await;
        assert_eq!(quote.crypto_amount, Decimal::ZERO);
        assert_eq!(quote.rate, None);

        let quote: QuoteResponse = get_json(&router, "/api/v1/quote").await;
        assert_eq!(quote.usd_amount, Decimal::new(150, 0));
        assert_eq!(quote.token, "ETH");
    }

    #[tokio::test]
    async fn test_invoice_link_opens_checkout() {
        let router = build_router(test_state());

        let invoice: serde_json::Value = post_json(
            &router,
            "/api/v1/invoices",
            r#"{"amount":"99.50","orderId":"ORDER-1001","token":"USDC","chain":"polygon"}"#,
        )
        .await;
        let payment_url = invoice["paymentUrl"].as_str().unwrap();
        assert_eq!(
            payment_url,
            "https://pay.example.com/payment-demo?amount=99.5&orderId=ORDER-1001&token=USDC&chain=polygon&pk=pk_demo"
        );

        let path_and_query = payment_url.trim_start_matches("https://pay.example.com");
        let session: CheckoutSessionResponse = get_json(&router, path_and_query).await;
        assert_eq!(session.order_id, "ORDER-1001");
        assert_eq!(session.usd_amount, Decimal::new(995, 1));
        assert_eq!(session.crypto_display, "99.500000 USDC");
        assert_eq!(session.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_payment_demo_defaults() {
        let router = build_router(test_state());
        let session: CheckoutSessionResponse =
            get_json(&router, "/payment-demo?amount=abc&token=DOGE&chain=bitcoin").await;
        assert_eq!(session.usd_amount, Decimal::ZERO);
        assert_eq!(session.crypto_display, "0.000000 DOGE");
        assert_eq!(session.description, "Demo Store Purchase");
        assert_eq!(session.currency, "USD");
        assert!(session.order_id.starts_with("DEMO-"));

        let session: CheckoutSessionResponse = get_json(&router, "/payment-demo").await;
        assert_eq!(session.usd_amount, Decimal::new(150, 0));
        assert_eq!(session.token, "ETH");
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_lifecycle() {
        let router = build_router(test_state());
        let session: CheckoutSessionResponse =
            get_json(&router, "/payment-demo?amount=150&orderId=ORDER-7").await;
        let base = format!("/api/v1/checkout/{}", session.session_id);

        let selected: CheckoutSessionResponse = post_json(
            &router,
            &format!("{base}/selection"),
            r#"{"token":"SOL","chain":"solana"}"#,
        )
        .await;
        assert_eq!(selected.crypto_display, "1.153846 SOL");
        assert_ne!(selected.payment_address, session.payment_address);

        let started: CheckoutSessionResponse =
            post_json(&router, &format!("{base}/simulate"), "").await;
        assert!(started.simulating);

        let (status, _) = send(&router, Method::POST, &format!("{base}/simulate"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, _) = send(
            &router,
            Method::POST,
            &format!("{base}/selection"),
            Some(r#"{"token":"ETH"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, _) = send(&router, Method::GET, &format!("{base}/summary"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        tokio::time::sleep(Duration::from_secs(8)).await;
        let confirmed: CheckoutSessionResponse = get_json(&router, &base).await;
        assert_eq!(confirmed.status, PaymentStatus::Confirmed);

        let summary: SettlementSummary = get_json(&router, &format!("{base}/summary")).await;
        assert_eq!(summary.customer_payment, "1.153846 SOL on Solana");
        assert_eq!(summary.settlement_display, "150.000000 USDC");
        let success: SettlementSummary = get_json(
            &router,
            &format!("/payment-success?session={}", session.session_id),
        )
        .await;
        assert_eq!(success, summary);

        let reset: CheckoutSessionResponse =
            post_json(&router, &format!("{base}/reset"), "").await;
        assert_eq!(reset.status, PaymentStatus::Pending);

        let (status, _) = send(&router, Method::DELETE, &base, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&router, Method::GET, &base, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_view_follows_configured_path() {
        let state = test_state();
        state.config.merchant.update(MerchantConfig {
            success_path: "/done".into(),
            ..MerchantConfig::new("Demo Store".into(), "pk_demo".into())
        });
        let router = build_router(state.clone());
        let mut events = state.sessions.subscribe();

        let session: CheckoutSessionResponse = get_json(&router, "/payment-demo?amount=150").await;
        let session_id = session.session_id;
        post_json::<CheckoutSessionResponse>(
            &router,
            &format!("/api/v1/checkout/{session_id}/simulate"),
            "",
        )
        .await;

        let location = loop {
            match events.recv().await.unwrap() {
                SessionEvent::Redirect { location, .. } => break location,
                SessionEvent::Closed { .. } => panic!("session closed before redirect"),
                SessionEvent::StatusChanged { .. } => continue,
            }
        };
        assert_eq!(location, format!("/done?session={session_id}"));

        let summary: SettlementSummary = get_json(&router, &location).await;
        assert_eq!(summary.order_id, session.order_id);

        let (status, _) = send(
            &router,
            Method::GET,
            &format!("/payment-success?session={session_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let router = build_router(test_state());
        let (status, _) = send(
            &router,
            Method::GET,
            &format!("/api/v1/checkout/{}", uuid::Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, Method::GET, "/api/v1/checkout/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_merchant_ledger() {
        let router = build_router(test_state());
        let all: Vec<MockTransaction> = get_json(&router, "/api/v1/merchant/transactions").await;
        assert_eq!(all.len(), 3);
        let processing: Vec<MockTransaction> =
            get_json(&router, "/api/v1/merchant/transactions?status=processing").await;
        assert_eq!(processing.len(), 1);
        let stats: DashboardStats = get_json(&router, "/api/v1/merchant/stats").await;
        assert_eq!(stats.total_volume_display, "$45,623.45");
    }

    async fn spawn_server(state: AppState) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        addr
    }

    fn next_message(msg: WsMessage) -> WsServerMessage {
        match msg {
            WsMessage::Text(text) => serde_json::from_str(&text).unwrap(),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ws_stream_to_redirect() {
        let state = test_state();
        state.config.simulator.update(SimulatorConfig {
            timings: settle_core::simulator::SimulationTimings {
                detect_after: Duration::from_millis(30),
                confirm_after: Duration::from_millis(30),
                redirect_after: Duration::from_millis(30),
            },
            ..SimulatorConfig::default()
        });
        let addr = spawn_server(state.clone()).await;
        let router = build_router(state.clone());

        let session: CheckoutSessionResponse = get_json(&router, "/payment-demo?amount=150").await;
        let session_id = session.session_id;

        let url = format!("ws://{addr}/api/v1/checkout/{session_id}/ws");
        let (mut stream, _) = tokio_tungstenite::connect_async(url).await.unwrap();

        match next_message(stream.next().await.unwrap().unwrap()) {
            WsServerMessage::StatusUpdate { session } => {
                assert_eq!(session.status, PaymentStatus::Pending);
            }
            other => panic!("unexpected first frame {other:?}"),
        }

        post_json::<CheckoutSessionResponse>(
            &router,
            &format!("/api/v1/checkout/{session_id}/simulate"),
            "",
        )
        .await;

        let mut statuses = Vec::new();
        let location = loop {
            match next_message(stream.next().await.unwrap().unwrap()) {
                WsServerMessage::StatusUpdate { session } => statuses.push(session.status),
                WsServerMessage::Redirect { location } => break location,
                WsServerMessage::Error { code, reason } => panic!("error {code}: {reason}"),
            }
        };
        assert_eq!(statuses, vec![PaymentStatus::Detected, PaymentStatus::Confirmed]);
        assert_eq!(location, format!("/payment-success?session={session_id}"));

        match stream.next().await {
            Some(Ok(WsMessage::Close(Some(frame)))) => assert_eq!(u16::from(frame.code), 1000),
            other => panic!("expected close frame, got {other:?}"),
        }

        // A finished run keeps its session for the success view.
        let summary: SettlementSummary = get_json(
            &router,
            &format!("/payment-success?session={session_id}"),
        )
        .await;
        assert_eq!(summary.processing_time, "0:00");
    }

    #[tokio::test]
    async fn test_ws_disconnect_closes_session() {
        let state = test_state();
        let addr = spawn_server(state.clone()).await;
        let router = build_router(state.clone());

        let session: CheckoutSessionResponse = get_json(&router, "/payment-demo").await;
        let session_id = session.session_id;
        let url = format!("ws://{addr}/api/v1/checkout/{session_id}/ws");
        let (mut stream, _) = tokio_tungstenite::connect_async(url).await.unwrap();
        stream.next().await.unwrap().unwrap();
        stream.close(None).await.unwrap();

        for _ in 0..50 {
            if state.sessions.is_empty().await {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("session was not closed after the client left");
    }

    #[tokio::test]
    async fn test_sdk_client_round_trip() {
        use settle_sdk::client::SettleClient;
        use settle_sdk::link::CheckoutOptions;
        use settle_sdk::objects::SelectPaymentOption;

        let state = test_state();
        state.config.simulator.update(SimulatorConfig {
            timings: settle_core::simulator::SimulationTimings {
                detect_after: Duration::from_millis(20),
                confirm_after: Duration::from_millis(20),
                redirect_after: Duration::from_millis(20),
            },
            ..SimulatorConfig::default()
        });
        let addr = spawn_server(state).await;
        let client = SettleClient::new(format!("http://{addr}").parse().unwrap());

        let invoice = client
            .create_invoice(&CheckoutOptions {
                redirect_url: Some("https://shop.example.com/thanks".into()),
                ..CheckoutOptions::new(Decimal::new(2450, 0), "ORDER-55")
            })
            .await
            .unwrap();
        let session = client.open_checkout(&invoice.payment_url).await.unwrap();
        assert_eq!(session.crypto_display, "1.000000 ETH");

        let session = client
            .select(
                session.session_id,
                &SelectPaymentOption {
                    token: Some("MATIC".into()),
                    chain: Some(settle_sdk::catalog::Chain::Polygon),
                },
            )
            .await
            .unwrap();
        assert_eq!(session.token, "MATIC");

        let mut watcher = client.watch(session.session_id).await.unwrap();
        assert!(matches!(
            watcher.next().await,
            Some(Ok(WsServerMessage::StatusUpdate { .. }))
        ));
        client.simulate(session.session_id).await.unwrap();

        let location = loop {
            match watcher.next().await {
                Some(Ok(WsServerMessage::Redirect { location })) => break location,
                Some(Ok(_)) => continue,
                other => panic!("stream ended early: {other:?}"),
            }
        };
        assert_eq!(location, "https://shop.example.com/thanks");

        let summary = client.summary(session.session_id).await.unwrap();
        assert_eq!(summary.order_id, "ORDER-55");
        assert_eq!(summary.amount, "$2,450.00");

        let transactions = client.transactions(Some("Settled")).await.unwrap();
        assert_eq!(transactions.len(), 2);

        client.close(session.session_id).await.unwrap();
        assert!(client.get_session(session.session_id).await.is_err());
    }

    #[tokio::test]
    async fn test_shutdown_closes_live_ws() {
        let state = test_state();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let reaper = tokio::spawn(
            SessionReaper::new(
                state.sessions.clone(),
                state.config.simulator.clone(),
                shutdown_rx.clone(),
            )
            .run(),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut server_rx = shutdown_rx;
        let server = tokio::spawn(serve(listener, build_router(state.clone()), async move {
            let _ = server_rx.wait_for(|stop| *stop).await;
        }));

        let router = build_router(state.clone());
        let session: CheckoutSessionResponse = get_json(&router, "/payment-demo").await;
        let url = format!("ws://{addr}/api/v1/checkout/{}/ws", session.session_id);
        let (mut stream, _) = tokio_tungstenite::connect_async(url).await.unwrap();
        stream.next().await.unwrap().unwrap();

        shutdown_tx.send(true).unwrap();

        match stream.next().await {
            Some(Ok(WsMessage::Close(Some(frame)))) => {
                assert_eq!(u16::from(frame.code), 1001);
                assert_eq!(frame.reason, "shutdown");
            }
            other => panic!("expected close frame, got {other:?}"),
        }
        drop(stream);

        reaper.await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert!(state.sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_ws_unknown_session() {
        let addr = spawn_server(test_state()).await;
        let url = format!("ws://{addr}/api/v1/checkout/{}/ws", uuid::Uuid::new_v4());
        let (mut stream, _) = tokio_tungstenite::connect_async(url).await.unwrap();

        match next_message(stream.next().await.unwrap().unwrap()) {
            WsServerMessage::Error { code, .. } => assert_eq!(code, 4004),
            other => panic!("unexpected frame {other:?}"),
        }
    }
}
