//! Order event, lookup and resync handlers.
//!
//! Writes go to the embedded order store first; the sync pipeline then
//! decides whether the change is worth a webhook delivery.

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::Router;
use bluelena_core::{Attribution, MemoryOrderStore, OrderStore};
use bluelena_sync::{EnqueueReceipt, OrderEvents};

use super::request::{OrderPathParams, ResyncOrders, UpdateOrderStatus, UpsertOrder};
use super::response::{OrderDetails, OrderQueued, OrdersSynced};
use crate::extract::{Json, Path};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for order operations.
const TRACING_TARGET: &str = "bluelena_server::handler::orders";

/// 202 when a sync was queued, 200 otherwise.
fn queued_status(receipt: &Option<EnqueueReceipt>) -> StatusCode {
    match receipt {
        Some(_) => StatusCode::ACCEPTED,
        None => StatusCode::OK,
    }
}

/// Creates or replaces an order.
///
/// A new order emits "order created"; an existing order whose status changed
/// emits "order status changed". The query string is kept as attribution.
#[tracing::instrument(skip_all)]
async fn upsert_order(
    State(orders): State<MemoryOrderStore>,
    State(events): State<OrderEvents>,
    RawQuery(query): RawQuery,
    Json(request): Json<UpsertOrder>,
) -> Result<(StatusCode, Json<OrderQueued>)> {
    let record = request.into_record();
    let order_id = record.id.clone();
    let attribution = Attribution::from_query_string(query.as_deref().unwrap_or_default());

    let previous_status = orders
        .get_order(&order_id)
        .await?
        .map(|previous| previous.status().map(str::to_owned));
    let status_changed = previous_status
        .as_ref()
        .is_some_and(|previous| previous.as_deref() != record.status());

    let created = orders.insert(record).await;

    let receipt = if created {
        events.order_created(order_id.clone(), attribution).await?
    } else if status_changed {
        events
            .order_status_changed(order_id.clone(), attribution)
            .await?
    } else {
        None
    };

    tracing::info!(
        target: TRACING_TARGET,
        %order_id,
        created,
        status_changed,
        queued = receipt.is_some(),
        "Order stored"
    );

    let status = queued_status(&receipt);
    Ok((status, Json(OrderQueued::new(order_id, receipt))))
}

/// Changes the status of an order.
#[tracing::instrument(skip_all)]
async fn update_order_status(
    State(orders): State<MemoryOrderStore>,
    State(events): State<OrderEvents>,
    Path(path_params): Path<OrderPathParams>,
    RawQuery(query): RawQuery,
    Json(request): Json<UpdateOrderStatus>,
) -> Result<(StatusCode, Json<OrderQueued>)> {
    let order_id = path_params.order_id();
    let attribution = Attribution::from_query_string(query.as_deref().unwrap_or_default());

    let Some(previous) = orders.get_order(&order_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!("order {order_id} not found"))
            .with_resource("order"));
    };

    if previous.status() == Some(request.status.as_str()) {
        tracing::debug!(
            target: TRACING_TARGET,
            %order_id,
            status = %request.status,
            "Order status unchanged"
        );
        return Ok((StatusCode::OK, Json(OrderQueued::new(order_id, None))));
    }

    orders
        .update_field(&order_id, "status", request.status.as_str())
        .await?;
    let receipt = events
        .order_status_changed(order_id.clone(), attribution)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        %order_id,
        from = previous.status().unwrap_or_default(),
        to = %request.status,
        queued = receipt.is_some(),
        "Order status changed"
    );

    let status = queued_status(&receipt);
    Ok((status, Json(OrderQueued::new(order_id, receipt))))
}

/// Returns a stored order and its sync annotations.
#[tracing::instrument(skip_all)]
async fn read_order(
    State(orders): State<MemoryOrderStore>,
    Path(path_params): Path<OrderPathParams>,
) -> Result<(StatusCode, Json<OrderDetails>)> {
    let order_id = path_params.order_id();

    let Some(order) = orders.get_order(&order_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!("order {order_id} not found"))
            .with_resource("order"));
    };
    let annotations = orders.annotations(&order_id).await.unwrap_or_default();

    Ok((StatusCode::OK, Json(OrderDetails { order, annotations })))
}

/// Queues the given orders again, whatever the settings say.
#[tracing::instrument(skip_all)]
async fn resync_orders(
    State(events): State<OrderEvents>,
    Json(request): Json<ResyncOrders>,
) -> Result<(StatusCode, Json<OrdersSynced>)> {
    let synced = events.resync(request.into_order_ids()).await?;

    tracing::info!(
        target: TRACING_TARGET,
        synced,
        "Bulk resync requested"
    );

    Ok((StatusCode::OK, Json(OrdersSynced { synced })))
}

/// Returns a [`Router`] with all order related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/orders", post(upsert_order))
        .route("/orders/sync", post(resync_orders))
        .route("/orders/{order_id}", get(read_order))
        .route("/orders/{order_id}/status", patch(update_order_status))
}

#[cfg(test)]
mod tests {
    use bluelena_core::types::{
        ANNOTATION_ERROR, ANNOTATION_RESPONSE_BODY, ANNOTATION_RESPONSE_CODE,
    };
    use bluelena_sync::DrainReport;
    use serde_json::json;

    use super::*;
    use crate::handler::test::create_test_context;

    #[tokio::test]
    async fn test_new_order_is_queued() -> anyhow::Result<()> {
        let (server, _, _) = create_test_context().await?;

        let response = server
            .post("/orders")
            .add_query_param("utm_source", "newsletter")
            .json(&json!({ "id": 1001, "fields": { "status": "processing" } }))
            .await;
        response.assert_status(StatusCode::ACCEPTED);

        let queued = response.json::<OrderQueued>();
        assert!(queued.queued);
        assert_eq!(queued.receipt.map(|r| r.pending), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn test_attribution_reaches_the_webhook() -> anyhow::Result<()> {
        let (server, _, mock) = create_test_context().await?;

        server
            .post("/orders")
            .add_query_param("utm_campaign", "spring")
            .add_query_param("utm_medium", "email")
            .json(&json!({ "id": 1001 }))
            .await
            .assert_status(StatusCode::ACCEPTED);
        server.post("/queue/drain").await.assert_status_ok();

        let body = mock.requests().await[0]
            .payload_json()
            .expect("payload is JSON");
        assert_eq!(body["utm"]["utm_campaign"], "spring");
        assert_eq!(body["utm"]["utm_medium"], "email");
        assert_eq!(body["utm"]["utm_source"], "");

        Ok(())
    }

    #[tokio::test]
    async fn test_unchanged_upsert_is_not_queued() -> anyhow::Result<()> {
        let (server, _, _) = create_test_context().await?;
        let order = json!({ "id": 1001, "fields": { "status": "processing" } });

        server.post("/orders").json(&order).await;
        let response = server.post("/orders").json(&order).await;
        response.assert_status_ok();
        assert!(!response.json::<OrderQueued>().queued);

        let changed = json!({ "id": 1001, "fields": { "status": "completed" } });
        let response = server.post("/orders").json(&changed).await;
        response.assert_status(StatusCode::ACCEPTED);

        Ok(())
    }

    #[tokio::test]
    async fn test_disabled_integration_is_not_queued() -> anyhow::Result<()> {
        let (server, _, _) = create_test_context().await?;

        server
            .put("/settings")
            .json(&json!({ "webhook_url": "https://hooks.example.com/orders", "enabled": false }))
            .await
            .assert_status_ok();

        let response = server.post("/orders").json(&json!({ "id": 1001 })).await;
        response.assert_status_ok();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["queued"], false);
        assert!(body.get("receipt").is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_status_change_of_unknown_order() -> anyhow::Result<()> {
        let (server, _, _) = create_test_context().await?;

        let response = server
            .patch("/orders/404/status")
            .json(&json!({ "status": "completed" }))
            .await;
        response.assert_status_not_found();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "not_found");

        Ok(())
    }

    #[tokio::test]
    async fn test_status_change_is_queued_once() -> anyhow::Result<()> {
        let (server, _, _) = create_test_context().await?;

        server
            .post("/orders")
            .json(&json!({ "id": 1001, "fields": { "status": "processing" } }))
            .await;

        let response = server
            .patch("/orders/1001/status")
            .json(&json!({ "status": "completed" }))
            .await;
        response.assert_status(StatusCode::ACCEPTED);
        assert_eq!(response.json::<OrderQueued>().receipt.map(|r| r.pending), Some(2));

        let response = server
            .patch("/orders/1001/status")
            .json(&json!({ "status": "completed" }))
            .await;
        response.assert_status_ok();

        let order = server.get("/orders/1001").await.json::<OrderDetails>();
        assert_eq!(order.order.status(), Some("completed"));

        Ok(())
    }

    #[tokio::test]
    async fn test_read_order_shows_annotations() -> anyhow::Result<()> {
        let (server, _, _) = create_test_context().await?;

        server.get("/orders/1001").await.assert_status_not_found();

        server.post("/orders").json(&json!({ "id": 1001 })).await;
        let report = server.post("/queue/drain").await.json::<DrainReport>();
        assert_eq!(report.delivered, 1);

        let details = server.get("/orders/1001").await.json::<OrderDetails>();
        assert_eq!(details.annotations[ANNOTATION_RESPONSE_CODE], "200");
        assert_eq!(details.annotations[ANNOTATION_RESPONSE_BODY], r#"{"ok":true}"#);
        assert!(!details.annotations.contains_key(ANNOTATION_ERROR));

        Ok(())
    }

    #[tokio::test]
    async fn test_bulk_resync() -> anyhow::Result<()> {
        let (server, state, mock) = create_test_context().await?;

        server.post("/orders").json(&json!({ "id": 1001 })).await;
        server.post("/orders").json(&json!({ "id": "wc-7" })).await;
        server.post("/queue/drain").await.assert_status_ok();

        let response = server
            .post("/orders/sync")
            .json(&json!({ "order_ids": [1001, "wc-7", "1001"] }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<OrdersSynced>().synced, 3);
        assert_eq!(state.queue.status().await.pending, 3);

        let report = server.post("/queue/drain").await.json::<DrainReport>();
        assert_eq!(report.delivered, 3);
        assert_eq!(mock.delivery_count().await, 5);

        Ok(())
    }
}
