mod common;

use bazaar_actions::{ErrorKind, Settings, ADMIN_ORDERS_KEY};
use bazaar_auth::AdminSession;
use bazaar_commerce::checkout::{Cart, CartLine, Order, OrderStatus};
use bazaar_commerce::contact::{ContactForm, ContactMessage, MessageStatus};
use bazaar_commerce::Money;
use bazaar_store::DocumentStoreExt;
use chrono::{Duration, Utc};
use common::{checkout_form, product, Fixture, ADMIN_PASSWORD};

async fn place(fx: &Fixture, rupees: i64) -> String {
    let item = fx.add_product(product("Item", rupees, 50)).await;
    let cart: Cart = vec![CartLine::product(&item, 1)].into_iter().collect();
    let result = fx.shop.place_order(&checkout_form(), &cart).await;
    assert!(result.success, "{}", result.message);
    result.data.unwrap().order_id.into_inner()
}

#[test]
fn login_requires_the_configured_password() {
    let fx = Fixture::new();

    let wrong = fx.shop.admin_login("guess");
    assert!(!wrong.success);
    assert_eq!(wrong.error, Some(ErrorKind::Unauthorized));

    let right = fx.shop.admin_login(ADMIN_PASSWORD);
    assert!(right.success);
    assert!(right.data.is_some());
}

#[test]
fn login_fails_without_a_configured_password() {
    let fx = Fixture::with_settings(Settings::default());

    let result = fx.shop.admin_login("");
    assert!(!result.success);
    assert_eq!(result.error, Some(ErrorKind::Unauthorized));
}

#[tokio::test]
async fn protected_operations_reject_missing_or_unknown_tokens() {
    let fx = Fixture::new();
    let order_id = place(&fx, 100).await;

    for token in [None, Some(""), Some("forged-token")] {
        let orders = fx.shop.list_orders(token).await;
        assert_eq!(orders.error, Some(ErrorKind::Unauthorized));
        assert!(orders.data.is_none());

        let status = fx
            .shop
            .update_order_status(token, &order_id, OrderStatus::Shipped)
            .await;
        assert_eq!(status.error, Some(ErrorKind::Unauthorized));

        assert_eq!(
            fx.shop.list_messages(token).await.error,
            Some(ErrorKind::Unauthorized)
        );
        assert_eq!(
            fx.shop.dashboard(token).await.error,
            Some(ErrorKind::Unauthorized)
        );
    }
}

#[tokio::test]
async fn expired_sessions_are_rejected() {
    let fx = Fixture::new();
    let session = AdminSession {
        token: "stale".into(),
        created_at: Utc::now() - Duration::hours(9),
        expires_at: Utc::now() - Duration::hours(1),
    };
    fx.cache.set(&session.cache_key(), &session).unwrap();

    let result = fx.shop.list_orders(Some("stale")).await;

    assert_eq!(result.error, Some(ErrorKind::Unauthorized));
    assert!(result.message.contains("expired"));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let fx = Fixture::new();
    let token = fx.login();
    assert!(fx.shop.list_orders(Some(&token)).await.success);

    let out = fx.shop.admin_logout(&token);
    assert!(out.success);
    assert_eq!(out.data, Some(true));

    let after = fx.shop.list_orders(Some(&token)).await;
    assert_eq!(after.error, Some(ErrorKind::Unauthorized));
}

#[tokio::test]
async fn orders_are_listed_newest_first_and_cached() {
    let fx = Fixture::new();
    let token = fx.login();
    let first = place(&fx, 100).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = place(&fx, 200).await;

    let orders = fx.shop.list_orders(Some(&token)).await.data.unwrap();
    let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);
    assert!(fx.cache.exists(ADMIN_ORDERS_KEY).unwrap());
}

#[tokio::test]
async fn status_moves_forward_and_evicts_cache() {
    let fx = Fixture::new();
    let token = fx.login();
    let order_id = place(&fx, 100).await;
    fx.shop.list_orders(Some(&token)).await;

    let shipped = fx
        .shop
        .update_order_status(Some(&token), &order_id, OrderStatus::Shipped)
        .await;
    assert!(shipped.success, "{}", shipped.message);
    assert_eq!(shipped.data.unwrap().status, OrderStatus::Shipped);
    assert!(!fx.cache.exists(ADMIN_ORDERS_KEY).unwrap());

    let back = fx
        .shop
        .update_order_status(Some(&token), &order_id, OrderStatus::Processing)
        .await;
    assert!(!back.success);
    assert_eq!(back.error, Some(ErrorKind::Validation));
    assert!(back.field_errors.get("status").is_some());
}

#[tokio::test]
async fn delivered_and_cancelled_are_final() {
    let fx = Fixture::new();
    let token = fx.login();
    let order_id = place(&fx, 100).await;

    let cancelled = fx
        .shop
        .update_order_status(Some(&token), &order_id, OrderStatus::Cancelled)
        .await;
    assert!(cancelled.success);

    for next in [OrderStatus::Pending, OrderStatus::Delivered, OrderStatus::Cancelled] {
        let result = fx
            .shop
            .update_order_status(Some(&token), &order_id, next)
            .await;
        assert!(!result.success, "{:?} allowed after cancel", next);
    }
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let fx = Fixture::new();
    let token = fx.login();

    let result = fx
        .shop
        .update_order_status(Some(&token), "order-missing", OrderStatus::Shipped)
        .await;

    assert_eq!(result.error, Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn messages_can_be_listed_and_marked() {
    let fx = Fixture::new();
    let token = fx.login();
    let sent = fx
        .shop
        .submit_contact(&ContactForm {
            name: "Sana".into(),
            email: "sana@example.com".into(),
            subject: String::new(),
            message: "Hello".into(),
        })
        .await
        .data
        .unwrap();

    let messages = fx.shop.list_messages(Some(&token)).await.data.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].status, MessageStatus::New);

    let marked = fx
        .shop
        .mark_message(Some(&token), sent.id.as_str(), MessageStatus::Replied)
        .await;
    assert!(marked.success);
    assert_eq!(marked.data.unwrap().status, MessageStatus::Replied);

    let missing = fx
        .shop
        .mark_message(Some(&token), "message-missing", MessageStatus::Read)
        .await;
    assert_eq!(missing.error, Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn ids_of_the_wrong_type_are_not_found() {
    let fx = Fixture::new();
    let token = fx.login();
    let order_id = place(&fx, 100).await;
    let sent = fx
        .shop
        .submit_contact(&ContactForm {
            name: "Sana".into(),
            email: "sana@example.com".into(),
            subject: String::new(),
            message: "Hello".into(),
        })
        .await
        .data
        .unwrap();

    let marked = fx
        .shop
        .mark_message(Some(&token), &order_id, MessageStatus::Read)
        .await;
    assert_eq!(marked.error, Some(ErrorKind::NotFound));

    let moved = fx
        .shop
        .update_order_status(Some(&token), sent.id.as_str(), OrderStatus::Shipped)
        .await;
    assert_eq!(moved.error, Some(ErrorKind::NotFound));

    let order: Order = fx.store.get_as(&order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    let message: ContactMessage = fx.store.get_as(sent.id.as_str()).await.unwrap().unwrap();
    assert_eq!(message.status, MessageStatus::New);

    fx.cache.delete(ADMIN_ORDERS_KEY).unwrap();
    assert!(fx.shop.list_orders(Some(&token)).await.success);
    assert!(fx.shop.dashboard(Some(&token)).await.success);
}

#[tokio::test]
async fn dashboard_summarises_orders_products_and_subscribers() {
    let fx = Fixture::new();
    let token = fx.login();
    place(&fx, 1000).await;
    let cancelled = place(&fx, 500).await;
    fx.shop
        .update_order_status(Some(&token), &cancelled, OrderStatus::Cancelled)
        .await;
    fx.shop.subscribe("a@b.com").await;
    fx.shop.subscribe("c@d.com").await;
    fx.shop.unsubscribe("c@d.com").await;

    let summary = fx.shop.dashboard(Some(&token)).await.data.unwrap();

    assert_eq!(summary.total_orders, 2);
    assert_eq!(summary.pending_orders, 1);
    // 1000 + 200 shipping; the cancelled order does not count
    assert_eq!(summary.revenue, Money::rupees(1200));
    assert_eq!(summary.product_count, 2);
    assert_eq!(summary.subscriber_count, 1);
    assert_eq!(summary.chart.len(), 6);
    assert_eq!(summary.chart.last().unwrap().height_percent, 100);
}
