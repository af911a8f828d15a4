mod common;

use bazaar_actions::{ErrorKind, ALREADY_SUBSCRIBED, NOT_SUBSCRIBED, REACTIVATED, SUBSCRIBED, UNSUBSCRIBED};
use bazaar_commerce::newsletter::Subscription;
use bazaar_store::{DocumentStoreExt, Query};
use common::Fixture;

async fn subscriptions(fx: &Fixture, email: &str) -> Vec<Subscription> {
    fx.store
        .query_as(&Query::of_type(Subscription::DOC_TYPE).where_eq("email", email))
        .await
        .unwrap()
}

#[tokio::test]
async fn subscribing_twice_keeps_one_document() {
    let fx = Fixture::new();

    let first = fx.shop.subscribe("a@b.com").await;
    assert!(first.success);
    assert_eq!(first.message, SUBSCRIBED);

    let second = fx.shop.subscribe("a@b.com").await;
    assert!(!second.success);
    assert_eq!(second.message, ALREADY_SUBSCRIBED);
    assert_eq!(second.error, Some(ErrorKind::Conflict));

    assert_eq!(subscriptions(&fx, "a@b.com").await.len(), 1);
}

#[tokio::test]
async fn email_is_trimmed_before_lookup() {
    let fx = Fixture::new();

    assert!(fx.shop.subscribe("  a@b.com ").await.success);
    let again = fx.shop.subscribe("a@b.com").await;

    assert_eq!(again.message, ALREADY_SUBSCRIBED);
    assert_eq!(fx.count(Subscription::DOC_TYPE).await, 1);
}

#[tokio::test]
async fn lapsed_subscription_is_reactivated() {
    let fx = Fixture::new();
    assert!(fx.shop.subscribe("a@b.com").await.success);

    let off = fx.shop.unsubscribe("a@b.com").await;
    assert!(off.success);
    assert_eq!(off.message, UNSUBSCRIBED);
    assert!(!off.data.unwrap().active);

    let back = fx.shop.subscribe("a@b.com").await;
    assert!(back.success);
    assert_eq!(back.message, REACTIVATED);
    assert!(back.data.unwrap().active);

    let subs = subscriptions(&fx, "a@b.com").await;
    assert_eq!(subs.len(), 1);
    assert!(subs[0].active);
}

#[tokio::test]
async fn unsubscribing_unknown_email_fails() {
    let fx = Fixture::new();

    let result = fx.shop.unsubscribe("nobody@example.com").await;

    assert!(!result.success);
    assert_eq!(result.message, NOT_SUBSCRIBED);
    assert_eq!(result.error, Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn unsubscribing_twice_fails_the_second_time() {
    let fx = Fixture::new();
    fx.shop.subscribe("a@b.com").await;

    assert!(fx.shop.unsubscribe("a@b.com").await.success);
    assert!(!fx.shop.unsubscribe("a@b.com").await.success);
}

#[tokio::test]
async fn malformed_email_is_rejected() {
    let fx = Fixture::new();

    for email in ["", "   ", "foo@bar", "no-at-sign.com"] {
        let result = fx.shop.subscribe(email).await;
        assert!(!result.success, "{:?} accepted", email);
        assert_eq!(result.error, Some(ErrorKind::Validation));
        assert!(result.field_errors.get("email").is_some());
    }
    assert_eq!(fx.count(Subscription::DOC_TYPE).await, 0);
}
