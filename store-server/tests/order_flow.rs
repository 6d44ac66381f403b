//! Order lifecycle integration tests against an in-memory database
//! Run: cargo test -p store-server --test order_flow

use shared::cart::LineItem;
use shared::order::OrderStatus;
use store_server::db::DbService;
use store_server::db::models::{AdminResponse, Order, ShippingAddress, UserCreate};
use store_server::db::repository::{OrderRepository, RepoError, UserRepository};
use store_server::pricing::compute_totals;

async fn setup() -> (OrderRepository, String) {
    let db = DbService::new_in_memory().await.unwrap();
    let users = UserRepository::new(db.db.clone());
    let user = users
        .create(UserCreate {
            name: "Buyer".to_string(),
            email: "buyer@example.com".to_string(),
            password: "secret123".to_string(),
            role: "user".to_string(),
            phone: None,
            address: None,
        })
        .await
        .unwrap();

    (
        OrderRepository::new(db.db),
        user.id.unwrap().to_string(),
    )
}

fn sample_order(user_id: &str) -> Order {
    let items = vec![LineItem {
        product: "product:phone1".to_string(),
        name: "Phone".to_string(),
        image: "/images/p.jpg".to_string(),
        price: 300.0,
        quantity: 1,
    }];
    let totals = compute_totals(&items);

    Order {
        id: None,
        user: user_id.parse().unwrap(),
        items,
        shipping_address: ShippingAddress {
            address: "1 Main St".to_string(),
            city: "Lisbon".to_string(),
            postal_code: "1000-001".to_string(),
            country: "PT".to_string(),
        },
        payment_method: "card".to_string(),
        items_price: totals.items_price,
        shipping_price: totals.shipping_price,
        tax_price: totals.tax_price,
        total_price: totals.total_price,
        is_paid: false,
        paid_at: None,
        payment_result: None,
        status: OrderStatus::Pending,
        tracking_number: None,
        admin_response: None,
        created_at: 1,
        updated_at: 1,
    }
}

#[tokio::test]
async fn order_create_and_ownership_listing() {
    let (orders, user_id) = setup().await;

    let created = orders.create(sample_order(&user_id)).await.unwrap();
    assert_eq!(created.status, OrderStatus::Pending);
    assert!(!created.is_paid);
    assert_eq!(created.total_price, 454.0);

    let mine = orders.find_by_user(&user_id).await.unwrap();
    assert_eq!(mine.len(), 1);

    let all = orders.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn empty_order_rejected() {
    let (orders, user_id) = setup().await;

    let mut order = sample_order(&user_id);
    order.items.clear();
    let result = orders.create(order).await;
    assert!(matches!(result, Err(RepoError::Validation(_))));
}

#[tokio::test]
async fn pay_once_only() {
    let (orders, user_id) = setup().await;
    let created = orders.create(sample_order(&user_id)).await.unwrap();
    let id = created.id.unwrap().to_string();

    let receipt = serde_json::json!({"id": "PAY-1", "status": "COMPLETED"});
    let paid = orders.mark_paid(&id, Some(receipt)).await.unwrap();
    assert!(paid.is_paid);
    assert!(paid.paid_at.is_some());
    assert_eq!(
        paid.payment_result.as_ref().and_then(|r| r["status"].as_str()),
        Some("COMPLETED")
    );

    let again = orders.mark_paid(&id, None).await;
    assert!(matches!(again, Err(RepoError::Duplicate(_))));
}

#[tokio::test]
async fn status_walks_the_forward_chain() {
    let (orders, user_id) = setup().await;
    let created = orders.create(sample_order(&user_id)).await.unwrap();
    let id = created.id.unwrap().to_string();

    let chain = [
        (OrderStatus::Pending, OrderStatus::Confirmed),
        (OrderStatus::Confirmed, OrderStatus::Processing),
        (OrderStatus::Processing, OrderStatus::Shipped),
        (OrderStatus::Shipped, OrderStatus::Delivered),
    ];
    for (from, to) in chain {
        let updated = orders.set_status(&id, from, to, None, None).await.unwrap();
        assert_eq!(updated.status, to);
    }

    let final_order = orders.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(final_order.status, OrderStatus::Delivered);
}

#[tokio::test]
async fn compare_and_set_guards_stale_transitions() {
    let (orders, user_id) = setup().await;
    let created = orders.create(sample_order(&user_id)).await.unwrap();
    let id = created.id.unwrap().to_string();

    orders
        .set_status(&id, OrderStatus::Pending, OrderStatus::Confirmed, None, None)
        .await
        .unwrap();

    // A second writer still thinks the order is Pending
    let stale = orders
        .set_status(&id, OrderStatus::Pending, OrderStatus::Cancelled, None, None)
        .await;
    assert!(matches!(stale, Err(RepoError::Validation(_))));

    let current = orders.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(current.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn denial_records_admin_response_and_tracking_survives() {
    let (orders, user_id) = setup().await;
    let created = orders.create(sample_order(&user_id)).await.unwrap();
    let id = created.id.unwrap().to_string();

    orders
        .set_status(
            &id,
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            Some("TRK-123".to_string()),
            None,
        )
        .await
        .unwrap();

    let denied = orders
        .set_status(
            &id,
            OrderStatus::Confirmed,
            OrderStatus::Denied,
            None,
            Some(AdminResponse {
                message: "Payment flagged".to_string(),
                responded_at: 42,
            }),
        )
        .await
        .unwrap();

    assert_eq!(denied.status, OrderStatus::Denied);
    assert_eq!(denied.tracking_number.as_deref(), Some("TRK-123"));
    assert_eq!(
        denied.admin_response.as_ref().map(|r| r.message.as_str()),
        Some("Payment flagged")
    );
}

#[tokio::test]
async fn revenue_counts_paid_orders_only() {
    let (orders, user_id) = setup().await;

    let first = orders.create(sample_order(&user_id)).await.unwrap();
    orders.create(sample_order(&user_id)).await.unwrap();

    orders
        .mark_paid(&first.id.unwrap().to_string(), None)
        .await
        .unwrap();

    assert_eq!(orders.count().await.unwrap(), 2);
    let revenue = orders.paid_revenue().await.unwrap();
    assert!((revenue - 454.0).abs() < 0.001);
}
