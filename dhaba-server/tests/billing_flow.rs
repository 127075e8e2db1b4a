//! 端到端结账流程测试
//!
//! 使用 ServerState::initialize_in_memory 完整初始化 (内存数据库
//! + 内存离线队列)，覆盖开台、多轮点单、结账落单、柜台单流程。

use dhaba_server::billing::CheckoutService;
use dhaba_server::billing::PaymentRequest;
use dhaba_server::db::models::{
    DiningTableCreate, FoodType, OrderStatus, ProductCreate, RestaurantUpdate, UserCreate,
};
use dhaba_server::{Config, Role, ServerState};
use shared::order::{CartItem, CustomerInfo, PaymentMode, TableStatus};
use tempfile::TempDir;

async fn test_state() -> (TempDir, ServerState) {
    let dir = TempDir::new().expect("temp dir");
    let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize_in_memory(&config)
        .await
        .expect("state init");
    (dir, state)
}

fn item(name: &str, price: f64, quantity: i32) -> CartItem {
    CartItem {
        product_id: format!("product:{}", name.to_lowercase()),
        name: name.to_string(),
        price,
        quantity,
    }
}

async fn seed_table(state: &ServerState, name: &str) -> String {
    let table = state
        .dining_table_repository()
        .create(DiningTableCreate {
            name: name.to_string(),
            capacity: Some(4),
        })
        .await
        .expect("create table");
    let id = table.id.expect("table id").to_string();
    state.table_manager().register(&id, &table.name);
    id
}

#[tokio::test]
async fn test_table_flow_occupy_order_checkout() {
    let (_dir, state) = test_state().await;

    // 税率 18% GST + 5% 服务费
    state
        .restaurant_repository()
        .update(RestaurantUpdate {
            name: Some("Test Dhaba".to_string()),
            address: None,
            phone: None,
            gstin: None,
            gst_rate: Some(18.0),
            service_rate: Some(5.0),
            receipt_footer: None,
        })
        .await
        .expect("settings");
    state.refresh_rates().await.expect("refresh rates");

    let table_id = seed_table(&state, "T1").await;

    let customer = CustomerInfo {
        name: "Asha".to_string(),
        phone: None,
        guests: 2,
    };
    state
        .table_manager()
        .occupy(&table_id, customer)
        .expect("occupy");

    // 两轮点单
    state
        .table_manager()
        .add_order(&table_id, vec![item("Burger", 100.0, 2)], None, state.rates())
        .expect("first order");
    let session = state
        .table_manager()
        .add_order(&table_id, vec![item("Chai", 25.0, 2)], None, state.rates())
        .expect("second order");

    assert_eq!(session.orders.len(), 2);
    assert_eq!(session.totals.subtotal, 250.0);
    assert_eq!(session.totals.gst, 45.0);
    assert_eq!(session.totals.service, 12.5);
    assert_eq!(session.totals.total, 307.5);

    // 分账预览不改变会话
    let shares = state
        .table_manager()
        .split_bill(&table_id, 2)
        .expect("split");
    assert_eq!(shares.len(), 2);
    let share_sum: f64 = shares.iter().map(|s| s.amount).sum();
    assert!((share_sum - 307.5).abs() < 1e-9);

    // 现金结账
    let payment = CheckoutService::resolve_payment(
        &PaymentRequest {
            mode: PaymentMode::Cash,
            cash_received: Some(310.0),
        },
        session.totals.total,
    )
    .expect("payment");
    assert_eq!(payment.change, Some(2.5));

    let outcome = state
        .checkout_service()
        .checkout(
            Some(session.name.clone()),
            session.all_items(),
            session.totals.clone(),
            payment,
            session.customer.clone(),
            "user:test".to_string(),
        )
        .await;
    assert!(outcome.persisted);
    assert!(outcome.order.receipt_number.starts_with("DHB"));

    state.table_manager().clear(&table_id).expect("clear");
    let after = state.table_manager().snapshot(&table_id).expect("snapshot");
    assert_eq!(after.status, TableStatus::Available);
    assert!(after.orders.is_empty());

    // 订单可按回执号查回
    let found = state
        .order_repository()
        .find_by_receipt(&outcome.order.receipt_number)
        .await
        .expect("query")
        .expect("order persisted");
    assert_eq!(found.total, 307.5);
    assert_eq!(found.table_name.as_deref(), Some("T1"));
    assert_eq!(found.items.len(), 2);
}

#[tokio::test]
async fn test_counter_sale_without_table() {
    let (_dir, state) = test_state().await;

    let items = vec![item("Samosa", 20.0, 3)];
    let payment = CheckoutService::resolve_payment(
        &PaymentRequest {
            mode: PaymentMode::Upi,
            cash_received: None,
        },
        60.0,
    )
    .expect("payment");

    let outcome = state
        .checkout_service()
        .checkout(
            None,
            items,
            shared::order::BillTotals {
                subtotal: 60.0,
                gst: 0.0,
                service: 0.0,
                total: 60.0,
            },
            payment,
            None,
            "user:test".to_string(),
        )
        .await;

    assert!(outcome.persisted);
    assert!(outcome.order.table_name.is_none());
    assert_eq!(outcome.order.payment.mode, PaymentMode::Upi);
    assert_eq!(outcome.order.payment.change, None);
}

#[tokio::test]
async fn test_merge_then_checkout_combined_bill() {
    let (_dir, state) = test_state().await;
    let t1 = seed_table(&state, "T1").await;
    let t2 = seed_table(&state, "T2").await;

    state
        .table_manager()
        .add_order(&t1, vec![item("Thali", 150.0, 1)], None, state.rates())
        .expect("order t1");
    state
        .table_manager()
        .add_order(&t2, vec![item("Lassi", 50.0, 2)], None, state.rates())
        .expect("order t2");

    let merged = state
        .table_manager()
        .merge(&t1, &t2, state.rates())
        .expect("merge");
    assert_eq!(merged.orders.len(), 2);
    assert_eq!(merged.totals.subtotal, 250.0);

    let source = state.table_manager().snapshot(&t1).expect("snapshot");
    assert_eq!(source.status, TableStatus::Available);
}

#[tokio::test]
async fn test_product_catalog_and_users() {
    let (_dir, state) = test_state().await;

    let created = state
        .product_repository()
        .create(ProductCreate {
            name: "Masala Dosa".to_string(),
            price: 80.0,
            category: Some("South Indian".to_string()),
            food_type: Some(FoodType::Veg),
            quantity_type: Some("plate".to_string()),
            image_url: None,
        })
        .await
        .expect("create product");
    assert!(created.is_available);

    // 读回的文档与保存的一致
    let product_id = created.id.as_ref().expect("product id").to_string();
    let loaded = state
        .product_repository()
        .find_by_id(&product_id)
        .await
        .expect("query")
        .expect("product persisted");
    assert_eq!(loaded.name, "Masala Dosa");
    assert_eq!(loaded.price, 80.0);
    assert_eq!(loaded.category, "South Indian");
    assert_eq!(loaded.food_type, FoodType::Veg);
    assert_eq!(loaded.quantity_type, "plate");

    let dup = state
        .product_repository()
        .create(ProductCreate {
            name: "Masala Dosa".to_string(),
            price: 90.0,
            category: None,
            food_type: None,
            quantity_type: None,
            image_url: None,
        })
        .await;
    assert!(dup.is_err(), "duplicate product name must be rejected");

    let user = state
        .user_repository()
        .create(UserCreate {
            name: "Ravi".to_string(),
            email: "Ravi@Dhaba.In".to_string(),
            password: "secret-password".to_string(),
            role: Role::Staff,
        })
        .await
        .expect("create user");
    assert_eq!(user.email, "ravi@dhaba.in", "emails are stored lowercased");
    assert!(user.verify_password("secret-password").expect("verify"));
    assert!(!user.verify_password("wrong").expect("verify"));

    // 哈希必须真正落库: 重新读回的文档也能验证口令
    let stored = state
        .user_repository()
        .find_by_email("ravi@dhaba.in")
        .await
        .expect("query")
        .expect("user persisted");
    assert_eq!(stored.password_hash, user.password_hash);
    assert!(stored.verify_password("secret-password").expect("verify"));

    // JWT 往返
    let user_id = user.id.expect("user id").to_string();
    let token = state
        .jwt_service()
        .generate_token(&user_id, &user.email, user.role)
        .expect("token");
    let claims = state.jwt_service().validate_token(&token).expect("claims");
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.role, "staff");
}

#[tokio::test]
async fn test_join_code_survives_settings_updates() {
    let (_dir, state) = test_state().await;

    let settings = state.restaurant_repository().get().await.expect("settings");
    assert_eq!(settings.join_code.len(), 6);

    state
        .restaurant_repository()
        .update(RestaurantUpdate {
            name: Some("Renamed Dhaba".to_string()),
            address: None,
            phone: None,
            gstin: None,
            gst_rate: None,
            service_rate: None,
            receipt_footer: None,
        })
        .await
        .expect("update");

    let after = state.restaurant_repository().get().await.expect("settings");
    assert_eq!(after.join_code, settings.join_code);
}

#[tokio::test]
async fn test_cancel_keeps_order_for_audit() {
    let (_dir, state) = test_state().await;

    let payment = CheckoutService::resolve_payment(
        &PaymentRequest {
            mode: PaymentMode::Card,
            cash_received: None,
        },
        40.0,
    )
    .expect("payment");
    let outcome = state
        .checkout_service()
        .checkout(
            None,
            vec![item("Chai", 20.0, 2)],
            shared::order::BillTotals {
                subtotal: 40.0,
                gst: 0.0,
                service: 0.0,
                total: 40.0,
            },
            payment,
            None,
            "user:test".to_string(),
        )
        .await;
    assert!(outcome.persisted);
    let order_id = outcome.order.id.expect("order id").to_string();

    let cancelled = state
        .order_repository()
        .cancel(&order_id)
        .await
        .expect("cancel");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.receipt_number, outcome.order.receipt_number);

    let again = state.order_repository().cancel(&order_id).await;
    assert!(again.is_err(), "cancelling twice must fail");

    // 文档仍在，历史查询可见
    let found = state
        .order_repository()
        .find_by_receipt(&cancelled.receipt_number)
        .await
        .expect("query")
        .expect("still present");
    assert_eq!(found.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn test_rate_change_recomputes_open_tables() {
    let (_dir, state) = test_state().await;
    let table_id = seed_table(&state, "T1").await;

    state
        .table_manager()
        .add_order(&table_id, vec![item("Paneer", 200.0, 1)], None, state.rates())
        .expect("order");

    state
        .restaurant_repository()
        .update(RestaurantUpdate {
            name: None,
            address: None,
            phone: None,
            gstin: None,
            gst_rate: Some(12.0),
            service_rate: Some(0.0),
            receipt_footer: None,
        })
        .await
        .expect("settings");
    state.refresh_rates().await.expect("refresh");

    let session = state.table_manager().snapshot(&table_id).expect("snapshot");
    assert_eq!(session.totals.gst, 24.0);
    assert_eq!(session.totals.service, 0.0);
    assert_eq!(session.totals.total, 224.0);
}
