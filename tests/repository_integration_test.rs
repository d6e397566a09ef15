// ==========================================
// 仓储层集成测试 (SQLite)
// ==========================================
// 测试目标: 验证产品/移动记录仓储与 SQLite 数据源
// 工具: tempfile 临时数据库
// ==========================================

mod test_helpers;

use inventory_forecast::datasource::{fetch_snapshot, SnapshotSource, SqliteSnapshotSource};
use inventory_forecast::{MovementRecord, Product};
use test_helpers::{create_test_product, exit_days_ago};

fn temp_db() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db").to_string_lossy().to_string();
    (dir, path)
}

#[tokio::test]
async fn product_roundtrip_preserves_fields() {
    let (_dir, db_path) = temp_db();
    let source = SqliteSnapshotSource::new(&db_path).unwrap();

    let products = vec![
        create_test_product("P001", 20)
            .with_min_quantity(5)
            .with_supplier("供应商甲")
            .with_category("原料")
            .with_unit_price(12.5),
        create_test_product("P002", 0),
    ];
    source.product_repo().batch_insert(&products).unwrap();

    let loaded = source.list_products().await.unwrap();
    assert_eq!(loaded.len(), 2);

    let p1 = loaded.iter().find(|p| p.product_id == "P001").unwrap();
    assert_eq!(p1.min_quantity, Some(5));
    assert_eq!(p1.supplier.as_deref(), Some("供应商甲"));
    assert_eq!(p1.category.as_deref(), Some("原料"));
    assert_eq!(p1.unit_price, Some(12.5));

    let p2 = loaded.iter().find(|p| p.product_id == "P002").unwrap();
    assert!(p2.min_quantity.is_none());
}

#[tokio::test]
async fn movement_roundtrip_keeps_chronological_order() {
    let (_dir, db_path) = temp_db();
    let source = SqliteSnapshotSource::new(&db_path).unwrap();

    source
        .product_repo()
        .batch_insert(&[create_test_product("P001", 10)])
        .unwrap();

    let records: Vec<MovementRecord> = vec![
        exit_days_ago("P001", 5, 3),
        exit_days_ago("P001", 50, 7),
        exit_days_ago("P001", 20, 4),
    ];
    source.movement_repo().batch_insert(&records).unwrap();

    let loaded = source.list_movements("P001").await.unwrap();
    assert_eq!(loaded.len(), 3);
    for pair in loaded.windows(2) {
        assert!(pair[0].occurred_at <= pair[1].occurred_at);
    }
}

#[tokio::test]
async fn malformed_rows_are_skipped_not_fatal() {
    let (_dir, db_path) = temp_db();
    let source = SqliteSnapshotSource::new(&db_path).unwrap();

    source
        .product_repo()
        .batch_insert(&[create_test_product("P001", 10)])
        .unwrap();
    source
        .movement_repo()
        .batch_insert(&[exit_days_ago("P001", 5, 3)])
        .unwrap();

    // 直接写入 kind / occurred_at 不合法的历史行
    {
        let conn = inventory_forecast::db::open_sqlite_connection(&db_path).unwrap();
        conn.execute(
            "INSERT INTO movement_record (movement_id, product_id, kind, quantity, occurred_at)
             VALUES ('BAD-1', 'P001', 'TRANSFER', 5, '2026-07-01T00:00:00Z')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO movement_record (movement_id, product_id, kind, quantity, occurred_at)
             VALUES ('BAD-2', 'P001', 'EXIT', 5, 'not-a-date')",
            [],
        )
        .unwrap();
    }

    let loaded = source.list_movements("P001").await.unwrap();
    // 坏行被剔除,好行保留
    assert_eq!(loaded.len(), 1);
}

#[tokio::test]
async fn snapshot_fetch_collects_all_products() {
    let (_dir, db_path) = temp_db();
    let source = SqliteSnapshotSource::new(&db_path).unwrap();

    let products: Vec<Product> = (1..=5)
        .map(|i| create_test_product(&format!("P{:03}", i), i * 10))
        .collect();
    source.product_repo().batch_insert(&products).unwrap();
    source
        .movement_repo()
        .batch_insert(&[exit_days_ago("P001", 5, 3), exit_days_ago("P002", 8, 2)])
        .unwrap();

    let snapshot = fetch_snapshot(&source, 4).await.unwrap();

    assert_eq!(snapshot.products.len(), 5);
    assert_eq!(snapshot.movements_for("P001").len(), 1);
    assert_eq!(snapshot.movements_for("P002").len(), 1);
    assert!(snapshot.movements_for("P003").is_empty());
    assert!(snapshot.product("P004").is_some());
}
