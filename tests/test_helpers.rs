// ==========================================
// 集成测试公共辅助
// ==========================================
// 约定: 测试统一以 2026-08-05 为"今天",保证确定性
// ==========================================

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use inventory_forecast::domain::types::MovementKind;
use inventory_forecast::{InMemorySnapshotSource, MovementRecord, Product};

/// 测试基准日期
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
}

/// 创建测试用的产品
pub fn create_test_product(id: &str, quantity: i64) -> Product {
    Product::new(
        id.to_string(),
        format!("C-{}", id),
        format!("产品{}", id),
        quantity,
    )
}

/// 基准日期前 days_ago 天的出库记录
pub fn exit_days_ago(product_id: &str, days_ago: i64, qty: u32) -> MovementRecord {
    let date = test_today() - Duration::days(days_ago);
    MovementRecord::new(
        product_id.to_string(),
        MovementKind::Exit,
        qty,
        Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap()),
    )
}

/// 基准日期前 days_ago 天的入库记录
pub fn entry_days_ago(product_id: &str, days_ago: i64, qty: u32) -> MovementRecord {
    let date = test_today() - Duration::days(days_ago);
    MovementRecord::new(
        product_id.to_string(),
        MovementKind::Entry,
        qty,
        Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap()),
    )
}

/// 指定日历日期的出库记录
pub fn exit_on(product_id: &str, year: i32, month: u32, day: u32, qty: u32) -> MovementRecord {
    MovementRecord::new(
        product_id.to_string(),
        MovementKind::Exit,
        qty,
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
    )
}

/// 每 10 天出库 10 件、覆盖 90 天的稳定消费历史 (日均 1.0)
pub fn steady_history(product_id: &str) -> Vec<MovementRecord> {
    (1..=9)
        .map(|i| exit_days_ago(product_id, i * 10, 10))
        .collect()
}

/// 构造内存数据源
pub fn memory_source(
    products: Vec<Product>,
    movements: Vec<MovementRecord>,
) -> InMemorySnapshotSource {
    InMemorySnapshotSource::new(products, movements)
}
