// ==========================================
// MovementImporter 导入集成测试
// ==========================================
// 测试目标: 验证 JSON/CSV 导入边界的校验与坏行剔除
// 工具: tempfile 临时文件
// ==========================================

use inventory_forecast::importer::{ImportError, MovementImporter};
use serde_json::json;
use std::io::Write;

#[test]
fn json_import_validates_and_counts_rows() {
    let importer = MovementImporter::new();
    let payload = json!([
        {"product_id": "P001", "kind": "exit", "quantity": 5, "occurred_at": "2026-07-01T10:00:00Z"},
        {"product_id": "P001", "kind": "entry", "quantity": 20, "occurred_at": "2026-07-02T10:00:00Z"},
        {"product_id": "P002", "kind": "exit", "quantity": "五", "occurred_at": "2026-07-03T10:00:00Z"},
        {"product_id": "P002", "kind": "exit", "quantity": 3, "occurred_at": "03/07/2026"}
    ]);

    let summary = importer.import_json(&payload).unwrap();

    assert_eq!(summary.total_rows, 4);
    assert_eq!(summary.imported_count(), 2);
    assert_eq!(summary.rejected_count(), 2);
    assert!(!summary.is_clean());
}

#[test]
fn csv_import_reads_headered_file() {
    let importer = MovementImporter::new();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movements.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "product_id,kind,quantity,occurred_at").unwrap();
    writeln!(file, "P001,EXIT,5,2026-07-01T10:00:00Z").unwrap();
    writeln!(file, "P001,entry,20,2026-07-02T10:00:00Z").unwrap();
    writeln!(file, ",EXIT,5,2026-07-03T10:00:00Z").unwrap();
    writeln!(file, "P002,EXIT,abc,2026-07-04T10:00:00Z").unwrap();

    let summary = importer.import_csv_file(&path).unwrap();

    assert_eq!(summary.total_rows, 4);
    assert_eq!(summary.imported_count(), 2);
    assert_eq!(summary.rejected_count(), 2);
    // 行号从 1 开始,坏行为第 3、4 行
    assert_eq!(summary.row_errors[0].row, 3);
    assert_eq!(summary.row_errors[1].row, 4);
}

#[test]
fn csv_import_rejects_missing_file_and_wrong_extension() {
    let importer = MovementImporter::new();

    let err = importer.import_csv_file("/no/such/file.csv").unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movements.xlsx");
    std::fs::write(&path, b"not a csv").unwrap();
    let err = importer.import_csv_file(&path).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}

#[test]
fn imported_records_feed_the_predictor() {
    use inventory_forecast::config::ForecastParameters;
    use inventory_forecast::engine::StockoutPredictor;
    use inventory_forecast::Product;

    let importer = MovementImporter::new();
    let payload = json!([
        {"product_id": "P001", "kind": "exit", "quantity": 10, "occurred_at": "2026-07-10T10:00:00Z"},
        {"product_id": "P001", "kind": "exit", "quantity": 10, "occurred_at": "2026-07-20T10:00:00Z"},
        {"product_id": "P001", "kind": "exit", "quantity": 10, "occurred_at": "2026-07-30T10:00:00Z"}
    ]);
    let summary = importer.import_json(&payload).unwrap();

    let product = Product::new("P001".to_string(), "A".to_string(), "甲".to_string(), 12);
    let predictor = StockoutPredictor::new();
    let result = predictor.predict(
        &product,
        &summary.records,
        chrono::NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
        &ForecastParameters::default(),
    );

    assert!(result.days_remaining.is_some());
    assert!(result.daily_consumption > 0.0);
}
