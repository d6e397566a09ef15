// ==========================================
// 库存补货预测系统 - 移动记录导入器
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 7/9 节
// 职责: 弱类型 JSON/CSV 记录 → 强类型 MovementRecord
// 红线: 字段校验在导入边界完成,坏行剔除并计数,不依赖隐式转换;
//       时间戳缺失或不可解析的行静默排除,不致命
// ==========================================

use crate::domain::movement::MovementRecord;
use crate::domain::types::MovementKind;
use crate::importer::error::{ImportError, ImportResult};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::path::Path;
use tracing::{info, instrument, warn};

// ==========================================
// 导入汇总
// ==========================================

/// 行级错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 行号 (JSON 数组下标或 CSV 数据行号, 从 1 开始)
    pub row: usize,

    /// 错误描述
    pub message: String,
}

/// 导入汇总
#[derive(Debug)]
pub struct ImportSummary {
    /// 输入总行数
    pub total_rows: usize,

    /// 通过校验的记录
    pub records: Vec<MovementRecord>,

    /// 被剔除的行
    pub row_errors: Vec<RowError>,
}

impl ImportSummary {
    /// 通过校验的行数
    pub fn imported_count(&self) -> usize {
        self.records.len()
    }

    /// 被剔除的行数
    pub fn rejected_count(&self) -> usize {
        self.row_errors.len()
    }

    /// 是否全部通过
    pub fn is_clean(&self) -> bool {
        self.row_errors.is_empty()
    }
}

// ==========================================
// MovementImporter - 移动记录导入器
// ==========================================
pub struct MovementImporter {
    // 无状态导入器
}

impl MovementImporter {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // JSON 导入
    // ==========================================

    /// 从弱类型 JSON 值导入
    ///
    /// 期望顶层为记录数组; 每条记录要求:
    /// - product_id: 非空字符串
    /// - kind: "ENTRY"/"EXIT" (大小写不敏感, 兼容 in/out)
    /// - quantity: 非负整数
    /// - occurred_at: RFC3339 时间戳字符串
    #[instrument(skip(self, value))]
    pub fn import_json(&self, value: &Value) -> ImportResult<ImportSummary> {
        let rows = value
            .as_array()
            .ok_or_else(|| ImportError::JsonShapeError(self.json_type_name(value).to_string()))?;

        let mut records = Vec::new();
        let mut row_errors = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            let row_no = index + 1;
            match self.parse_json_row(row) {
                Ok(record) => records.push(record),
                Err(message) => {
                    warn!(row = row_no, %message, "movement row rejected");
                    row_errors.push(RowError {
                        row: row_no,
                        message,
                    });
                }
            }
        }

        info!(
            total = rows.len(),
            imported = records.len(),
            rejected = row_errors.len(),
            "json movement import finished"
        );

        Ok(ImportSummary {
            total_rows: rows.len(),
            records,
            row_errors,
        })
    }

    /// 解析单条 JSON 记录
    fn parse_json_row(&self, row: &Value) -> Result<MovementRecord, String> {
        let obj = row
            .as_object()
            .ok_or_else(|| format!("期望对象,实际 {}", self.json_type_name(row)))?;

        let product_id = obj
            .get("product_id")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "product_id 缺失或为空".to_string())?;

        let kind_raw = obj
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| "kind 缺失".to_string())?;
        let kind = MovementKind::parse(kind_raw)
            .ok_or_else(|| format!("kind 不可识别: {}", kind_raw))?;

        // 负数与非整数显式拒绝,不做隐式截断
        let quantity = obj
            .get("quantity")
            .and_then(Value::as_u64)
            .ok_or_else(|| "quantity 缺失或不是非负整数".to_string())?;
        let quantity = u32::try_from(quantity).map_err(|_| "quantity 超出范围".to_string())?;

        let occurred_raw = obj
            .get("occurred_at")
            .and_then(Value::as_str)
            .ok_or_else(|| "occurred_at 缺失".to_string())?;
        let occurred_at = self.parse_timestamp(occurred_raw)?;

        Ok(MovementRecord::new(
            product_id.to_string(),
            kind,
            quantity,
            occurred_at,
        ))
    }

    // ==========================================
    // CSV 导入
    // ==========================================

    /// 从 CSV 文件导入
    ///
    /// 期望表头: product_id, kind, quantity, occurred_at
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_csv_file(&self, path: impl AsRef<Path>) -> ImportResult<ImportSummary> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => {}
            _ => return Err(ImportError::UnsupportedFormat(path.display().to_string())),
        }

        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let col = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let product_col =
            col("product_id").ok_or_else(|| ImportError::CsvParseError("缺少 product_id 列".to_string()))?;
        let kind_col =
            col("kind").ok_or_else(|| ImportError::CsvParseError("缺少 kind 列".to_string()))?;
        let qty_col = col("quantity")
            .ok_or_else(|| ImportError::CsvParseError("缺少 quantity 列".to_string()))?;
        let occurred_col = col("occurred_at")
            .ok_or_else(|| ImportError::CsvParseError("缺少 occurred_at 列".to_string()))?;

        let mut records = Vec::new();
        let mut row_errors = Vec::new();
        let mut total_rows = 0;

        for (index, row) in reader.records().enumerate() {
            let row_no = index + 1;
            total_rows += 1;

            let parsed = row
                .map_err(|e| e.to_string())
                .and_then(|record| {
                    self.parse_csv_row(&record, product_col, kind_col, qty_col, occurred_col)
                });

            match parsed {
                Ok(record) => records.push(record),
                Err(message) => {
                    warn!(row = row_no, %message, "movement row rejected");
                    row_errors.push(RowError {
                        row: row_no,
                        message,
                    });
                }
            }
        }

        info!(
            total = total_rows,
            imported = records.len(),
            rejected = row_errors.len(),
            "csv movement import finished"
        );

        Ok(ImportSummary {
            total_rows,
            records,
            row_errors,
        })
    }

    /// 解析单条 CSV 记录
    fn parse_csv_row(
        &self,
        record: &csv::StringRecord,
        product_col: usize,
        kind_col: usize,
        qty_col: usize,
        occurred_col: usize,
    ) -> Result<MovementRecord, String> {
        let field = |idx: usize, name: &str| {
            record
                .get(idx)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| format!("{} 缺失或为空", name))
        };

        let product_id = field(product_col, "product_id")?;
        let kind_raw = field(kind_col, "kind")?;
        let kind = MovementKind::parse(kind_raw)
            .ok_or_else(|| format!("kind 不可识别: {}", kind_raw))?;

        let qty_raw = field(qty_col, "quantity")?;
        let quantity: u32 = qty_raw
            .parse()
            .map_err(|_| format!("quantity 不是非负整数: {}", qty_raw))?;

        let occurred_at = self.parse_timestamp(field(occurred_col, "occurred_at")?)?;

        Ok(MovementRecord::new(
            product_id.to_string(),
            kind,
            quantity,
            occurred_at,
        ))
    }

    // ==========================================
    // 公共辅助
    // ==========================================

    /// 解析 RFC3339 时间戳 (兼容无时区的 `YYYY-MM-DDTHH:MM:SS`)
    fn parse_timestamp(&self, raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Utc.from_utc_datetime(&naive));
        }
        Err(format!("occurred_at 不可解析: {}", raw))
    }

    fn json_type_name(&self, value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for MovementImporter {
    fn default() -> Self {
        Self::new()
    }
}
