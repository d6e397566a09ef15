// ==========================================
// 库存补货预测系统 - 库存移动记录
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 3. 数据模型
// 红线: 移动记录一经创建不可变,引擎只读
// ==========================================

use crate::domain::types::MovementKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 库存移动记录
///
/// 由外部事务组件产生,引擎视为只读快照的一部分。
/// 数量恒为非负整数,方向由 kind 表达。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    /// 移动记录 ID
    pub movement_id: String,

    /// 产品 ID
    pub product_id: String,

    /// 移动类型 (入库/出库)
    pub kind: MovementKind,

    /// 数量 (>= 0)
    pub quantity: u32,

    /// 发生时间
    pub occurred_at: DateTime<Utc>,
}

impl MovementRecord {
    /// 创建新的移动记录
    pub fn new(
        product_id: String,
        kind: MovementKind,
        quantity: u32,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            movement_id: Uuid::new_v4().to_string(),
            product_id,
            kind,
            quantity,
            occurred_at,
        }
    }

    /// 是否为出库记录
    pub fn is_exit(&self) -> bool {
        self.kind == MovementKind::Exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assigns_movement_id() {
        let rec = MovementRecord::new("P001".to_string(), MovementKind::Exit, 10, Utc::now());
        assert!(!rec.movement_id.is_empty());
        assert!(rec.is_exit());
        assert_eq!(rec.quantity, 10);
    }
}
