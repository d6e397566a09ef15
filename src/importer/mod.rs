// ==========================================
// 库存补货预测系统 - 导入层
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 7/9 节
// ==========================================
// 职责: 外部弱类型记录的校验与强类型转换
// 红线: 坏行剔除并计数,不使整批失败
// ==========================================

pub mod error;
pub mod movement_importer;

// 重导出核心导入器
pub use error::{ImportError, ImportResult};
pub use movement_importer::{ImportSummary, MovementImporter, RowError};
