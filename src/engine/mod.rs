// ==========================================
// 库存补货预测系统 - 引擎层
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 4. 组件设计
// ==========================================
// 职责: 实现预测业务规则,不做 I/O
// 红线: 引擎只消费冻结快照, 所有分级必须输出 reason
// ==========================================

pub mod forecaster;
pub mod predictor;
pub mod procurement;
pub mod ranker;
pub mod temporal;

// 重导出核心引擎
pub use forecaster::ConsumptionForecaster;
pub use predictor::StockoutPredictor;
pub use procurement::ProcurementListBuilder;
pub use ranker::PriorityRanker;
pub use temporal::{LookbackWindow, TemporalAnalyzer};
