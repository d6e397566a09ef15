// ==========================================
// 库存补货预测系统 - 领域模型层
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 3. 数据模型
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod movement;
pub mod prediction;
pub mod product;
pub mod profile;
pub mod types;

// 重导出核心类型
pub use movement::MovementRecord;
pub use prediction::{
    PredictionResult, PriorityEntry, ShoppingList, ShoppingListItem, SupplierGroup,
};
pub use product::Product;
pub use profile::{ConsumptionForecast, ForecastScenario, TemporalProfile};
pub use types::{
    Confidence, CyclePattern, MovementKind, ScenarioKind, TrendDirection, Urgency,
};
