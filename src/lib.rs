// ==========================================
// 库存补货预测系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (人工最终控制权)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 数据源层 - 快照接口
pub mod datasource;

// 引擎层 - 预测业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 预测参数
pub mod config;

// 数据库基础设施(连接初始化/PRAGMA 统一)
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    Confidence, CyclePattern, MovementKind, ScenarioKind, TrendDirection, Urgency,
};

// 领域实体
pub use domain::{
    ConsumptionForecast, ForecastScenario, MovementRecord, PredictionResult, PriorityEntry,
    Product, ShoppingList, ShoppingListItem, SupplierGroup, TemporalProfile,
};

// 配置
pub use config::ForecastParameters;

// 数据源
pub use datasource::{
    fetch_snapshot, InMemorySnapshotSource, Snapshot, SnapshotSource, SqliteSnapshotSource,
};

// 引擎
pub use engine::{
    ConsumptionForecaster, PriorityRanker, ProcurementListBuilder, StockoutPredictor,
    TemporalAnalyzer,
};

// API
pub use api::{ForecastApi, ForecastApiImpl};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存补货预测系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
