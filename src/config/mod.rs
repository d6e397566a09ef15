// ==========================================
// 库存补货预测系统 - 配置层
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 阈值与占位常量全集
// ==========================================
// 职责: 预测参数集中管理,支持 JSON 覆写
// ==========================================

pub mod forecast_profile;

// 重导出核心配置
pub use forecast_profile::ForecastParameters;
