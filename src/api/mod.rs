// ==========================================
// 库存补货预测系统 - API 层
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 6. 外部接口
// 职责: 对外提供预测查询接口与序列化视图
// ==========================================

pub mod dto;
pub mod error;
pub mod forecast_api;
pub mod forecast_api_impl;

// 重导出核心接口
pub use dto::{
    PredictionResultDto, PriorityEntryDto, ShoppingListDto, ShoppingListItemDto, SupplierGroupDto,
};
pub use error::{ApiError, ApiResult};
pub use forecast_api::ForecastApi;
pub use forecast_api_impl::ForecastApiImpl;
