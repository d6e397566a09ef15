// ==========================================
// 库存补货预测系统 - 领域类型定义
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 0.2 分级体系
// 红线: 紧急等级/置信度是"等级制",不是评分制
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 移动类型 (Movement Kind)
// ==========================================
// 入库/出库,预测引擎只消费出库记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    Entry, // 入库
    Exit,  // 出库
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementKind::Entry => write!(f, "ENTRY"),
            MovementKind::Exit => write!(f, "EXIT"),
        }
    }
}

impl MovementKind {
    /// 从字符串解析移动类型(大小写不敏感,导入层使用)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ENTRY" | "IN" => Some(MovementKind::Entry),
            "EXIT" | "OUT" => Some(MovementKind::Exit),
            _ => None,
        }
    }
}

// ==========================================
// 紧急等级 (Urgency Tier)
// ==========================================
// 顺序: Low < Medium < High (与严重程度一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Low,    // 正常
    Medium, // 关注
    High,   // 紧急
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Urgency::Low => write!(f, "LOW"),
            Urgency::Medium => write!(f, "MEDIUM"),
            Urgency::High => write!(f, "HIGH"),
        }
    }
}

impl Urgency {
    /// 排序序号,0 最紧急(排序引擎使用)
    pub fn sort_rank(&self) -> u8 {
        match self {
            Urgency::High => 0,
            Urgency::Medium => 1,
            Urgency::Low => 2,
        }
    }
}

// ==========================================
// 预测置信度 (Forecast Confidence)
// ==========================================
// 依据: Forecast_Engine_Specs 4.3 - 按样本量与周期形态分档
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "LOW"),
            Confidence::Medium => write!(f, "MEDIUM"),
            Confidence::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// 消费周期形态 (Cycle Pattern)
// ==========================================
// 自相关检测的输出,Irregular 表示未检出显著周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CyclePattern {
    Monthly,    // 月度周期 (lag=1)
    Quarterly,  // 季度周期 (lag=3)
    Semiannual, // 半年周期 (lag=6)
    Annual,     // 年度周期 (lag=12)
    Irregular,  // 无显著周期
}

impl fmt::Display for CyclePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CyclePattern::Monthly => write!(f, "MONTHLY"),
            CyclePattern::Quarterly => write!(f, "QUARTERLY"),
            CyclePattern::Semiannual => write!(f, "SEMIANNUAL"),
            CyclePattern::Annual => write!(f, "ANNUAL"),
            CyclePattern::Irregular => write!(f, "IRREGULAR"),
        }
    }
}

impl CyclePattern {
    /// 自相关滞后阶数 → 周期形态
    pub fn from_lag(lag: usize) -> Option<Self> {
        match lag {
            1 => Some(CyclePattern::Monthly),
            3 => Some(CyclePattern::Quarterly),
            6 => Some(CyclePattern::Semiannual),
            12 => Some(CyclePattern::Annual),
            _ => None,
        }
    }
}

// ==========================================
// 消费趋势方向 (Trend Direction)
// ==========================================
// 前后半段均值对比: >+10% 增长, <-10% 下降, 其余平稳
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Growing,   // 增长
    Declining, // 下降
    Stable,    // 平稳
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Growing => write!(f, "GROWING"),
            TrendDirection::Declining => write!(f, "DECLINING"),
            TrendDirection::Stable => write!(f, "STABLE"),
        }
    }
}

// ==========================================
// 预测情景类型 (Scenario Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioKind {
    Optimistic,  // 乐观 (消费放缓)
    Realistic,   // 现实
    Pessimistic, // 悲观 (消费加速)
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioKind::Optimistic => write!(f, "OPTIMISTIC"),
            ScenarioKind::Realistic => write!(f, "REALISTIC"),
            ScenarioKind::Pessimistic => write!(f, "PESSIMISTIC"),
        }
    }
}
