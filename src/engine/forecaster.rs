// ==========================================
// 库存补货预测系统 - 消费预测引擎
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 4.2 Consumption Forecaster
// 红线: 情景概率为启发式权重,保持行为兼容,不得当作校准概率
// ==========================================
// 职责: 基线/调整消费速率 + 乐观/现实/悲观三情景
// 输入: 在库数量 + 回看窗口 + 时序画像
// 输出: ConsumptionForecast
// ==========================================

use crate::config::ForecastParameters;
use crate::domain::profile::{ConsumptionForecast, ForecastScenario, TemporalProfile};
use crate::domain::types::ScenarioKind;
use crate::engine::temporal::LookbackWindow;
use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, instrument};

// 情景概率权重 (现实, 乐观, 悲观) - 启发式常量
const PROB_DEFAULT: (f64, f64, f64) = (0.6, 0.2, 0.2);
// 现实剩余天数 > 90 时放宽不确定性
const PROB_WIDE: (f64, f64, f64) = (0.5, 0.25, 0.25);
// 现实剩余天数 < 30 时收紧
const PROB_SHARP: (f64, f64, f64) = (0.7, 0.15, 0.15);

// 预期偏差基数
const DEVIATION_BASE: f64 = 0.1;
const DEVIATION_SEASONAL: f64 = 0.15;
const DEVIATION_IRREGULAR: f64 = 0.2;

// ==========================================
// ConsumptionForecaster - 消费预测引擎
// ==========================================
pub struct ConsumptionForecaster {
    // 无状态引擎
}

impl ConsumptionForecaster {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成消费预测
    ///
    /// # 步骤
    /// 1. 基线速率 = 窗口出库总量 / 窗口天数
    /// 2. 调整速率 = 基线 x 当月季节因子 x 趋势修正
    /// 3. 调整速率 <= 0 → 终态"不会耗尽"
    /// 4. 构造现实/乐观/悲观三情景
    ///
    /// # 参数
    /// - `quantity`: 当前在库数量
    /// - `window`: 回看窗口
    /// - `profile`: 时序画像
    /// - `today`: 当前日期
    #[instrument(skip(self, window, profile, params), fields(window_days = window.window_days))]
    pub fn forecast(
        &self,
        quantity: i64,
        window: &LookbackWindow,
        profile: &TemporalProfile,
        today: NaiveDate,
        params: &ForecastParameters,
    ) -> ConsumptionForecast {
        // 1. 基线速率 (窗口天数为 0 时显式归零,不做除法)
        let baseline_rate = if window.window_days > 0 {
            window.total_exit_qty() as f64 / window.window_days as f64
        } else {
            0.0
        };

        // 2. 调整速率
        let mut adjusted_rate = baseline_rate;
        if profile.seasonal {
            adjusted_rate *= profile.factor_for_month(today.month());
        }
        if profile.is_trending() {
            adjusted_rate *= 1.0 + profile.trend_rate_pct / 100.0;
        }

        // 3. 零消费终态
        if adjusted_rate <= 0.0 {
            debug!(baseline_rate, "adjusted rate non-positive, no depletion");
            return ConsumptionForecast::no_depletion(baseline_rate);
        }

        // 4. 三情景
        let realistic_days = self.days_remaining(quantity, adjusted_rate);
        let (p_real, p_opt, p_pess) = self.probability_split(realistic_days);
        let base_deviation = self.base_deviation(profile);

        let scenarios = vec![
            self.build_scenario(
                ScenarioKind::Realistic,
                adjusted_rate,
                1.0,
                quantity,
                today,
                p_real,
                base_deviation,
            ),
            self.build_scenario(
                ScenarioKind::Optimistic,
                adjusted_rate * params.optimistic_rate_factor,
                params.optimistic_rate_factor,
                quantity,
                today,
                p_opt,
                base_deviation,
            ),
            self.build_scenario(
                ScenarioKind::Pessimistic,
                adjusted_rate * params.pessimistic_rate_factor,
                params.pessimistic_rate_factor,
                quantity,
                today,
                p_pess,
                base_deviation,
            ),
        ];

        ConsumptionForecast {
            baseline_rate,
            adjusted_rate,
            scenarios,
        }
    }

    // ==========================================
    // 情景构造
    // ==========================================

    /// 构造单一情景
    ///
    /// expected_deviation = 偏差基数 x 情景速率系数
    fn build_scenario(
        &self,
        kind: ScenarioKind,
        daily_rate: f64,
        rate_factor: f64,
        quantity: i64,
        today: NaiveDate,
        probability: f64,
        base_deviation: f64,
    ) -> ForecastScenario {
        let days = self.days_remaining(quantity, daily_rate);
        let depletion_date = days.map(|d| today + Duration::days(d));

        ForecastScenario {
            kind,
            daily_rate,
            days_remaining: days,
            depletion_date,
            probability,
            expected_deviation: base_deviation * rate_factor,
        }
    }

    /// 剩余天数 = floor(quantity / rate), 速率非正时为 None
    fn days_remaining(&self, quantity: i64, rate: f64) -> Option<i64> {
        if rate <= 0.0 {
            return None;
        }
        Some(((quantity.max(0) as f64) / rate).floor() as i64)
    }

    /// 概率权重分档 (现实, 乐观, 悲观)
    fn probability_split(&self, realistic_days: Option<i64>) -> (f64, f64, f64) {
        match realistic_days {
            Some(d) if d > 90 => PROB_WIDE,
            Some(d) if d < 30 => PROB_SHARP,
            _ => PROB_DEFAULT,
        }
    }

    /// 偏差基数: 无显著周期 > 季节性 > 常规
    fn base_deviation(&self, profile: &TemporalProfile) -> f64 {
        if profile.cycle == crate::domain::types::CyclePattern::Irregular {
            DEVIATION_IRREGULAR
        } else if profile.seasonal {
            DEVIATION_SEASONAL
        } else {
            DEVIATION_BASE
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for ConsumptionForecaster {
    fn default() -> Self {
        Self::new()
    }
}
