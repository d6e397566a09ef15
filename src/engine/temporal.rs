// ==========================================
// 库存补货预测系统 - 时序分析引擎
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 4.1 Temporal Analyzer
// 红线: 数据不足时输出中性画像,不得抛错
// ==========================================
// 职责: 季节性检测 + 周期检测 + 趋势判定
// 输入: 产品出库记录 (月度聚合)
// 输出: TemporalProfile (时序画像)
// ==========================================

use crate::config::ForecastParameters;
use crate::domain::movement::MovementRecord;
use crate::domain::profile::TemporalProfile;
use crate::domain::types::{CyclePattern, TrendDirection};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

// ==========================================
// 回看窗口 (Lookback Window)
// ==========================================

/// 回看窗口选取结果
///
/// records 为窗口内按时间升序的出库记录;
/// widened 表示默认窗口记录不足、已加宽到扩展窗口。
#[derive(Debug, Clone)]
pub struct LookbackWindow {
    /// 窗口长度 (天)
    pub window_days: i64,

    /// 窗口内出库记录 (时间升序)
    pub records: Vec<MovementRecord>,

    /// 是否已加宽
    pub widened: bool,
}

impl LookbackWindow {
    /// 窗口内出库总量
    pub fn total_exit_qty(&self) -> i64 {
        self.records.iter().map(|r| r.quantity as i64).sum()
    }
}

// ==========================================
// TemporalAnalyzer - 时序分析引擎
// ==========================================
pub struct TemporalAnalyzer {
    // 无状态引擎,参数由调用方传入
}

impl TemporalAnalyzer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 选取回看窗口
    ///
    /// 默认窗口 (90 天) 内出库记录不足 min_window_records 条时,
    /// 加宽到扩展窗口 (180 天)。只保留出库类型记录。
    ///
    /// # 参数
    /// - `movements`: 产品全部移动记录
    /// - `today`: 当前日期
    /// - `params`: 预测参数
    #[instrument(skip(self, movements, params), fields(count = movements.len()))]
    pub fn select_window(
        &self,
        movements: &[MovementRecord],
        today: NaiveDate,
        params: &ForecastParameters,
    ) -> LookbackWindow {
        let mut records = self.exits_within(movements, today, params.lookback_days);
        let mut window_days = params.lookback_days;
        let mut widened = false;

        // 记录不足 → 加宽窗口
        if records.len() < params.min_window_records {
            records = self.exits_within(movements, today, params.extended_lookback_days);
            window_days = params.extended_lookback_days;
            widened = true;
            debug!(
                records = records.len(),
                window_days, "lookback window widened"
            );
        }

        records.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at));

        LookbackWindow {
            window_days,
            records,
            widened,
        }
    }

    /// 分析时序画像
    ///
    /// # 步骤
    /// 1. 记录不足 → 中性画像
    /// 2. 按年月聚合出库量
    /// 3. 计算季节因子并判定季节性
    /// 4. 自相关周期检测
    /// 5. 前后半段趋势判定
    #[instrument(skip(self, window, params), fields(records = window.records.len()))]
    pub fn analyze(&self, window: &LookbackWindow, params: &ForecastParameters) -> TemporalProfile {
        // 1. 数据不足 → 中性画像
        if window.records.len() < params.min_usable_records {
            debug!(
                records = window.records.len(),
                min = params.min_usable_records,
                "insufficient records, neutral profile"
            );
            let mut profile = TemporalProfile::neutral();
            profile.sample_count = window.records.len();
            return profile;
        }

        // 2. 按年月聚合 (BTreeMap 保证时间升序)
        let monthly = self.aggregate_by_month(&window.records);
        let series: Vec<f64> = monthly.values().copied().collect();

        // 3. 季节因子
        let (seasonal_factors, seasonal) = self.compute_seasonal_factors(&monthly, params);

        // 4. 周期检测
        let cycle = self.detect_cycle(&series, seasonal, params);

        // 5. 趋势判定
        let (trend, trend_rate_pct) = self.detect_trend(&series, params);

        TemporalProfile {
            seasonal,
            seasonal_factors,
            cycle,
            trend,
            trend_rate_pct,
            sample_count: window.records.len(),
        }
    }

    // ==========================================
    // 窗口过滤
    // ==========================================

    /// 窗口内的出库记录 (时间戳落在 [today - days, today])
    fn exits_within(
        &self,
        movements: &[MovementRecord],
        today: NaiveDate,
        days: i64,
    ) -> Vec<MovementRecord> {
        let cutoff = today - Duration::days(days);
        movements
            .iter()
            .filter(|m| m.is_exit())
            .filter(|m| {
                let d = m.occurred_at.date_naive();
                d >= cutoff && d <= today
            })
            .cloned()
            .collect()
    }

    // ==========================================
    // 月度聚合与季节因子 (依据 Forecast_Engine_Specs 4.1)
    // ==========================================

    /// 按 (年, 月) 聚合出库量
    fn aggregate_by_month(&self, records: &[MovementRecord]) -> BTreeMap<(i32, u32), f64> {
        let mut monthly: BTreeMap<(i32, u32), f64> = BTreeMap::new();
        for rec in records {
            let d = rec.occurred_at.date_naive();
            *monthly.entry((d.year(), d.month())).or_insert(0.0) += rec.quantity as f64;
        }
        monthly
    }

    /// 计算季节因子并判定季节性
    ///
    /// factor(自然月) = 该月均值 / 总体均值;
    /// 季节性 = 覆盖自然月数 >= min_seasonal_months 且 max|factor-1| > 阈值。
    ///
    /// # 返回
    /// (月 → 因子, 是否季节性)
    fn compute_seasonal_factors(
        &self,
        monthly: &BTreeMap<(i32, u32), f64>,
        params: &ForecastParameters,
    ) -> (std::collections::HashMap<u32, f64>, bool) {
        let mut factors = std::collections::HashMap::new();
        if monthly.is_empty() {
            return (factors, false);
        }

        let overall_avg = monthly.values().sum::<f64>() / monthly.len() as f64;
        if overall_avg <= f64::EPSILON {
            return (factors, false);
        }

        // 同一自然月跨年取均值
        let mut per_month: std::collections::HashMap<u32, (f64, usize)> =
            std::collections::HashMap::new();
        for (&(_, month), &qty) in monthly {
            let entry = per_month.entry(month).or_insert((0.0, 0));
            entry.0 += qty;
            entry.1 += 1;
        }

        let mut max_deviation = 0.0_f64;
        for (month, (sum, count)) in &per_month {
            let factor = (sum / *count as f64) / overall_avg;
            max_deviation = max_deviation.max((factor - 1.0).abs());
            factors.insert(*month, factor);
        }

        let seasonal =
            per_month.len() >= params.min_seasonal_months && max_deviation > params.seasonality_threshold;

        (factors, seasonal)
    }

    // ==========================================
    // 周期检测 (自相关)
    // ==========================================

    /// 周期检测
    ///
    /// 规则:
    /// - 有序样本 < autocorr_min_samples: 有季节性 → Annual, 否则 Irregular
    /// - 在滞后 {1,3,6,12} 上取自相关系数最高者,超过阈值才接受
    fn detect_cycle(
        &self,
        series: &[f64],
        seasonal: bool,
        params: &ForecastParameters,
    ) -> CyclePattern {
        if series.len() < params.autocorr_min_samples {
            return if seasonal {
                CyclePattern::Annual
            } else {
                CyclePattern::Irregular
            };
        }

        let mut best: Option<(usize, f64)> = None;
        for &lag in &[1usize, 3, 6, 12] {
            if let Some(coeff) = self.autocorrelation(series, lag) {
                debug!(lag, coeff, "autocorrelation");
                match best {
                    Some((_, best_coeff)) if coeff <= best_coeff => {}
                    _ => best = Some((lag, coeff)),
                }
            }
        }

        match best {
            Some((lag, coeff)) if coeff > params.autocorr_threshold => {
                CyclePattern::from_lag(lag).unwrap_or(CyclePattern::Irregular)
            }
            _ => CyclePattern::Irregular,
        }
    }

    /// 自相关系数
    ///
    /// r(lag) = Σ(xᵢ-μ)(xᵢ₊lag-μ) / Σ(xᵢ-μ)²
    ///
    /// 常数序列 (分母为 0) 或 lag 超界时返回 None。
    fn autocorrelation(&self, series: &[f64], lag: usize) -> Option<f64> {
        let n = series.len();
        if lag >= n {
            return None;
        }

        let mean = series.iter().sum::<f64>() / n as f64;
        let denom: f64 = series.iter().map(|x| (x - mean).powi(2)).sum();
        if denom <= f64::EPSILON {
            return None;
        }

        let num: f64 = (0..n - lag)
            .map(|i| (series[i] - mean) * (series[i + lag] - mean))
            .sum();

        Some(num / denom)
    }

    // ==========================================
    // 趋势判定 (前后半段均值对比)
    // ==========================================

    /// 趋势判定
    ///
    /// 有序月度序列从中点切分,比较前后半段均值:
    /// 差值 > +阈值 → Growing, < -阈值 → Declining, 其余 Stable。
    ///
    /// # 返回
    /// (趋势方向, 趋势速率百分比)
    fn detect_trend(&self, series: &[f64], params: &ForecastParameters) -> (TrendDirection, f64) {
        if series.len() < 2 {
            return (TrendDirection::Stable, 0.0);
        }

        let mid = series.len() / 2;
        let first_mean = series[..mid].iter().sum::<f64>() / mid as f64;
        let second_mean = series[mid..].iter().sum::<f64>() / (series.len() - mid) as f64;

        if first_mean <= f64::EPSILON {
            return (TrendDirection::Stable, 0.0);
        }

        let rate_pct = (second_mean - first_mean) / first_mean * 100.0;
        let direction = if rate_pct > params.trend_threshold_pct {
            TrendDirection::Growing
        } else if rate_pct < -params.trend_threshold_pct {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        };

        (direction, rate_pct)
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for TemporalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::MovementKind;
    use chrono::{TimeZone, Utc};

    fn exit_on(year: i32, month: u32, day: u32, qty: u32) -> MovementRecord {
        MovementRecord::new(
            "P001".to_string(),
            MovementKind::Exit,
            qty,
            Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
        )
    }

    fn entry_on(year: i32, month: u32, day: u32, qty: u32) -> MovementRecord {
        MovementRecord::new(
            "P001".to_string(),
            MovementKind::Entry,
            qty,
            Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    #[test]
    fn test_select_window_excludes_entries() {
        let analyzer = TemporalAnalyzer::new();
        let params = ForecastParameters::default();
        let movements = vec![
            exit_on(2026, 7, 1, 10),
            entry_on(2026, 7, 2, 50),
            exit_on(2026, 7, 10, 10),
            exit_on(2026, 7, 20, 10),
            exit_on(2026, 7, 25, 10),
            exit_on(2026, 8, 1, 10),
        ];

        let window = analyzer.select_window(&movements, today(), &params);

        assert_eq!(window.records.len(), 5);
        assert_eq!(window.window_days, 90);
        assert!(!window.widened);
        assert_eq!(window.total_exit_qty(), 50);
    }

    #[test]
    fn test_select_window_widens_when_sparse() {
        let analyzer = TemporalAnalyzer::new();
        let params = ForecastParameters::default();
        // 90 天窗口内只有 2 条, 150 天前还有 3 条
        let movements = vec![
            exit_on(2026, 3, 10, 5),
            exit_on(2026, 3, 20, 5),
            exit_on(2026, 4, 1, 5),
            exit_on(2026, 7, 1, 5),
            exit_on(2026, 7, 15, 5),
        ];

        let window = analyzer.select_window(&movements, today(), &params);

        assert!(window.widened);
        assert_eq!(window.window_days, 180);
        assert_eq!(window.records.len(), 5);
    }

    #[test]
    fn test_analyze_insufficient_records_is_neutral() {
        let analyzer = TemporalAnalyzer::new();
        let params = ForecastParameters::default();
        let movements = vec![exit_on(2026, 7, 1, 10), exit_on(2026, 7, 15, 10)];

        let window = analyzer.select_window(&movements, today(), &params);
        let profile = analyzer.analyze(&window, &params);

        assert!(!profile.seasonal);
        assert_eq!(profile.cycle, CyclePattern::Irregular);
        assert_eq!(profile.trend, TrendDirection::Stable);
        assert_eq!(profile.sample_count, 2);
    }

    #[test]
    fn test_seasonal_factors_average_to_one() {
        let analyzer = TemporalAnalyzer::new();
        let params = ForecastParameters::default();
        // 三个月均匀消费,每月各一笔
        let movements = vec![
            exit_on(2026, 6, 5, 30),
            exit_on(2026, 7, 5, 10),
            exit_on(2026, 8, 1, 20),
        ];

        let window = analyzer.select_window(&movements, today(), &params);
        let profile = analyzer.analyze(&window, &params);

        let avg: f64 =
            profile.seasonal_factors.values().sum::<f64>() / profile.seasonal_factors.len() as f64;
        assert!((avg - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_seasonality_detection() {
        let analyzer = TemporalAnalyzer::new();
        let params = ForecastParameters::default();
        // 月度差异显著: 30/10/20 → max|factor-1| = 0.5 > 0.2
        let movements = vec![
            exit_on(2026, 6, 5, 30),
            exit_on(2026, 7, 5, 10),
            exit_on(2026, 8, 1, 20),
        ];

        let window = analyzer.select_window(&movements, today(), &params);
        let profile = analyzer.analyze(&window, &params);

        assert!(profile.seasonal);
        // 样本月数 < 12 且有季节性 → 默认年度周期
        assert_eq!(profile.cycle, CyclePattern::Annual);
    }

    #[test]
    fn test_flat_consumption_not_seasonal() {
        let analyzer = TemporalAnalyzer::new();
        let params = ForecastParameters::default();
        let movements = vec![
            exit_on(2026, 6, 5, 20),
            exit_on(2026, 7, 5, 20),
            exit_on(2026, 8, 1, 20),
        ];

        let window = analyzer.select_window(&movements, today(), &params);
        let profile = analyzer.analyze(&window, &params);

        assert!(!profile.seasonal);
        assert_eq!(profile.cycle, CyclePattern::Irregular);
    }

    #[test]
    fn test_growing_trend() {
        let analyzer = TemporalAnalyzer::new();
        let params = ForecastParameters::default();
        // 后半段均值明显高于前半段
        let movements = vec![
            exit_on(2026, 6, 5, 10),
            exit_on(2026, 7, 5, 20),
            exit_on(2026, 8, 1, 30),
        ];

        let window = analyzer.select_window(&movements, today(), &params);
        let profile = analyzer.analyze(&window, &params);

        // 前半段 [10], 后半段 [20,30] → +150%
        assert_eq!(profile.trend, TrendDirection::Growing);
        assert!(profile.trend_rate_pct > 100.0);
    }

    #[test]
    fn test_declining_trend() {
        let analyzer = TemporalAnalyzer::new();
        let params = ForecastParameters::default();
        let movements = vec![
            exit_on(2026, 6, 5, 40),
            exit_on(2026, 7, 5, 20),
            exit_on(2026, 8, 1, 10),
        ];

        let window = analyzer.select_window(&movements, today(), &params);
        let profile = analyzer.analyze(&window, &params);

        assert_eq!(profile.trend, TrendDirection::Declining);
        assert!(profile.trend_rate_pct < -10.0);
    }

    #[test]
    fn test_autocorrelation_detects_quarterly_cycle() {
        let analyzer = TemporalAnalyzer::new();
        let params = ForecastParameters::default();
        // 12 个月,周期 3 的锯齿序列
        let series: Vec<f64> = (0..12)
            .map(|i| match i % 3 {
                0 => 30.0,
                1 => 10.0,
                _ => 20.0,
            })
            .collect();

        let cycle = analyzer.detect_cycle(&series, false, &params);
        assert_eq!(cycle, CyclePattern::Quarterly);
    }

    #[test]
    fn test_autocorrelation_constant_series_is_none() {
        let analyzer = TemporalAnalyzer::new();
        let series = vec![5.0; 12];
        assert!(analyzer.autocorrelation(&series, 3).is_none());
    }
}
