// ==========================================
// 列车上线排程决策系统 - 优化配置
// ==========================================
// 职责: 权重/容量/阈值等策略参数
// 红线: 权重是配置,不是硬编码业务逻辑
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 权重和校验的允许误差
const WEIGHT_SUM_EPSILON: f64 = 1e-6;

// ==========================================
// ScoringWeights - 评分分量权重
// ==========================================
// 约定: 四个分量权重之和固定为 expected_total (就绪分量为哨兵,不参与加权)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// 证书分量权重
    #[serde(default = "ScoringWeights::default_certification")]
    pub certification: f64,

    /// 里程均衡分量权重
    #[serde(default = "ScoringWeights::default_mileage_balance")]
    pub mileage_balance: f64,

    /// 检修紧迫度分量权重
    #[serde(default = "ScoringWeights::default_maintenance_urgency")]
    pub maintenance_urgency: f64,

    /// 合同合规分量权重
    #[serde(default = "ScoringWeights::default_contract_compliance")]
    pub contract_compliance: f64,

    /// 四分量权重之和的期望值
    #[serde(default = "ScoringWeights::default_expected_total")]
    pub expected_total: f64,
}

impl ScoringWeights {
    fn default_certification() -> f64 {
        0.30
    }
    fn default_mileage_balance() -> f64 {
        0.25
    }
    fn default_maintenance_urgency() -> f64 {
        0.25
    }
    fn default_contract_compliance() -> f64 {
        0.20
    }
    fn default_expected_total() -> f64 {
        1.0
    }

    /// 权重之和
    pub fn sum(&self) -> f64 {
        self.certification + self.mileage_balance + self.maintenance_urgency + self.contract_compliance
    }

    /// 权重之和是否等于期望值 (浮点容差)
    pub fn is_balanced(&self) -> bool {
        (self.sum() - self.expected_total).abs() < WEIGHT_SUM_EPSILON
    }

    /// 以配置映射 {component: weight} 的形式导出 (审计/前端展示用)
    pub fn as_map(&self) -> HashMap<String, f64> {
        HashMap::from([
            ("certification".to_string(), self.certification),
            ("mileage_balance".to_string(), self.mileage_balance),
            ("maintenance_urgency".to_string(), self.maintenance_urgency),
            ("contract_compliance".to_string(), self.contract_compliance),
        ])
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            certification: Self::default_certification(),
            mileage_balance: Self::default_mileage_balance(),
            maintenance_urgency: Self::default_maintenance_urgency(),
            contract_compliance: Self::default_contract_compliance(),
            expected_total: Self::default_expected_total(),
        }
    }
}

// ==========================================
// CapacityConfig - 槽位容量配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityConfig {
    /// 最低上线数 (软约束,不满足时产生冲突)
    pub min_service: usize,
    /// 上线槽位上限
    pub max_service_slots: usize,
    /// 检修台位上限
    pub max_maintenance_bays: usize,
    /// 清洁槽位上限
    pub max_cleaning_slots: usize,
    /// 检查台位上限
    pub max_inspection_bays: usize,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            min_service: 14,
            max_service_slots: 18,
            max_maintenance_bays: 4,
            max_cleaning_slots: 3,
            max_inspection_bays: 2,
        }
    }
}

// ==========================================
// OptimizationConfig - 优化运行配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// 槽位容量
    #[serde(default)]
    pub capacities: CapacityConfig,

    /// 评分权重
    #[serde(default)]
    pub weights: ScoringWeights,

    /// 证书临界窗口 (天),窗口内扣大额罚分
    #[serde(default = "OptimizationConfig::default_cert_critical_window_days")]
    pub cert_critical_window_days: i64,

    /// 证书预警窗口 (天),窗口内扣小额罚分
    #[serde(default = "OptimizationConfig::default_cert_warning_window_days")]
    pub cert_warning_window_days: i64,

    /// 临界窗口罚分
    #[serde(default = "OptimizationConfig::default_cert_critical_penalty")]
    pub cert_critical_penalty: f64,

    /// 预警窗口罚分
    #[serde(default = "OptimizationConfig::default_cert_warning_penalty")]
    pub cert_warning_penalty: f64,

    /// 检查窗口 (天): 证书在该窗口内到期的车辆优先安排检查
    #[serde(default = "OptimizationConfig::default_inspection_window_days")]
    pub inspection_window_days: i64,

    /// 合同合规目标比 (delivered/target 低于该值视为欠曝光)
    #[serde(default = "OptimizationConfig::default_contract_compliance_target")]
    pub contract_compliance_target: f64,

    /// 单次运行调车次数合计上限
    #[serde(default = "OptimizationConfig::default_max_total_shunting_moves")]
    pub max_total_shunting_moves: i32,

    /// 调车能耗基线 (次),用于节能估算
    #[serde(default = "OptimizationConfig::default_shunting_baseline_moves")]
    pub shunting_baseline_moves: i32,

    /// 单次调车能耗 (kWh)
    #[serde(default = "OptimizationConfig::default_energy_per_move_kwh")]
    pub energy_per_move_kwh: f64,

    /// 检修台位利用率建议阈值
    #[serde(default = "OptimizationConfig::default_bay_utilization_warn_ratio")]
    pub bay_utilization_warn_ratio: f64,

    /// 上线可用率建议阈值
    #[serde(default = "OptimizationConfig::default_service_availability_warn_ratio")]
    pub service_availability_warn_ratio: f64,
}

impl OptimizationConfig {
    fn default_cert_critical_window_days() -> i64 {
        7
    }
    fn default_cert_warning_window_days() -> i64 {
        30
    }
    fn default_cert_critical_penalty() -> f64 {
        0.30
    }
    fn default_cert_warning_penalty() -> f64 {
        0.10
    }
    fn default_inspection_window_days() -> i64 {
        14
    }
    fn default_contract_compliance_target() -> f64 {
        0.90
    }
    fn default_max_total_shunting_moves() -> i32 {
        40
    }
    fn default_shunting_baseline_moves() -> i32 {
        48
    }
    fn default_energy_per_move_kwh() -> f64 {
        15.0
    }
    fn default_bay_utilization_warn_ratio() -> f64 {
        0.90
    }
    fn default_service_availability_warn_ratio() -> f64 {
        0.70
    }

    /// 配置自检,在引擎启动前调用
    ///
    /// # 返回
    /// 违规描述列表,为空表示配置合法
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if !self.weights.is_balanced() {
            violations.push(format!(
                "WEIGHT_SUM_MISMATCH: component weights sum to {:.6}, expected {:.6}",
                self.weights.sum(),
                self.weights.expected_total
            ));
        }
        for (name, w) in self.weights.as_map() {
            if !(0.0..=1.0).contains(&w) {
                violations.push(format!("WEIGHT_OUT_OF_RANGE: {} = {}", name, w));
            }
        }
        if self.capacities.min_service > self.capacities.max_service_slots {
            violations.push(format!(
                "SERVICE_BOUNDS_INVERTED: min_service {} > max_service_slots {}",
                self.capacities.min_service, self.capacities.max_service_slots
            ));
        }
        if self.cert_critical_window_days > self.cert_warning_window_days {
            violations.push(format!(
                "CERT_WINDOWS_INVERTED: critical {} > warning {}",
                self.cert_critical_window_days, self.cert_warning_window_days
            ));
        }
        if !(0.0..=1.0).contains(&self.contract_compliance_target) {
            violations.push(format!(
                "COMPLIANCE_TARGET_OUT_OF_RANGE: {}",
                self.contract_compliance_target
            ));
        }
        if self.max_total_shunting_moves < 0 {
            violations.push(format!(
                "SHUNTING_LIMIT_NEGATIVE: {}",
                self.max_total_shunting_moves
            ));
        }

        violations
    }
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            capacities: CapacityConfig::default(),
            weights: ScoringWeights::default(),
            cert_critical_window_days: Self::default_cert_critical_window_days(),
            cert_warning_window_days: Self::default_cert_warning_window_days(),
            cert_critical_penalty: Self::default_cert_critical_penalty(),
            cert_warning_penalty: Self::default_cert_warning_penalty(),
            inspection_window_days: Self::default_inspection_window_days(),
            contract_compliance_target: Self::default_contract_compliance_target(),
            max_total_shunting_moves: Self::default_max_total_shunting_moves(),
            shunting_baseline_moves: Self::default_shunting_baseline_moves(),
            energy_per_move_kwh: Self::default_energy_per_move_kwh(),
            bay_utilization_warn_ratio: Self::default_bay_utilization_warn_ratio(),
            service_availability_warn_ratio: Self::default_service_availability_warn_ratio(),
        }
    }
}
