// ==========================================
// 列车上线排程决策系统 - 评分引擎
// ==========================================
// 职责: 五分量加权评分,分量先截断后加权
// 输入: 车辆快照列表 + 优化配置
// 输出: ScoredVehicle 列表 (一一对应)
// 红线: 无状态引擎,单车评分相互独立,可并行
// ==========================================

use crate::config::OptimizationConfig;
use crate::domain::decision::{ScoreBreakdown, ScoredVehicle};
use crate::domain::types::CertStatus;
use crate::domain::vehicle::VehicleRecord;
use rayon::prelude::*;
use tracing::{debug, instrument};

/// 无上线许可时的评分哨兵,压过其余全部分量
pub const READINESS_SENTINEL: f64 = -10.0;

/// 关键工单对检修紧迫度的单位扣减
const CRITICAL_ORDER_FACTOR: f64 = 0.2;
/// 普通工单对检修紧迫度的单位扣减
const OPEN_ORDER_FACTOR: f64 = 0.1;

// ==========================================
// ScoreEngine - 评分引擎
// ==========================================
pub struct ScoreEngine {
    // 无状态引擎,配置由调用方传入
}

impl ScoreEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 整队评分
    ///
    /// 单车评分相互独立,按 rayon 并行计算;collect 保序,
    /// 因此并行不影响确定性。
    ///
    /// # 参数
    /// - `vehicles`: 车队快照
    /// - `config`: 优化配置
    ///
    /// # 返回
    /// 与输入一一对应的 ScoredVehicle 列表
    #[instrument(skip(self, vehicles, config), fields(fleet_size = vehicles.len()))]
    pub fn score_fleet(
        &self,
        vehicles: &[VehicleRecord],
        config: &OptimizationConfig,
    ) -> Vec<ScoredVehicle> {
        let fleet_average = Self::fleet_average_mileage(vehicles);
        debug!(fleet_average_mileage_km = fleet_average, "车队平均里程计算完成");

        vehicles
            .par_iter()
            .map(|record| self.score_vehicle(record, fleet_average, config))
            .collect()
    }

    /// 单车评分
    pub fn score_vehicle(
        &self,
        record: &VehicleRecord,
        fleet_average_mileage: f64,
        config: &OptimizationConfig,
    ) -> ScoredVehicle {
        // 就绪哨兵: 无上线许可的车辆直接压到大额负分,
        // 其余分量不再参与,确保该车绝不会被排入载客服务
        if !record.has_operational_clearance() {
            return ScoredVehicle {
                record: record.clone(),
                score: READINESS_SENTINEL,
                breakdown: ScoreBreakdown {
                    certification: 0.0,
                    mileage_balance: 0.0,
                    maintenance_urgency: 0.0,
                    contract_compliance: 0.0,
                    readiness: READINESS_SENTINEL,
                },
            };
        }

        let certification = self.certification_component(record, config);
        let mileage_balance = self.mileage_component(record, fleet_average_mileage, config);
        let maintenance_urgency = self.maintenance_component(record, config);
        let contract_compliance = self.contract_component(record, config);

        let breakdown = ScoreBreakdown {
            certification,
            mileage_balance,
            maintenance_urgency,
            contract_compliance,
            readiness: 0.0,
        };

        ScoredVehicle {
            record: record.clone(),
            score: certification + mileage_balance + maintenance_urgency + contract_compliance,
            breakdown,
        }
    }

    // ==========================================
    // 分量计算
    // ==========================================

    /// 证书分量 = (certScore/10) * w_cert - 窗口罚分
    ///
    /// certScore ∈ [0,10]: 有效=10,复审中=5,过期/无证书=0;
    /// 临界窗口 (默认 <=7 天) 扣大额罚分,预警窗口 (默认 <=30 天) 扣小额罚分
    fn certification_component(&self, record: &VehicleRecord, config: &OptimizationConfig) -> f64 {
        let cert = &record.certification;
        let cert_score: f64 = match cert.status {
            CertStatus::Valid => 10.0,
            CertStatus::UnderReview => 5.0,
            CertStatus::Expired | CertStatus::NotOnFile => 0.0,
        };
        let cert_score = cert_score.clamp(0.0, 10.0);

        let mut component = (cert_score / 10.0) * config.weights.certification;
        if cert.expires_within(config.cert_critical_window_days) {
            component -= config.cert_critical_penalty;
        } else if cert.expires_within(config.cert_warning_window_days) {
            component -= config.cert_warning_penalty;
        }
        component
    }

    /// 里程均衡分量 = (1 - min(|m - avg| / avg, 1)) * w_mileage
    ///
    /// 车队平均里程为 0 (空队/零里程) 时定义为 0,避免除零
    fn mileage_component(
        &self,
        record: &VehicleRecord,
        fleet_average_mileage: f64,
        config: &OptimizationConfig,
    ) -> f64 {
        if fleet_average_mileage <= 0.0 {
            return 0.0;
        }
        let deviation =
            ((record.current_mileage_km - fleet_average_mileage) / fleet_average_mileage).abs();
        (1.0 - deviation.min(1.0)) * config.weights.mileage_balance
    }

    /// 检修紧迫度分量 = max(0, 1 - (关键工单*0.2 + 总工单*0.1)) * w_maintenance
    fn maintenance_component(&self, record: &VehicleRecord, config: &OptimizationConfig) -> f64 {
        let backlog = record.critical_order_count() as f64 * CRITICAL_ORDER_FACTOR
            + record.open_order_count() as f64 * OPEN_ORDER_FACTOR;
        (1.0 - backlog).max(0.0) * config.weights.maintenance_urgency
    }

    /// 合同合规分量: 欠曝光合同按 (1 - ratio) * w_contract 抬分,否则为 0
    fn contract_component(&self, record: &VehicleRecord, config: &OptimizationConfig) -> f64 {
        match &record.branding {
            Some(contract) if contract.is_under_delivering(config.contract_compliance_target) => {
                let ratio = contract.exposure_ratio().clamp(0.0, 1.0);
                (1.0 - ratio) * config.weights.contract_compliance
            }
            _ => 0.0,
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 车队平均里程 (近期里程的算术平均)
    fn fleet_average_mileage(vehicles: &[VehicleRecord]) -> f64 {
        if vehicles.is_empty() {
            return 0.0;
        }
        vehicles.iter().map(|v| v.current_mileage_km).sum::<f64>() / vehicles.len() as f64
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{WorkOrderCategory, WorkOrderPriority};
    use crate::domain::vehicle::{BrandingContract, Certification, WorkOrder};

    fn base_vehicle(id: &str, mileage: f64) -> VehicleRecord {
        VehicleRecord {
            vehicle_id: id.to_string(),
            certification: Certification {
                status: CertStatus::Valid,
                days_until_expiry: 180,
            },
            work_orders: vec![],
            branding: None,
            current_mileage_km: mileage,
            cumulative_mileage_km: mileage * 100.0,
            manufacture_year: 2020,
            seating_capacity: 300,
            current_location: "DEPOT-A".to_string(),
            held_in_maintenance: false,
        }
    }

    fn order(priority: WorkOrderPriority) -> WorkOrder {
        WorkOrder {
            order_id: "WO-X".to_string(),
            priority,
            category: WorkOrderCategory::Mechanical,
        }
    }

    #[test]
    fn test_full_score_vehicle() {
        // 测试: 证书远期有效 + 平均里程 + 无工单 => 四分量满额
        let engine = ScoreEngine::new();
        let config = OptimizationConfig::default();
        let v = base_vehicle("TS-01", 1000.0);

        let scored = engine.score_vehicle(&v, 1000.0, &config);
        assert!((scored.breakdown.certification - 0.30).abs() < 1e-9);
        assert!((scored.breakdown.mileage_balance - 0.25).abs() < 1e-9);
        assert!((scored.breakdown.maintenance_urgency - 0.25).abs() < 1e-9);
        assert_eq!(scored.breakdown.contract_compliance, 0.0);
        assert!((scored.score - 0.80).abs() < 1e-9);
    }

    #[test]
    fn test_readiness_sentinel_overrides_everything() {
        // 测试: 证书过期 => 哨兵分,其余分量归零
        let engine = ScoreEngine::new();
        let config = OptimizationConfig::default();
        let mut v = base_vehicle("TS-02", 1000.0);
        v.certification = Certification {
            status: CertStatus::Expired,
            days_until_expiry: -5,
        };

        let scored = engine.score_vehicle(&v, 1000.0, &config);
        assert_eq!(scored.score, READINESS_SENTINEL);
        assert_eq!(scored.breakdown.readiness, READINESS_SENTINEL);
        assert_eq!(scored.breakdown.certification, 0.0);

        // 检修占用同样触发哨兵
        let mut held = base_vehicle("TS-03", 1000.0);
        held.held_in_maintenance = true;
        assert_eq!(engine.score_vehicle(&held, 1000.0, &config).score, READINESS_SENTINEL);
    }

    #[test]
    fn test_cert_window_penalties() {
        let engine = ScoreEngine::new();
        let config = OptimizationConfig::default();

        // 临界窗口 (<=7 天): 0.30 - 0.30
        let mut critical = base_vehicle("TS-04", 1000.0);
        critical.certification.days_until_expiry = 5;
        let scored = engine.score_vehicle(&critical, 1000.0, &config);
        assert!((scored.breakdown.certification - 0.0).abs() < 1e-9);

        // 预警窗口 (<=30 天): 0.30 - 0.10
        let mut warning = base_vehicle("TS-05", 1000.0);
        warning.certification.days_until_expiry = 20;
        let scored = engine.score_vehicle(&warning, 1000.0, &config);
        assert!((scored.breakdown.certification - 0.20).abs() < 1e-9);
    }

    #[test]
    fn test_under_review_mid_score() {
        let engine = ScoreEngine::new();
        let config = OptimizationConfig::default();
        let mut v = base_vehicle("TS-06", 1000.0);
        v.certification = Certification {
            status: CertStatus::UnderReview,
            days_until_expiry: 60,
        };
        let scored = engine.score_vehicle(&v, 1000.0, &config);
        assert!((scored.breakdown.certification - 0.15).abs() < 1e-9); // 5/10 * 0.30
    }

    #[test]
    fn test_mileage_component_zero_average() {
        // 测试: 车队平均里程为 0 => 分量为 0,不除零
        let engine = ScoreEngine::new();
        let config = OptimizationConfig::default();
        let v = base_vehicle("TS-07", 0.0);
        let scored = engine.score_vehicle(&v, 0.0, &config);
        assert_eq!(scored.breakdown.mileage_balance, 0.0);
    }

    #[test]
    fn test_mileage_deviation_capped_at_one() {
        // 测试: 偏离超过 100% 时分量截断到 0 而不是负数
        let engine = ScoreEngine::new();
        let config = OptimizationConfig::default();
        let v = base_vehicle("TS-08", 5000.0);
        let scored = engine.score_vehicle(&v, 1000.0, &config);
        assert_eq!(scored.breakdown.mileage_balance, 0.0);
    }

    #[test]
    fn test_maintenance_component_floor_zero() {
        // 测试: 大量工单时分量不为负
        let engine = ScoreEngine::new();
        let config = OptimizationConfig::default();
        let mut v = base_vehicle("TS-09", 1000.0);
        v.work_orders = (0..12).map(|_| order(WorkOrderPriority::Critical)).collect();
        let scored = engine.score_vehicle(&v, 1000.0, &config);
        assert_eq!(scored.breakdown.maintenance_urgency, 0.0);
    }

    #[test]
    fn test_contract_component_only_when_under_delivering() {
        let engine = ScoreEngine::new();
        let config = OptimizationConfig::default();

        let mut under = base_vehicle("TS-10", 1000.0);
        under.branding = Some(BrandingContract {
            contract_id: "AD-1".to_string(),
            target_exposure_hours: 100.0,
            delivered_exposure_hours: 40.0,
            priority_weight: 1.0,
        });
        let scored = engine.score_vehicle(&under, 1000.0, &config);
        // (1 - 0.4) * 0.20
        assert!((scored.breakdown.contract_compliance - 0.12).abs() < 1e-9);

        let mut ok = base_vehicle("TS-11", 1000.0);
        ok.branding = Some(BrandingContract {
            contract_id: "AD-2".to_string(),
            target_exposure_hours: 100.0,
            delivered_exposure_hours: 95.0,
            priority_weight: 1.0,
        });
        assert_eq!(
            engine.score_vehicle(&ok, 1000.0, &config).breakdown.contract_compliance,
            0.0
        );
    }

    #[test]
    fn test_score_fleet_order_preserving() {
        // 测试: 并行评分保持输入顺序,一一对应
        let engine = ScoreEngine::new();
        let config = OptimizationConfig::default();
        let fleet: Vec<VehicleRecord> = (0..25)
            .map(|i| base_vehicle(&format!("TS-{:02}", i), 900.0 + i as f64 * 10.0))
            .collect();

        let scored = engine.score_fleet(&fleet, &config);
        assert_eq!(scored.len(), fleet.len());
        for (record, scored) in fleet.iter().zip(scored.iter()) {
            assert_eq!(record.vehicle_id, scored.record.vehicle_id);
        }
    }
}
