// ==========================================
// 列车上线排程决策系统 - 状态分配引擎
// ==========================================
// 职责: 按评分降序一次遍历,规则序贯分配运营状态
// 输入: ScoredVehicle 列表 + 容量配置 (+ 沙盘强制状态)
// 输出: Decision 列表 (reason 仅在此生成)
// 红线: 规则 1 安全压倒容量;同分按车辆编号升序,保证字节级确定性
// ==========================================

use crate::config::OptimizationConfig;
use crate::domain::decision::{Conflict, Decision, ScoredVehicle};
use crate::domain::types::{ConflictCategory, DecisionPriority, OperationalState};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, instrument};

// ==========================================
// SlotLedger - 容量台账
// ==========================================
// 分配顺序即消费顺序,容量在排序后列表上顺序扣减
#[derive(Debug, Default)]
struct SlotLedger {
    service: usize,
    maintenance: usize,
    cleaning: usize,
    inspection: usize,
}

impl SlotLedger {
    fn consume(&mut self, state: OperationalState) {
        match state {
            OperationalState::InService => self.service += 1,
            OperationalState::Maintenance => self.maintenance += 1,
            OperationalState::Cleaning => self.cleaning += 1,
            OperationalState::Inspection => self.inspection += 1,
            OperationalState::Standby => {} // 备用不占槽位
        }
    }
}

// ==========================================
// DecisionAllocator - 状态分配引擎
// ==========================================
pub struct DecisionAllocator {
    // 无状态引擎,不需要注入依赖
}

impl DecisionAllocator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 分配运营状态 (单次运行)
    ///
    /// 规则优先级 (首条命中即定):
    /// 1) 无上线许可 => MAINTENANCE (CRITICAL),超容也计入检修台账;
    ///    规则 1 车辆在遍历前预占检修台账,台位永远先于规则 2 被拿走
    /// 2) 有关键工单: 检修容量未满 => MAINTENANCE (HIGH);
    ///    容量已满 => STANDBY 并附 CAPACITY 冲突 (关键积压不允许上线)
    /// 3) 有清洁工单且清洁容量未满 => CLEANING
    /// 4) 证书在检查窗口内到期且检查容量未满 => INSPECTION
    /// 5) 上线容量未满且评分 > 0 => IN_SERVICE (欠曝光合同抬升为 HIGH)
    /// 6) 兜底 => STANDBY (不占资源,零时长)
    ///
    /// # 参数
    /// - `scored`: 评分后的车辆列表 (顺序任意,内部重排)
    /// - `config`: 优化配置
    /// - `snapshot_date`: 快照日期 (计划时刻由此推导,保证确定性)
    /// - `forced_states`: 沙盘强制状态 (常规运行传空表)
    ///
    /// # 返回
    /// 按评分降序排列的决策列表,每车恰好一条
    #[instrument(skip(self, scored, config, forced_states), fields(
        vehicle_count = scored.len(),
        forced_count = forced_states.len()
    ))]
    pub fn allocate(
        &self,
        scored: Vec<ScoredVehicle>,
        config: &OptimizationConfig,
        snapshot_date: NaiveDate,
        forced_states: &HashMap<String, OperationalState>,
    ) -> Vec<Decision> {
        let sorted = Self::sort_for_allocation(scored);

        // 规则 1 车辆预占检修台账: 强制检修永远先于规则 2 拿到台位,
        // 与评分顺序无关
        let mut ledger = SlotLedger::default();
        ledger.maintenance = sorted
            .iter()
            .filter(|v| {
                !forced_states.contains_key(&v.record.vehicle_id)
                    && !v.record.has_operational_clearance()
            })
            .count();

        let mut decisions = Vec::with_capacity(sorted.len());

        for vehicle in &sorted {
            let decision = self.decide_single(vehicle, config, snapshot_date, forced_states, &mut ledger);
            debug!(
                vehicle_id = %decision.vehicle_id,
                state = %decision.operational_state,
                score = decision.score,
                "状态分配完成"
            );
            decisions.push(decision);
        }

        decisions
    }

    /// 评分降序排序,同分按车辆编号升序 (确定性打破平局)
    fn sort_for_allocation(mut scored: Vec<ScoredVehicle>) -> Vec<ScoredVehicle> {
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.record.vehicle_id.cmp(&b.record.vehicle_id))
        });
        scored
    }

    // ==========================================
    // 单车规则判定
    // ==========================================

    fn decide_single(
        &self,
        vehicle: &ScoredVehicle,
        config: &OptimizationConfig,
        snapshot_date: NaiveDate,
        forced_states: &HashMap<String, OperationalState>,
        ledger: &mut SlotLedger,
    ) -> Decision {
        let record = &vehicle.record;
        let capacities = &config.capacities;
        let mut reasons = Vec::new();
        let mut recommendations = Vec::new();
        let mut conflicts = Vec::new();
        // 规则 1 的台账消费已在遍历前预占
        let mut precharged = false;

        // 规则 0: 沙盘强制状态优先于全部规则 (仅 simulate_scenario 使用)
        let (state, priority) = if let Some(forced) = forced_states.get(&record.vehicle_id) {
            reasons.push(format!(
                "SCENARIO_OVERRIDE: state forced to {} by what-if override",
                forced
            ));
            (*forced, DecisionPriority::High)
        }
        // 规则 1: 无上线许可,安全压倒容量
        else if !record.has_operational_clearance() {
            reasons.push(
                "NO_CLEARANCE: certification invalid or vehicle held in workshop, maintenance is mandatory"
                    .to_string(),
            );
            precharged = true;
            (OperationalState::Maintenance, DecisionPriority::Critical)
        }
        // 规则 2: 关键工单积压 (无论是否有台位,都不允许上线)
        else if record.critical_order_count() > 0 {
            if ledger.maintenance < capacities.max_maintenance_bays {
                reasons.push(format!(
                    "CRITICAL_BACKLOG: {} critical work order(s) open, maintenance bay reserved",
                    record.critical_order_count()
                ));
                (OperationalState::Maintenance, DecisionPriority::High)
            } else {
                reasons.push(
                    "CRITICAL_BACKLOG_DEFERRED: critical work order open but no maintenance bay left, vehicle held on standby"
                        .to_string(),
                );
                conflicts.push(Conflict::new(
                    ConflictCategory::Capacity,
                    format!(
                        "MAINT_CAPACITY_SATURATED: {} critical work order(s) deferred, all {} maintenance bay(s) taken",
                        record.critical_order_count(),
                        capacities.max_maintenance_bays
                    ),
                ));
                (OperationalState::Standby, DecisionPriority::High)
            }
        }
        // 规则 3: 清洁工单 + 清洁容量未满
        else if record.has_cleaning_order() && ledger.cleaning < capacities.max_cleaning_slots {
            reasons.push("CLEANING_DUE: open cleaning work order, cleaning slot reserved".to_string());
            (OperationalState::Cleaning, DecisionPriority::Normal)
        }
        // 规则 4: 证书进入检查窗口 + 检查容量未满
        else if record.certification.expires_within(config.inspection_window_days)
            && ledger.inspection < capacities.max_inspection_bays
        {
            reasons.push(format!(
                "CERT_INSPECTION_WINDOW: certification expires in {} day(s), inspection scheduled",
                record.certification.days_until_expiry
            ));
            (OperationalState::Inspection, DecisionPriority::Normal)
        }
        // 规则 5: 上线容量未满且评分为正
        else if ledger.service < capacities.max_service_slots && vehicle.score > 0.0 {
            reasons.push(format!(
                "SERVICE_FIT: score {:.3} qualifies for revenue service",
                vehicle.score
            ));
            let priority = match &record.branding {
                Some(contract) if contract.is_under_delivering(config.contract_compliance_target) => {
                    reasons.push(format!(
                        "CONTRACT_PUSH: exposure contract at {:.0}% of target, service priority raised",
                        contract.exposure_ratio() * 100.0
                    ));
                    DecisionPriority::High
                }
                _ => DecisionPriority::Normal,
            };
            if record.certification.expires_within(config.cert_warning_window_days) {
                recommendations.push(format!(
                    "Plan inspection for {} before certification expiry in {} day(s)",
                    record.vehicle_id, record.certification.days_until_expiry
                ));
            }
            (OperationalState::InService, priority)
        }
        // 规则 6: 兜底备用
        else {
            reasons.push("STANDBY_FALLBACK: no state rule matched or capacity exhausted".to_string());
            (OperationalState::Standby, DecisionPriority::Low)
        };

        if !precharged {
            ledger.consume(state);
        }

        Decision {
            vehicle_id: record.vehicle_id.clone(),
            operational_state: state,
            score: vehicle.score,
            reasons,
            conflicts,
            recommendations,
            shunting_moves: 0,
            assigned_resource: None,
            priority,
            scheduled_time: Self::scheduled_time(state, snapshot_date),
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 计划执行时刻: 仅由状态与快照日期推导,不读壁钟
    fn scheduled_time(state: OperationalState, snapshot_date: NaiveDate) -> NaiveDateTime {
        let time = match state {
            OperationalState::InService => NaiveTime::from_hms_opt(5, 30, 0),
            OperationalState::Inspection => NaiveTime::from_hms_opt(21, 0, 0),
            OperationalState::Maintenance => NaiveTime::from_hms_opt(22, 0, 0),
            OperationalState::Cleaning => NaiveTime::from_hms_opt(23, 0, 0),
            OperationalState::Standby => NaiveTime::from_hms_opt(6, 0, 0),
        };
        snapshot_date.and_time(time.unwrap_or(NaiveTime::MIN))
    }
}

impl Default for DecisionAllocator {
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
    use crate::domain::decision::ScoreBreakdown;
    use crate::domain::types::{CertStatus, WorkOrderCategory, WorkOrderPriority};
    use crate::domain::vehicle::{BrandingContract, Certification, VehicleRecord, WorkOrder};

    fn snapshot_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn vehicle(id: &str) -> VehicleRecord {
        VehicleRecord {
            vehicle_id: id.to_string(),
            certification: Certification {
                status: CertStatus::Valid,
                days_until_expiry: 180,
            },
            work_orders: vec![],
            branding: None,
            current_mileage_km: 1000.0,
            cumulative_mileage_km: 100_000.0,
            manufacture_year: 2020,
            seating_capacity: 300,
            current_location: "DEPOT-A".to_string(),
            held_in_maintenance: false,
        }
    }

    fn scored(record: VehicleRecord, score: f64) -> ScoredVehicle {
        ScoredVehicle {
            record,
            score,
            breakdown: ScoreBreakdown {
                certification: 0.0,
                mileage_balance: 0.0,
                maintenance_urgency: 0.0,
                contract_compliance: 0.0,
                readiness: if score <= -10.0 { score } else { 0.0 },
            },
        }
    }

    fn allocate(scored_vehicles: Vec<ScoredVehicle>, config: &OptimizationConfig) -> Vec<Decision> {
        DecisionAllocator::new().allocate(scored_vehicles, config, snapshot_date(), &HashMap::new())
    }

    #[test]
    fn test_no_clearance_forced_to_maintenance_over_capacity() {
        // 测试: 规则 1 超容也强制检修
        let mut config = OptimizationConfig::default();
        config.capacities.max_maintenance_bays = 1;

        let mut expired1 = vehicle("TS-01");
        expired1.certification = Certification {
            status: CertStatus::Expired,
            days_until_expiry: -1,
        };
        let mut expired2 = vehicle("TS-02");
        expired2.certification = Certification::not_on_file();

        let decisions = allocate(vec![scored(expired1, -10.0), scored(expired2, -10.0)], &config);
        assert_eq!(decisions.len(), 2);
        for d in &decisions {
            assert_eq!(d.operational_state, OperationalState::Maintenance);
            assert_eq!(d.priority, DecisionPriority::Critical);
            assert!(d.reasons[0].contains("NO_CLEARANCE"));
        }
    }

    #[test]
    fn test_critical_order_respects_capacity() {
        // 测试: 规则 2 受容量约束,超出后落入后续规则
        let mut config = OptimizationConfig::default();
        config.capacities.max_maintenance_bays = 1;

        let mut v1 = vehicle("TS-01");
        v1.work_orders = vec![WorkOrder {
            order_id: "WO-1".to_string(),
            priority: WorkOrderPriority::Critical,
            category: WorkOrderCategory::Mechanical,
        }];
        let mut v2 = vehicle("TS-02");
        v2.work_orders = v1.work_orders.clone();

        // v1 分高先占台位;v2 无台位 => 备用并附容量冲突
        let decisions = allocate(vec![scored(v1, 0.9), scored(v2, -0.5)], &config);
        assert_eq!(decisions[0].vehicle_id, "TS-01");
        assert_eq!(decisions[0].operational_state, OperationalState::Maintenance);
        assert_eq!(decisions[0].priority, DecisionPriority::High);
        assert_eq!(decisions[1].operational_state, OperationalState::Standby);
        assert!(decisions[1]
            .conflicts
            .iter()
            .any(|c| c.category == ConflictCategory::Capacity));
    }

    #[test]
    fn test_forced_maintenance_wins_bay_over_critical_order() {
        // 测试: 规则 1 预占台账,分高的规则 2 车辆也抢不走唯一台位
        let mut config = OptimizationConfig::default();
        config.capacities.max_maintenance_bays = 1;

        let mut expired = vehicle("TS-01");
        expired.certification = Certification {
            status: CertStatus::Expired,
            days_until_expiry: -1,
        };
        let mut backlog = vehicle("TS-02");
        backlog.work_orders = vec![WorkOrder {
            order_id: "WO-2".to_string(),
            priority: WorkOrderPriority::Critical,
            category: WorkOrderCategory::Mechanical,
        }];

        // backlog 分数远高于 expired,仍然拿不到台位
        let decisions = allocate(vec![scored(expired, -10.0), scored(backlog, 0.9)], &config);
        let by_id = |id: &str| decisions.iter().find(|d| d.vehicle_id == id).unwrap();
        assert_eq!(by_id("TS-01").operational_state, OperationalState::Maintenance);
        assert_eq!(by_id("TS-02").operational_state, OperationalState::Standby);
        assert!(by_id("TS-02")
            .conflicts
            .iter()
            .any(|c| c.message.starts_with("MAINT_CAPACITY_SATURATED")));
    }

    #[test]
    fn test_cleaning_and_inspection_rules() {
        let config = OptimizationConfig::default();

        let mut cleaner = vehicle("TS-01");
        cleaner.work_orders = vec![WorkOrder {
            order_id: "WO-C".to_string(),
            priority: WorkOrderPriority::Low,
            category: WorkOrderCategory::Cleaning,
        }];

        let mut inspect = vehicle("TS-02");
        inspect.certification.days_until_expiry = 10; // 检查窗口 14 天内

        let decisions = allocate(vec![scored(cleaner, 0.8), scored(inspect, 0.7)], &config);
        assert_eq!(decisions[0].operational_state, OperationalState::Cleaning);
        assert!(decisions[0].reasons[0].contains("CLEANING_DUE"));
        assert_eq!(decisions[1].operational_state, OperationalState::Inspection);
        assert!(decisions[1].reasons[0].contains("CERT_INSPECTION_WINDOW"));
    }

    #[test]
    fn test_service_requires_positive_score() {
        let config = OptimizationConfig::default();
        let decisions = allocate(
            vec![scored(vehicle("TS-01"), 0.6), scored(vehicle("TS-02"), -0.1)],
            &config,
        );
        assert_eq!(decisions[0].operational_state, OperationalState::InService);
        assert_eq!(decisions[1].operational_state, OperationalState::Standby);
    }

    #[test]
    fn test_under_delivering_contract_raises_priority() {
        let config = OptimizationConfig::default();
        let mut v = vehicle("TS-01");
        v.branding = Some(BrandingContract {
            contract_id: "AD-1".to_string(),
            target_exposure_hours: 100.0,
            delivered_exposure_hours: 30.0,
            priority_weight: 1.0,
        });
        let decisions = allocate(vec![scored(v, 0.9)], &config);
        assert_eq!(decisions[0].operational_state, OperationalState::InService);
        assert_eq!(decisions[0].priority, DecisionPriority::High);
        assert!(decisions[0].reasons.iter().any(|r| r.contains("CONTRACT_PUSH")));
    }

    #[test]
    fn test_service_capacity_exhaustion_falls_to_standby() {
        let mut config = OptimizationConfig::default();
        config.capacities.max_service_slots = 2;
        config.capacities.min_service = 1;

        let fleet: Vec<ScoredVehicle> = (1..=4)
            .map(|i| scored(vehicle(&format!("TS-{:02}", i)), 0.5))
            .collect();
        let decisions = allocate(fleet, &config);
        let in_service = decisions
            .iter()
            .filter(|d| d.operational_state == OperationalState::InService)
            .count();
        let standby = decisions
            .iter()
            .filter(|d| d.operational_state == OperationalState::Standby)
            .count();
        assert_eq!(in_service, 2);
        assert_eq!(standby, 2);
    }

    #[test]
    fn test_tie_break_by_vehicle_id_ascending() {
        // 测试: 同分退化为按车辆编号升序,输出字节级确定
        let config = OptimizationConfig::default();
        let fleet = vec![
            scored(vehicle("TS-30"), 0.5),
            scored(vehicle("TS-10"), 0.5),
            scored(vehicle("TS-20"), 0.5),
        ];
        let decisions = allocate(fleet, &config);
        let ids: Vec<&str> = decisions.iter().map(|d| d.vehicle_id.as_str()).collect();
        assert_eq!(ids, vec!["TS-10", "TS-20", "TS-30"]);
    }

    #[test]
    fn test_determinism_identical_inputs() {
        let config = OptimizationConfig::default();
        let build = || {
            vec![
                scored(vehicle("TS-01"), 0.7),
                scored(vehicle("TS-02"), 0.7),
                scored(vehicle("TS-03"), -10.0),
            ]
        };
        let a = allocate(build(), &config);
        let b = allocate(build(), &config);
        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }

    #[test]
    fn test_forced_state_wins_over_rules() {
        // 测试: 沙盘强制状态覆盖规则 1-6
        let config = OptimizationConfig::default();
        let forced = HashMap::from([("TS-01".to_string(), OperationalState::Cleaning)]);
        let decisions = DecisionAllocator::new().allocate(
            vec![scored(vehicle("TS-01"), 0.9)],
            &config,
            snapshot_date(),
            &forced,
        );
        assert_eq!(decisions[0].operational_state, OperationalState::Cleaning);
        assert!(decisions[0].reasons[0].contains("SCENARIO_OVERRIDE"));
    }

    #[test]
    fn test_scheduled_time_derived_from_snapshot_date() {
        let config = OptimizationConfig::default();
        let decisions = allocate(vec![scored(vehicle("TS-01"), 0.5)], &config);
        assert_eq!(
            decisions[0].scheduled_time,
            snapshot_date().and_time(NaiveTime::from_hms_opt(5, 30, 0).unwrap())
        );
    }
}
