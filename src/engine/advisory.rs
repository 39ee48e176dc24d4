// ==========================================
// 列车上线排程决策系统 - 建议与告警引擎
// ==========================================
// 职责: 基于最终决策集与原始快照生成建议清单和结构化告警
// 红线: 纯函数,同输入同输出,无副作用
// ==========================================

use crate::config::OptimizationConfig;
use crate::domain::decision::Decision;
use crate::domain::result::Alert;
use crate::domain::types::{AlertSeverity, OperationalState};
use crate::domain::vehicle::VehicleRecord;
use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::instrument;

/// 告警类别常量
const CATEGORY_CERTIFICATION: &str = "CERTIFICATION";
const CATEGORY_MAINTENANCE: &str = "MAINTENANCE";
const CATEGORY_CAPACITY: &str = "CAPACITY";

// ==========================================
// AdvisoryEngine - 建议与告警引擎
// ==========================================
pub struct AdvisoryEngine {
    // 无状态引擎,所有方法都是纯函数
}

impl AdvisoryEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成建议与告警
    ///
    /// # 参数
    /// - `decisions`: 冲突检测后的决策列表
    /// - `vehicles`: 原始车队快照
    /// - `snapshot_date`: 快照日期 (告警期限由此推导)
    /// - `config`: 优化配置
    ///
    /// # 返回
    /// (建议清单, 告警清单)
    #[instrument(skip_all, fields(decision_count = decisions.len()))]
    pub fn generate(
        &self,
        decisions: &[Decision],
        vehicles: &[VehicleRecord],
        snapshot_date: NaiveDate,
        config: &OptimizationConfig,
    ) -> (Vec<String>, Vec<Alert>) {
        (
            self.build_recommendations(decisions, vehicles, config),
            self.build_alerts(decisions, vehicles, snapshot_date, config),
        )
    }

    // ==========================================
    // 建议生成 (固定阈值驱动)
    // ==========================================

    fn build_recommendations(
        &self,
        decisions: &[Decision],
        vehicles: &[VehicleRecord],
        config: &OptimizationConfig,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();
        let total = decisions.len();
        if total == 0 {
            return recommendations;
        }

        // 检修台位利用率
        let maintenance_count = Self::count_state(decisions, OperationalState::Maintenance);
        let max_bays = config.capacities.max_maintenance_bays;
        if max_bays > 0 {
            let utilization = maintenance_count as f64 / max_bays as f64;
            if utilization > config.bay_utilization_warn_ratio {
                recommendations.push(format!(
                    "Maintenance bay utilization at {:.0}% ({}/{} bays); consider deferring non-critical work orders",
                    utilization * 100.0,
                    maintenance_count,
                    max_bays
                ));
            }
        }

        // 上线可用率
        let service_count = Self::count_state(decisions, OperationalState::InService);
        let availability = service_count as f64 / total as f64;
        if availability < config.service_availability_warn_ratio {
            recommendations.push(format!(
                "Service availability at {:.0}% ({}/{} vehicles); review standby pool and open work orders",
                availability * 100.0,
                service_count,
                total
            ));
        }

        // 证书到期梯队
        let expiring = vehicles
            .iter()
            .filter(|v| v.certification.expires_within(config.cert_warning_window_days))
            .count();
        if expiring > 0 {
            recommendations.push(format!(
                "{} certification(s) expiring within {} days; schedule renewals to protect service capacity",
                expiring, config.cert_warning_window_days
            ));
        }

        // 曝光合同风险
        let at_risk = vehicles
            .iter()
            .filter(|v| {
                v.branding
                    .as_ref()
                    .map(|c| c.is_under_delivering(config.contract_compliance_target))
                    .unwrap_or(false)
            })
            .count();
        if at_risk > 0 {
            recommendations.push(format!(
                "{} vehicle(s) at risk of breaching exposure contracts; prioritize them for revenue service",
                at_risk
            ));
        }

        // 调车节能估算 (与固定基线比较)
        let total_moves: i32 = decisions.iter().map(|d| d.shunting_moves).sum();
        let saved_moves = config.shunting_baseline_moves - total_moves;
        if saved_moves > 0 {
            recommendations.push(format!(
                "Estimated energy saving of {:.0} kWh from {} fewer shunting move(s) vs baseline {}",
                saved_moves as f64 * config.energy_per_move_kwh,
                saved_moves,
                config.shunting_baseline_moves
            ));
        }

        // 冲突汇总
        let conflict_total: usize = decisions.iter().map(|d| d.conflicts.len()).sum();
        if conflict_total > 0 {
            let affected = decisions.iter().filter(|d| !d.is_conflict_free()).count();
            recommendations.push(format!(
                "{} conflict(s) across {} decision(s) require manual review before dispatch",
                conflict_total, affected
            ));
        }

        recommendations
    }

    // ==========================================
    // 告警生成 (结构化)
    // ==========================================

    fn build_alerts(
        &self,
        decisions: &[Decision],
        vehicles: &[VehicleRecord],
        snapshot_date: NaiveDate,
        config: &OptimizationConfig,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();
        let day_end = |offset_days: i64| {
            Some(
                (snapshot_date + Duration::days(offset_days))
                    .and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)),
            )
        };

        for vehicle in vehicles {
            let cert = &vehicle.certification;

            // 证书已失效: 立即处置
            if cert.is_invalid() {
                alerts.push(Alert {
                    severity: AlertSeverity::Critical,
                    category: CATEGORY_CERTIFICATION.to_string(),
                    vehicle_id: Some(vehicle.vehicle_id.clone()),
                    message: format!(
                        "Certification for {} is {}; vehicle is barred from service",
                        vehicle.vehicle_id, cert.status
                    ),
                    action: "Keep in maintenance and renew certification immediately".to_string(),
                    deadline: day_end(0),
                });
            }
            // 临界窗口内到期
            else if cert.expires_within(config.cert_critical_window_days) {
                alerts.push(Alert {
                    severity: AlertSeverity::Warning,
                    category: CATEGORY_CERTIFICATION.to_string(),
                    vehicle_id: Some(vehicle.vehicle_id.clone()),
                    message: format!(
                        "Certification for {} expires in {} day(s)",
                        vehicle.vehicle_id, cert.days_until_expiry
                    ),
                    action: "Book inspection and renewal before expiry".to_string(),
                    deadline: day_end(cert.days_until_expiry),
                });
            }

            // 关键工单积压
            let critical_orders = vehicle.critical_order_count();
            if critical_orders > 0 {
                alerts.push(Alert {
                    severity: AlertSeverity::Warning,
                    category: CATEGORY_MAINTENANCE.to_string(),
                    vehicle_id: Some(vehicle.vehicle_id.clone()),
                    message: format!(
                        "{} has {} critical work order(s) open",
                        vehicle.vehicle_id, critical_orders
                    ),
                    action: "Allocate maintenance bay at next opportunity".to_string(),
                    deadline: day_end(1),
                });
            }
        }

        // 容量趋于饱和: 提示级
        let maintenance_count = Self::count_state(decisions, OperationalState::Maintenance);
        let max_bays = config.capacities.max_maintenance_bays;
        if max_bays > 0 && maintenance_count as f64 / max_bays as f64 >= config.bay_utilization_warn_ratio {
            alerts.push(Alert {
                severity: AlertSeverity::Info,
                category: CATEGORY_CAPACITY.to_string(),
                vehicle_id: None,
                message: format!(
                    "Maintenance bays nearing saturation: {}/{} occupied",
                    maintenance_count, max_bays
                ),
                action: "Review tomorrow's bay plan and defer low-priority orders".to_string(),
                deadline: day_end(1),
            });
        }

        alerts
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn count_state(decisions: &[Decision], state: OperationalState) -> usize {
        decisions
            .iter()
            .filter(|d| d.operational_state == state)
            .count()
    }
}

impl Default for AdvisoryEngine {
    fn default() -> Self {
        Self::new()
    }
}
