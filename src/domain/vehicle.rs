// ==========================================
// 列车上线排程决策系统 - 车辆领域模型
// ==========================================
// 职责: 车队快照的只读输入模型
// 红线: 引擎不修改 VehicleRecord,每次运行使用独立快照
// ==========================================

use crate::domain::types::{CertStatus, WorkOrderCategory, WorkOrderPriority};
use serde::{Deserialize, Serialize};

// ==========================================
// Certification - 上线安全证书
// ==========================================
// 说明: 缺失证书用 CertStatus::NotOnFile 表达,不用 Option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub status: CertStatus,     // 证书状态
    pub days_until_expiry: i64, // 距到期天数 (过期为负或 0)
}

impl Certification {
    /// 无证书记录的哨兵值
    pub fn not_on_file() -> Self {
        Self {
            status: CertStatus::NotOnFile,
            days_until_expiry: 0,
        }
    }

    /// 证书是否已失效 (过期或无证书)
    ///
    /// 复审中证书视为仍然有效;有效证书到期日当天起视为失效。
    pub fn is_invalid(&self) -> bool {
        match self.status {
            CertStatus::Expired | CertStatus::NotOnFile => true,
            CertStatus::UnderReview => false,
            CertStatus::Valid => self.days_until_expiry <= 0,
        }
    }

    /// 证书是否在指定窗口内到期 (仍有效但临近)
    pub fn expires_within(&self, window_days: i64) -> bool {
        self.status.is_operational()
            && self.days_until_expiry > 0
            && self.days_until_expiry <= window_days
    }
}

// ==========================================
// WorkOrder - 开口工单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub order_id: String,            // 工单号
    pub priority: WorkOrderPriority, // 优先级
    pub category: WorkOrderCategory, // 类别
}

// ==========================================
// BrandingContract - 广告曝光合同
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandingContract {
    pub contract_id: String,           // 合同号
    pub target_exposure_hours: f64,    // 目标曝光小时
    pub delivered_exposure_hours: f64, // 已完成曝光小时
    pub priority_weight: f64,          // 合同权重
}

impl BrandingContract {
    /// 已完成/目标曝光比 (目标为 0 时按已完成处理,避免除零)
    pub fn exposure_ratio(&self) -> f64 {
        if self.target_exposure_hours <= 0.0 {
            return 1.0;
        }
        self.delivered_exposure_hours / self.target_exposure_hours
    }

    /// 是否低于合规目标比
    pub fn is_under_delivering(&self, compliance_target: f64) -> bool {
        self.exposure_ratio() < compliance_target
    }
}

// ==========================================
// VehicleRecord - 车辆快照记录
// ==========================================
// 用途: 引擎唯一输入,由 FleetSnapshotReader 提供,已校验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub vehicle_id: String,                   // 车辆编号
    pub certification: Certification,         // 证书
    pub work_orders: Vec<WorkOrder>,          // 开口工单
    pub branding: Option<BrandingContract>,   // 广告合同 (可无)
    pub current_mileage_km: f64,              // 近期里程
    pub cumulative_mileage_km: f64,           // 累计里程
    pub manufacture_year: i32,                // 出厂年份
    pub seating_capacity: i32,                // 座位数
    pub current_location: String,             // 当前位置
    pub held_in_maintenance: bool,            // 当前处于检修占用状态
}

impl VehicleRecord {
    /// 是否具备上线许可
    ///
    /// # 规则
    /// - 证书过期或无证书: 不具备
    /// - 当前处于检修占用: 不具备
    pub fn has_operational_clearance(&self) -> bool {
        !self.certification.is_invalid() && !self.held_in_maintenance
    }

    /// 关键优先级工单数量
    pub fn critical_order_count(&self) -> usize {
        self.work_orders
            .iter()
            .filter(|o| o.priority == WorkOrderPriority::Critical)
            .count()
    }

    /// 开口工单总数
    pub fn open_order_count(&self) -> usize {
        self.work_orders.len()
    }

    /// 是否存在清洁类工单
    pub fn has_cleaning_order(&self) -> bool {
        self.work_orders
            .iter()
            .any(|o| o.category == WorkOrderCategory::Cleaning)
    }
}
