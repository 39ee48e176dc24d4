// ==========================================
// 列车上线排程决策系统 - 领域类型定义
// ==========================================
// 职责: 运营状态/优先级/告警等级等核心枚举
// 序列化格式: SCREAMING_SNAKE_CASE (与持久化及前端约定一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 运营状态 (Operational State)
// ==========================================
// 红线: 每车每次运行恰好一个状态,互斥
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationalState {
    InService,   // 上线载客
    Maintenance, // 检修
    Cleaning,    // 清洁
    Inspection,  // 检查
    Standby,     // 备用
}

impl fmt::Display for OperationalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationalState::InService => write!(f, "IN_SERVICE"),
            OperationalState::Maintenance => write!(f, "MAINTENANCE"),
            OperationalState::Cleaning => write!(f, "CLEANING"),
            OperationalState::Inspection => write!(f, "INSPECTION"),
            OperationalState::Standby => write!(f, "STANDBY"),
        }
    }
}

// ==========================================
// 决策优先级 (Decision Priority)
// ==========================================
// 顺序: Low < Normal < High < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionPriority {
    Low,      // 低
    Normal,   // 正常
    High,     // 高
    Critical, // 红线
}

impl fmt::Display for DecisionPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionPriority::Low => write!(f, "LOW"),
            DecisionPriority::Normal => write!(f, "NORMAL"),
            DecisionPriority::High => write!(f, "HIGH"),
            DecisionPriority::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// 证书状态 (Certification Status)
// ==========================================
// 红线: "无证书" 是显式哨兵状态,不允许用 Option 表达缺失
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertStatus {
    Valid,       // 有效
    UnderReview, // 复审中
    Expired,     // 已过期
    NotOnFile,   // 无证书记录
}

impl CertStatus {
    /// 是否具备上线资格 (过期/无证书均不具备)
    pub fn is_operational(&self) -> bool {
        matches!(self, CertStatus::Valid | CertStatus::UnderReview)
    }
}

impl fmt::Display for CertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertStatus::Valid => write!(f, "VALID"),
            CertStatus::UnderReview => write!(f, "UNDER_REVIEW"),
            CertStatus::Expired => write!(f, "EXPIRED"),
            CertStatus::NotOnFile => write!(f, "NOT_ON_FILE"),
        }
    }
}

// ==========================================
// 工单优先级 (Work Order Priority)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkOrderPriority {
    Low,      // 低
    Medium,   // 中
    High,     // 高
    Critical, // 关键
}

impl fmt::Display for WorkOrderPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkOrderPriority::Low => write!(f, "LOW"),
            WorkOrderPriority::Medium => write!(f, "MEDIUM"),
            WorkOrderPriority::High => write!(f, "HIGH"),
            WorkOrderPriority::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// 工单类别 (Work Order Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkOrderCategory {
    Mechanical, // 机械
    Electrical, // 电气
    Cleaning,   // 清洁
    Inspection, // 检查
}

impl fmt::Display for WorkOrderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkOrderCategory::Mechanical => write!(f, "MECHANICAL"),
            WorkOrderCategory::Electrical => write!(f, "ELECTRICAL"),
            WorkOrderCategory::Cleaning => write!(f, "CLEANING"),
            WorkOrderCategory::Inspection => write!(f, "INSPECTION"),
        }
    }
}

// ==========================================
// 冲突类别 (Conflict Category)
// ==========================================
// 红线: 冲突是附着在决策上的数据,不是运行失败
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictCategory {
    Capacity,   // 容量超限
    Compliance, // 合规缺口
    Shunting,   // 调车超限
    Resource,   // 资源冲突/耗尽
}

impl fmt::Display for ConflictCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictCategory::Capacity => write!(f, "CAPACITY"),
            ConflictCategory::Compliance => write!(f, "COMPLIANCE"),
            ConflictCategory::Shunting => write!(f, "SHUNTING"),
            ConflictCategory::Resource => write!(f, "RESOURCE"),
        }
    }
}

// ==========================================
// 告警等级 (Alert Severity)
// ==========================================
// 顺序: Info < Warning < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Info,     // 提示
    Warning,  // 警告
    Critical, // 红线
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Info => write!(f, "INFO"),
            AlertSeverity::Warning => write!(f, "WARNING"),
            AlertSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// 场内资源类型 (Yard Resource Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    MaintenanceBay,   // 检修台位
    CleaningBay,      // 清洁台位
    InspectionBay,    // 检查台位
    StablingPosition, // 存车股道
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::MaintenanceBay => write!(f, "MAINTENANCE_BAY"),
            ResourceKind::CleaningBay => write!(f, "CLEANING_BAY"),
            ResourceKind::InspectionBay => write!(f, "INSPECTION_BAY"),
            ResourceKind::StablingPosition => write!(f, "STABLING_POSITION"),
        }
    }
}
