// ==========================================
// 集成测试公共夹具
// ==========================================
// 各测试二进制按需取用
#![allow(dead_code)]

use metro_induction_aps::domain::types::{
    CertStatus, ResourceKind, WorkOrderCategory, WorkOrderPriority,
};
use metro_induction_aps::domain::vehicle::{Certification, VehicleRecord, WorkOrder};
use metro_induction_aps::domain::resource::{YardResource, YardSnapshot};
use chrono::NaiveDate;

pub fn snapshot_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

/// 有效证书的基准车辆
pub fn valid_vehicle(id: &str) -> VehicleRecord {
    VehicleRecord {
        vehicle_id: id.to_string(),
        certification: Certification {
            status: CertStatus::Valid,
            days_until_expiry: 180,
        },
        work_orders: vec![],
        branding: None,
        current_mileage_km: 1000.0,
        cumulative_mileage_km: 120_000.0,
        manufacture_year: 2020,
        seating_capacity: 300,
        current_location: "DEPOT-A".to_string(),
        held_in_maintenance: false,
    }
}

pub fn expired_vehicle(id: &str) -> VehicleRecord {
    let mut vehicle = valid_vehicle(id);
    vehicle.certification = Certification {
        status: CertStatus::Expired,
        days_until_expiry: -2,
    };
    vehicle
}

pub fn vehicle_with_critical_order(id: &str) -> VehicleRecord {
    let mut vehicle = valid_vehicle(id);
    vehicle.work_orders.push(WorkOrder {
        order_id: format!("WO-{id}"),
        priority: WorkOrderPriority::Critical,
        category: WorkOrderCategory::Mechanical,
    });
    vehicle
}

/// 指定各类台位数量的场内资源快照
pub fn yard(maintenance: usize, cleaning: usize, inspection: usize, stabling: usize) -> YardSnapshot {
    let group = |prefix: &str, kind: ResourceKind, count: usize| {
        (1..=count)
            .map(|rank| YardResource {
                resource_id: format!("{}-{:02}", prefix, rank),
                kind,
                accessibility_rank: rank as i32,
            })
            .collect::<Vec<_>>()
    };
    YardSnapshot {
        maintenance_bays: group("MB", ResourceKind::MaintenanceBay, maintenance),
        cleaning_bays: group("CB", ResourceKind::CleaningBay, cleaning),
        inspection_bays: group("IB", ResourceKind::InspectionBay, inspection),
        stabling_positions: group("SP", ResourceKind::StablingPosition, stabling),
    }
}
