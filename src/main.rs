// ==========================================
// 列车上线排程决策系统 - 演示入口
// ==========================================
// Usage:
//   cargo run -- [fleet.json] [config.json] [db_path]
//
// 不带参数时使用内置演示车队;结果落库到 SQLite 并以 JSON 打印摘要。
// ==========================================

use anyhow::{Context, Result};
use chrono::Local;
use metro_induction_aps::engine::{InductionRepositories, InductionService};
use metro_induction_aps::repository::{InMemoryFleetReader, SqliteResultStore, StaticResourceCatalog};
use metro_induction_aps::{
    logging, BrandingContract, CertStatus, Certification, OptimizationConfig, VehicleRecord,
    WorkOrder, WorkOrderCategory, WorkOrderPriority, APP_NAME, VERSION,
};
use std::fs;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    info!(version = VERSION, "{} 启动", APP_NAME);

    let mut args = std::env::args().skip(1);
    let fleet_path = args.next();
    let config_path = args.next();
    let db_path = args.next().unwrap_or_else(|| "metro_induction.db".to_string());

    let vehicles: Vec<VehicleRecord> = match &fleet_path {
        Some(path) => {
            let payload = fs::read_to_string(path)
                .with_context(|| format!("读取车队快照失败: {path}"))?;
            serde_json::from_str(&payload).with_context(|| format!("解析车队快照失败: {path}"))?
        }
        None => demo_fleet(),
    };

    let config: OptimizationConfig = match &config_path {
        Some(path) => {
            let payload =
                fs::read_to_string(path).with_context(|| format!("读取配置失败: {path}"))?;
            serde_json::from_str(&payload).with_context(|| format!("解析配置失败: {path}"))?
        }
        None => OptimizationConfig::default(),
    };

    let store = SqliteResultStore::open(&db_path)
        .with_context(|| format!("打开结果库失败: {db_path}"))?;
    let repos = InductionRepositories::new(
        Arc::new(InMemoryFleetReader::new(vehicles)),
        Arc::new(StaticResourceCatalog::demo_depot()),
        Arc::new(store),
    );
    let service = InductionService::new(repos, config);

    let snapshot_date = Local::now().date_naive();
    let outcome = service
        .run_induction(snapshot_date)
        .await
        .context("上线排程运行失败")?;

    if let Some(err) = &outcome.persist_error {
        eprintln!("警告: 结果未落库: {err}");
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&outcome.result.summary)?
    );
    for line in &outcome.result.recommendations {
        println!("建议: {line}");
    }
    for alert in &outcome.result.alerts {
        println!("告警[{}]: {}", alert.severity, alert.message);
    }
    info!(
        result_id = %outcome.result.result_id,
        duration_ms = outcome.result.processing_duration_ms,
        "运行结束"
    );
    Ok(())
}

/// 内置演示车队: 覆盖有效/到期/在修/清洁/品牌合同多种形态
fn demo_fleet() -> Vec<VehicleRecord> {
    let base = |id: &str| VehicleRecord {
        vehicle_id: id.to_string(),
        certification: Certification {
            status: CertStatus::Valid,
            days_until_expiry: 180,
        },
        work_orders: vec![],
        branding: None,
        current_mileage_km: 1200.0,
        cumulative_mileage_km: 150_000.0,
        manufacture_year: 2019,
        seating_capacity: 310,
        current_location: "DEPOT-A".to_string(),
        held_in_maintenance: false,
    };

    let mut fleet = Vec::new();
    for i in 1..=20 {
        let mut vehicle = base(&format!("TS-{:02}", i));
        vehicle.current_mileage_km = 800.0 + (i as f64) * 55.0;
        fleet.push(vehicle);
    }

    // 证书即将到期
    fleet[2].certification.days_until_expiry = 5;
    // 证书过期
    fleet[5].certification = Certification {
        status: CertStatus::Expired,
        days_until_expiry: -3,
    };
    // 紧急工单
    fleet[8].work_orders.push(WorkOrder {
        order_id: "WO-4401".to_string(),
        priority: WorkOrderPriority::Critical,
        category: WorkOrderCategory::Mechanical,
    });
    // 待清洁
    fleet[11].work_orders.push(WorkOrder {
        order_id: "WO-4402".to_string(),
        priority: WorkOrderPriority::Medium,
        category: WorkOrderCategory::Cleaning,
    });
    // 品牌合同欠曝光
    fleet[14].branding = Some(BrandingContract {
        contract_id: "BC-07".to_string(),
        target_exposure_hours: 400.0,
        delivered_exposure_hours: 280.0,
        priority_weight: 1.2,
    });
    // 在修留置
    fleet[17].held_in_maintenance = true;

    fleet
}
