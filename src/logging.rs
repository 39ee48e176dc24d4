// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 默认过滤: 第三方 crate 压到 warn,本引擎保持 info
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 未设置 RUST_LOG 时的默认过滤指令
///
/// 排程运行的步骤日志全部在本 crate 下,依赖库 (sqlite/runtime)
/// 的 info 噪声对操作员无意义,默认压到 warn
pub const DEFAULT_ENV_FILTER: &str = "warn,metro_induction_aps=info";

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器,覆盖默认指令
///   例如: RUST_LOG=debug 或 RUST_LOG=metro_induction_aps=trace
///
/// # 示例
/// ```no_run
/// use metro_induction_aps::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_ENV_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// 初始化测试环境的日志系统
///
/// 本 crate 开 debug 便于追踪流水线各阶段,其余保持 warn
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("warn,metro_induction_aps=debug"))
        .with_test_writer()
        .try_init();
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_targets_this_crate() {
        // 默认指令须带本 crate 的定向级别,且能被 EnvFilter 解析
        assert!(DEFAULT_ENV_FILTER.contains("metro_induction_aps="));
        let filter: EnvFilter = DEFAULT_ENV_FILTER.parse().unwrap();
        assert!(!filter.to_string().is_empty());
    }
}
