use crate::inventory::OverconsumptionPolicy;
use std::path::PathBuf;

/// 快照数据库文件名 (位于工作目录下)
const SNAPSHOT_FILE: &str = "pos-snapshot.redb";

/// POS 核心配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (快照文件) |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_DIR | (无) | 日志目录，设置后按天滚动写文件 |
/// | BOOKING_BACKEND_URL | http://localhost:5000/api | 预订后端地址 |
/// | CATALOG_BACKEND_URL | http://localhost:5001/api | 菜单/库存后端地址 |
/// | REQUEST_TIMEOUT_MS | 10000 | 请求超时(毫秒) |
/// | SNAPSHOT_INTERVAL_SECS | 60 | 快照间隔(秒) |
/// | RESERVATION_SLOT_MINUTES | 120 | 预订时段长度(分钟) |
/// | OVERCONSUMPTION_POLICY | clamp | 库存不足策略: clamp \| reject |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/pos OVERCONSUMPTION_POLICY=reject cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储快照等文件
    pub work_dir: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<String>,
    /// 预订后端 URL (桌台查询、预订、订单追加)
    pub booking_backend_url: String,
    /// 菜单/库存后端 URL
    pub catalog_backend_url: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 快照间隔 (秒)
    pub snapshot_interval_secs: u64,
    /// 预订占用时段 (分钟)，可用桌台查询按此窗口判断冲突
    pub reservation_slot_minutes: i64,
    /// 消耗超过库存时的处理策略
    pub overconsumption_policy: OverconsumptionPolicy,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            booking_backend_url: std::env::var("BOOKING_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".into()),
            catalog_backend_url: std::env::var("CATALOG_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:5001/api".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            snapshot_interval_secs: std::env::var("SNAPSHOT_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(60),
            reservation_slot_minutes: std::env::var("RESERVATION_SLOT_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|mins| *mins > 0)
                .unwrap_or(120),
            overconsumption_policy: std::env::var("OVERCONSUMPTION_POLICY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// 使用自定义工作目录覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, policy: OverconsumptionPolicy) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.overconsumption_policy = policy;
        config
    }

    /// 快照数据库路径
    pub fn snapshot_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(SNAPSHOT_FILE)
    }

    /// 预订时段长度 (毫秒)
    pub fn reservation_slot_millis(&self) -> i64 {
        self.reservation_slot_minutes * 60 * 1000
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_keep_defaults() {
        let config = Config::with_overrides("/tmp/pos-test", OverconsumptionPolicy::Reject);
        assert_eq!(config.work_dir, "/tmp/pos-test");
        assert_eq!(config.overconsumption_policy, OverconsumptionPolicy::Reject);
        assert!(config.snapshot_path().ends_with(SNAPSHOT_FILE));
        assert!(config.reservation_slot_millis() > 0);
    }
}
