// ==========================================
// 列车上线排程决策系统 - 运行结果仓储
// ==========================================
// 职责: InductionResultSet 的只追加存储
// 红线: 只 INSERT,绝不 UPDATE;新运行产生新记录
// 存储: induction_result 表,整体 JSON + 可索引列
// ==========================================

use crate::domain::result::InductionResultSet;
use crate::engine::repositories::ResultPersister;
use crate::repository::error::RepositoryError;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

// ==========================================
// SqliteResultStore - SQLite 结果仓储
// ==========================================
pub struct SqliteResultStore {
    conn: Mutex<Connection>,
}

impl SqliteResultStore {
    /// 打开 (或创建) 指定路径的结果库
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 内存库 (测试/沙盘用)
    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 建表 (幂等)
    fn init_schema(conn: &Connection) -> Result<(), RepositoryError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS induction_result (
                result_id       TEXT PRIMARY KEY,
                snapshot_date   TEXT NOT NULL,
                created_at      TEXT NOT NULL,
                decision_count  INTEGER NOT NULL,
                compliance_rate REAL NOT NULL,
                payload_json    TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_induction_result_snapshot_date
                ON induction_result (snapshot_date);
            "#,
        )?;
        Ok(())
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 追加一条运行结果
    ///
    /// # 返回
    /// 持久化句柄 (result_id)
    pub fn insert(&self, result: &InductionResultSet) -> Result<String, RepositoryError> {
        let payload = serde_json::to_string(result)?;
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::InternalError(format!("lock poisoned: {e}")))?;

        conn.execute(
            r#"
            INSERT INTO induction_result
                (result_id, snapshot_date, created_at, decision_count, compliance_rate, payload_json)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                result.result_id,
                result.metadata.snapshot_date.to_string(),
                result.created_at.to_string(),
                result.decisions.len() as i64,
                result.summary.compliance_rate,
                payload,
            ],
        )?;

        info!(result_id = %result.result_id, "运行结果已落库");
        Ok(result.result_id.clone())
    }

    /// 按 ID 读取结果
    pub fn find_by_id(&self, result_id: &str) -> Result<InductionResultSet, RepositoryError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::InternalError(format!("lock poisoned: {e}")))?;

        let payload: String = conn
            .query_row(
                "SELECT payload_json FROM induction_result WHERE result_id = ?1",
                params![result_id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                    entity: "induction_result".to_string(),
                    id: result_id.to_string(),
                },
                other => other.into(),
            })?;

        Ok(serde_json::from_str(&payload)?)
    }

    /// 最近 N 条结果 (驾驶舱历史视图用),按创建时间降序
    pub fn list_recent(&self, limit: usize) -> Result<Vec<InductionResultSet>, RepositoryError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::InternalError(format!("lock poisoned: {e}")))?;

        let mut statement = conn.prepare(
            "SELECT payload_json FROM induction_result ORDER BY created_at DESC, result_id DESC LIMIT ?1",
        )?;
        let rows = statement.query_map(params![limit as i64], |row| row.get::<_, String>(0))?;

        let mut results = Vec::new();
        for payload in rows {
            results.push(serde_json::from_str(&payload?)?);
        }
        debug!(count = results.len(), "历史结果读取完成");
        Ok(results)
    }
}

// ==========================================
// ResultPersister trait 实现
// ==========================================
// 写入为本地 SQLite,同步完成,无需切换阻塞线程池
#[async_trait]
impl ResultPersister for SqliteResultStore {
    async fn save(&self, result: &InductionResultSet) -> Result<String, RepositoryError> {
        self.insert(result)
    }
}
