use std::sync::Arc;

use crate::auth::{JwtService, PasswordHasher};
use crate::core::{Config, Result};
use crate::db::Store;
use crate::seed;
use crate::services::{ImportService, ReferenceService, TicketService, UserService};

/// 服务器状态 - 持有所有服务的引用
///
/// ServerState 是 Clone 的，克隆成本低 (Store 与 JwtService 均为 Arc)。
/// 每个请求的 Actor 单独解析，不保存在状态中。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 服务器配置 |
/// | store | redb 实体存储 |
/// | jwt_service | JWT 令牌服务 |
/// | tickets | 工单生命周期服务 |
/// | users | 用户管理服务 |
/// | reference | 指挥部/单位参考数据服务 |
/// | import | 批量导入服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub store: Store,
    pub jwt_service: Arc<JwtService>,
    pub tickets: TicketService,
    pub users: UserService,
    pub reference: ReferenceService,
    pub import: ImportService,
}

impl ServerState {
    /// 基于已打开的存储构建状态 (不写入初始数据)
    pub fn new(config: Config, store: Store) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let hasher = PasswordHasher::new(config.password_cost);

        Self {
            tickets: TicketService::new(store.clone()),
            users: UserService::new(store.clone(), hasher),
            reference: ReferenceService::new(store.clone()),
            import: ImportService::new(store.clone()),
            config,
            store,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 创建工作目录结构
    /// 2. 打开数据库 (work_dir/database/tickets.redb)
    /// 3. 空库时写入管理员账号 (以及可选的演示数据)
    pub fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_path();
        let store = Store::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Database opened");

        let state = Self::new(config.clone(), store);
        seed::bootstrap(&state)?;
        Ok(state)
    }

    /// 内存数据库状态 (测试用)
    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Store::open_in_memory()?;
        let state = Self::new(config, store);
        seed::bootstrap(&state)?;
        Ok(state)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}
