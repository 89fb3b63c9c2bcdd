use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio_util::sync::CancellationToken;

use crate::auth::JwtService;
use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::db::repository::{
    ChatRepository, CheckInRepository, EmergencyRepository, ForumRepository, GroceryRepository,
    HealthRepository, PrescriptionRepository, RatingRepository, TaskRepository, UserRepository,
    VoiceRepository,
};
use crate::live::EventHub;
use crate::notify::{MailTransport, ReminderMailer, SmtpMailer};
use crate::scheduler::ReminderScanner;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是浅拷贝 (`Surreal<Db>`、`Arc`、broadcast sender)，Clone 成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | hub | EventHub | 实时事件分发 |
/// | users / tasks / emergency / chat | *Repository | 数据访问 |
/// | prescriptions / grocery / forum / health / check_ins / ratings / voice | *Repository | 社区与照护记录 |
/// | mailer | ReminderMailer | 提醒邮件投递 |
/// | shutdown | CancellationToken | 进程级关闭信号 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub hub: EventHub,
    pub users: UserRepository,
    pub tasks: TaskRepository,
    pub emergency: EmergencyRepository,
    pub chat: ChatRepository,
    pub prescriptions: PrescriptionRepository,
    pub grocery: GroceryRepository,
    pub forum: ForumRepository,
    pub health: HealthRepository,
    pub check_ins: CheckInRepository,
    pub ratings: RatingRepository,
    pub voice: VoiceRepository,
    pub mailer: ReminderMailer,
    pub shutdown: CancellationToken,
}

impl ServerState {
    /// 用已打开的数据库和任意邮件传输构造状态
    ///
    /// 测试中传入内存 transport；生产环境由 [`initialize()`](Self::initialize) 调用
    pub fn new(config: Config, db: Surreal<Db>, transport: Arc<dyn MailTransport>) -> Self {
        let users = UserRepository::new(db.clone());
        let mailer = ReminderMailer::new(transport, Arc::new(users.clone()));

        Self {
            jwt_service: Arc::new(JwtService::new(&config.jwt)),
            hub: EventHub::new(config.live_channel_capacity),
            tasks: TaskRepository::new(db.clone()),
            emergency: EmergencyRepository::new(db.clone()),
            chat: ChatRepository::new(db.clone()),
            prescriptions: PrescriptionRepository::new(db.clone()),
            grocery: GroceryRepository::new(db.clone()),
            forum: ForumRepository::new(db.clone()),
            health: HealthRepository::new(db.clone()),
            check_ins: CheckInRepository::new(db.clone()),
            ratings: RatingRepository::new(db.clone()),
            voice: VoiceRepository::new(db.clone()),
            users,
            mailer,
            shutdown: CancellationToken::new(),
            config,
            db,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 打开数据库 (DATABASE_PATH)
    /// 2. 构建 SMTP transport
    /// 3. 创建 EventHub 和各 repository
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path).await?.db;
        let transport = SmtpMailer::new(&config.smtp)?;
        Ok(Self::new(config.clone(), db, Arc::new(transport)))
    }

    /// 启动后台任务: 提醒扫描器
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let scanner = ReminderScanner::new(
            Arc::new(self.tasks.clone()),
            self.mailer.clone(),
            self.hub.clone(),
            self.config.reminder_scan_interval,
            tasks.shutdown_token(),
        );
        tasks.spawn("reminder_scanner", scanner.run());
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 获取关闭信号
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}
