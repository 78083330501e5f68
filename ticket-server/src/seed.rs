//! 初始数据 - 空库时创建管理员账号 (可选演示数据)
//!
//! 只在没有任何用户时执行，已有数据的库不会被修改。

use shared::models::{Comment, Priority, Status, UserCreate};
use shared::util::now_millis;

use crate::core::{Result, ServerError, ServerState};
use crate::db::{commit, repository};
use crate::services::tickets::{NewTicket, insert_ticket};

/// 管理员默认所在的指挥部/单位
const ADMIN_COMMAND: &str = "HQ";
const ADMIN_UNIT: &str = "Administration";

/// 开发环境下未设置 ADMIN_PASSWORD 时使用的默认密码
const DEV_ADMIN_PASSWORD: &str = "admin123";

const DEMO_COMMANDS: [(&str, &str, &[&str]); 5] = [
    (
        "District Command",
        "Regional district command",
        &["Medical Center 8282", "Electrical Unit 650", "Maintenance Unit 441", "Base 227"],
    ),
    (
        "Home Front Command",
        "Civil home front command",
        &["Battalion 331", "Maintenance Unit 412", "Base 178"],
    ),
    ("IDF", "Israel Defense Forces", &["Golani Brigade", "Paratroopers Brigade", "Unit 8200"]),
    ("Police", "Israel Police", &["Jerusalem Station", "Tel Aviv Station", "Border Police"]),
    ("Fire & Rescue", "Fire and rescue services", &["Central Station", "North Station", "Rescue Unit"]),
];

/// (username, password, role, command, unit)
const DEMO_USERS: [(&str, &str, &str, &str, &str); 3] = [
    ("technician1", "tech123", "technician", "District Command", "Electrical Unit 650"),
    ("technician2", "tech123", "technician", "Home Front Command", "Battalion 331"),
    ("viewer1", "view123", "viewer", "IDF", "Golani Brigade"),
];

struct DemoTicket {
    command: &'static str,
    unit: &'static str,
    priority: Priority,
    status: Status,
    is_recurring: bool,
    description: &'static str,
    created_by: &'static str,
    assigned_technician: Option<&'static str>,
    comment: Option<(&'static str, &'static str)>,
}

const DEMO_TICKETS: [DemoTicket; 5] = [
    DemoTicket {
        command: "Police",
        unit: "Jerusalem Station",
        priority: Priority::Normal,
        status: Status::Resolved,
        is_recurring: false,
        description: "Main entrance door repair - loose hinges",
        created_by: "admin",
        assigned_technician: None,
        comment: None,
    },
    DemoTicket {
        command: "IDF",
        unit: "Golani Brigade",
        priority: Priority::Urgent,
        status: Status::InProgress,
        is_recurring: false,
        description: "Communication system fault - no contact with outer posts",
        created_by: "admin",
        assigned_technician: Some("technician1"),
        comment: Some((
            "technician1",
            "Checked the equipment - the problem looks like the main antenna",
        )),
    },
    DemoTicket {
        command: "Home Front Command",
        unit: "Battalion 331",
        priority: Priority::Normal,
        status: Status::Resolved,
        is_recurring: false,
        description: "Replace burnt-out bulbs in the main corridor",
        created_by: "technician2",
        assigned_technician: Some("technician2"),
        comment: None,
    },
    DemoTicket {
        command: "District Command",
        unit: "Electrical Unit 650",
        priority: Priority::Critical,
        status: Status::Open,
        is_recurring: true,
        description: "Recurring power outage on the main line - transformer needs immediate inspection",
        created_by: "technician1",
        assigned_technician: None,
        comment: None,
    },
    DemoTicket {
        command: "District Command",
        unit: "Medical Center 8282",
        priority: Priority::Urgent,
        status: Status::InProgress,
        is_recurring: false,
        description: "Air conditioning failure in building A - temperature above 30 degrees",
        created_by: "technician1",
        assigned_technician: Some("technician1"),
        comment: None,
    },
];

/// 空库初始化入口
pub fn bootstrap(state: &ServerState) -> Result<()> {
    if !state.users.is_empty()? {
        return Ok(());
    }

    let password = admin_password(state)?;
    ensure_unit(state, ADMIN_COMMAND, "Headquarters", ADMIN_UNIT)?;
    state.users.insert_user(&UserCreate {
        username: "admin".into(),
        password,
        role: "admin".into(),
        command: ADMIN_COMMAND.into(),
        unit: ADMIN_UNIT.into(),
    })?;
    tracing::info!("Created initial admin account");

    if state.config.seed_demo_data {
        seed_demo(state)?;
    }
    Ok(())
}

fn admin_password(state: &ServerState) -> Result<String> {
    match &state.config.admin_password {
        Some(password) => Ok(password.clone()),
        None if state.config.is_production() => Err(ServerError::Config(
            "ADMIN_PASSWORD must be set to create the initial admin account".into(),
        )),
        None => {
            tracing::warn!(
                "ADMIN_PASSWORD not set, using the development default. Do not use in production!"
            );
            Ok(DEV_ADMIN_PASSWORD.into())
        }
    }
}

/// 确保指挥部及其下属单位存在 (已存在则跳过)
fn ensure_unit(state: &ServerState, command: &str, description: &str, unit: &str) -> Result<()> {
    let now = now_millis();
    let txn = state.store.begin_write()?;
    let command = match repository::command::find_by_name(&txn, command)? {
        Some(existing) => existing,
        None => repository::command::insert(&txn, command, description, now)?,
    };
    if repository::unit::find_by_name(&txn, command.id, unit)?.is_none() {
        repository::unit::insert(&txn, command.id, unit, "", now)?;
    }
    commit(txn)?;
    Ok(())
}

fn seed_demo(state: &ServerState) -> Result<()> {
    for (command, description, units) in DEMO_COMMANDS {
        for unit in units {
            ensure_unit(state, command, description, unit)?;
        }
    }

    for (username, password, role, command, unit) in DEMO_USERS {
        state.users.insert_user(&UserCreate {
            username: username.into(),
            password: password.into(),
            role: role.into(),
            command: command.into(),
            unit: unit.into(),
        })?;
    }

    let now = now_millis();
    let txn = state.store.begin_write()?;
    for demo in &DEMO_TICKETS {
        let (command, unit) =
            crate::services::reference::resolve_unit(&txn, demo.command, demo.unit)?;
        let new = NewTicket {
            command_id: command.id,
            unit_id: unit.id,
            priority: demo.priority,
            status: demo.status,
            is_recurring: demo.is_recurring,
            description: demo.description.into(),
            assigned_technician: demo.assigned_technician.map(str::to_string),
        };
        let mut ticket = insert_ticket(&txn, new, demo.created_by, now)?;
        if let Some((author, content)) = demo.comment {
            ticket.comments.push(Comment {
                author: author.into(),
                content: content.into(),
                created_at: now,
            });
            repository::ticket::save(&txn, &ticket)?;
        }
    }
    commit(txn)?;

    tracing::info!(
        commands = DEMO_COMMANDS.len(),
        users = DEMO_USERS.len(),
        tickets = DEMO_TICKETS.len(),
        "Demo data seeded"
    );
    Ok(())
}
