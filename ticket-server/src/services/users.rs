//! User Service - account management and credential checks
//!
//! All management operations are admin-only. Passwords are hashed before
//! the write transaction opens (Argon2 is deliberately slow) and the hash
//! never leaves this module: every response is a [`UserView`].

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Role, UserCreate, UserUpdate, UserView};
use shared::util::now_millis;

use super::ReferenceNames;
use super::reference::resolve_unit;
use crate::auth::{Action, Actor, PasswordHasher, policy};
use crate::db::{Store, TableReader, UserRecord, commit, repository};
use crate::utils::validation::{MAX_USERNAME_LEN, validate_password, validate_required_text};

fn user_not_found(id: u64) -> AppError {
    AppError::with_message(ErrorCode::UserNotFound, format!("User {id} not found"))
        .with_detail("id", id)
}

fn view_of(txn: &impl TableReader, user: UserRecord) -> AppResult<UserView> {
    let names = ReferenceNames::for_ids(txn, user.command_id, user.unit_id)?;
    Ok(names.user_view(user))
}

#[derive(Debug, Clone)]
pub struct UserService {
    store: Store,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(store: Store, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    fn authorize(actor: &Actor) -> AppResult<()> {
        policy::authorize(policy::can_manage_users(actor), actor, Action::ManageUsers)
    }

    /// All users ordered by username
    pub fn list_users(&self, actor: &Actor) -> AppResult<Vec<UserView>> {
        Self::authorize(actor)?;
        let txn = self.store.begin_read()?;
        let names = ReferenceNames::load(&txn)?;
        Ok(repository::user::find_all(&txn)?
            .into_iter()
            .map(|u| names.user_view(u))
            .collect())
    }

    pub fn get_user(&self, actor: &Actor, id: u64) -> AppResult<UserView> {
        Self::authorize(actor)?;
        let txn = self.store.begin_read()?;
        let user = repository::user::find_by_id(&txn, id)?.ok_or_else(|| user_not_found(id))?;
        view_of(&txn, user)
    }

    pub fn create_user(&self, actor: &Actor, payload: UserCreate) -> AppResult<UserView> {
        Self::authorize(actor)?;
        let user = self.insert_user(&payload)?;
        tracing::info!(
            user_id = user.id,
            username = %user.username,
            role = %user.role,
            created_by = %actor.username,
            "User created"
        );
        Ok(user)
    }

    /// Create an account without an acting user (bootstrap and seeding)
    pub(crate) fn insert_user(&self, payload: &UserCreate) -> AppResult<UserView> {
        let username = validate_required_text(&payload.username, "username", MAX_USERNAME_LEN)?;
        validate_password(&payload.password)?;
        let role: Role = payload.role.parse()?;
        let password_hash = self.hasher.hash(&payload.password)?;

        let txn = self.store.begin_write()?;
        if repository::user::find_by_username(&txn, username)?.is_some() {
            return Err(AppError::with_message(
                ErrorCode::UsernameExists,
                format!("Username '{username}' already exists"),
            ));
        }
        let (command, unit) = resolve_unit(&txn, &payload.command, &payload.unit)?;

        let user = UserRecord {
            id: repository::user::next_id(&txn)?,
            username: username.to_string(),
            password_hash,
            role,
            command_id: command.id,
            unit_id: unit.id,
            last_login: None,
            created_at: now_millis(),
        };
        repository::user::insert(&txn, &user)?;
        let view = view_of(&txn, user)?;
        commit(txn)?;
        Ok(view)
    }

    /// Replace role / command / unit; re-hash only when a new password is given
    ///
    /// Command and unit are merged with the stored values before validation,
    /// so changing only the command still requires the current unit to exist
    /// under the new command.
    pub fn update_user(&self, actor: &Actor, id: u64, patch: UserUpdate) -> AppResult<UserView> {
        Self::authorize(actor)?;

        let role = patch
            .role
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()?;
        let new_hash = match patch.new_password() {
            Some(password) => {
                validate_password(password)?;
                Some(self.hasher.hash(password)?)
            }
            None => None,
        };

        let txn = self.store.begin_write()?;
        let mut user = repository::user::find_by_id(&txn, id)?.ok_or_else(|| user_not_found(id))?;

        if let Some(role) = role {
            user.role = role;
        }
        if patch.command.is_some() || patch.unit.is_some() {
            let current_command = repository::command::find_by_id(&txn, user.command_id)?
                .map(|c| c.name)
                .unwrap_or_default();
            let current_unit = repository::unit::find_by_id(&txn, user.unit_id)?
                .map(|u| u.name)
                .unwrap_or_default();
            let command_name = patch.command.as_deref().unwrap_or(&current_command);
            let unit_name = patch.unit.as_deref().unwrap_or(&current_unit);

            let (command, unit) = resolve_unit(&txn, command_name, unit_name)?;
            user.command_id = command.id;
            user.unit_id = unit.id;
        }
        let password_changed = new_hash.is_some();
        if let Some(hash) = new_hash {
            user.password_hash = hash;
        }

        repository::user::save(&txn, &user)?;
        let view = view_of(&txn, user)?;
        commit(txn)?;

        tracing::info!(
            user_id = id,
            role = %view.role,
            password_changed,
            updated_by = %actor.username,
            "User updated"
        );
        Ok(view)
    }

    /// Hard delete; tickets keep the username in `createdBy`
    pub fn delete_user(&self, actor: &Actor, id: u64) -> AppResult<()> {
        Self::authorize(actor)?;
        if actor.id == id {
            return Err(AppError::validation("You cannot delete your own account"));
        }

        let txn = self.store.begin_write()?;
        let user = repository::user::delete(&txn, id)?.ok_or_else(|| user_not_found(id))?;
        commit(txn)?;

        tracing::info!(
            user_id = id,
            username = %user.username,
            deleted_by = %actor.username,
            "User deleted"
        );
        Ok(())
    }

    /// Check a username/password pair and stamp `last_login`
    ///
    /// Unknown user and wrong password fail with the same error.
    pub fn authenticate(&self, username: &str, password: &str) -> AppResult<Actor> {
        let username = username.trim();
        let user = {
            let txn = self.store.begin_read()?;
            repository::user::find_by_username(&txn, username)?
        };
        let Some(user) = user else {
            tracing::warn!(username = %username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        };
        if !self.hasher.verify(password, &user.password_hash) {
            tracing::warn!(username = %username, "Login failed - invalid credentials");
            return Err(AppError::invalid_credentials());
        }

        let txn = self.store.begin_write()?;
        if let Some(mut fresh) = repository::user::find_by_id(&txn, user.id)? {
            fresh.last_login = Some(now_millis());
            repository::user::save(&txn, &fresh)?;
        }
        commit(txn)?;

        let txn = self.store.begin_read()?;
        Actor::resolve(&txn, user.id)
    }

    /// True when no account exists yet
    pub(crate) fn is_empty(&self) -> AppResult<bool> {
        let txn = self.store.begin_read()?;
        Ok(repository::user::count(&txn)? == 0)
    }
}
