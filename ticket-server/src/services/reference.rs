//! Reference Service - commands and their units
//!
//! Tickets and users point at a (command, unit) pair. Requests address them
//! by name; [`resolve_unit`] turns the names into stored records and is the
//! single place where an unknown name becomes a not-found error.

use std::collections::HashMap;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Command, CommandCreate, CommandWithUnits, Unit, UnitCreate};
use shared::util::now_millis;

use crate::auth::{Action, Actor, policy};
use crate::db::{Store, TableReader, commit, repository};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text,
};

#[derive(Debug, Clone)]
pub struct ReferenceService {
    store: Store,
}

impl ReferenceService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All commands ordered by name, each with its units ordered by name
    pub fn list_commands(&self) -> AppResult<Vec<CommandWithUnits>> {
        let txn = self.store.begin_read()?;

        let mut units_by_command: HashMap<u64, Vec<Unit>> = HashMap::new();
        for unit in repository::unit::find_all(&txn)? {
            units_by_command.entry(unit.command_id).or_default().push(unit);
        }

        let commands = repository::command::find_all(&txn)?
            .into_iter()
            .map(|command| {
                let mut units = units_by_command.remove(&command.id).unwrap_or_default();
                units.sort_by(|a, b| a.name.cmp(&b.name));
                CommandWithUnits { command, units }
            })
            .collect();
        Ok(commands)
    }

    /// Units of one command
    pub fn list_units(&self, command_id: u64) -> AppResult<Vec<Unit>> {
        let txn = self.store.begin_read()?;
        if repository::command::find_by_id(&txn, command_id)?.is_none() {
            return Err(AppError::new(ErrorCode::CommandNotFound)
                .with_detail("commandId", command_id));
        }
        Ok(repository::unit::find_by_command(&txn, command_id)?)
    }

    pub fn create_command(&self, actor: &Actor, payload: CommandCreate) -> AppResult<Command> {
        policy::authorize(
            policy::can_manage_reference_data(actor),
            actor,
            Action::ManageReferenceData,
        )?;

        let name = validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        let description = payload.description.trim();
        validate_optional_text(description, "description", MAX_DESCRIPTION_LEN)?;

        let txn = self.store.begin_write()?;
        if repository::command::find_by_name(&txn, name)?.is_some() {
            return Err(AppError::with_message(
                ErrorCode::CommandNameExists,
                format!("Command '{name}' already exists"),
            ));
        }
        let command = repository::command::insert(&txn, name, description, now_millis())?;
        commit(txn)?;

        tracing::info!(
            command_id = command.id,
            name = %command.name,
            created_by = %actor.username,
            "Command created"
        );
        Ok(command)
    }

    pub fn create_unit(&self, actor: &Actor, payload: UnitCreate) -> AppResult<Unit> {
        policy::authorize(
            policy::can_manage_reference_data(actor),
            actor,
            Action::ManageReferenceData,
        )?;

        let command_name = validate_required_text(&payload.command, "command", MAX_NAME_LEN)?;
        let name = validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        let description = payload.description.trim();
        validate_optional_text(description, "description", MAX_DESCRIPTION_LEN)?;

        let txn = self.store.begin_write()?;
        let command = repository::command::find_by_name(&txn, command_name)?
            .ok_or_else(|| command_not_found(command_name))?;
        if repository::unit::find_by_name(&txn, command.id, name)?.is_some() {
            return Err(AppError::with_message(
                ErrorCode::UnitNameExists,
                format!("Unit '{name}' already exists in command '{command_name}'"),
            ));
        }
        let unit = repository::unit::insert(&txn, command.id, name, description, now_millis())?;
        commit(txn)?;

        tracing::info!(
            unit_id = unit.id,
            command_id = command.id,
            name = %unit.name,
            created_by = %actor.username,
            "Unit created"
        );
        Ok(unit)
    }
}

pub(crate) fn command_not_found(name: &str) -> AppError {
    AppError::with_message(
        ErrorCode::CommandNotFound,
        format!("Command '{name}' not found"),
    )
    .with_detail("command", name)
}

pub(crate) fn unit_not_found(command: &str, unit: &str) -> AppError {
    AppError::with_message(
        ErrorCode::UnitNotFound,
        format!("Unit '{unit}' not found in command '{command}'"),
    )
    .with_detail("unit", unit)
}

/// Resolve a (command, unit) name pair; the unit must belong to the command
pub(crate) fn resolve_unit(
    txn: &impl TableReader,
    command: &str,
    unit: &str,
) -> AppResult<(Command, Unit)> {
    let command_name = validate_required_text(command, "command", MAX_NAME_LEN)?;
    let unit_name = validate_required_text(unit, "unit", MAX_NAME_LEN)?;

    let command = repository::command::find_by_name(txn, command_name)?
        .ok_or_else(|| command_not_found(command_name))?;
    let unit = repository::unit::find_by_name(txn, command.id, unit_name)?
        .ok_or_else(|| unit_not_found(command_name, unit_name))?;
    Ok((command, unit))
}
