//! Command Repository

use crate::db::{
    COMMAND_NAMES_TABLE, COMMAND_SEQ, COMMANDS_TABLE, StoreResult, TableReader, next_value,
    read_record, scan_records, write_record,
};
use redb::{ReadableTable, WriteTransaction};
use shared::models::Command;

/// Find all commands ordered by name
pub fn find_all(txn: &impl TableReader) -> StoreResult<Vec<Command>> {
    let table = txn.table(COMMANDS_TABLE)?;
    let mut commands: Vec<Command> = scan_records(&table)?;
    commands.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(commands)
}

/// Find command by id
pub fn find_by_id(txn: &impl TableReader, id: u64) -> StoreResult<Option<Command>> {
    let table = txn.table(COMMANDS_TABLE)?;
    read_record(&table, id)
}

/// Find command by exact name
pub fn find_by_name(txn: &impl TableReader, name: &str) -> StoreResult<Option<Command>> {
    let id = {
        let index = txn.table(COMMAND_NAMES_TABLE)?;
        index.get(name)?.map(|g| g.value())
    };
    match id {
        Some(id) => find_by_id(txn, id),
        None => Ok(None),
    }
}

/// Insert a new command; the caller has already checked the name is free
pub fn insert(
    txn: &WriteTransaction,
    name: &str,
    description: &str,
    now: i64,
) -> StoreResult<Command> {
    let command = Command {
        id: next_value(txn, COMMAND_SEQ)?,
        name: name.to_string(),
        description: description.to_string(),
        created_at: now,
    };
    write_record(txn, COMMANDS_TABLE, command.id, &command)?;
    txn.open_table(COMMAND_NAMES_TABLE)?
        .insert(command.name.as_str(), command.id)?;
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;

    #[test]
    fn test_insert_and_lookup() {
        let store = Store::open_in_memory().unwrap();
        let txn = store.begin_write().unwrap();
        let south = insert(&txn, "South", "", 1).unwrap();
        let north = insert(&txn, "North", "HQ", 2).unwrap();
        txn.commit().unwrap();

        assert_ne!(south.id, north.id);

        let read = store.begin_read().unwrap();
        assert_eq!(find_by_name(&read, "North").unwrap(), Some(north.clone()));
        assert_eq!(find_by_name(&read, "north").unwrap(), None);
        assert_eq!(find_by_id(&read, south.id).unwrap(), Some(south));

        let names: Vec<String> = find_all(&read).unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["North", "South"]);
    }
}
