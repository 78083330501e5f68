//! Unit Repository

use crate::db::{
    StoreResult, TableReader, UNIT_NAMES_TABLE, UNIT_SEQ, UNITS_TABLE, next_value, read_record,
    scan_records, write_record,
};
use redb::{ReadableTable, WriteTransaction};
use shared::models::Unit;

/// Find all units
pub fn find_all(txn: &impl TableReader) -> StoreResult<Vec<Unit>> {
    let table = txn.table(UNITS_TABLE)?;
    scan_records(&table)
}

/// Find units belonging to a command, ordered by name
pub fn find_by_command(txn: &impl TableReader, command_id: u64) -> StoreResult<Vec<Unit>> {
    let mut units: Vec<Unit> = find_all(txn)?
        .into_iter()
        .filter(|u| u.command_id == command_id)
        .collect();
    units.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(units)
}

/// Find unit by id
pub fn find_by_id(txn: &impl TableReader, id: u64) -> StoreResult<Option<Unit>> {
    let table = txn.table(UNITS_TABLE)?;
    read_record(&table, id)
}

/// Find unit by name within a command
pub fn find_by_name(
    txn: &impl TableReader,
    command_id: u64,
    name: &str,
) -> StoreResult<Option<Unit>> {
    let id = {
        let index = txn.table(UNIT_NAMES_TABLE)?;
        index.get((command_id, name))?.map(|g| g.value())
    };
    match id {
        Some(id) => find_by_id(txn, id),
        None => Ok(None),
    }
}

/// Insert a new unit; the caller has already checked the command exists
/// and the name is free within it
pub fn insert(
    txn: &WriteTransaction,
    command_id: u64,
    name: &str,
    description: &str,
    now: i64,
) -> StoreResult<Unit> {
    let unit = Unit {
        id: next_value(txn, UNIT_SEQ)?,
        name: name.to_string(),
        command_id,
        description: description.to_string(),
        created_at: now,
    };
    write_record(txn, UNITS_TABLE, unit.id, &unit)?;
    txn.open_table(UNIT_NAMES_TABLE)?
        .insert((command_id, unit.name.as_str()), unit.id)?;
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;

    #[test]
    fn test_same_name_under_different_commands() {
        let store = Store::open_in_memory().unwrap();
        let txn = store.begin_write().unwrap();
        let a = insert(&txn, 1, "Workshop", "", 0).unwrap();
        let b = insert(&txn, 2, "Workshop", "", 0).unwrap();
        insert(&txn, 1, "Armory", "", 0).unwrap();
        txn.commit().unwrap();

        let read = store.begin_read().unwrap();
        assert_eq!(find_by_name(&read, 1, "Workshop").unwrap(), Some(a));
        assert_eq!(find_by_name(&read, 2, "Workshop").unwrap(), Some(b));
        assert_eq!(find_by_name(&read, 3, "Workshop").unwrap(), None);

        let names: Vec<String> = find_by_command(&read, 1)
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Armory", "Workshop"]);
    }
}
