//! User Repository

use crate::db::{
    StoreResult, TableReader, USER_SEQ, USERNAMES_TABLE, USERS_TABLE, UserRecord, next_value,
    read_record, remove_record, scan_records, write_record,
};
use redb::{ReadableTable, WriteTransaction};

/// Find all users ordered by username
pub fn find_all(txn: &impl TableReader) -> StoreResult<Vec<UserRecord>> {
    let table = txn.table(USERS_TABLE)?;
    let mut users: Vec<UserRecord> = scan_records(&table)?;
    users.sort_by(|a, b| a.username.cmp(&b.username));
    Ok(users)
}

/// Find user by id
pub fn find_by_id(txn: &impl TableReader, id: u64) -> StoreResult<Option<UserRecord>> {
    let table = txn.table(USERS_TABLE)?;
    read_record(&table, id)
}

/// Find user by exact (case-sensitive) username
pub fn find_by_username(txn: &impl TableReader, username: &str) -> StoreResult<Option<UserRecord>> {
    let id = {
        let index = txn.table(USERNAMES_TABLE)?;
        index.get(username)?.map(|g| g.value())
    };
    match id {
        Some(id) => find_by_id(txn, id),
        None => Ok(None),
    }
}

/// Count stored users
pub fn count(txn: &impl TableReader) -> StoreResult<u64> {
    use redb::ReadableTableMetadata;
    let table = txn.table(USERS_TABLE)?;
    Ok(table.len()?)
}

/// Allocate the id for a new user
pub fn next_id(txn: &WriteTransaction) -> StoreResult<u64> {
    next_value(txn, USER_SEQ)
}

/// Insert a new user and claim its username
pub fn insert(txn: &WriteTransaction, user: &UserRecord) -> StoreResult<()> {
    write_record(txn, USERS_TABLE, user.id, user)?;
    txn.open_table(USERNAMES_TABLE)?
        .insert(user.username.as_str(), user.id)?;
    Ok(())
}

/// Overwrite an existing user (username is immutable)
pub fn save(txn: &WriteTransaction, user: &UserRecord) -> StoreResult<()> {
    write_record(txn, USERS_TABLE, user.id, user)
}

/// Hard delete a user and release the username
pub fn delete(txn: &WriteTransaction, id: u64) -> StoreResult<Option<UserRecord>> {
    let Some(user) = find_by_id(txn, id)? else {
        return Ok(None);
    };
    remove_record(txn, USERS_TABLE, id)?;
    txn.open_table(USERNAMES_TABLE)?
        .remove(user.username.as_str())?;
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;
    use shared::models::Role;

    fn record(id: u64, username: &str) -> UserRecord {
        UserRecord {
            id,
            username: username.into(),
            password_hash: "$argon2id$stub".into(),
            role: Role::Viewer,
            command_id: 1,
            unit_id: 1,
            last_login: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_username_index_follows_insert_and_delete() {
        let store = Store::open_in_memory().unwrap();
        let txn = store.begin_write().unwrap();
        let id = next_id(&txn).unwrap();
        insert(&txn, &record(id, "viewer1")).unwrap();
        txn.commit().unwrap();

        let read = store.begin_read().unwrap();
        assert_eq!(find_by_username(&read, "viewer1").unwrap().unwrap().id, id);
        assert!(find_by_username(&read, "Viewer1").unwrap().is_none());
        assert_eq!(count(&read).unwrap(), 1);
        drop(read);

        let txn = store.begin_write().unwrap();
        assert!(delete(&txn, id).unwrap().is_some());
        assert!(delete(&txn, id).unwrap().is_none());
        txn.commit().unwrap();

        let read = store.begin_read().unwrap();
        assert!(find_by_username(&read, "viewer1").unwrap().is_none());
        assert!(find_all(&read).unwrap().is_empty());
    }
}
