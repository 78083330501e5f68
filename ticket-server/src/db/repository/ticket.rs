//! Ticket Repository

use crate::db::{
    StoreResult, TICKET_NUMBER_SEQ, TICKET_SEQ, TICKETS_TABLE, TableReader, TicketRecord,
    next_value, read_record, remove_record, scan_records, write_record,
};
use redb::WriteTransaction;

/// Find all tickets, newest ticket number first
pub fn find_all(txn: &impl TableReader) -> StoreResult<Vec<TicketRecord>> {
    let table = txn.table(TICKETS_TABLE)?;
    let mut tickets: Vec<TicketRecord> = scan_records(&table)?;
    tickets.sort_by(|a, b| b.ticket_number.cmp(&a.ticket_number));
    Ok(tickets)
}

/// Find ticket by id
pub fn find_by_id(txn: &impl TableReader, id: u64) -> StoreResult<Option<TicketRecord>> {
    let table = txn.table(TICKETS_TABLE)?;
    read_record(&table, id)
}

/// Allocate `(id, ticket_number)` for a new ticket
///
/// Both counters advance inside the caller's transaction, so concurrent
/// creators (interactive or import) can never observe the same number.
pub fn allocate(txn: &WriteTransaction) -> StoreResult<(u64, u64)> {
    let id = next_value(txn, TICKET_SEQ)?;
    let number = next_value(txn, TICKET_NUMBER_SEQ)?;
    Ok((id, number))
}

/// Insert or overwrite a ticket
pub fn save(txn: &WriteTransaction, ticket: &TicketRecord) -> StoreResult<()> {
    write_record(txn, TICKETS_TABLE, ticket.id, ticket)
}

/// Delete a ticket; returns false if it did not exist
pub fn delete(txn: &WriteTransaction, id: u64) -> StoreResult<bool> {
    remove_record(txn, TICKETS_TABLE, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;
    use shared::models::{Priority, Status};

    fn record(id: u64, ticket_number: u64) -> TicketRecord {
        TicketRecord {
            id,
            ticket_number,
            command_id: 1,
            unit_id: 1,
            priority: Priority::Normal,
            status: Status::Open,
            is_recurring: false,
            description: format!("ticket {ticket_number}"),
            open_date: 0,
            close_date: None,
            created_by: "admin".into(),
            assigned_technician: None,
            comments: vec![],
            updated_at: 0,
        }
    }

    #[test]
    fn test_find_all_orders_by_number_desc() {
        let store = Store::open_in_memory().unwrap();
        let txn = store.begin_write().unwrap();
        for _ in 0..3 {
            let (id, number) = allocate(&txn).unwrap();
            save(&txn, &record(id, number)).unwrap();
        }
        txn.commit().unwrap();

        let read = store.begin_read().unwrap();
        let numbers: Vec<u64> = find_all(&read)
            .unwrap()
            .iter()
            .map(|t| t.ticket_number)
            .collect();
        assert_eq!(numbers, vec![3, 2, 1]);
    }

    #[test]
    fn test_numbers_not_reused_after_delete() {
        let store = Store::open_in_memory().unwrap();
        let txn = store.begin_write().unwrap();
        let (id, number) = allocate(&txn).unwrap();
        save(&txn, &record(id, number)).unwrap();
        assert!(delete(&txn, id).unwrap());
        assert!(!delete(&txn, id).unwrap());
        let (_, next) = allocate(&txn).unwrap();
        txn.commit().unwrap();
        assert_eq!(next, number + 1);
    }
}
