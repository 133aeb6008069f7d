use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::search::{find, SearchHit};
use crate::store::backend::TableBackend;
use crate::store::RecordStore;
use chrono::NaiveDate;

/// Clients first, then projects. A blank query finds nothing.
pub fn run<B: TableBackend>(store: &RecordStore<B>, query: &str) -> Result<CmdResult> {
    let query = query.trim();
    let mut result = CmdResult::default();
    if query.is_empty() {
        return Ok(result);
    }

    let clients = store.load_clients()?;
    let projects = store.load_projects()?;
    result.hits = find(&clients, query)
        .map(SearchHit::from)
        .chain(find(&projects, query).map(SearchHit::from))
        .collect();

    if result.hits.is_empty() {
        result.add_message(CmdMessage::info(format!("No matches for '{}'", query)));
    }
    Ok(result)
}

/// Clients whose birthday falls on `on`'s month and day.
pub fn birthdays<B: TableBackend>(store: &RecordStore<B>, on: NaiveDate) -> Result<CmdResult> {
    let clients: Vec<_> = store
        .load_clients()?
        .into_iter()
        .filter(|c| c.has_birthday_on(on))
        .collect();

    let mut result = CmdResult::default();
    if clients.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No birthdays on {}",
            on.format("%d/%m")
        )));
    }
    Ok(result.with_clients(clients))
}
