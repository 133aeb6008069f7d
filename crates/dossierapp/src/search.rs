//! Linear, case-insensitive substring search.
//!
//! No index: each query scans the loaded table once. Clients match on first
//! name, last name and id; projects on name and order code.

use crate::model::{Client, Project};
use crate::store::Table;
use serde::Serialize;

pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Client {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.first_name.as_str(), self.last_name.as_str(), self.id.as_str()]
    }
}

impl Searchable for Project {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.order_code.as_str()]
    }
}

/// Rows whose searchable fields contain `query`, ignoring case, in table order.
pub fn find<'a, T: Searchable>(rows: &'a [T], query: &str) -> impl Iterator<Item = &'a T> + 'a {
    let needle = query.to_lowercase();
    rows.iter().filter(move |row| {
        row.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    })
}

/// One line of a combined search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub kind: Table,
    pub name: String,
    pub code: String,
}

impl From<&Client> for SearchHit {
    fn from(client: &Client) -> Self {
        Self {
            kind: Table::Clients,
            name: client.full_name(),
            code: client.id.clone(),
        }
    }
}

impl From<&Project> for SearchHit {
    fn from(project: &Project) -> Self {
        Self {
            kind: Table::Projects,
            name: project.name.clone(),
            code: project.order_code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn matches_any_client_field_ignoring_case() {
        let clients = vec![
            Client::new("900123", "Ana", "Lopez"),
            Client::new("800", "Beto", "Ruiz"),
        ];
        let by_last: Vec<_> = find(&clients, "LOP").map(|c| c.id.as_str()).collect();
        assert_eq!(by_last, vec!["900123"]);
        let by_id: Vec<_> = find(&clients, "800").map(|c| c.id.as_str()).collect();
        assert_eq!(by_id, vec!["800"]);
    }

    #[test]
    fn projects_do_not_match_on_comments_or_client() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let projects =
            vec![Project::new("OP-1", "Mesa de roble", "ana", start).with_comments("silla")];
        assert_eq!(find(&projects, "roble").count(), 1);
        assert_eq!(find(&projects, "op-1").count(), 1);
        assert_eq!(find(&projects, "silla").count(), 0);
        assert_eq!(find(&projects, "ana").count(), 0);
    }

    #[test]
    fn search_is_lazy_and_ordered() {
        let clients: Vec<_> = (0..5)
            .map(|i| Client::new(format!("id-{}", i), "Ana", ""))
            .collect();
        let first_two: Vec<_> = find(&clients, "ana").take(2).map(|c| c.id.clone()).collect();
        assert_eq!(first_two, vec!["id-0", "id-1"]);
    }
}
