//! Client-side search over records already held by a view.

use std::str::FromStr;

use crate::types::{Provider, Requirement, ServiceKind, UnknownVariant, UserRole};

/// A record that can be matched by free text and filtered by service kind.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
    fn service_kind(&self) -> Option<ServiceKind>;
}

impl Searchable for Requirement {
    fn search_fields(&self) -> Vec<&str> {
        [&self.title, &self.description, &self.hotel]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .collect()
    }

    fn service_kind(&self) -> Option<ServiceKind> {
        Requirement::service_kind(self)
    }
}

impl Searchable for Provider {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = [&self.name, &self.description]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .collect();
        fields.extend(self.services.iter().map(String::as_str));
        fields
    }

    fn service_kind(&self) -> Option<ServiceKind> {
        Provider::service_kind(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Only(ServiceKind),
}

impl KindFilter {
    /// What a signed-in role gets to browse. Hotels see everything; providers
    /// only see work of their own kind.
    pub fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::Hotel => KindFilter::All,
            UserRole::Staffing => KindFilter::Only(ServiceKind::Staffing),
            UserRole::Vendor => KindFilter::Only(ServiceKind::Vendor),
        }
    }

    pub fn matches(&self, kind: Option<ServiceKind>) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(wanted) => kind == Some(*wanted),
        }
    }
}

impl FromStr for KindFilter {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(KindFilter::All);
        }
        s.parse().map(KindFilter::Only)
    }
}

/// Case-insensitive substring match on any search field. The query is used
/// as typed, so an empty query matches every record and whitespace is part
/// of the needle.
pub fn matches_query<R: Searchable + ?Sized>(record: &R, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Records matching both `query` and `filter`, in their original order.
pub fn filter_records<'a, R: Searchable>(records: &'a [R], query: &str, filter: KindFilter) -> Vec<&'a R> {
    records
        .iter()
        .filter(|r| filter.matches(r.service_kind()) && matches_query(*r, query))
        .collect()
}
