use serde_json::Value;

use crate::domain::Note;

pub const DEFAULT_SEARCH_LIMIT: usize = 50;
pub const MAX_SEARCH_LIMIT: usize = 200;

/// Note fields a search result may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedDate,
    UpdatedDate,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "createdDate" => Some(Self::CreatedDate),
            "updatedDate" => Some(Self::UpdatedDate),
            "title" => Some(Self::Title),
            _ => None,
        }
    }
}

/// Search terms extracted from a search request payload.
///
/// Parsing is lenient: keys that are absent, empty, or of the wrong
/// type fall back to defaults instead of failing the request. Sort keys
/// are collected in field-name order, so `createdDate` outranks `title`
/// no matter how the request object orders them.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    pub query: Option<String>,
    pub note_id: Option<String>,
    pub user_id: Option<String>,
    pub course_id: Option<String>,
    pub content_id: Option<String>,
    pub offset: usize,
    pub limit: usize,
    pub sort_by: Vec<(SortField, SortOrder)>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            query: None,
            note_id: None,
            user_id: None,
            course_id: None,
            content_id: None,
            offset: 0,
            limit: DEFAULT_SEARCH_LIMIT,
            sort_by: Vec::new(),
        }
    }
}

impl SearchCriteria {
    pub fn from_payload(payload: &Value) -> Self {
        let filters = payload.get("filters");
        let filter_text = |key: &str| {
            filters
                .and_then(|f| f.get(key))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let limit = payload
            .get("limit")
            .and_then(Value::as_u64)
            .map(|v| (v as usize).clamp(1, MAX_SEARCH_LIMIT))
            .unwrap_or(DEFAULT_SEARCH_LIMIT);
        let offset = payload.get("offset").and_then(Value::as_u64).unwrap_or(0) as usize;

        let mut sort_by = Vec::new();
        if let Some(map) = payload.get("sort_by").and_then(Value::as_object) {
            // Map iteration is sorted by key; that key order, not the
            // request's JSON order, fixes multi-key precedence.
            for (field, order) in map {
                if let Some(field) = SortField::parse(field) {
                    let order = match order.as_str() {
                        Some(o) if o.eq_ignore_ascii_case("desc") => SortOrder::Desc,
                        _ => SortOrder::Asc,
                    };
                    sort_by.push((field, order));
                }
            }
        }

        Self {
            query: payload
                .get("query")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
            note_id: filter_text("id"),
            user_id: filter_text("userId"),
            course_id: filter_text("courseId"),
            content_id: filter_text("contentId"),
            offset,
            limit,
            sort_by,
        }
    }

    /// True when the note satisfies every filter and the free-text query.
    pub fn matches(&self, note: &Note) -> bool {
        if let Some(id) = &self.note_id {
            if &note.id != id {
                return false;
            }
        }
        if let Some(user_id) = &self.user_id {
            if &note.user_id != user_id {
                return false;
            }
        }
        if let Some(course_id) = &self.course_id {
            if note.course_id.as_deref() != Some(course_id.as_str()) {
                return false;
            }
        }
        if let Some(content_id) = &self.content_id {
            if note.content_id.as_deref() != Some(content_id.as_str()) {
                return false;
            }
        }
        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            if !note.title.to_lowercase().contains(&query)
                && !note.note.to_lowercase().contains(&query)
            {
                return false;
            }
        }
        true
    }

    /// Orders notes by the requested sort keys.
    ///
    /// Runs a stable sort per key from the least significant key up, so
    /// earlier keys dominate the final order.
    pub fn sort(&self, notes: &mut [Note]) {
        for (field, order) in self.sort_by.iter().rev() {
            notes.sort_by(|a, b| {
                let ordering = match field {
                    SortField::CreatedDate => a.created_date.cmp(&b.created_date),
                    SortField::UpdatedDate => a.updated_date.cmp(&b.updated_date),
                    SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
                };
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }
    }

    /// Applies offset and limit to an already sorted result set.
    pub fn page(&self, notes: Vec<Note>) -> Vec<Note> {
        notes.into_iter().skip(self.offset).take(self.limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotePayload;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn note(id: &str, user: &str, title: &str, body: &str) -> Note {
        let payload: NotePayload = serde_json::from_value(json!({
            "userId": user,
            "courseId": "course-1",
            "title": title,
            "note": body,
        }))
        .unwrap();
        Note::from_payload(id, payload)
    }

    #[test]
    fn test_from_payload_defaults() {
        let criteria = SearchCriteria::from_payload(&json!({}));
        assert_eq!(criteria.offset, 0);
        assert_eq!(criteria.limit, DEFAULT_SEARCH_LIMIT);
        assert!(criteria.query.is_none());
        assert!(criteria.user_id.is_none());
        assert!(criteria.sort_by.is_empty());
    }

    #[test]
    fn test_from_payload_reads_filters_and_paging() {
        let criteria = SearchCriteria::from_payload(&json!({
            "query": "  lecture ",
            "filters": {"userId": "user-1", "courseId": " course-2 ", "id": ""},
            "offset": 5,
            "limit": 20,
            "sort_by": {"createdDate": "desc"}
        }));
        assert_eq!(criteria.query.as_deref(), Some("lecture"));
        assert_eq!(criteria.user_id.as_deref(), Some("user-1"));
        assert_eq!(criteria.course_id.as_deref(), Some("course-2"));
        assert!(criteria.note_id.is_none());
        assert_eq!(criteria.offset, 5);
        assert_eq!(criteria.limit, 20);
        assert_eq!(criteria.sort_by, vec![(SortField::CreatedDate, SortOrder::Desc)]);
    }

    #[test]
    fn test_limit_is_clamped() {
        let criteria = SearchCriteria::from_payload(&json!({"limit": 0}));
        assert_eq!(criteria.limit, 1);
        let criteria = SearchCriteria::from_payload(&json!({"limit": 100_000}));
        assert_eq!(criteria.limit, MAX_SEARCH_LIMIT);
    }

    #[test]
    fn test_matches_filters_and_query() {
        let subject = note("note-1", "user-1", "Week 1", "Covers gravity");
        let mut criteria = SearchCriteria::from_payload(&json!({
            "query": "GRAVITY",
            "filters": {"userId": "user-1", "courseId": "course-1"}
        }));
        assert!(criteria.matches(&subject));

        criteria.user_id = Some("user-2".to_string());
        assert!(!criteria.matches(&subject));

        criteria.user_id = Some("user-1".to_string());
        criteria.query = Some("magnetism".to_string());
        assert!(!criteria.matches(&subject));
    }

    #[test]
    fn test_multi_key_sort_precedence_is_by_field_name() {
        let base = Utc::now();
        let mut zebra = note("n1", "u", "Zebra", "");
        zebra.created_date = base + Duration::seconds(2);
        let mut apple = note("n2", "u", "Apple", "");
        apple.created_date = base + Duration::seconds(1);
        let mut mango = note("n3", "u", "Mango", "");
        mango.created_date = base;

        // The request lists `title` first; `createdDate` still wins.
        let criteria = SearchCriteria::from_payload(&json!({
            "sort_by": {"title": "asc", "createdDate": "desc"}
        }));
        assert_eq!(
            criteria.sort_by,
            vec![
                (SortField::CreatedDate, SortOrder::Desc),
                (SortField::Title, SortOrder::Asc),
            ]
        );

        let mut notes = vec![apple, mango, zebra];
        criteria.sort(&mut notes);
        let titles: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Zebra", "Apple", "Mango"]);
    }

    #[test]
    fn test_sort_and_page() {
        let mut notes = vec![
            note("n1", "u", "banana", ""),
            note("n2", "u", "Apple", ""),
            note("n3", "u", "cherry", ""),
        ];
        let criteria = SearchCriteria::from_payload(&json!({
            "sort_by": {"title": "asc"},
            "offset": 1,
            "limit": 1
        }));
        criteria.sort(&mut notes);
        let titles: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "banana", "cherry"]);

        let page = criteria.page(notes);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "banana");
    }
}
