//! Search result envelope

use serde::{Deserialize, Serialize};

/// One page of a search endpoint (`GET systems`, `GET operations`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(alias = "Items", default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl<T> Page<T> {
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_items_and_paging_fields() {
        let page: Page<String> =
            serde_json::from_str(r#"{"items":["a","b"],"count":12,"size":2,"offset":0}"#).unwrap();

        assert_eq!(page.count, Some(12));
        assert_eq!(page.into_items(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn missing_items_is_empty() {
        let page: Page<String> = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
    }
}
