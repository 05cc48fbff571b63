//! Partitioning of mixed item batches by type tag

use crate::domain::{ItemType, TypedItem};
use std::collections::HashMap;

/// Group items by their type tag, preserving relative order within each group
///
/// Items without a usable tag are collected under `None`; no insert operation
/// is ever registered for that key, so they are dropped downstream.
pub fn group_by_item_type<T, I>(items: I) -> HashMap<Option<ItemType>, Vec<T>>
where
    T: TypedItem,
    I: IntoIterator<Item = T>,
{
    let mut groups: HashMap<Option<ItemType>, Vec<T>> = HashMap::new();
    for item in items {
        let key = item.item_type().and_then(|tag| ItemType::new(tag).ok());
        groups.entry(key).or_default().push(item);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;
    use serde_json::json;

    fn item(value: serde_json::Value) -> Item {
        Item::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        let groups = group_by_item_type(Vec::<Item>::new());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_groups_preserve_relative_order() {
        let items = vec![
            item(json!({"type": "block", "n": 1})),
            item(json!({"type": "log", "n": 2})),
            item(json!({"type": "block", "n": 3})),
            item(json!({"type": "log", "n": 4})),
            item(json!({"type": "block", "n": 5})),
        ];

        let groups = group_by_item_type(items);
        assert_eq!(groups.len(), 2);

        let blocks: Vec<i64> = groups[&Some(ItemType::new("block").unwrap())]
            .iter()
            .map(|i| i.get("n").and_then(|v| v.as_i64()).unwrap())
            .collect();
        assert_eq!(blocks, vec![1, 3, 5]);

        let logs: Vec<i64> = groups[&Some(ItemType::new("log").unwrap())]
            .iter()
            .map(|i| i.get("n").and_then(|v| v.as_i64()).unwrap())
            .collect();
        assert_eq!(logs, vec![2, 4]);
    }

    #[test]
    fn test_untagged_items_group_under_none() {
        let items = vec![
            item(json!({"n": 1})),
            item(json!({"type": null, "n": 2})),
            item(json!({"type": "block", "n": 3})),
        ];

        let groups = group_by_item_type(items);
        assert_eq!(groups[&None::<ItemType>].len(), 2);
        assert_eq!(groups[&Some(ItemType::new("block").unwrap())].len(), 1);
    }

    #[test]
    fn test_partition_is_disjoint_and_complete() {
        let items: Vec<Item> = (0..50)
            .map(|n| {
                let tag = ["block", "transaction", "log"][n % 3];
                item(json!({"type": tag, "n": n}))
            })
            .collect();

        let groups = group_by_item_type(items.clone());
        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, items.len());

        let mut seen: Vec<i64> = groups
            .values()
            .flatten()
            .map(|i| i.get("n").and_then(|v| v.as_i64()).unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<i64>>());
    }
}
