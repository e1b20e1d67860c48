use super::*;
use crate::catalog::model::Category;

fn item(category: Category, brand: &str, created_at_ms: u64) -> ItemRef {
    ItemRef::new(ItemId::new(), vec![1u8, 2, 3])
        .with_category(category)
        .with_brand(brand)
        .with_created_at_ms(created_at_ms)
}

#[test]
fn lookup_finds_inserted_and_forgets_removed() {
    let a = item(Category::Top, "Uniqlo", 1);
    let id = a.id;
    let mut cat = MemoryCatalog::new();
    cat.insert(a);
    assert_eq!(cat.lookup_by_id(id).map(|i| i.id), Some(id));

    assert!(cat.remove(id).is_some());
    assert!(cat.lookup_by_id(id).is_none());
    assert!(cat.is_empty());
}

#[test]
fn insert_replaces_same_id() {
    let a = item(Category::Top, "Uniqlo", 1);
    let id = a.id;
    let mut cat = MemoryCatalog::new();
    cat.insert(a.clone());
    cat.insert(a.with_category(Category::Bottom));
    assert_eq!(cat.len(), 1);
    assert_eq!(cat.lookup_by_id(id).unwrap().category, Category::Bottom);
}

#[test]
fn query_filters_and_orders_newest_first() {
    let old_top = item(Category::Top, "Cos", 10);
    let new_top = item(Category::Top, "Zara", 30);
    let shoes = item(Category::Footwear, "Vans", 20);
    let archived = item(Category::Top, "Zara", 40).archived();
    let cat: MemoryCatalog = [
        old_top.clone(),
        new_top.clone(),
        shoes.clone(),
        archived.clone(),
    ]
    .into_iter()
    .collect();

    let all: Vec<ItemId> = cat.query(&ItemFilter::default()).iter().map(|i| i.id).collect();
    assert_eq!(all, vec![new_top.id, shoes.id, old_top.id]);

    let tops: Vec<ItemId> = cat
        .query(&ItemFilter::category(Category::Top))
        .iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(tops, vec![new_top.id, old_top.id]);

    let zara = ItemFilter {
        brand: Some("zara".to_string()),
        include_archived: true,
        ..ItemFilter::default()
    };
    let zara: Vec<ItemId> = cat.query(&zara).iter().map(|i| i.id).collect();
    assert_eq!(zara, vec![archived.id, new_top.id]);
}

#[test]
fn category_and_season_strings_roundtrip() {
    use crate::catalog::model::Season;

    for c in Category::ALL {
        assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
    }
    assert_eq!(
        serde_json::to_string(&Category::FullBody).unwrap(),
        "\"Full Body\""
    );
    assert_eq!("autumn".parse::<Season>().unwrap(), Season::Autumn);
    assert!("Monsoon".parse::<Season>().is_err());
}
