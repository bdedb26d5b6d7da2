//! Catalog search helpers

use shared::Product;

/// Default threshold used by the dashboard low-stock count
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Filter products by a free-text term
///
/// A blank term keeps everything. Otherwise matches are case-insensitive
/// substrings of the name, the barcode or the embedded category name.
/// Input order is preserved.
pub fn filter_products<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.barcode.to_lowercase().contains(&needle)
                || p
                    .category_name()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Products with `stock <= threshold`
pub fn low_stock(products: &[Product], threshold: i64) -> Vec<&Product> {
    products.iter().filter(|p| p.stock <= threshold).collect()
}
