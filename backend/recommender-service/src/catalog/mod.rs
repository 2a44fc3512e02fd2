/// Catalog Module
///
/// Read-only product and retailer tables, loaded once from the artifacts
/// directory before the service accepts traffic.
///
/// # Artifacts
/// - `retailer_profiles.json`: `[{retailer_id, store_type, location_tier, index}]`
/// - `product_catalog.json`: `[{product_id, category, profit_margin, current_stock, index}]`
/// - `product_vectors.json`: `{product_id: [f32; vector_dim]}`
///
/// `index` is the id's embedding row in the trained model. It is independent
/// of row order and must form a permutation of `0..len` within each table.
///
/// Rows are validated here so that request-time code only ever sees typed,
/// well-formed records.
use crate::error::{AppError, Result};
use crate::models::{Category, LocationTier, ProductRecord, RetailerProfile, StoreType};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const RETAILER_PROFILES_FILE: &str = "retailer_profiles.json";
pub const PRODUCT_CATALOG_FILE: &str = "product_catalog.json";
pub const PRODUCT_VECTORS_FILE: &str = "product_vectors.json";

#[derive(Debug, Deserialize)]
struct RetailerRow {
    retailer_id: String,
    store_type: StoreType,
    location_tier: LocationTier,
    index: u32,
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    product_id: String,
    category: Category,
    profit_margin: f32,
    current_stock: u32,
    index: u32,
}

#[derive(Debug)]
pub struct CatalogStore {
    /// Products in load order; this order is the scoring batch order
    products: Vec<ProductRecord>,
    product_index: HashMap<String, usize>,
    retailers: HashMap<String, RetailerProfile>,
    vector_dim: usize,
}

impl CatalogStore {
    /// Load and validate all catalog artifacts from `dir`
    pub fn load<P: AsRef<Path>>(dir: P, vector_dim: usize) -> Result<Self> {
        let dir = dir.as_ref();

        let retailers = read_artifact(dir, RETAILER_PROFILES_FILE)?;
        let products = read_artifact(dir, PRODUCT_CATALOG_FILE)?;
        let vectors = read_artifact(dir, PRODUCT_VECTORS_FILE)?;

        let store = Self::from_json(&retailers, &products, &vectors, vector_dim)?;

        info!(
            artifacts_dir = %dir.display(),
            products = store.len(),
            retailers = store.retailer_count(),
            vector_dim,
            "Catalog loaded"
        );

        Ok(store)
    }

    /// Build the catalog from the raw JSON content of the three artifacts
    pub fn from_json(
        retailers_json: &str,
        products_json: &str,
        vectors_json: &str,
        vector_dim: usize,
    ) -> Result<Self> {
        let retailer_rows: Vec<RetailerRow> = serde_json::from_str(retailers_json)
            .map_err(|e| AppError::CatalogLoad(format!("{}: {}", RETAILER_PROFILES_FILE, e)))?;
        let product_rows: Vec<ProductRow> = serde_json::from_str(products_json)
            .map_err(|e| AppError::CatalogLoad(format!("{}: {}", PRODUCT_CATALOG_FILE, e)))?;
        let mut vectors: BTreeMap<String, Vec<f32>> = serde_json::from_str(vectors_json)
            .map_err(|e| AppError::CatalogLoad(format!("{}: {}", PRODUCT_VECTORS_FILE, e)))?;

        let retailers = retailer_rows
            .into_iter()
            .map(|row| RetailerProfile {
                retailer_id: row.retailer_id,
                store_type: row.store_type,
                location_tier: row.location_tier,
                index: row.index,
            })
            .collect::<Vec<_>>();

        let mut products = Vec::with_capacity(product_rows.len());
        for row in product_rows {
            let content_vector = vectors.remove(&row.product_id).ok_or_else(|| {
                AppError::CatalogLoad(format!(
                    "Content vector missing for product_id: {}",
                    row.product_id
                ))
            })?;

            products.push(ProductRecord {
                product_id: row.product_id,
                category: row.category,
                profit_margin: row.profit_margin,
                current_stock: row.current_stock,
                content_vector,
                index: row.index,
            });
        }

        // Whatever is left over has no catalog row
        if let Some(orphan) = vectors.keys().next() {
            return Err(AppError::CatalogLoad(format!(
                "Content vector for unknown product_id: {}",
                orphan
            )));
        }

        Self::build(retailers, products, vector_dim)
    }

    /// Build the catalog from already-typed records
    pub fn from_records(
        retailers: Vec<RetailerProfile>,
        products: Vec<ProductRecord>,
    ) -> Result<Self> {
        let vector_dim = products
            .first()
            .map(|p| p.content_vector.len())
            .unwrap_or(0);
        Self::build(retailers, products, vector_dim)
    }

    fn build(
        retailers: Vec<RetailerProfile>,
        products: Vec<ProductRecord>,
        vector_dim: usize,
    ) -> Result<Self> {
        validate_indices(
            "retailer",
            retailers.iter().map(|r| (r.retailer_id.as_str(), r.index)),
            retailers.len(),
        )?;
        validate_indices(
            "product",
            products.iter().map(|p| (p.product_id.as_str(), p.index)),
            products.len(),
        )?;

        let mut retailer_map = HashMap::with_capacity(retailers.len());
        for profile in retailers {
            if profile.retailer_id.is_empty() {
                return Err(AppError::CatalogLoad("Empty retailer_id".to_string()));
            }
            let id = profile.retailer_id.clone();
            if retailer_map.insert(id.clone(), profile).is_some() {
                return Err(AppError::CatalogLoad(format!(
                    "Duplicate retailer_id: {}",
                    id
                )));
            }
        }

        let mut product_index = HashMap::with_capacity(products.len());
        for (i, product) in products.iter().enumerate() {
            validate_product(product, vector_dim)?;
            if product_index.insert(product.product_id.clone(), i).is_some() {
                return Err(AppError::CatalogLoad(format!(
                    "Duplicate product_id: {}",
                    product.product_id
                )));
            }
        }

        if products.is_empty() {
            warn!("Catalog contains no products; every recommendation will be empty");
        }

        Ok(Self {
            products,
            product_index,
            retailers: retailer_map,
            vector_dim,
        })
    }

    pub fn retailer(&self, retailer_id: &str) -> Option<&RetailerProfile> {
        self.retailers.get(retailer_id)
    }

    pub fn product(&self, product_id: &str) -> Option<&ProductRecord> {
        self.product_index
            .get(product_id)
            .map(|&i| &self.products[i])
    }

    /// All products, in scoring batch order
    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn retailer_count(&self) -> usize {
        self.retailers.len()
    }

    pub fn vector_dim(&self) -> usize {
        self.vector_dim
    }
}

fn read_artifact(dir: &Path, name: &str) -> Result<String> {
    let path = dir.join(name);
    fs::read_to_string(&path)
        .map_err(|e| AppError::CatalogLoad(format!("Failed to read {}: {}", path.display(), e)))
}

/// Embedding indices must be unique and inside `0..len`
fn validate_indices<'a, I>(table: &str, entries: I, len: usize) -> Result<()>
where
    I: Iterator<Item = (&'a str, u32)>,
{
    let mut seen = vec![false; len];
    for (id, index) in entries {
        let slot = seen.get_mut(index as usize).ok_or_else(|| {
            AppError::CatalogLoad(format!(
                "Embedding index {} for {} {} is outside 0..{}",
                index, table, id, len
            ))
        })?;
        if *slot {
            return Err(AppError::CatalogLoad(format!(
                "Duplicate embedding index {} for {} {}",
                index, table, id
            )));
        }
        *slot = true;
    }
    Ok(())
}

fn validate_product(product: &ProductRecord, vector_dim: usize) -> Result<()> {
    if product.product_id.is_empty() {
        return Err(AppError::CatalogLoad("Empty product_id".to_string()));
    }

    if !product.profit_margin.is_finite() {
        return Err(AppError::CatalogLoad(format!(
            "Non-finite profit_margin for product_id: {}",
            product.product_id
        )));
    }

    if product.content_vector.len() != vector_dim {
        return Err(AppError::CatalogLoad(format!(
            "Content vector for product_id {} has {} dims, expected {}",
            product.product_id,
            product.content_vector.len(),
            vector_dim
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const RETAILERS: &str = r#"[
        {"retailer_id": "R001", "store_type": "Supermarket", "location_tier": "A", "index": 0},
        {"retailer_id": "R002", "store_type": "Kiosk", "location_tier": "C", "index": 1}
    ]"#;

    const PRODUCTS: &str = r#"[
        {"product_id": "P0001", "category": "Dairy", "profit_margin": 0.2, "current_stock": 120, "index": 0},
        {"product_id": "P0002", "category": "Snacks", "profit_margin": 0.35, "current_stock": 30, "index": 1}
    ]"#;

    const VECTORS: &str = r#"{"P0001": [0.1, 0.2, 0.3], "P0002": [0.4, 0.5, 0.6]}"#;

    #[test]
    fn test_from_json() {
        let store = CatalogStore::from_json(RETAILERS, PRODUCTS, VECTORS, 3).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.retailer_count(), 2);

        let retailer = store.retailer("R002").unwrap();
        assert_eq!(retailer.store_type, StoreType::Kiosk);
        assert_eq!(retailer.index, 1);

        let product = store.product("P0002").unwrap();
        assert_eq!(product.category, Category::Snacks);
        assert_eq!(product.current_stock, 30);
        assert_eq!(product.content_vector, vec![0.4, 0.5, 0.6]);

        // Load order is preserved
        let ids: Vec<_> = store.products().iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(ids, vec!["P0001", "P0002"]);
    }

    #[test]
    fn test_indices_follow_declared_values_not_row_order() {
        let retailers = r#"[
            {"retailer_id": "R417", "store_type": "Convenience", "location_tier": "B", "index": 1},
            {"retailer_id": "R002", "store_type": "Kiosk", "location_tier": "C", "index": 0}
        ]"#;
        let products = r#"[
            {"product_id": "P0417", "category": "Dairy", "profit_margin": 0.2, "current_stock": 120, "index": 1},
            {"product_id": "P0002", "category": "Snacks", "profit_margin": 0.35, "current_stock": 30, "index": 0}
        ]"#;
        let vectors = r#"{"P0417": [0.1, 0.2, 0.3], "P0002": [0.4, 0.5, 0.6]}"#;

        let store = CatalogStore::from_json(retailers, products, vectors, 3).unwrap();

        assert_eq!(store.retailer("R417").unwrap().index, 1);
        assert_eq!(store.retailer("R002").unwrap().index, 0);
        assert_eq!(store.product("P0417").unwrap().index, 1);
        assert_eq!(store.product("P0002").unwrap().index, 0);

        // Batch order is still file order
        assert_eq!(store.products()[0].product_id, "P0417");
    }

    #[test]
    fn test_rejects_bad_indices() {
        let duplicate = r#"[
            {"product_id": "P0001", "category": "Dairy", "profit_margin": 0.2, "current_stock": 120, "index": 0},
            {"product_id": "P0002", "category": "Snacks", "profit_margin": 0.35, "current_stock": 30, "index": 0}
        ]"#;
        let result = CatalogStore::from_json(RETAILERS, duplicate, VECTORS, 3);
        assert!(matches!(result, Err(AppError::CatalogLoad(msg)) if msg.contains("Duplicate embedding index")));

        let out_of_range = r#"[
            {"retailer_id": "R001", "store_type": "Supermarket", "location_tier": "A", "index": 0},
            {"retailer_id": "R002", "store_type": "Kiosk", "location_tier": "C", "index": 2}
        ]"#;
        let result = CatalogStore::from_json(out_of_range, PRODUCTS, VECTORS, 3);
        assert!(matches!(result, Err(AppError::CatalogLoad(msg)) if msg.contains("R002")));

        let missing = r#"[
            {"retailer_id": "R001", "store_type": "Supermarket", "location_tier": "A"}
        ]"#;
        let result = CatalogStore::from_json(missing, PRODUCTS, VECTORS, 3);
        assert!(matches!(result, Err(AppError::CatalogLoad(_))));
    }

    #[test]
    fn test_unknown_lookups() {
        let store = CatalogStore::from_json(RETAILERS, PRODUCTS, VECTORS, 3).unwrap();
        assert!(store.retailer("R999").is_none());
        assert!(store.product("P9999").is_none());
    }

    #[test]
    fn test_rejects_duplicate_product() {
        let products = r#"[
            {"product_id": "P0001", "category": "Dairy", "profit_margin": 0.2, "current_stock": 120, "index": 0},
            {"product_id": "P0001", "category": "Snacks", "profit_margin": 0.35, "current_stock": 30, "index": 1}
        ]"#;
        let vectors = r#"{"P0001": [0.1, 0.2, 0.3]}"#;

        // The second row finds its vector already consumed
        let result = CatalogStore::from_json(RETAILERS, products, vectors, 3);
        assert!(matches!(result, Err(AppError::CatalogLoad(_))));
    }

    #[test]
    fn test_rejects_duplicate_retailer() {
        let retailers = r#"[
            {"retailer_id": "R001", "store_type": "Supermarket", "location_tier": "A", "index": 0},
            {"retailer_id": "R001", "store_type": "Kiosk", "location_tier": "B", "index": 1}
        ]"#;

        let result = CatalogStore::from_json(retailers, PRODUCTS, VECTORS, 3);
        assert!(matches!(result, Err(AppError::CatalogLoad(msg)) if msg.contains("R001")));
    }

    #[test]
    fn test_rejects_malformed_rows() {
        let negative_stock = r#"[
            {"product_id": "P0001", "category": "Dairy", "profit_margin": 0.2, "current_stock": -5, "index": 0}
        ]"#;
        let result = CatalogStore::from_json(RETAILERS, negative_stock, VECTORS, 3);
        assert!(matches!(result, Err(AppError::CatalogLoad(_))));

        let unknown_category = r#"[
            {"product_id": "P0001", "category": "Frozen", "profit_margin": 0.2, "current_stock": 5, "index": 0}
        ]"#;
        let result = CatalogStore::from_json(RETAILERS, unknown_category, VECTORS, 3);
        assert!(matches!(result, Err(AppError::CatalogLoad(_))));
    }

    #[test]
    fn test_rejects_vector_mismatch() {
        // Wrong dimension
        let result = CatalogStore::from_json(RETAILERS, PRODUCTS, VECTORS, 4);
        assert!(matches!(result, Err(AppError::CatalogLoad(msg)) if msg.contains("dims")));

        // Missing vector
        let vectors = r#"{"P0001": [0.1, 0.2, 0.3]}"#;
        let result = CatalogStore::from_json(RETAILERS, PRODUCTS, vectors, 3);
        assert!(matches!(result, Err(AppError::CatalogLoad(msg)) if msg.contains("P0002")));

        // Vector without a product
        let vectors = r#"{"P0001": [0.1, 0.2, 0.3], "P0002": [0.4, 0.5, 0.6], "P0003": [0.0, 0.0, 0.0]}"#;
        let result = CatalogStore::from_json(RETAILERS, PRODUCTS, vectors, 3);
        assert!(matches!(result, Err(AppError::CatalogLoad(msg)) if msg.contains("P0003")));
    }

    #[test]
    fn test_out_of_domain_margin_is_accepted() {
        let products = r#"[
            {"product_id": "P0001", "category": "Dairy", "profit_margin": 0.55, "current_stock": 120, "index": 0},
            {"product_id": "P0002", "category": "Snacks", "profit_margin": 0.0, "current_stock": 30, "index": 1}
        ]"#;
        let store = CatalogStore::from_json(RETAILERS, products, VECTORS, 3).unwrap();
        assert_eq!(store.product("P0001").unwrap().profit_margin, 0.55);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in [
            (RETAILER_PROFILES_FILE, RETAILERS),
            (PRODUCT_CATALOG_FILE, PRODUCTS),
            (PRODUCT_VECTORS_FILE, VECTORS),
        ] {
            let mut file = fs::File::create(dir.path().join(name)).unwrap();
            file.write_all(content.as_bytes()).unwrap();
        }

        let store = CatalogStore::load(dir.path(), 3).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.vector_dim(), 3);
    }

    #[test]
    fn test_load_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let result = CatalogStore::load(dir.path(), 3);
        assert!(
            matches!(result, Err(AppError::CatalogLoad(msg)) if msg.contains(RETAILER_PROFILES_FILE))
        );
    }
}
