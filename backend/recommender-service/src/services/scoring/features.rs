use crate::error::{AppError, Result};
use crate::models::{ProductRecord, RetailerProfile};
use ndarray::Array2;

/// Column-aligned model inputs for one scoring batch.
///
/// Layout follows the trained model's input order:
/// retailer tower `[retailer_index, store_type, location_tier]`, then product
/// tower `[product_index, content_vector, category, profit_margin, current_stock]`.
/// Every matrix has one row per product.
#[derive(Debug, Clone)]
pub struct ModelInputs {
    pub retailer_index: Array2<i32>,
    pub store_type: Array2<i32>,
    pub location_tier: Array2<i32>,
    pub product_index: Array2<i32>,
    pub content: Array2<f32>,
    pub category: Array2<i32>,
    pub profit_margin: Array2<f32>,
    pub current_stock: Array2<f32>,
}

impl ModelInputs {
    pub fn from_batch(retailer: &RetailerProfile, products: &[ProductRecord]) -> Result<Self> {
        let n = products.len();
        let vector_dim = products.first().map(|p| p.content_vector.len()).unwrap_or(0);

        let content_values: Vec<f32> = products
            .iter()
            .flat_map(|p| p.content_vector.iter().copied())
            .collect();
        let content = Array2::from_shape_vec((n, vector_dim), content_values).map_err(|e| {
            AppError::Scoring(format!("Failed to build content matrix: {}", e))
        })?;

        Ok(Self {
            retailer_index: Array2::from_elem((n, 1), retailer.index as i32),
            store_type: Array2::from_elem((n, 1), retailer.store_type.code()),
            location_tier: Array2::from_elem((n, 1), retailer.location_tier.code()),
            product_index: column(products, |p| p.index as i32),
            content,
            category: column(products, |p| p.category.code()),
            profit_margin: column(products, |p| p.profit_margin),
            current_stock: column(products, |p| p.current_stock as f32),
        })
    }

    pub fn batch_size(&self) -> usize {
        self.content.nrows()
    }

    pub fn vector_dim(&self) -> usize {
        self.content.ncols()
    }

    /// Shape and row-major values of one input matrix
    pub fn raw<T: Clone>(matrix: &Array2<T>) -> ((usize, usize), Vec<T>) {
        (matrix.dim(), matrix.iter().cloned().collect())
    }
}

fn column<T: Clone, F: Fn(&ProductRecord) -> T>(products: &[ProductRecord], f: F) -> Array2<T> {
    Array2::from_shape_fn((products.len(), 1), |(i, _)| f(&products[i]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, LocationTier, StoreType};

    fn product(id: &str, index: u32, vector: Vec<f32>) -> ProductRecord {
        ProductRecord {
            product_id: id.to_string(),
            category: Category::Snacks,
            profit_margin: 0.2,
            current_stock: 75,
            content_vector: vector,
            index,
        }
    }

    fn retailer() -> RetailerProfile {
        RetailerProfile {
            retailer_id: "R007".to_string(),
            store_type: StoreType::Supermarket,
            location_tier: LocationTier::B,
            index: 7,
        }
    }

    #[test]
    fn test_inputs_are_row_aligned() {
        let products = vec![
            product("P0001", 0, vec![0.1, 0.2]),
            product("P0002", 1, vec![0.3, 0.4]),
        ];

        let inputs = ModelInputs::from_batch(&retailer(), &products).unwrap();

        assert_eq!(inputs.batch_size(), 2);
        assert_eq!(inputs.vector_dim(), 2);
        assert_eq!(inputs.retailer_index[[1, 0]], 7);
        assert_eq!(inputs.store_type[[0, 0]], StoreType::Supermarket.code());
        assert_eq!(inputs.location_tier[[0, 0]], 1);
        assert_eq!(inputs.product_index[[1, 0]], 1);
        assert_eq!(inputs.content[[1, 1]], 0.4);
        assert_eq!(inputs.category[[0, 0]], 3);
        assert_eq!(inputs.current_stock[[1, 0]], 75.0);
    }

    #[test]
    fn test_ragged_vectors_rejected() {
        let products = vec![
            product("P0001", 0, vec![0.1, 0.2]),
            product("P0002", 1, vec![0.3]),
        ];

        let result = ModelInputs::from_batch(&retailer(), &products);
        assert!(matches!(result, Err(AppError::Scoring(_))));
    }
}
