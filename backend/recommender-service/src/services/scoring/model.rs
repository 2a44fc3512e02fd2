/// Two-Tower Model Inference Module
///
/// Loads and runs the ONNX export of the hybrid two-tower relevance model
/// using tract-onnx. Inference runs on the blocking thread pool so a full
/// catalog batch never stalls the async workers.
use super::{ModelInputs, RelevanceScorer};
use crate::error::{AppError, Result};
use crate::models::{ProductRecord, RetailerProfile};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use tract_onnx::prelude::*;

/// Number of graph inputs: 3 retailer tower + 5 product tower
const MODEL_INPUT_COUNT: usize = 8;

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

pub struct OnnxRelevanceModel {
    plan: Arc<OnnxPlan>,
}

impl OnnxRelevanceModel {
    /// Load ONNX model from file path
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let path = model_path.as_ref();

        if !path.exists() {
            return Err(AppError::ModelLoad(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        let plan = Self::try_load_onnx(path).map_err(|e| {
            AppError::ModelLoad(format!("Failed to load {}: {}", path.display(), e))
        })?;

        info!("Loaded ONNX relevance model from: {}", path.display());

        Ok(Self {
            plan: Arc::new(plan),
        })
    }

    fn try_load_onnx(path: &Path) -> TractResult<OnnxPlan> {
        let model = tract_onnx::onnx().model_for_path(path)?;

        let input_count = model.input_outlets()?.len();
        if input_count != MODEL_INPUT_COUNT {
            return Err(TractError::msg(format!(
                "Expected {} model inputs, found {}",
                MODEL_INPUT_COUNT, input_count
            )));
        }

        model.into_optimized()?.into_runnable()
    }

    fn run(plan: &OnnxPlan, inputs: ModelInputs) -> TractResult<Vec<f32>> {
        let values: TVec<TValue> = tvec![
            to_tensor(ModelInputs::raw(&inputs.retailer_index))?,
            to_tensor(ModelInputs::raw(&inputs.store_type))?,
            to_tensor(ModelInputs::raw(&inputs.location_tier))?,
            to_tensor(ModelInputs::raw(&inputs.product_index))?,
            to_tensor(ModelInputs::raw(&inputs.content))?,
            to_tensor(ModelInputs::raw(&inputs.category))?,
            to_tensor(ModelInputs::raw(&inputs.profit_margin))?,
            to_tensor(ModelInputs::raw(&inputs.current_stock))?,
        ];

        let output = plan.run(values)?;
        let scores = output[0].to_array_view::<f32>()?;

        Ok(scores.iter().copied().collect())
    }
}

#[async_trait]
impl RelevanceScorer for OnnxRelevanceModel {
    async fn score(
        &self,
        retailer: &RetailerProfile,
        products: &[ProductRecord],
    ) -> Result<Vec<f32>> {
        if products.is_empty() {
            return Ok(vec![]);
        }

        let inputs = ModelInputs::from_batch(retailer, products)?;
        let batch_size = inputs.batch_size();
        let plan = Arc::clone(&self.plan);

        debug!(
            retailer_id = %retailer.retailer_id,
            batch_size,
            "Running ONNX inference"
        );

        // A caller that times out only drops the JoinHandle; the inference
        // keeps its blocking-pool thread until it runs to completion.
        let scores = tokio::task::spawn_blocking(move || Self::run(&plan, inputs))
            .await
            .map_err(|e| AppError::Scoring(format!("Inference task failed: {}", e)))?
            .map_err(|e| AppError::Scoring(format!("ONNX inference failed: {}", e)))?;

        if scores.len() != batch_size {
            return Err(AppError::Scoring(format!(
                "Model returned {} scores for {} products",
                scores.len(),
                batch_size
            )));
        }

        Ok(scores)
    }

    fn name(&self) -> &'static str {
        "onnx"
    }
}

fn to_tensor<T: Datum>((shape, values): ((usize, usize), Vec<T>)) -> TractResult<TValue> {
    let array = tract_ndarray::Array2::from_shape_vec(shape, values)?;
    Ok(Tensor::from(array).into())
}
