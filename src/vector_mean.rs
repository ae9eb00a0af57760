use crate::error::{Error, Result};
use ndarray::{Array1, Array2, Axis};
use ndarray_stats::SummaryStatisticsExt;
use tracing::{debug, warn};

/// One chunk's embedding weighted by the chunk's token count.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedVector {
    pub vector: Vec<f32>,
    pub weight: usize,
}

impl WeightedVector {
    pub fn new(vector: Vec<f32>, weight: usize) -> Self {
        Self { vector, weight }
    }
}

/// Weighted mean of the vectors, scaled to unit L2 norm.
///
/// Accumulates in `f64`; only the normalized result is narrowed back to
/// `f32`. The result does not depend on input order beyond floating-point
/// rounding.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if `weighted` is empty, the vectors differ
///   in length, or the weights overflow `usize` when summed.
/// - [`Error::DegenerateInput`] if the weights sum to zero or the mean has
///   zero (or non-finite) magnitude.
pub fn aggregate(weighted: &[WeightedVector]) -> Result<Vec<f32>> {
    let first = weighted
        .first()
        .ok_or_else(|| Error::InvalidArgument("no vectors to aggregate".to_string()))?;
    let embedding_dim = first.vector.len();

    if let Some((i, wv)) = weighted
        .iter()
        .enumerate()
        .find(|(_, wv)| wv.vector.len() != embedding_dim)
    {
        return Err(Error::InvalidArgument(format!(
            "vector {i} has dimension {}, expected {embedding_dim}",
            wv.vector.len()
        )));
    }

    let total_weight = weighted
        .iter()
        .try_fold(0usize, |acc, wv| acc.checked_add(wv.weight))
        .ok_or_else(|| Error::InvalidArgument("total weight overflows usize".to_string()))?;
    if total_weight == 0 {
        warn!(vectors = weighted.len(), "all aggregation weights are zero");
        return Err(Error::DegenerateInput("total weight is zero".to_string()));
    }

    let flat_embeddings: Vec<f64> = weighted
        .iter()
        .flat_map(|wv| wv.vector.iter().map(|&x| f64::from(x)))
        .collect();
    let array = Array2::from_shape_vec((weighted.len(), embedding_dim), flat_embeddings)
        .map_err(|e| Error::InvalidArgument(e.to_string()))?;
    let weights: Array1<f64> = weighted.iter().map(|wv| wv.weight as f64).collect();

    let mean_embedding = array
        .weighted_mean_axis(Axis(0), &weights)
        .map_err(|e| Error::InvalidArgument(e.to_string()))?;

    let norm = mean_embedding.dot(&mean_embedding).sqrt();
    if norm == 0.0 || !norm.is_finite() {
        warn!(norm, dimension = embedding_dim, "weighted mean cannot be normalized");
        return Err(Error::DegenerateInput(format!(
            "weighted mean has norm {norm}, cannot normalize"
        )));
    }

    debug!(
        vectors = weighted.len(),
        dimension = embedding_dim,
        total_weight,
        "aggregated chunk embeddings"
    );

    let (v, _) = mean_embedding
        .mapv(|x| (x / norm) as f32)
        .into_raw_vec_and_offset();
    Ok(v)
}
