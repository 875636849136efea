use eldermem_shared::AppError;

/// Target dimension for embeddings.
pub const EMBEDDING_DIM: usize = 768;
/// Threshold for determining if L2 normalization is needed.
const L2_NORM_TOLERANCE: f32 = 1e-6;

/// Process embedding vector to ensure it's L2 normalized with exactly 768 dimensions.
///
/// - If dim > 768: truncate to 768 and L2 normalize
/// - If dim == 768: check if already L2 normalized, normalize if not
/// - If dim < 768: return error
pub fn process_embedding(mut vec: Vec<f32>) -> Result<Vec<f32>, AppError> {
  match vec.len() {
    d if d > EMBEDDING_DIM => {
      vec.truncate(EMBEDDING_DIM);
      l2_normalize(&mut vec);
      Ok(vec)
    }
    d if d == EMBEDDING_DIM => {
      let norm_sq: f32 = vec.iter().map(|x| x * x).sum();
      if (norm_sq - 1.0).abs() > L2_NORM_TOLERANCE {
        l2_normalize(&mut vec);
      }
      Ok(vec)
    }
    d => Err(AppError::new(anyhow::anyhow!(
      "embedding dimension {} is less than required {}",
      d,
      EMBEDDING_DIM
    ))),
  }
}

/// L2 normalize a vector in-place.
fn l2_normalize(vec: &mut [f32]) {
  let norm_sq: f32 = vec.iter().map(|x| x * x).sum();
  let norm = norm_sq.sqrt();
  if norm > 1e-12 {
    for x in vec.iter_mut() {
      *x /= norm;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
  }

  #[test]
  fn exact_dim_is_normalized() {
    let mut v = vec![0.0_f32; EMBEDDING_DIM];
    v[0] = 3.0;
    v[1] = 4.0;
    let out = process_embedding(v).unwrap();
    assert_eq!(out.len(), EMBEDDING_DIM);
    assert!((norm(&out) - 1.0).abs() < 1e-5);
  }

  #[test]
  fn longer_vector_is_truncated() {
    let mut v = vec![0.0_f32; EMBEDDING_DIM + 256];
    v[0] = 1.0;
    let out = process_embedding(v).unwrap();
    assert_eq!(out.len(), EMBEDDING_DIM);
    assert!((norm(&out) - 1.0).abs() < 1e-5);
  }

  #[test]
  fn shorter_vector_is_rejected() {
    let v = vec![1.0_f32; EMBEDDING_DIM - 1];
    assert!(process_embedding(v).is_err());
  }

  #[test]
  fn already_unit_norm_is_untouched() {
    let mut v = vec![0.0_f32; EMBEDDING_DIM];
    v[42] = 1.0;
    let out = process_embedding(v.clone()).unwrap();
    assert_eq!(out, v);
  }
}
