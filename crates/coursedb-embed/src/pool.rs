use anyhow::{bail, Result};
use candle_core::Tensor;

/// Mean of the token states selected by `attention_mask`: `[B,T,H]` + `[B,T]` → `[B,H]`.
///
/// No normalization here; cosine scoring normalizes at query time.
pub fn masked_mean(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let dims = hidden.dims();
    if dims.len() != 3 {
        bail!("hidden shape must be [B,T,H], got {:?}", dims);
    }
    let batch = dims[0];
    let hidden_dim = dims[2];

    let mask = attention_mask
        .to_device(hidden.device())?
        .to_dtype(hidden.dtype())?;
    let mask_3d = mask.unsqueeze(2)?;
    let mask_broadcast = match mask_3d.broadcast_as(hidden.shape()) {
        Ok(m) => m,
        Err(_) => mask_3d.repeat((1, 1, hidden_dim))?,
    };
    let masked = (hidden * &mask_broadcast)?;
    let sum = masked.sum(1)?;
    let lengths = mask.sum(1)?.unsqueeze(1)?.to_dtype(sum.dtype())?;
    let mean = sum.broadcast_div(&lengths)?;
    if mean.dims() != [batch, hidden_dim] {
        bail!(
            "pooled shape {:?} != [{}, {}]",
            mean.dims(),
            batch,
            hidden_dim
        );
    }
    Ok(mean)
}
