//! Tensor Pool - scoped numeric buffers
//!
//! Every input/label tensor handed to the network comes from a pool and is
//! released when its guard drops, whichever way the owning scope exits.

use candle_core::{Device, Tensor as CandleTensor};
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use super::ModelError;

#[derive(Debug, Default)]
struct PoolCounters {
    live: AtomicUsize,
    live_bytes: AtomicUsize,
    allocated: AtomicU64,
}

/// Allocator and accounting for tensors
#[derive(Debug, Clone, Default)]
pub struct TensorPool {
    counters: Arc<PoolCounters>,
}

impl TensorPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap row-major `data` as a `rows x cols` CPU tensor
    pub fn tensor2d(&self, data: Vec<f32>, shape: (usize, usize)) -> Result<Tensor, ModelError> {
        let len = data.len();
        if len != shape.0 * shape.1 {
            return Err(ModelError::Shape(format!(
                "{} values into {}x{}",
                len, shape.0, shape.1
            )));
        }

        let inner = CandleTensor::from_vec(data, shape, &Device::Cpu)?;
        let bytes = len * std::mem::size_of::<f32>();
        self.counters.live.fetch_add(1, Ordering::Relaxed);
        self.counters.live_bytes.fetch_add(bytes, Ordering::Relaxed);
        self.counters.allocated.fetch_add(1, Ordering::Relaxed);

        Ok(Tensor {
            inner,
            bytes,
            counters: Arc::clone(&self.counters),
        })
    }

    /// Tensors currently alive
    pub fn live(&self) -> usize {
        self.counters.live.load(Ordering::Relaxed)
    }

    pub fn live_bytes(&self) -> usize {
        self.counters.live_bytes.load(Ordering::Relaxed)
    }

    /// Tensors ever allocated from this pool
    pub fn allocated_total(&self) -> u64 {
        self.counters.allocated.load(Ordering::Relaxed)
    }
}

/// A pooled 2-D tensor, released on drop
#[derive(Debug)]
pub struct Tensor {
    inner: CandleTensor,
    bytes: usize,
    counters: Arc<PoolCounters>,
}

impl Deref for Tensor {
    type Target = CandleTensor;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Drop for Tensor {
    fn drop(&mut self) {
        self.counters.live.fetch_sub(1, Ordering::Relaxed);
        self.counters.live_bytes.fetch_sub(self.bytes, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_on_drop() {
        let pool = TensorPool::new();
        {
            let a = pool.tensor2d(vec![0.0; 6], (2, 3)).unwrap();
            let _b = pool.tensor2d(vec![1.0; 3], (3, 1)).unwrap();
            assert_eq!(a.dims(), &[2, 3]);
            assert_eq!(pool.live(), 2);
            assert_eq!(pool.live_bytes(), 9 * 4);
        }
        assert_eq!(pool.live(), 0);
        assert_eq!(pool.live_bytes(), 0);
        assert_eq!(pool.allocated_total(), 2);
    }

    #[test]
    fn test_shape_mismatch_allocates_nothing() {
        let pool = TensorPool::new();
        let result = pool.tensor2d(vec![0.0; 5], (2, 3));

        assert!(matches!(result, Err(ModelError::Shape(_))));
        assert_eq!(pool.live(), 0);
        assert_eq!(pool.allocated_total(), 0);
    }

    #[test]
    fn test_clones_share_accounting() {
        let pool = TensorPool::new();
        let other = pool.clone();
        let t = other.tensor2d(vec![0.5, 1.5], (1, 2)).unwrap();
        assert_eq!(pool.live(), 1);
        assert_eq!(t.to_vec2::<f32>().unwrap(), vec![vec![0.5, 1.5]]);
    }
}
