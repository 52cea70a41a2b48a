//! Built-in readers.
//!
//! `SyntheticReader` generates a deterministic labeled stream for end-to-end
//! runs and throughput measurement. `VecReader` replays a prepared in-memory
//! sequence; it is a library-level building block and is not registered
//! (its data cannot come from flags).

use crate::pipeline::error::ReadError;
use crate::pipeline::stage::{ComponentHandle, Reader};
use crate::registry::{
    Category, ComponentDescriptor, DefaultValue, ParamDescriptor, ParamKind, ParamSet,
};
use crate::types::Instance;

static SYNTHETIC_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::optional("-n", "Instances", ParamKind::Int, DefaultValue::Int(1000)),
    ParamDescriptor::optional("-a", "Attributes", ParamKind::Int, DefaultValue::Int(5)),
    ParamDescriptor::optional("-c", "Classes", ParamKind::Int, DefaultValue::Int(2)),
    ParamDescriptor::optional("-s", "Seed", ParamKind::Int, DefaultValue::Int(1)),
];

/// Deterministic generator of labeled instances.
///
/// Features are uniform in [0, 1); the label buckets the feature sum into
/// one of `classes` ranges, so the stream is learnable and reproducible for
/// a given seed.
pub struct SyntheticReader {
    remaining: u64,
    attributes: usize,
    classes: usize,
    rng_state: u64,
    emitted: u64,
}

impl SyntheticReader {
    pub fn new(instances: u64, attributes: usize, classes: usize, seed: u64) -> Self {
        Self {
            remaining: instances,
            attributes: attributes.max(1),
            classes: classes.max(2),
            // xorshift64 must not start at zero
            rng_state: seed.max(1),
            emitted: 0,
        }
    }

    pub fn descriptor() -> ComponentDescriptor {
        ComponentDescriptor {
            name: "SyntheticReader",
            category: Category::Reader,
            params: SYNTHETIC_PARAMS,
            factory: Self::from_params,
        }
    }

    fn from_params(params: ParamSet) -> Result<ComponentHandle, String> {
        let instances = params.get_int("-n").ok_or("missing -n")?;
        let attributes = params.get_int("-a").ok_or("missing -a")?;
        let classes = params.get_int("-c").ok_or("missing -c")?;
        let seed = params.get_int("-s").ok_or("missing -s")?;

        if instances < 0 {
            return Err("-n must be non-negative".to_string());
        }
        if attributes < 1 {
            return Err("-a must be at least 1".to_string());
        }
        if classes < 2 {
            return Err("-c must be at least 2".to_string());
        }

        Ok(ComponentHandle::Reader(Box::new(Self::new(
            instances as u64,
            attributes as usize,
            classes as usize,
            seed as u64,
        ))))
    }

    /// Instances emitted so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    fn next_f64(&mut self) -> f64 {
        // xorshift64
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;
        (x >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl Reader for SyntheticReader {
    fn name(&self) -> &str {
        "SyntheticReader"
    }

    fn next_instance(&mut self) -> Result<Option<Instance>, ReadError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;

        let features: Vec<f64> = (0..self.attributes).map(|_| self.next_f64()).collect();
        let sum: f64 = features.iter().sum();
        let bucket = (sum / self.attributes as f64 * self.classes as f64) as usize;
        let label = bucket.min(self.classes - 1);

        self.emitted += 1;
        Ok(Some(Instance::labeled(features, label)))
    }
}

/// Replays a prepared sequence of instances, then reports exhaustion.
pub struct VecReader {
    items: std::vec::IntoIter<Instance>,
}

impl VecReader {
    pub fn new(items: Vec<Instance>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }
}

impl Reader for VecReader {
    fn name(&self) -> &str {
        "VecReader"
    }

    fn next_instance(&mut self) -> Result<Option<Instance>, ReadError> {
        Ok(self.items.next())
    }
}
