use rand::Rng;
use reqwest::Method;

/// One kind of request a simulated user can make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub method: Method,
    /// Path appended to the target host, starting with `/`.
    pub path: String,
    /// Relative likelihood of this task being picked on each iteration.
    pub weight: u32,
}

impl Task {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            weight: 1,
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Key under which results are aggregated, e.g. `GET /status`.
    pub fn name(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// The homepage and the status endpoint, equally weighted.
pub fn default_tasks() -> Vec<Task> {
    vec![Task::get("/"), Task::get("/status")]
}

/// Picks an index into `weights` with probability proportional to its weight.
///
/// `total` must equal the sum of `weights` and be non-zero.
pub(super) fn pick_weighted<R: Rng>(weights: &[u32], total: u64, rng: &mut R) -> usize {
    let mut roll = rng.random_range(0..total);
    for (idx, &weight) in weights.iter().enumerate() {
        let weight = u64::from(weight);
        if roll < weight {
            return idx;
        }
        roll -= weight;
    }
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn default_tasks_hit_home_and_status() {
        let names: Vec<String> = default_tasks().iter().map(Task::name).collect();
        assert_eq!(names, ["GET /", "GET /status"]);
        assert!(default_tasks().iter().all(|t| t.weight == 1));
    }

    #[test]
    fn zero_weight_is_never_picked() {
        let mut rng = StdRng::seed_from_u64(7);
        let weights = [0, 3, 0];
        for _ in 0..500 {
            assert_eq!(pick_weighted(&weights, 3, &mut rng), 1);
        }
    }

    #[test]
    fn picks_roughly_by_weight() {
        let mut rng = StdRng::seed_from_u64(42);
        let weights = [1, 3];
        let mut counts = [0u32; 2];
        for _ in 0..10_000 {
            counts[pick_weighted(&weights, 4, &mut rng)] += 1;
        }
        // Expect ~2500 / ~7500.
        assert!((2_000..3_000).contains(&counts[0]), "{counts:?}");
        assert!((7_000..8_000).contains(&counts[1]), "{counts:?}");
    }
}
