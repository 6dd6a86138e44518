use rayon::prelude::*;

/// Where the per-primitive and per-line loops run.
pub enum Executor {
    /// Plain loop on the calling thread.
    Sequential,
    /// rayon's global pool.
    Global,
    /// A pool owned by this pipeline.
    Pool(rayon::ThreadPool),
}

impl Executor {
    /// Call `f` once per item. No ordering is promised on the parallel
    /// variants.
    pub fn for_each<T, F>(&self, items: &[T], f: F)
    where
        T: Sync,
        F: Fn(&T) + Send + Sync,
    {
        match self {
            Executor::Sequential => items.iter().for_each(f),
            Executor::Global => items.par_iter().for_each(f),
            Executor::Pool(pool) => pool.install(|| items.par_iter().for_each(f)),
        }
    }

    /// Worker count, 1 for [`Executor::Sequential`].
    pub fn threads(&self) -> usize {
        match self {
            Executor::Sequential => 1,
            Executor::Global => rayon::current_num_threads(),
            Executor::Pool(pool) => pool.current_num_threads(),
        }
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Executor::Sequential => f.write_str("Sequential"),
            Executor::Global => f.write_str("Global"),
            Executor::Pool(pool) => write!(f, "Pool({})", pool.current_num_threads()),
        }
    }
}
