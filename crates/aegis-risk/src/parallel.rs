//! Conditional parallel iteration over instruments.
//!
//! Uses rayon when the `parallel` feature is enabled and the configuration
//! asks for it; otherwise runs sequentially. Output order always matches
//! input order.

use aegis_core::types::RiskConfig;

/// Maps a function over items, in parallel when `config` allows it for
/// this many items.
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &RiskConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}
