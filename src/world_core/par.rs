// Maps over an index range and collects into a Vec in index order. Runs on the
// rayon pool natively; wasm32 has no threads, so it falls back to a plain loop.

#[cfg(not(target_arch = "wasm32"))]
macro_rules! par_map_collect {
    ($range:expr, $f:expr) => {{
        use rayon::prelude::*;
        $range.into_par_iter().map($f).collect::<Vec<_>>()
    }};
}

#[cfg(target_arch = "wasm32")]
macro_rules! par_map_collect {
    ($range:expr, $f:expr) => {
        $range.into_iter().map($f).collect::<Vec<_>>()
    };
}
