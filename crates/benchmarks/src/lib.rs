//! Benchmarks for command discovery. See `benches/`.
