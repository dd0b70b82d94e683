//! Benchmark utilities and performance testing
//!
//! This module provides simple benchmarking functions for measuring
//! encoding and decoding performance. Only available with std feature.

#[cfg(feature = "std")]
use std::time::{Duration, Instant};

use alloc::vec;
use alloc::vec::Vec;

use crate::decoder::{decode, decode_segments};
use crate::encoder::encode;
use crate::error::Result;
use crate::value::Value;

/// Simple benchmark statistics
#[derive(Debug, Clone)]
pub struct BenchStats {
    /// Number of operations
    pub count: usize,
    /// Total duration
    pub total_duration: Duration,
    /// Average time per operation
    pub avg_ns_per_op: u64,
    /// Operations per second
    pub ops_per_sec: f64,
}

impl BenchStats {
    /// Create new stats from measurements
    pub fn new(count: usize, total_duration: Duration) -> Self {
        let total_ns = total_duration.as_nanos() as u64;
        let avg_ns_per_op = if count > 0 {
            total_ns / count as u64
        } else {
            0
        };
        let ops_per_sec = if total_ns > 0 {
            (count as f64) * 1_000_000_000.0 / (total_ns as f64)
        } else {
            0.0
        };

        Self {
            count,
            total_duration,
            avg_ns_per_op,
            ops_per_sec,
        }
    }
}

#[cfg(feature = "std")]
impl std::fmt::Display for BenchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ops, {:.2}ms total, {} ns/op, {:.0} ops/sec",
            self.count,
            self.total_duration.as_secs_f64() * 1000.0,
            self.avg_ns_per_op,
            self.ops_per_sec
        )
    }
}

/// A representative record: a map of mixed scalars plus a short array
pub fn sample_record(i: usize) -> Value {
    Value::Map(vec![
        (Value::from("seq"), Value::from(i as u64)),
        (Value::from("ts_ns"), Value::from(1_700_000_000_000_000_000u64 + i as u64)),
        (Value::from("price"), Value::from(50_000_000i64 - (i as i64 % 1000))),
        (Value::from("ratio"), Value::from(0.5f64 + i as f64)),
        (Value::from("symbol"), Value::from("AAPL")),
        (
            Value::from("tags"),
            Value::Array(vec![Value::from(true), Value::Nil, Value::from(-7i8)]),
        ),
    ])
}

/// Benchmark record encoding
#[cfg(feature = "std")]
pub fn bench_encode(count: usize) -> BenchStats {
    let records: Vec<Value> = (0..count).map(sample_record).collect();
    let start = Instant::now();

    for record in &records {
        std::hint::black_box(encode(record));
    }

    BenchStats::new(count, start.elapsed())
}

/// Benchmark record decoding from one contiguous buffer
#[cfg(feature = "std")]
pub fn bench_decode(count: usize) -> Result<BenchStats> {
    let frames: Vec<Vec<u8>> = (0..count).map(|i| encode(&sample_record(i))).collect();
    let start = Instant::now();

    for frame in &frames {
        std::hint::black_box(decode(frame)?);
    }

    Ok(BenchStats::new(count, start.elapsed()))
}

/// Benchmark record decoding with every frame split into `chunk`-byte regions
#[cfg(feature = "std")]
pub fn bench_decode_segmented(count: usize, chunk: usize) -> Result<BenchStats> {
    let frames: Vec<Vec<u8>> = (0..count).map(|i| encode(&sample_record(i))).collect();
    let regions: Vec<Vec<&[u8]>> = frames
        .iter()
        .map(|frame| frame.chunks(chunk.max(1)).collect())
        .collect();
    let start = Instant::now();

    for parts in &regions {
        std::hint::black_box(decode_segments(parts)?);
    }

    Ok(BenchStats::new(count, start.elapsed()))
}

/// Run simple performance test suite
#[cfg(feature = "std")]
pub fn run_perf_test() -> Result<()> {
    std::println!("segpack Performance Test Suite");
    std::println!("==============================");

    const TEST_COUNT: usize = 100_000;

    std::println!("\nTesting with {} operations...", TEST_COUNT);

    let encode_stats = bench_encode(TEST_COUNT);
    std::println!("Record encode: {}", encode_stats);

    let decode_stats = bench_decode(TEST_COUNT)?;
    std::println!("Record decode (contiguous): {}", decode_stats);

    for chunk in [64, 16, 1] {
        let stats = bench_decode_segmented(TEST_COUNT, chunk)?;
        std::println!("Record decode ({}-byte regions): {}", chunk, stats);
    }

    let record_size = encode(&sample_record(0)).len();
    std::println!("\nRecord size analysis:");
    std::println!("Encoded record size: {} bytes", record_size);
    std::println!(
        "Throughput at {:.0} decodes/s: {:.2} MB/s",
        decode_stats.ops_per_sec,
        decode_stats.ops_per_sec * record_size as f64 / 1_000_000.0
    );

    Ok(())
}
