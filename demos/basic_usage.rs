//! Basic usage example for segpack
//!
//! Run with: cargo run --example basic_usage

use segpack::*;

fn main() -> Result<(), Error> {
    println!("segpack Basic Usage Example");
    println!("===========================");

    let trade = Value::Map(vec![
        (Value::from("seq"), Value::from(12345u32)),
        (Value::from("ts_ns"), Value::from(1_700_000_000_000_000_000u64)),
        (Value::from("price"), Value::from(-25_500_000i64)),
        (Value::from("symbol"), Value::from("AAPL")),
        (Value::from("note"), Value::Nil),
    ]);

    // Example 1: Encode into a Vec and decode back
    println!("\n1. Round Trip:");
    {
        let bytes = encode(&trade);
        println!("  Encoded {} bytes: {:02x?}", bytes.len(), &bytes[..8]);

        let decoded = decode(&bytes)?;
        println!(
            "  Decoded: seq={:?}, price={:?}, symbol={:?}",
            decoded.get(&Value::from("seq")).and_then(Value::as_u64),
            decoded.get(&Value::from("price")).and_then(Value::as_i64),
            decoded.get(&Value::from("symbol")).and_then(Value::as_str),
        );
        println!("  Equal to input: {}", decoded == trade);
    }

    // Example 2: Input scattered over several buffers
    println!("\n2. Scatter-Gather Decoding:");
    {
        let bytes = encode(&trade);
        let regions: Vec<&[u8]> = bytes.chunks(7).collect();
        println!("  {} bytes in {} regions", bytes.len(), regions.len());

        let decoded = decode_segments(&regions)?;
        println!("  Equal to contiguous decode: {}", decoded == decode(&bytes)?);

        // A source can also be assembled incrementally
        let mut source = Segmented::default();
        for region in regions.iter().copied() {
            source.push(region);
        }
        let mut decoder = Decoder::new(&source);
        decoder.decode()?;
        println!("  Decoder consumed {} bytes", decoder.position());
    }

    // Example 3: Allocation-free encoding into a fixed buffer
    println!("\n3. Fixed Buffer Encoding:");
    {
        let mut buf = [0u8; 64];
        let mut encoder = ValueEncoder::new(&mut buf);
        let size = encoder.encode(&trade)?;
        println!("  Encoded {} bytes, {} left", size, encoder.remaining());

        let mut small = [0u8; 16];
        let mut encoder = ValueEncoder::new(&mut small);
        match encoder.encode(&trade) {
            Err(e) => println!("  16-byte buffer: {} (position {})", e, encoder.position()),
            Ok(n) => println!("  16-byte buffer unexpectedly held {} bytes", n),
        }
    }

    // Example 4: Failure modes
    println!("\n4. Error Handling:");
    {
        let bytes = encode(&trade);
        for (name, input) in [
            ("truncated", &bytes[..bytes.len() - 1]),
            ("reserved tag", &[0xc1][..]),
            ("empty", &[][..]),
        ] {
            match decode(input) {
                Err(e) => println!(
                    "  {}: {} (need more input: {})",
                    name,
                    e,
                    e.is_incomplete()
                ),
                Ok(v) => println!("  {}: decoded {:?}", name, v),
            }
        }

        let mut nested = vec![0x91u8; 64];
        nested.push(0xc0);
        let source = Contiguous::new(&nested);
        let config = DecodeConfig::default().with_max_depth(16);
        println!(
            "  64 nested arrays with max_depth 16: {:?}",
            Decoder::with_config(&source, config).decode().err()
        );
    }

    // Example 5: Streams of concatenated values
    println!("\n5. Value Streams:");
    {
        let mut stream = Vec::new();
        for i in 0..3u8 {
            stream.extend_from_slice(&encode(&Value::from(i)));
        }
        stream.extend_from_slice(&encode(&Value::from("done")));

        let (first, consumed) = decode_first(&stream)?;
        println!("  First value {:?} used {} byte(s)", first, consumed);
        println!("  All values: {:?}", decode_all(&stream)?);
    }

    // Example 6: Legacy raw-format peers
    println!("\n6. Compatibility Mode:");
    {
        let blob = Value::Binary(b"raw bytes".to_vec());
        let modern = encode(&blob);
        let legacy = encode_with(&blob, EncodeConfig::default().with_compatibility(true));
        println!("  Binary tag: modern=0x{:02x}, legacy=0x{:02x}", modern[0], legacy[0]);

        let source = Contiguous::new(&legacy);
        let config = DecodeConfig::default().with_compatibility(true);
        let decoded = Decoder::with_config(&source, config).decode()?;
        println!("  Legacy decode is Binary: {}", decoded.as_bytes().is_some());
    }

    // Example 7: Size analysis
    println!("\n7. Size Analysis:");
    {
        let samples = [
            ("nil", Value::Nil),
            ("small uint", Value::from(7u8)),
            ("u64 max", Value::from(u64::MAX)),
            ("i64 min", Value::from(i64::MIN)),
            ("double", Value::from(0.1f64)),
            ("32-char string", Value::from("a".repeat(32))),
            ("trade record", trade.clone()),
        ];

        for (name, value) in &samples {
            println!("  {}: {} bytes", name, encoded_len(value));
        }
    }

    println!("\nAll examples completed successfully!");
    Ok(())
}
