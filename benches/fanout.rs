use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shotfan::batch::BatchWriter;
use shotfan::record::SampleFormat;
use shotfan::table::BitTable;
use std::io;

/// Random-looking table with roughly one bit in eight set
fn generate_table(num_major: usize, num_minor: usize) -> BitTable {
    BitTable::from_fn(num_major, num_minor, |m, s| {
        let x = (m as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (s as u64).wrapping_mul(0xD6E8_FEB8_6659_FD93);
        (x >> 61) == 0
    })
}

/// Benchmark bulk fan-out for serial formats (transpose path)
fn bench_serial_bulk(c: &mut Criterion) {
    let mut group = c.benchmark_group("serial_bulk");

    for num_shots in [64, 512, 2048] {
        let table = generate_table(1024, num_shots);
        group.throughput(Throughput::Elements((num_shots * 1024) as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}shots_b8", num_shots)),
            &table,
            |b, table| {
                b.iter(|| {
                    let mut sink = io::sink();
                    let mut writer = BatchWriter::new(&mut sink, num_shots, SampleFormat::B8)
                        .expect("Failed to open batch writer");
                    writer.batch_write_bytes(table, 16).expect("Bulk write failed");
                    writer.write_end().expect("Finalize failed")
                });
            },
        );
    }

    group.finish();
}

/// Benchmark bulk fan-out for ptb64 (byte copy path)
fn bench_ptb64_bulk(c: &mut Criterion) {
    let mut group = c.benchmark_group("ptb64_bulk");

    for num_shots in [64, 512, 2048] {
        let table = generate_table(1024, num_shots);
        group.throughput(Throughput::Elements((num_shots * 1024) as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}shots", num_shots)),
            &table,
            |b, table| {
                b.iter(|| {
                    let mut sink = io::sink();
                    let mut writer = BatchWriter::new(&mut sink, num_shots, SampleFormat::Ptb64)
                        .expect("Failed to open batch writer");
                    writer.batch_write_bytes(table, 16).expect("Bulk write failed");
                    writer.write_end().expect("Finalize failed")
                });
            },
        );
    }

    group.finish();
}

/// Benchmark one sample at a time against the bulk path
fn bench_per_sample_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("per_sample_overhead");
    let num_shots = 256;
    let table = generate_table(64, num_shots);
    group.throughput(Throughput::Elements((num_shots * 64) as u64));

    group.bench_function("batch_write_bit_x64", |b| {
        b.iter(|| {
            let mut sink = io::sink();
            let mut writer = BatchWriter::new(&mut sink, num_shots, SampleFormat::Text01)
                .expect("Failed to open batch writer");
            for m in 0..64 {
                writer.batch_write_bit(table.row(m)).expect("Row write failed");
            }
            writer.write_end().expect("Finalize failed")
        });
    });

    group.bench_function("batch_write_bytes_x1", |b| {
        b.iter(|| {
            let mut sink = io::sink();
            let mut writer = BatchWriter::new(&mut sink, num_shots, SampleFormat::Text01)
                .expect("Failed to open batch writer");
            writer.batch_write_bytes(&table, 1).expect("Bulk write failed");
            writer.write_end().expect("Finalize failed")
        });
    });

    group.finish();
}

/// Benchmark the 64x64 block transpose on its own
fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");

    for size in [64, 1024, 4096] {
        let table = generate_table(size, size);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| table.transposed());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_serial_bulk,
    bench_ptb64_bulk,
    bench_per_sample_overhead,
    bench_transpose
);
criterion_main!(benches);
