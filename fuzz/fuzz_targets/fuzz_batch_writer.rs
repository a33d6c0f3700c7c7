#![no_main]

use libfuzzer_sys::fuzz_target;
use shotfan::batch::BatchWriter;
use shotfan::record::{ResultType, SampleFormat, SampleLayout};
use shotfan::table::BitTable;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let format = SampleFormat::ALL[data[0] as usize % SampleFormat::ALL.len()];
    let layout = format.layout();
    let num_shots = match layout {
        SampleLayout::Serial => 1 + data[1] as usize % 96,
        SampleLayout::TransposedPacked64 => 64 * (1 + data[1] as usize % 3),
    };
    let num_writers = num_shots / layout.shots_per_writer();

    // Per-stream reference buffers, fed the same calls as the batch writer.
    let mut expected: Vec<_> = (0..num_writers).map(|_| format.writer(Vec::new())).collect();
    let mut samples = 0usize;

    let mut out = Vec::new();
    let result = {
        let mut writer = BatchWriter::new(&mut out, num_shots, format).unwrap();
        let mut rest = &data[2..];

        while let Some((&op, tail)) = rest.split_first() {
            rest = tail;
            match op % 3 {
                0 => {
                    let result_type = match op / 3 % 3 {
                        0 => ResultType::Measurement,
                        1 => ResultType::Detector,
                        _ => ResultType::Observable,
                    };
                    writer.begin_result_type(result_type).unwrap();
                    for stream in &mut expected {
                        stream.begin_result_type(result_type).unwrap();
                    }
                }
                1 => {
                    let width = num_shots.div_ceil(8);
                    if rest.len() < width {
                        break;
                    }
                    let (row, tail) = rest.split_at(width);
                    rest = tail;
                    match layout {
                        // ptb64 streams take a whole 8-byte sample per row.
                        SampleLayout::TransposedPacked64 => {
                            writer.batch_write_bit(row).unwrap();
                            for (k, stream) in expected.iter_mut().enumerate() {
                                stream.write_bytes(&row[k * 8..k * 8 + 8]).unwrap();
                            }
                        }
                        SampleLayout::Serial => {
                            writer.batch_write_bit(row).unwrap();
                            for (k, stream) in expected.iter_mut().enumerate() {
                                stream.write_bit((row[k / 8] >> (k % 8)) & 1 == 1).unwrap();
                            }
                        }
                    }
                    samples += 1;
                }
                _ => {
                    let seed = op as usize;
                    let table = BitTable::from_fn(64, num_shots, |m, s| (m * 31 + s * seed) % 7 == 0);
                    writer.batch_write_bytes(&table, 1).unwrap();
                    for m in 0..64 {
                        for (k, stream) in expected.iter_mut().enumerate() {
                            match layout {
                                SampleLayout::TransposedPacked64 => {
                                    stream.write_bytes(&table.row(m)[k * 8..k * 8 + 8]).unwrap()
                                }
                                SampleLayout::Serial => stream.write_bit(table.get(m, k)).unwrap(),
                            }
                        }
                    }
                    samples += 64;
                }
            }
        }

        writer.write_end()
    };

    let complete = layout == SampleLayout::Serial || samples % 64 == 0;
    assert_eq!(result.is_ok(), complete);
    if complete {
        let reference: Vec<u8> = expected
            .into_iter()
            .flat_map(|stream| stream.finish().unwrap())
            .collect();
        assert_eq!(out, reference);
    }
});
