use super::*;

/// Feed `bits` one at a time and return everything the writer produced.
fn encode_bits(format: SampleFormat, bits: &[bool]) -> Vec<u8> {
    let mut writer = format.writer(Vec::new());
    for bit in bits {
        writer.write_bit(*bit).unwrap();
    }
    writer.finish().unwrap()
}

fn bits_from_str(s: &str) -> Vec<bool> {
    s.chars().map(|c| c == '1').collect()
}

#[test]
fn test_text01() {
    assert_eq!(encode_bits(SampleFormat::Text01, &bits_from_str("1011")), b"1011\n");
    assert_eq!(encode_bits(SampleFormat::Text01, &[]), b"\n");
}

#[test]
fn test_text01_write_bytes_lsb_first() {
    let mut writer = SampleFormat::Text01.writer(Vec::new());
    writer.write_bytes(&[0b0000_0011, 0x80]).unwrap();
    assert_eq!(writer.finish().unwrap(), b"1100000000000001\n");
}

#[test]
fn test_b8_packs_and_pads() {
    let out = encode_bits(SampleFormat::B8, &bits_from_str("1000000011"));
    assert_eq!(out, vec![0x01, 0x03]);
}

#[test]
fn test_b8_write_bytes_off_boundary() {
    let mut writer = SampleFormat::B8.writer(Vec::new());
    writer.write_bit(true).unwrap();
    writer.write_bytes(&[0xFF]).unwrap();
    assert_eq!(writer.finish().unwrap(), vec![0xFF, 0x01]);
}

#[test]
fn test_b8_write_bytes_on_boundary_is_verbatim() {
    let mut writer = SampleFormat::B8.writer(Vec::new());
    writer.write_bytes(&[0xAB, 0xCD]).unwrap();
    assert_eq!(writer.finish().unwrap(), vec![0xAB, 0xCD]);
}

#[test]
fn test_r8() {
    // 0 zeros then 1, 3 zeros then 1, 2 trailing zeros.
    assert_eq!(encode_bits(SampleFormat::R8, &bits_from_str("1000100")), vec![0, 3, 2]);
    assert_eq!(encode_bits(SampleFormat::R8, &[]), vec![0]);
}

#[test]
fn test_r8_long_runs() {
    let mut bits = vec![false; 255];
    bits.push(true);
    assert_eq!(encode_bits(SampleFormat::R8, &bits), vec![0xFF, 0x00, 0x00]);

    let bits = vec![false; 300];
    assert_eq!(encode_bits(SampleFormat::R8, &bits), vec![0xFF, 45]);
}

#[test]
fn test_hits() {
    assert_eq!(encode_bits(SampleFormat::Hits, &bits_from_str("0110001")), b"1,2,6\n");
    assert_eq!(encode_bits(SampleFormat::Hits, &bits_from_str("000")), b"\n");
}

#[test]
fn test_hits_write_bytes_skips_zero_bytes() {
    let mut writer = SampleFormat::Hits.writer(Vec::new());
    writer.write_bytes(&[0x00, 0x02]).unwrap();
    assert_eq!(writer.finish().unwrap(), b"9\n");
}

#[test]
fn test_dets_sections() {
    let mut writer = SampleFormat::Dets.writer(Vec::new());
    writer.begin_result_type(ResultType::Detector).unwrap();
    for bit in bits_from_str("0101") {
        writer.write_bit(bit).unwrap();
    }
    writer.begin_result_type(ResultType::Observable).unwrap();
    writer.write_bit(true).unwrap();
    assert_eq!(writer.finish().unwrap(), b"shot D1 D3 L0\n");
}

#[test]
fn test_dets_defaults_to_measurements() {
    assert_eq!(encode_bits(SampleFormat::Dets, &bits_from_str("001")), b"shot M2\n");
    assert_eq!(encode_bits(SampleFormat::Dets, &[]), b"shot\n");
}

#[test]
fn test_ptb64_blocks() {
    let mut writer = SampleFormat::Ptb64.writer(Vec::new());
    for sample in 0..PTB64_BLOCK_SAMPLES as u64 {
        writer.write_bytes(&sample.to_le_bytes()).unwrap();
    }
    let out = writer.finish().unwrap();
    assert_eq!(out.len(), PTB64_BLOCK_SAMPLES * PTB64_SAMPLE_BYTES);
    assert_eq!(&out[8..16], &1u64.to_le_bytes());
    assert_eq!(&out[504..512], &63u64.to_le_bytes());
}

#[test]
fn test_ptb64_rejects_bits_and_ragged_bytes() {
    let mut writer = SampleFormat::Ptb64.writer(Vec::new());
    assert!(matches!(writer.write_bit(true), Err(RecordError::Unsupported(_))));
    assert!(matches!(writer.write_bytes(&[0; 7]), Err(RecordError::Unsupported(_))));
}

#[test]
fn test_ptb64_incomplete_block() {
    let mut writer = SampleFormat::Ptb64.writer(Vec::new());
    writer.write_bytes(&[0xFF; 16]).unwrap();
    let err = writer.finish().unwrap_err();
    assert!(matches!(
        err,
        RecordError::IncompleteBlock {
            recorded: 2,
            required: 64
        }
    ));
}

#[test]
fn test_format_names_roundtrip() {
    for format in SampleFormat::ALL {
        assert_eq!(format.name().parse::<SampleFormat>().unwrap(), format);
        assert_eq!(format.to_string(), format.name());
    }
    assert_eq!(" PTB64 ".parse::<SampleFormat>().unwrap(), SampleFormat::Ptb64);
    assert!(matches!(
        "csv".parse::<SampleFormat>(),
        Err(RecordError::UnknownFormat(_))
    ));
}

#[test]
fn test_layouts() {
    assert_eq!(SampleFormat::Ptb64.layout(), SampleLayout::TransposedPacked64);
    assert_eq!(SampleFormat::B8.layout(), SampleLayout::Serial);
    assert_eq!(SampleLayout::TransposedPacked64.shots_per_writer(), 64);
    assert_eq!(SampleLayout::Serial.shots_per_writer(), 1);
}

#[test]
fn test_result_type_chars() {
    for c in ['M', 'D', 'L'] {
        assert_eq!(ResultType::try_from(c).unwrap().as_char(), c);
    }
    assert!(matches!(
        ResultType::try_from('X'),
        Err(RecordError::UnknownResultType('X'))
    ));
}

#[test]
fn test_abandon_skips_framing_and_pending_samples() {
    let mut writer = SampleFormat::Text01.writer(Vec::new());
    writer.write_bytes(&[0b0000_0101]).unwrap();
    assert_eq!(writer.abandon(), b"10100000");

    let mut writer = SampleFormat::B8.writer(Vec::new());
    for bit in bits_from_str("101") {
        writer.write_bit(bit).unwrap();
    }
    assert!(writer.abandon().is_empty());

    let mut writer = SampleFormat::Ptb64.writer(Vec::new());
    writer.write_bytes(&[0xFF; 8]).unwrap();
    assert!(writer.abandon().is_empty());
}
