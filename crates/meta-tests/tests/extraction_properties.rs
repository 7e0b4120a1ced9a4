//! Extraction properties
//!
//! Frame header decoding, chunk reassembly, error kinds and the early-exit
//! rule, checked on generated streams.

use meta_tests::JpegBuilder;
use meta_tests::fixtures::{MAX_ICC_CHUNK, entropy_data, split_profile, synthetic_profile};
use meta_tests::readers::CountingReader;
use oxmeta_core::{
    Error, ExtractOptions, FrameKind, Metadata, extract_metadata, extract_metadata_with_options,
    load,
};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn baseline(builder: JpegBuilder) -> JpegBuilder {
    builder.frame(FrameKind::Baseline, 8, 640, 480)
}

#[test]
fn test_frame_header_reference_payload() {
    let jpeg = JpegBuilder::new()
        .segment(0xC0, &[0x08, 0x01, 0x2C, 0x01, 0x90])
        .finish();

    let md = extract_metadata(&jpeg[..]).unwrap();
    assert_eq!(md.bits_per_component, 8);
    assert_eq!(md.pixel_height, 300);
    assert_eq!(md.pixel_width, 400);
}

#[test]
fn test_full_frame_header_fields() {
    for kind in [FrameKind::Baseline, FrameKind::Progressive] {
        let jpeg = JpegBuilder::new()
            .jfif()
            .dqt()
            .frame(kind, 12, 65_535, 1)
            .scan(&[0x12, 0x34])
            .finish();

        let md = extract_metadata(&jpeg[..]).unwrap();
        assert_eq!(
            md,
            Metadata {
                bits_per_component: 12,
                pixel_width: 65_535,
                pixel_height: 1,
                profile_data: None,
            },
            "{:?}",
            kind
        );
    }
}

#[test]
fn test_no_profile_is_success() {
    let jpeg = baseline(JpegBuilder::new().jfif()).scan(&[0]).finish();
    let md = extract_metadata(&jpeg[..]).unwrap();
    assert!(!md.has_profile());
}

#[test]
fn test_single_chunk_profile_is_exact() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for _ in 0..32 {
        let len = rng.gen_range(0..4096);
        let profile = synthetic_profile(rng.r#gen(), len);
        let jpeg = baseline(JpegBuilder::new().jfif().icc_chunk(1, 1, &profile)).finish();

        let md = extract_metadata(&jpeg[..]).unwrap();
        assert_eq!(md.profile_data.as_deref(), Some(&profile[..]));
    }
}

#[test]
fn test_chunks_in_any_order() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    for round in 0..64 {
        let count = rng.gen_range(1..=12usize);
        let profile = synthetic_profile(round, rng.gen_range(count..count * 700));
        let mut parts: Vec<(u8, Vec<u8>)> = split_profile(&profile, count)
            .into_iter()
            .enumerate()
            .map(|(i, p)| (i as u8 + 1, p))
            .collect();
        parts.shuffle(&mut rng);

        let builder = parts.iter().fold(JpegBuilder::new(), |b, (index, part)| {
            b.icc_chunk(*index, count as u8, part)
        });
        let jpeg = baseline(builder).finish();

        let md = extract_metadata(&jpeg[..]).unwrap();
        assert_eq!(md.profile_data, Some(profile), "round {}", round);
    }
}

#[test]
fn test_max_chunk_count() {
    let profile = synthetic_profile(3, 255 * 3);
    let jpeg = baseline(JpegBuilder::new().icc_profile(&profile, 255)).finish();
    let md = extract_metadata(&jpeg[..]).unwrap();
    assert_eq!(md.profile_data, Some(profile));
}

#[test]
fn test_max_size_chunks() {
    let profile = synthetic_profile(4, MAX_ICC_CHUNK * 3);
    let jpeg = baseline(JpegBuilder::new().icc_profile(&profile, 3)).finish();
    let md = extract_metadata(&jpeg[..]).unwrap();
    assert_eq!(md.profile_data.map(|p| p.len()), Some(MAX_ICC_CHUNK * 3));
}

#[test]
fn test_chunks_interleaved_with_other_segments() {
    let profile = synthetic_profile(5, 900);
    let parts = split_profile(&profile, 3);
    let jpeg = JpegBuilder::new()
        .jfif()
        .icc_chunk(3, 3, &parts[2])
        .exif(b"MM\0\x2a\0\0\0\x08")
        .icc_chunk(1, 3, &parts[0])
        .dqt()
        .segment(0xFE, b"comment")
        .icc_chunk(2, 3, &parts[1]);
    let jpeg = baseline(jpeg).finish();

    let md = extract_metadata(&jpeg[..]).unwrap();
    assert_eq!(md.profile_data, Some(profile));
}

#[test]
fn test_inconsistent_chunk_counts() {
    let jpeg = baseline(
        JpegBuilder::new()
            .icc_chunk(1, 2, b"first")
            .icc_chunk(2, 4, b"second"),
    )
    .finish();

    let (result, _) = load(&jpeg[..]);
    assert!(matches!(
        result,
        Err(Error::InconsistentProfileChunks {
            expected: 2,
            actual: 4
        })
    ));
}

#[test]
fn test_inconsistent_count_after_frame() {
    // Table still incomplete after the frame header, so scanning continues
    let jpeg = JpegBuilder::new()
        .icc_chunk(1, 2, b"a")
        .frame(FrameKind::Baseline, 8, 1, 1)
        .icc_chunk(2, 3, b"b")
        .finish();
    assert!(matches!(
        extract_metadata(&jpeg[..]),
        Err(Error::InconsistentProfileChunks { .. })
    ));
}

#[test]
fn test_duplicate_chunk_index() {
    let jpeg = baseline(
        JpegBuilder::new()
            .icc_chunk(2, 3, b"one")
            .icc_chunk(2, 3, b"two"),
    )
    .finish();
    assert!(matches!(extract_metadata(&jpeg[..]), Err(Error::DuplicateChunk(2))));
}

#[test]
fn test_chunk_index_out_of_range() {
    for (index, count) in [(0u8, 3u8), (4, 3), (1, 0), (255, 254)] {
        let jpeg = baseline(JpegBuilder::new().icc_chunk(index, count, b"x")).finish();
        match extract_metadata(&jpeg[..]) {
            Err(Error::InvalidChunkIndex { index: i, count: c }) => {
                assert_eq!((i, c), (index, count as usize));
            }
            other => panic!("index {} count {}: {:?}", index, count, other),
        }
    }
}

#[test]
fn test_no_frame_before_end_of_image() {
    let jpeg = JpegBuilder::new()
        .jfif()
        .icc_chunk(1, 1, b"profile")
        .finish();
    let (result, _) = load(&jpeg[..]);
    assert!(matches!(result, Err(Error::IncompleteMetadata)));
}

#[test]
fn test_frame_after_start_of_scan_is_ignored() {
    let jpeg = JpegBuilder::new()
        .scan(&[1, 2, 3])
        .frame(FrameKind::Baseline, 8, 1, 1)
        .finish();
    assert!(matches!(extract_metadata(&jpeg[..]), Err(Error::IncompleteMetadata)));
}

#[test]
fn test_stream_ending_after_frame_with_partial_profile() {
    let jpeg = JpegBuilder::new()
        .icc_chunk(1, 2, b"half")
        .frame(FrameKind::Progressive, 8, 10, 20)
        .build();
    let md = extract_metadata(&jpeg[..]).unwrap();
    assert_eq!((md.pixel_width, md.pixel_height), (10, 20));
    assert_eq!(md.profile_data, None);
}

#[test]
fn test_start_of_scan_before_last_chunk() {
    let jpeg = baseline(JpegBuilder::new().icc_chunk(1, 2, b"a"))
        .scan(&[0])
        .icc_chunk(2, 2, b"b")
        .finish();
    let md = extract_metadata(&jpeg[..]).unwrap();
    assert_eq!(md.profile_data, None);
}

#[test]
fn test_identifier_must_match_fully() {
    let mut almost = b"ICC_PROFILE\x01".to_vec();
    almost.extend_from_slice(&[1, 1, 0xAA, 0xBB]);
    let mut lower = b"icc_profile\0".to_vec();
    lower.extend_from_slice(&[1, 1, 0xAA]);

    let jpeg = baseline(
        JpegBuilder::new()
            .segment(0xE2, &almost)
            .segment(0xE2, &lower)
            .segment(0xE2, b"ICC"),
    )
    .finish();

    let md = extract_metadata(&jpeg[..]).unwrap();
    assert_eq!(md.profile_data, None);
}

#[test]
fn test_non_profile_app2_does_not_disturb_profile() {
    let jpeg = baseline(
        JpegBuilder::new()
            .icc_chunk(1, 2, b"ab")
            .segment(0xE2, b"FPXR\0\x01\x02\x03\x04\x05\x06\x07\x08\x09")
            .icc_chunk(2, 2, b"cd"),
    )
    .finish();
    let md = extract_metadata(&jpeg[..]).unwrap();
    assert_eq!(md.profile_data.as_deref(), Some(&b"abcd"[..]));
}

#[test]
fn test_short_frame_header_is_internal_fault() {
    let jpeg = JpegBuilder::new().segment(0xC2, &[8, 0, 1, 0]).finish();
    assert!(matches!(extract_metadata(&jpeg[..]), Err(Error::InternalFault(_))));
}

#[test]
fn test_internal_fault_discards_found_metadata() {
    let jpeg = JpegBuilder::new()
        .icc_chunk(1, 2, b"a")
        .frame(FrameKind::Baseline, 8, 2, 2)
        .segment(0xC0, &[8])
        .finish();
    assert!(matches!(extract_metadata(&jpeg[..]), Err(Error::InternalFault(_))));
}

#[test]
fn test_early_exit_reads_only_header() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let profile = synthetic_profile(6, 2000);
    let header = baseline(JpegBuilder::new().jfif().icc_profile(&profile, 2)).build();
    let jpeg = JpegBuilder::empty()
        .raw(&header)
        .scan(&entropy_data(&mut rng, 1 << 16))
        .finish();

    let mut source = CountingReader::new(&jpeg[..]);
    let md = extract_metadata(&mut source).unwrap();
    assert_eq!(md.profile_data, Some(profile));
    assert_eq!(source.count(), header.len());
}

#[test]
fn test_scan_continues_without_early_exit() {
    let profile = synthetic_profile(7, 64);
    let jpeg = baseline(JpegBuilder::new())
        .icc_chunk(1, 1, &profile)
        .scan(&[0])
        .finish();

    let md = extract_metadata(&jpeg[..]).unwrap();
    assert_eq!(md.profile_data, None);

    let options = ExtractOptions {
        early_exit: false,
        ..Default::default()
    };
    let md = extract_metadata_with_options(&jpeg[..], options).unwrap();
    assert_eq!(md.profile_data, Some(profile));
}

#[test]
fn test_malformed_framing() {
    let cases: Vec<Vec<u8>> = vec![
        vec![0xD8, 0xFF],
        vec![0xFF, 0xD8, 0xFF],
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00],
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x00],
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46],
        vec![0xFF, 0xD8, 0x00],
    ];
    for case in cases {
        let (result, _) = load(&case[..]);
        assert!(
            matches!(result, Err(Error::MalformedSegment(_))),
            "{:02X?} gave {:?}",
            case,
            result
        );
    }
}

#[test]
fn test_metadata_serializes() -> anyhow::Result<()> {
    let jpeg = baseline(JpegBuilder::new().icc_chunk(1, 1, &[1, 2, 3])).finish();
    let md = extract_metadata(&jpeg[..])?;

    let json = serde_json::to_value(&md)?;
    assert_eq!(json["pixel_width"], 640);
    assert_eq!(json["pixel_height"], 480);
    assert_eq!(json["bits_per_component"], 8);
    assert_eq!(json["profile_data"], serde_json::json!([1, 2, 3]));

    let back: Metadata = serde_json::from_value(json)?;
    assert_eq!(back, md);
    Ok(())
}
