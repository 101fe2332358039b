#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for resource archives and the folder helpers

use across_crypto::{RESOURCE_TABLE, XorStreamCipher};
use across_formats::batch::{pack_archive, unpack_archive, verify_folder};
use across_formats::resource::{DATA_OFFSET, MAX_FILES, ResourceArchive, ResourceArchiveBuilder};
use across_formats::{AcrossFormat, FormatError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const TABLE_MARKER: u32 = 0x1490ff;

/// Archive with `(name, stored offset, data)` entries; the data blobs are
/// appended in the order given
fn archive_file(entries: &[(&str, u32, &[u8])]) -> Vec<u8> {
    let mut table = Vec::with_capacity(MAX_FILES * 24);
    for (name, offset, data) in entries {
        let mut field = name.as_bytes().to_vec();
        field.resize(16, 0);
        table.extend(field);
        table.extend_from_slice(&offset.to_le_bytes());
        table.extend_from_slice(&(data.len() as u32).to_le_bytes());
    }
    table.resize(MAX_FILES * 24, 0);

    let mut out = (entries.len() as u32).to_le_bytes().to_vec();
    out.extend(XorStreamCipher::new(RESOURCE_TABLE).encrypt(&table));
    out.extend_from_slice(&TABLE_MARKER.to_le_bytes());
    for (_, _, data) in entries {
        out.extend_from_slice(data);
    }
    out
}

fn contiguous<'a>(files: &[(&'a str, &'a [u8])]) -> Vec<(&'a str, u32, &'a [u8])> {
    let mut offset = DATA_OFFSET;
    files
        .iter()
        .map(|(name, data)| {
            let entry = (*name, offset, *data);
            offset += data.len() as u32;
            entry
        })
        .collect()
}

#[test]
fn archive_parses_and_round_trips() {
    let files: [(&str, &[u8]); 3] = [
        ("intro.pcx", b"\x0a\x05\x01\x08pcx"),
        ("q1bike.pcx", &[0x55; 300]),
        ("empty.txt", b""),
    ];
    let raw = archive_file(&contiguous(&files));
    let archive = ResourceArchive::parse(&raw).expect("archive should parse");

    assert_eq!(archive.files.len(), 3);
    for (file, (name, data)) in archive.files.iter().zip(files) {
        assert_eq!(file.name.to_string(), name);
        assert_eq!(file.data, data);
    }
    assert_eq!(archive.get("q1bike.pcx").map(|f| f.data.len()), Some(300));
    assert_eq!(archive.data_size(), 7 + 300);

    let table = archive.table().unwrap();
    assert_eq!(table[1].offset, 7);
    assert_eq!(table[2].offset, 307);

    assert_eq!(archive.build().unwrap(), raw);
    ResourceArchive::verify_round_trip(&raw).unwrap();
}

#[test]
fn empty_archive_is_header_only() {
    let raw = archive_file(&[]);
    assert_eq!(raw.len(), DATA_OFFSET as usize);
    let archive = ResourceArchive::parse(&raw).unwrap();
    assert!(archive.files.is_empty());
    assert_eq!(archive.build().unwrap(), raw);
}

#[test]
fn out_of_order_entries_parse_but_do_not_round_trip() {
    let raw = archive_file(&[
        ("b.txt", DATA_OFFSET + 2, b"bb"),
        ("a.txt", DATA_OFFSET, b"aa"),
    ]);
    let archive = ResourceArchive::parse(&raw).unwrap();
    assert_eq!(archive.get("b.txt").unwrap().data, b"aa");
    assert_eq!(archive.get("a.txt").unwrap().data, b"bb");

    let err = ResourceArchive::verify_round_trip(&raw).unwrap_err();
    assert!(matches!(err, FormatError::RoundTripMismatch { .. }));
}

#[test]
fn entry_past_end_of_data_is_rejected() {
    let files: [(&str, &[u8]); 1] = [("a.txt", b"abcdef")];
    let mut raw = archive_file(&contiguous(&files));
    raw.truncate(raw.len() - 1);
    let err = ResourceArchive::parse(&raw).unwrap_err();
    assert!(matches!(err, FormatError::LengthMismatch { field: "resource data", .. }));
}

#[test]
fn offset_inside_header_is_rejected() {
    let raw = archive_file(&[("a.txt", 12, b"abc")]);
    let err = ResourceArchive::parse(&raw).unwrap_err();
    assert!(matches!(err, FormatError::ValueOutOfRange { field: "resource offset", .. }));
}

#[test]
fn oversized_count_is_rejected() {
    let mut raw = archive_file(&[]);
    raw[..4].copy_from_slice(&151u32.to_le_bytes());
    let err = ResourceArchive::parse(&raw).unwrap_err();
    assert!(matches!(
        err,
        FormatError::LengthMismatch {
            field: "resource table",
            expected: 150,
            actual: 151
        }
    ));
}

#[test]
fn wrong_table_marker_is_rejected() {
    let mut raw = archive_file(&[]);
    raw[DATA_OFFSET as usize - 4] ^= 0x01;
    let err = ResourceArchive::parse(&raw).unwrap_err();
    assert!(matches!(err, FormatError::ConstMismatch { .. }));
}

#[test]
fn builder_output_matches_hand_assembled_archive() {
    let archive = ResourceArchiveBuilder::new()
        .add_file("one.bin", vec![1, 2, 3])
        .unwrap()
        .add_file("two.bin", vec![4, 5])
        .unwrap()
        .build()
        .unwrap();
    let files: [(&str, &[u8]); 2] = [("one.bin", &[1, 2, 3]), ("two.bin", &[4, 5])];
    let expected = archive_file(&contiguous(&files));
    assert_eq!(AcrossFormat::build(&archive).unwrap(), expected);
}

#[test]
fn folder_pack_and_unpack() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let source = tempfile::tempdir().unwrap();
    std::fs::write(source.path().join("b.pcx"), b"second").unwrap();
    std::fs::write(source.path().join("a.pcx"), b"first").unwrap();

    let archive_path = source.path().join("out.res");
    let packed = pack_archive(source.path(), &archive_path).expect("pack should succeed");
    assert_eq!(packed, 2);

    let archive = ResourceArchive::parse(&std::fs::read(&archive_path).unwrap()).unwrap();
    let names: Vec<String> = archive.files.iter().map(|f| f.name.to_string()).collect();
    assert_eq!(names, ["a.pcx", "b.pcx"]);

    let target = tempfile::tempdir().unwrap();
    let unpacked = unpack_archive(&archive_path, target.path().join("nested")).unwrap();
    assert_eq!(unpacked, 2);
    let unpacked_file = std::fs::read(target.path().join("nested/b.pcx")).unwrap();
    assert_eq!(unpacked_file, b"second");

    let reports = verify_folder::<ResourceArchive>(source.path(), "res");
    assert_eq!(reports.len(), 1);
    assert!(reports[0].is_ok());
}

proptest! {
    #[test]
    fn built_archives_keep_content_and_order(
        contents in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..12)
    ) {
        let mut builder = ResourceArchiveBuilder::new();
        for (i, data) in contents.iter().enumerate() {
            builder = builder.add_file(&format!("file{i:02}.dat"), data.clone()).unwrap();
        }
        let bytes = builder.build().unwrap().build().unwrap();
        let data_len: usize = contents.iter().map(Vec::len).sum();
        prop_assert_eq!(bytes.len(), DATA_OFFSET as usize + data_len);

        let parsed = ResourceArchive::parse(&bytes).unwrap();
        prop_assert_eq!(parsed.files.len(), contents.len());
        for (i, (file, data)) in parsed.files.iter().zip(&contents).enumerate() {
            prop_assert_eq!(file.name.to_string(), format!("file{i:02}.dat"));
            prop_assert_eq!(&file.data, data);
        }
    }
}
