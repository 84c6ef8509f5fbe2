//! End-to-end construction/extraction tests over real files

use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};

use ard_storage::{
    ArhIndex, BuildOptions, ContentKind, ExtractOptions, InputFile, StoredFormat, build_archive,
    extract_archive,
};
use xbc1::CompressionKind;

struct Fixture {
    _dir: tempfile::TempDir,
    root: PathBuf,
    inputs: Vec<InputFile>,
}

impl Fixture {
    fn new(files: &[(&str, u64, Vec<u8>)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let input_dir = root.join("input");
        fs::create_dir_all(&input_dir).unwrap();

        let mut inputs = Vec::new();
        for (name, cache_id, content) in files {
            let path = input_dir.join(name);
            fs::write(&path, content).unwrap();
            inputs.push(InputFile {
                path,
                cache_id: *cache_id,
                name: (*name).to_string(),
            });
        }

        Self {
            _dir: dir,
            root,
            inputs,
        }
    }

    fn ard(&self) -> PathBuf {
        self.root.join("data.ard")
    }

    fn arh(&self) -> PathBuf {
        self.root.join("data.arh")
    }

    fn out(&self) -> PathBuf {
        self.root.join("extracted")
    }
}

fn classify(data: &[u8]) -> ContentKind {
    if data.starts_with(b"BDAT") {
        ContentKind::Bdat
    } else {
        ContentKind::Unknown
    }
}

fn read_extracted(dir: &Path, cache_id: u64, kind: ContentKind) -> Vec<u8> {
    let extension = match kind {
        ContentKind::Bdat => ".bdat",
        ContentKind::Unknown => ".dec",
    };
    fs::read(dir.join(format!("{cache_id:016x}{extension}"))).unwrap()
}

fn large_payload() -> Vec<u8> {
    (0..1_000_000u32).map(|v| (v % 251) as u8).collect()
}

#[test]
fn test_roundtrip_raw_entries() {
    let fixture = Fixture::new(&[
        ("alpha.bin", 1, b"first entry".to_vec()),
        ("beta.bin", 2, b"second entry, somewhat longer".to_vec()),
        ("gamma.bin", 3, vec![0x55; 3000]),
    ]);

    let summary = build_archive(
        fixture.inputs.clone(),
        &fixture.ard(),
        &fixture.arh(),
        None,
        &BuildOptions::default(),
    )
    .unwrap();
    assert_eq!(summary.entries, 3);

    let extracted = extract_archive(
        &fixture.ard(),
        &fixture.arh(),
        &fixture.out(),
        None,
        &ExtractOptions::default(),
    )
    .unwrap();
    assert!(extracted.is_complete());
    assert_eq!(extracted.written, 3);

    let out = fixture.out();
    assert_eq!(read_extracted(&out, 1, ContentKind::Unknown), b"first entry");
    assert_eq!(
        read_extracted(&out, 2, ContentKind::Unknown),
        b"second entry, somewhat longer"
    );
    assert_eq!(read_extracted(&out, 3, ContentKind::Unknown), vec![0x55; 3000]);
}

#[test]
fn test_roundtrip_compressed_entries() {
    let fixture = Fixture::new(&[
        ("a.bin", 10, vec![0xAB; 50_000]),
        ("b.bin", 11, b"tiny".to_vec()),
    ]);

    let options = BuildOptions {
        compression: Some(CompressionKind::Zstd),
        ..BuildOptions::default()
    };
    build_archive(
        fixture.inputs.clone(),
        &fixture.ard(),
        &fixture.arh(),
        None,
        &options,
    )
    .unwrap();

    // Repetitive data compresses; the data plane holds containers
    let index = ArhIndex::parse_file(&fixture.arh()).unwrap();
    assert_eq!(index.len(), 2);
    assert!(index.entries().iter().all(|e| e.format == StoredFormat::Xbc1));
    assert!(index.entries()[0].stored_size < index.entries()[0].decompressed_size);

    let extracted = extract_archive(
        &fixture.ard(),
        &fixture.arh(),
        &fixture.out(),
        None,
        &ExtractOptions::default(),
    )
    .unwrap();
    assert!(extracted.is_complete());

    let out = fixture.out();
    assert_eq!(read_extracted(&out, 10, ContentKind::Unknown), vec![0xAB; 50_000]);
    assert_eq!(read_extracted(&out, 11, ContentKind::Unknown), b"tiny");
}

#[test]
fn test_roundtrip_zero_one_and_million_byte_files() {
    for compression in [None, Some(CompressionKind::Zstd)] {
        let fixture = Fixture::new(&[
            ("empty.bin", 100, Vec::new()),
            ("one.bin", 101, vec![0x42]),
            ("million.bin", 102, large_payload()),
        ]);

        let options = BuildOptions {
            compression,
            ..BuildOptions::default()
        };
        build_archive(
            fixture.inputs.clone(),
            &fixture.ard(),
            &fixture.arh(),
            None,
            &options,
        )
        .unwrap();

        let index = ArhIndex::parse_file(&fixture.arh()).unwrap();
        assert_eq!(index.len(), 3);

        let extracted = extract_archive(
            &fixture.ard(),
            &fixture.arh(),
            &fixture.out(),
            None,
            &ExtractOptions::default(),
        )
        .unwrap();
        assert!(extracted.is_complete(), "compression {compression:?}");

        let out = fixture.out();
        assert_eq!(read_extracted(&out, 100, ContentKind::Unknown), Vec::<u8>::new());
        assert_eq!(read_extracted(&out, 101, ContentKind::Unknown), vec![0x42]);
        assert_eq!(read_extracted(&out, 102, ContentKind::Unknown), large_payload());

        fs::remove_dir_all(fixture.out()).unwrap();
    }
}

#[test]
fn test_every_offset_is_aligned() {
    let fixture = Fixture::new(&[
        ("a", 1, vec![1; 1]),
        ("b", 2, vec![2; 15]),
        ("c", 3, vec![3; 16]),
        ("d", 4, vec![4; 17]),
        ("e", 5, vec![5; 4097]),
    ]);

    build_archive(
        fixture.inputs.clone(),
        &fixture.ard(),
        &fixture.arh(),
        None,
        &BuildOptions::default(),
    )
    .unwrap();

    let index = ArhIndex::parse_file(&fixture.arh()).unwrap();
    for entry in index.entries() {
        assert_eq!(entry.offset % 16, 0, "entry {:016x}", entry.cache_id);
    }
}

#[test]
fn test_entry_order_is_reproducible() {
    let files: [(&str, u64, Vec<u8>); 3] = [
        ("zeta", 1, b"z".to_vec()),
        ("alpha", 2, b"a".to_vec()),
        ("mid", 3, b"m".to_vec()),
    ];

    let fixture = Fixture::new(&files);
    let mut shuffled = fixture.inputs.clone();
    shuffled.reverse();

    build_archive(
        shuffled,
        &fixture.ard(),
        &fixture.arh(),
        None,
        &BuildOptions::default(),
    )
    .unwrap();

    // Entries land in name order no matter how the caller enumerated them
    let index = ArhIndex::parse_file(&fixture.arh()).unwrap();
    let ids: Vec<u64> = index.entries().iter().map(|e| e.cache_id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
}

#[test]
fn test_filtered_extraction() {
    let fixture = Fixture::new(&[
        ("table1", 1, b"BDAT table one".to_vec()),
        ("blob", 2, b"something else".to_vec()),
        ("table2", 3, b"BDAT table two".to_vec()),
    ]);

    build_archive(
        fixture.inputs.clone(),
        &fixture.ard(),
        &fixture.arh(),
        Some(&classify),
        &BuildOptions::default(),
    )
    .unwrap();

    let extracted = extract_archive(
        &fixture.ard(),
        &fixture.arh(),
        &fixture.out(),
        Some(&|entry: &ard_storage::EntryRecord| entry.content == ContentKind::Bdat),
        &ExtractOptions::default(),
    )
    .unwrap();
    assert!(extracted.is_complete());
    assert_eq!(extracted.selected, 2);
    assert_eq!(extracted.written, 2);

    let out = fixture.out();
    assert_eq!(read_extracted(&out, 1, ContentKind::Bdat), b"BDAT table one");
    assert_eq!(read_extracted(&out, 3, ContentKind::Bdat), b"BDAT table two");
    assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
}

#[test]
fn test_partial_failure_reports_one_entry_and_extracts_the_rest() {
    let fixture = Fixture::new(&[
        ("a", 1, vec![1; 64]),
        ("b", 2, vec![2; 64]),
        ("c", 3, vec![3; 64]),
    ]);

    build_archive(
        fixture.inputs.clone(),
        &fixture.ard(),
        &fixture.arh(),
        None,
        &BuildOptions::default(),
    )
    .unwrap();

    // Cut the last entry's range short to simulate corruption
    let ard_bytes = fs::read(fixture.ard()).unwrap();
    fs::write(fixture.ard(), &ard_bytes[..ard_bytes.len() - 32]).unwrap();

    let extracted = extract_archive(
        &fixture.ard(),
        &fixture.arh(),
        &fixture.out(),
        None,
        &ExtractOptions::default(),
    )
    .unwrap();

    assert_eq!(extracted.written, 2);
    assert_eq!(extracted.failures.len(), 1);
    assert_eq!(extracted.failures[0].index, 2);
    assert_eq!(extracted.failures[0].cache_id, 3);

    let out = fixture.out();
    assert_eq!(read_extracted(&out, 1, ContentKind::Unknown), vec![1; 64]);
    assert_eq!(read_extracted(&out, 2, ContentKind::Unknown), vec![2; 64]);
}

#[test]
fn test_filter_skips_corrupt_excluded_ranges() {
    let fixture = Fixture::new(&[
        ("table", 1, b"BDAT table".to_vec()),
        ("zz-blob", 2, vec![9; 64]),
    ]);

    build_archive(
        fixture.inputs.clone(),
        &fixture.ard(),
        &fixture.arh(),
        Some(&classify),
        &BuildOptions::default(),
    )
    .unwrap();

    // Corrupt the non-BDAT entry's range (last in name order); a filtered
    // extraction never reads it and still succeeds completely
    let ard_bytes = fs::read(fixture.ard()).unwrap();
    fs::write(fixture.ard(), &ard_bytes[..ard_bytes.len() - 32]).unwrap();

    let extracted = extract_archive(
        &fixture.ard(),
        &fixture.arh(),
        &fixture.out(),
        Some(&|entry: &ard_storage::EntryRecord| entry.content == ContentKind::Bdat),
        &ExtractOptions::default(),
    )
    .unwrap();

    assert!(extracted.is_complete());
    assert_eq!(extracted.written, 1);
}

#[test]
fn test_store_raw_when_larger() {
    // Incompressible noise: the container (header + payload) can only expand
    let mut state = 0x9E37_79B9u32;
    let noise: Vec<u8> = (0..1024)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect();

    let fixture = Fixture::new(&[("noise.bin", 1, noise.clone())]);

    let options = BuildOptions {
        compression: Some(CompressionKind::Zstd),
        store_raw_when_larger: true,
        ..BuildOptions::default()
    };
    build_archive(
        fixture.inputs.clone(),
        &fixture.ard(),
        &fixture.arh(),
        None,
        &options,
    )
    .unwrap();

    let index = ArhIndex::parse_file(&fixture.arh()).unwrap();
    assert_eq!(index.entries()[0].format, StoredFormat::Raw);
    assert_eq!(index.entries()[0].stored_size as usize, noise.len());

    let extracted = extract_archive(
        &fixture.ard(),
        &fixture.arh(),
        &fixture.out(),
        None,
        &ExtractOptions::default(),
    )
    .unwrap();
    assert!(extracted.is_complete());
    assert_eq!(read_extracted(&fixture.out(), 1, ContentKind::Unknown), noise);
}

#[test]
fn test_existing_container_passes_through() {
    let payload = b"inner payload for passthrough".to_vec();
    let container = xbc1::compress(&payload, CompressionKind::Zlib, None, "inner").unwrap();

    let fixture = Fixture::new(&[("wrapped.xbc1", 7, container)]);

    // Compression requested, but the input is already a container
    let options = BuildOptions {
        compression: Some(CompressionKind::Zstd),
        ..BuildOptions::default()
    };
    build_archive(
        fixture.inputs.clone(),
        &fixture.ard(),
        &fixture.arh(),
        None,
        &options,
    )
    .unwrap();

    let index = ArhIndex::parse_file(&fixture.arh()).unwrap();
    assert_eq!(index.entries()[0].format, StoredFormat::Xbc1);
    assert_eq!(index.entries()[0].decompressed_size as usize, payload.len());

    let extracted = extract_archive(
        &fixture.ard(),
        &fixture.arh(),
        &fixture.out(),
        None,
        &ExtractOptions::default(),
    )
    .unwrap();
    assert!(extracted.is_complete());
    assert_eq!(read_extracted(&fixture.out(), 7, ContentKind::Unknown), payload);
}

#[test]
fn test_construction_aborts_on_unreadable_input() {
    let fixture = Fixture::new(&[("ok.bin", 1, b"fine".to_vec())]);

    let mut inputs = fixture.inputs.clone();
    inputs.push(InputFile {
        path: fixture.root.join("input/missing.bin"),
        cache_id: 2,
        name: "missing.bin".to_string(),
    });

    let err = build_archive(
        inputs,
        &fixture.ard(),
        &fixture.arh(),
        None,
        &BuildOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ard_storage::ArdError::EntryFailed { cache_id: 2, .. }
    ));
    // A broken archive is never published
    assert!(!fixture.arh().exists());
}
