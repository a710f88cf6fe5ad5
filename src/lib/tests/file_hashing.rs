use csutils::*;

use std::fs::File;
use std::io::{Seek, SeekFrom, Write};

fn temp_file(len: usize) -> (tempfile::TempDir, std::path::PathBuf, Vec<u8>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    let content: Vec<u8> = (0..len).map(|i| (i * 7 % 256) as u8).collect();
    File::create(&path).unwrap().write_all(&content).unwrap();
    (dir, path, content)
}

#[test]
fn whole_file_byte_count() {
    let (_dir, path, _) = temp_file(10000);
    assert_eq!(hash_file_data(&path).unwrap(), 10000);
}

#[test]
fn empty_file() {
    let (_dir, path, _) = temp_file(0);
    let mut hasher = Sha1::new();
    assert_eq!(hash_file_data_with(&path, &mut hasher).unwrap(), 0);
    assert_eq!(hasher.finalize(), Sha1::new().finalize());
}

#[test]
fn caller_accumulator_misses_the_final_chunk() {
    let (_dir, path, content) = temp_file(10000);
    let mut hasher = Sha256::new();
    assert_eq!(hash_file_data_with(&path, &mut hasher).unwrap(), 10000);

    let mut expected = Sha256::new();
    expected.update(&content[..8192]);
    assert_eq!(hasher.finalize(), expected.finalize());
}

#[test]
fn bounded_section_from_an_offset() {
    let (_dir, path, content) = temp_file(20000);
    let mut file = File::open(&path).unwrap();
    file.seek(SeekFrom::Start(3000)).unwrap();
    let mut file = FileDesc::new(file);
    let mut hasher = Sha1::new();
    assert_eq!(hash_file_desc(&mut file, &mut hasher, 6000).unwrap(), 6000);

    let mut expected = Sha1::new();
    expected.update(&content[3000..9000]);
    assert_eq!(hasher.finalize(), expected.finalize());
}

#[test]
fn page_by_page_from_a_shared_file() {
    let (_dir, path, content) = temp_file(20000);
    let mut file = File::open(&path).unwrap();
    for page in 0..4 {
        let mut hasher = Sha1::new();
        let total = hash_file_desc(&mut FileDesc::new(&mut file), &mut hasher, 4096).unwrap();
        assert_eq!(total, 4096, "page {page}");

        let mut expected = Sha1::new();
        expected.update(&content[page * 4096..(page + 1) * 4096]);
        assert_eq!(hasher.finalize(), expected.finalize(), "page {page}");
    }
    assert_eq!(file.stream_position().unwrap(), 16384);

    let mut hasher = Sha1::new();
    assert_eq!(hash_file_desc(&mut FileDesc::new(&mut file), &mut hasher, 4096).unwrap(), 20000 - 16384);
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing");
    match hash_file_data(&path) {
        Err(CSError::FileOpen { path: p, source }) => {
            assert_eq!(p, path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
