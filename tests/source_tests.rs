//! Source / ReadDirector tests

use std::io::Write;

use emread_core::Buffer;
use emread_io::buffered::{self, BufferedStream};
use emread_io::{FileSource, ReadDirector, Result, Source, TextSource};

#[derive(Default)]
struct Collect {
    got: Vec<Buffer>,
}

impl ReadDirector for Collect {
    fn read_buffer(&mut self, buffer: Buffer) -> Result<()> {
        self.got.push(buffer);
        Ok(())
    }
}

/// Wraps the input in a buffer-backed stream and reads its first line.
#[derive(Default)]
struct FirstLine {
    line: Option<String>,
}

impl ReadDirector for FirstLine {
    fn read_buffer(&mut self, buffer: Buffer) -> Result<()> {
        let bs = buffered::from_buffer(buffer);
        let head = bs.get_chunk(0, 64)?;
        let end = head.iter().position(|&b| b == b'\n').unwrap_or(head.len());
        self.line = Some(String::from_utf8_lossy(&head[..end]).into_owned());
        Ok(())
    }
}

#[test]
fn test_text_source() {
    let src = TextSource::new("a,b\n1,2\n");
    assert_eq!(src.name(), "<text>");
    assert!(!src.keep_reading());

    let mut director = Collect::default();
    src.read_with(&mut director).unwrap();
    assert_eq!(director.got.len(), 1);
    assert_eq!(director.got[0].as_slice(), b"a,b\n1,2\n");
}

#[test]
fn test_file_source_maps_contents() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"ts,uid\n2023-01-01,alice\n").unwrap();
    file.flush().unwrap();

    let src = FileSource::new(file.path());
    assert_eq!(src.name(), file.path().display().to_string());

    let mut director = FirstLine::default();
    src.read_with(&mut director).unwrap();
    assert_eq!(director.line.as_deref(), Some("ts,uid"));
}

#[test]
fn test_empty_file_gives_empty_buffer() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut director = Collect::default();
    FileSource::new(file.path()).read_with(&mut director).unwrap();
    assert!(director.got[0].is_empty());
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.csv");
    let mut director = Collect::default();
    let err = FileSource::new(&missing).read_with(&mut director).unwrap_err();
    assert!(err.to_string().contains("nope.csv"), "{}", err);
    assert!(director.got.is_empty());
}

#[test]
fn test_sources_as_trait_objects() {
    let sources: Vec<Box<dyn Source>> = vec![
        Box::new(TextSource::new("first")),
        Box::new(TextSource::new("second")),
    ];
    let mut director = Collect::default();
    for src in &sources {
        src.read_with(&mut director).unwrap();
        if !src.keep_reading() {
            break;
        }
    }
    assert_eq!(director.got.len(), 1);
}
