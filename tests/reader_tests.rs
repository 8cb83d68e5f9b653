//! Sequential BufferedReader tests

mod test_streams;

use std::io::{BufRead, Read};
use std::sync::Arc;

use emread_core::{Buffer, ReadConfig};
use emread_io::buffered::{self, BufferedStream, StreamBackedStream};
use emread_io::stream::MemoryStream;
use emread_io::BufferedReader;
use test_streams::generate_bytes;

#[test]
fn test_reader_drains_with_small_memory_limit() {
    let data = generate_bytes(50_000, 5);
    let cfg = ReadConfig::new(512).with_chunk_size(128);
    let bs = Arc::new(
        StreamBackedStream::with_config(Box::new(MemoryStream::new(data.clone())), &cfg).unwrap(),
    );
    let producer = buffered::spawn_producer(bs.clone() as Arc<dyn BufferedStream>).unwrap();

    // Without the reader releasing as it goes the producer would stall at 512 bytes.
    let mut reader = BufferedReader::new(bs.clone(), 200);
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    producer.join().unwrap().unwrap();

    assert_eq!(out, data);
    assert_eq!(reader.position(), data.len());
    assert!(bs.stats().exhausted);
}

#[test]
fn test_reader_lines_over_buffer() {
    let bs: Arc<dyn BufferedStream> =
        Arc::from(buffered::from_buffer(Buffer::from("id,name\n1,alice\n2,bob\n")));
    let reader = BufferedReader::new(bs, 5);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    assert_eq!(lines, vec!["id,name", "1,alice", "2,bob"]);
}

#[test]
fn test_peek_does_not_consume() {
    let bs: Arc<dyn BufferedStream> = Arc::from(buffered::from_buffer(Buffer::from("MAGIC-body")));
    let mut reader = BufferedReader::new(bs, 4);

    assert_eq!(reader.peek(5).unwrap().as_slice(), b"MAGIC");
    let mut head = [0u8; 6];
    reader.read_exact(&mut head).unwrap();
    assert_eq!(&head, b"MAGIC-");
    assert_eq!(reader.position(), 6);
    assert_eq!(reader.peek(10).unwrap().as_slice(), b"body");
}

#[test]
fn test_fill_buf_and_consume() {
    let bs: Arc<dyn BufferedStream> = Arc::from(buffered::from_buffer(Buffer::from("abcdefgh")));
    let mut reader = BufferedReader::new(bs, 3);

    assert_eq!(reader.fill_buf().unwrap(), b"abc");
    reader.consume(2);
    assert_eq!(reader.buffered(), b"c");
    reader.consume(10);
    assert_eq!(reader.fill_buf().unwrap(), b"def");
    assert_eq!(reader.position(), 3);
}
