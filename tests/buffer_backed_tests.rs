//! Buffer-backed buffered stream and Buffer view tests

use emread_core::Buffer;
use emread_io::buffered::{self, BufferBackedStream, BufferedStream};

#[test]
fn test_hello_windows_and_drain() {
    let bs = buffered::from_buffer(Buffer::from("HELLO"));

    assert_eq!(bs.get_chunk(2, 10).unwrap().as_slice(), b"LLO");
    assert!(bs.get_chunk(10, 5).unwrap().is_empty());
    assert_eq!(bs.get_chunk(0, 5).unwrap().as_slice(), b"HELLO");

    assert_eq!(bs.read_chunk(1).unwrap().as_slice(), b"HELLO");
    assert!(bs.read_chunk(1).unwrap().is_empty());
    assert!(bs.get_chunk(0, 5).unwrap().is_empty());
}

#[test]
fn test_stream_and_release_are_noops() {
    let bs = BufferBackedStream::new(Buffer::from("0123456789"));
    bs.stream().unwrap();
    bs.release_chunk(8);
    // Nothing is freed early: released offsets stay readable.
    assert_eq!(bs.get_chunk(0, 3).unwrap().as_slice(), b"012");
    assert_eq!(bs.get_chunk(5, 5).unwrap().as_slice(), b"56789");
    assert_eq!(bs.get_chunk(10, 1).unwrap().len(), 0);
}

#[test]
fn test_windows_share_storage() {
    let data = Buffer::from(vec![7u8; 128]);
    let bs = BufferBackedStream::new(data.clone());
    let window = bs.get_chunk(32, 16).unwrap();
    assert_eq!(window.as_ptr(), data[32..].as_ptr());
}

#[test]
fn test_view_and_concat() {
    let buf = Buffer::from("abcdefgh");
    let left = buf.view(3, 0);
    let right = buf.view(2, 6);
    assert_eq!(left.as_slice(), b"abc");
    assert_eq!(right.as_slice(), b"gh");

    let joined = Buffer::concat(&[left.clone(), right]);
    assert_eq!(joined.as_slice(), b"abcgh");

    // A lone fragment is passed through without copying.
    let single = Buffer::concat(std::slice::from_ref(&left));
    assert_eq!(single.as_ptr(), left.as_ptr());
    assert!(Buffer::concat(&[]).is_empty());
}

#[test]
#[should_panic(expected = "out of bounds")]
fn test_view_past_end_panics() {
    let buf = Buffer::from("abc");
    let _ = buf.view(2, 2);
}

#[test]
fn test_take_leaves_empty() {
    let mut buf = Buffer::from(String::from("payload"));
    let taken = buf.take();
    assert_eq!(taken.as_slice(), b"payload");
    assert!(buf.is_empty());
}

#[test]
fn test_debug_is_truncated() {
    let buf = Buffer::from(vec![b'x'; 1000]);
    let dbg = format!("{:?}", buf);
    assert!(dbg.contains("len: 1000"));
    assert!(dbg.len() < 200);
}
