use bytes::BytesMut;
use criterion::{Criterion, criterion_group, criterion_main};
use futures::StreamExt;
use futures::executor::block_on;
use micro_http_decoder::codec::{ChunkedDecoder, RequestDecoder, ResponseDecoder};
use std::{
    hint::black_box,
    io,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::io::{AsyncRead, ReadBuf};
use tokio_util::codec::{Decoder, FramedRead};

const SIMPLE_REQUEST: &[u8] = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";

const BROWSER_REQUEST: &[u8] = b"GET /index.html?page=1 HTTP/1.1\r\n\
Host: localhost:8080\r\n\
User-Agent: Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0\r\n\
Accept: text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8\r\n\
Accept-Language: en-US,en;q=0.5\r\n\
Accept-Encoding: gzip, deflate, br\r\n\
Connection: keep-alive\r\n\
Cookie: session=0123456789abcdef; theme=dark\r\n\
Upgrade-Insecure-Requests: 1\r\n\
\r\n";

// Mock IO handing out at most `fragment` bytes per read
struct MockIO {
    read_data: Vec<u8>,
    read_pos: usize,
    fragment: usize,
}

impl MockIO {
    fn new(read_data: Vec<u8>, fragment: usize) -> Self {
        Self { read_data, read_pos: 0, fragment }
    }
}

impl AsyncRead for MockIO {
    fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let remaining = &self.read_data[self.read_pos..];
        let amt = remaining.len().min(buf.remaining()).min(self.fragment);
        buf.put_slice(&remaining[..amt]);
        self.read_pos += amt;
        Poll::Ready(Ok(()))
    }
}

fn bench_request_decoder(c: &mut Criterion) {
    c.bench_function("decode_simple_request", |b| {
        b.iter(|| {
            let mut decoder = RequestDecoder::new();
            let mut bytes = BytesMut::from(SIMPLE_REQUEST);
            let mut out = Vec::new();
            decoder.decode_into(&mut bytes, &mut out);
            black_box(out);
        });
    });

    c.bench_function("decode_browser_request", |b| {
        b.iter(|| {
            let mut decoder = RequestDecoder::new();
            let mut bytes = BytesMut::from(BROWSER_REQUEST);
            let mut out = Vec::new();
            decoder.decode_into(&mut bytes, &mut out);
            black_box(out);
        });
    });
}

fn bench_response_decoder(c: &mut Criterion) {
    let response = b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 12\r\n\r\nHello World!";

    c.bench_function("decode_simple_response", |b| {
        b.iter(|| {
            let mut decoder = ResponseDecoder::new();
            let mut bytes = BytesMut::from(&response[..]);
            black_box(decoder.decode(&mut bytes).unwrap());
            black_box(decoder.decode(&mut bytes).unwrap());
        });
    });
}

fn bench_chunked_decoder(c: &mut Criterion) {
    let mut body = Vec::new();
    for _ in 0..16 {
        body.extend_from_slice(b"400\r\n");
        body.extend(std::iter::repeat_n(b'x', 0x400));
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(b"0\r\nExpires: never\r\n\r\n");

    c.bench_function("decode_chunked_body", |b| {
        b.iter(|| {
            let mut decoder = ChunkedDecoder::default();
            let mut bytes = BytesMut::from(&body[..]);
            while let Some(item) = decoder.decode(&mut bytes).unwrap() {
                black_box(item);
            }
        });
    });
}

fn bench_framed_read(c: &mut Criterion) {
    c.bench_function("framed_read_fragmented_request", |b| {
        b.iter(|| {
            let mock_io = MockIO::new(BROWSER_REQUEST.to_vec(), 7);
            let objects = FramedRead::new(mock_io, RequestDecoder::new());
            black_box(block_on(objects.collect::<Vec<_>>()));
        });
    });
}

criterion_group!(benches, bench_request_decoder, bench_response_decoder, bench_chunked_decoder, bench_framed_read);
criterion_main!(benches);
