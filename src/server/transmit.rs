use std::io::{self, Write};

use http::Version;
use tracing::debug;

use super::request::Request;
use super::response::Response;
use crate::runtime_config::RuntimeConfig;

/// Writes a [`Response`] to any byte sink in HTTP/1.x message form.
///
/// The status line uses the request's protocol version. Headers are written
/// in insertion order, one line per value. The body is rewound first when
/// the stream is seekable and then copied in `chunk_size` pieces (`0` copies
/// it in a single write).
#[derive(Debug, Clone, Copy)]
pub struct Transmitter {
    chunk_size: usize,
}

impl Default for Transmitter {
    fn default() -> Self {
        Self::from_config(&RuntimeConfig::default())
    }
}

impl Transmitter {
    #[must_use]
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    #[must_use]
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.chunk_size)
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn transmit<W: Write>(&self, req: &Request, res: Response, out: &mut W) -> io::Result<()> {
        let reason = res.reason_phrase().to_string();
        let status_line = if reason.is_empty() {
            format!("HTTP/{} {}\r\n", version_str(req.version()), res.status().as_u16())
        } else {
            format!(
                "HTTP/{} {} {}\r\n",
                version_str(req.version()),
                res.status().as_u16(),
                reason
            )
        };
        out.write_all(status_line.as_bytes())?;
        for (name, value) in res.headers().iter() {
            write!(out, "{name}: {value}\r\n")?;
        }
        out.write_all(b"\r\n")?;

        let mut body = res.into_body();
        if body.is_seekable() {
            body.rewind()?;
        }
        let written = if self.chunk_size == 0 {
            let bytes = body.contents()?;
            out.write_all(&bytes)?;
            bytes.len()
        } else {
            let mut total = 0;
            while !body.eof() {
                let chunk = body.read(self.chunk_size)?;
                if chunk.is_empty() {
                    break;
                }
                out.write_all(&chunk)?;
                total += chunk.len();
            }
            total
        };
        out.flush()?;
        debug!(request_id = %req.id(), bytes = written, "Response transmitted");
        Ok(())
    }
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};

    use super::*;
    use crate::server::{MemoryStream, Stream};

    fn render(transmitter: Transmitter, req: &Request, res: Response) -> String {
        let mut out = Vec::new();
        transmitter.transmit(req, res, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_status_line_headers_and_body() {
        let req = Request::new(Method::GET, "/");
        let res = Response::new()
            .with_header("Content-type", "text/plain")
            .with_added_header("Set-Cookie", "a=1")
            .with_added_header("Set-Cookie", "b=2")
            .with_body(MemoryStream::from_bytes("hi"));
        assert_eq!(
            render(Transmitter::default(), &req, res),
            "HTTP/1.1 200 OK\r\nContent-type: text/plain\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n\r\nhi"
        );
    }

    #[test]
    fn test_custom_reason_and_version() {
        let req = Request::new(Method::GET, "/").with_version(Version::HTTP_10);
        let res = Response::new().with_status_reason(StatusCode::IM_A_TEAPOT, "Short And Stout");
        assert_eq!(
            render(Transmitter::default(), &req, res),
            "HTTP/1.0 418 Short And Stout\r\n\r\n"
        );
    }

    #[test]
    fn test_body_rewound_and_chunked() {
        let req = Request::new(Method::GET, "/");
        let mut body = MemoryStream::new();
        body.write(b"abcdefghij").unwrap();
        let res = Response::new().with_body(body);
        assert!(render(Transmitter::new(3), &req, res).ends_with("\r\n\r\nabcdefghij"));
    }

    #[test]
    fn test_whole_body_when_chunk_size_zero() {
        let req = Request::new(Method::GET, "/");
        let res = Response::new().with_body(MemoryStream::from_bytes("whole"));
        assert!(render(Transmitter::new(0), &req, res).ends_with("\r\n\r\nwhole"));
    }
}
