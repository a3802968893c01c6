//! The codec seam between stores and file encodings.

use bytes::Bytes;

use crate::{Error, Format, Value};

/// Codec for converting between a whole database tree and file bytes.
///
/// Codecs handle the parsing (decode) and serialization (encode) of data.
/// File stores don't care about specific encodings; that's the codec's job.
///
/// # Implementing Custom Codecs
///
/// ```rust
/// use pathdb_core::{Codec, Error, Format, Value};
/// use bytes::Bytes;
///
/// struct DebugCodec;
///
/// impl Codec for DebugCodec {
///     fn format(&self) -> Format {
///         Format::from_static("text/x-debug")
///     }
///
///     fn decode(&self, _bytes: &Bytes) -> Result<Value, Error> {
///         Err(Error::decode(self.format(), "write-only codec"))
///     }
///
///     fn encode(&self, value: &Value, _pretty: bool) -> Result<Bytes, Error> {
///         Ok(Bytes::from(format!("{:?}", value)))
///     }
/// }
/// ```
pub trait Codec: Send + Sync {
    /// The encoding this codec reads and writes.
    fn format(&self) -> Format;

    /// Decode raw bytes into a Value.
    fn decode(&self, bytes: &Bytes) -> Result<Value, Error>;

    /// Encode a Value into raw bytes.
    ///
    /// `pretty` asks for human-readable output where the encoding has a
    /// choice; encodings without one ignore it.
    fn encode(&self, value: &Value, pretty: bool) -> Result<Bytes, Error>;

    /// File extension for this codec's files, without the leading dot.
    fn extension(&self) -> &'static str {
        self.format().extension().unwrap_or("db")
    }
}

impl<C: Codec + ?Sized> Codec for &C {
    fn format(&self) -> Format {
        (**self).format()
    }

    fn decode(&self, bytes: &Bytes) -> Result<Value, Error> {
        (**self).decode(bytes)
    }

    fn encode(&self, value: &Value, pretty: bool) -> Result<Bytes, Error> {
        (**self).encode(value, pretty)
    }

    fn extension(&self) -> &'static str {
        (**self).extension()
    }
}

impl<C: Codec + ?Sized> Codec for Box<C> {
    fn format(&self) -> Format {
        (**self).format()
    }

    fn decode(&self, bytes: &Bytes) -> Result<Value, Error> {
        (**self).decode(bytes)
    }

    fn encode(&self, value: &Value, pretty: bool) -> Result<Bytes, Error> {
        (**self).encode(value, pretty)
    }

    fn extension(&self) -> &'static str {
        (**self).extension()
    }
}
