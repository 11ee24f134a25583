//! Decode targets selecting how a response body is interpreted.
//!
//! # Design
//! The caller picks the target as a type parameter on each call, e.g.
//! `client.get_as::<Typed<Item>>(..)`. Each target names its output type and
//! whether it wants the raw stream or buffered text, so one `send` pipeline
//! covers every outcome without runtime type inspection.

use std::io::{Cursor, Read};
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::codec::JsonCodec;
use crate::error::Result;

/// Unbuffered response body handed back by the `Bytes` target.
pub type ByteStream = Box<dyn Read + Send + 'static>;

/// Response body as it comes off the transport.
pub enum RawBody {
    Stream(ByteStream),
    Text(String),
}

impl RawBody {
    /// Buffer the body as UTF-8 text. Invalid sequences become U+FFFD.
    pub fn into_text(self) -> Result<String> {
        match self {
            RawBody::Text(text) => Ok(text),
            RawBody::Stream(mut reader) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }

    pub fn into_stream(self) -> ByteStream {
        match self {
            RawBody::Stream(reader) => reader,
            RawBody::Text(text) => Box::new(Cursor::new(text.into_bytes())),
        }
    }
}

/// A shape a response body can be decoded into.
pub trait DecodeTarget {
    type Output;

    /// When `true` the pipeline hands over the body without reading it.
    const STREAMING: bool = false;

    fn decode(body: RawBody, codec: &JsonCodec) -> Result<Self::Output>;
}

/// Raw byte stream, no buffering and no content inspection.
#[derive(Debug)]
pub enum Bytes {}

/// Body text returned unchanged, whatever the content type.
#[derive(Debug)]
pub enum Text {}

/// Generic JSON tree (`serde_json::Value`).
#[derive(Debug)]
pub enum JsonTree {}

/// A concrete structure deserialized with the client's codec.
#[derive(Debug)]
pub struct Typed<T>(PhantomData<fn() -> T>);

impl DecodeTarget for Bytes {
    type Output = ByteStream;
    const STREAMING: bool = true;

    fn decode(body: RawBody, _codec: &JsonCodec) -> Result<ByteStream> {
        Ok(body.into_stream())
    }
}

impl DecodeTarget for Text {
    type Output = String;

    fn decode(body: RawBody, _codec: &JsonCodec) -> Result<String> {
        body.into_text()
    }
}

impl DecodeTarget for JsonTree {
    type Output = Value;

    fn decode(body: RawBody, codec: &JsonCodec) -> Result<Value> {
        codec.decode_tree(&body.into_text()?)
    }
}

impl<T: DeserializeOwned> DecodeTarget for Typed<T> {
    type Output = T;

    fn decode(body: RawBody, codec: &JsonCodec) -> Result<T> {
        codec.decode(&body.into_text()?)
    }
}
