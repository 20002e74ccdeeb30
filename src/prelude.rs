pub use crate::{
    encoding::{
        decode, decode_full, decode_slice, decode_with, encode, encode_full, encode_with,
        ChecksumKind, DecodeOptions, EncodeOptions, Placement, Serializer, StringEncoding,
    },
    errors::{JksnError, Result},
    float::Float,
    inum::Inum,
    vecmap::VecMap,
    Jksn,
};
pub use bytes::Bytes;
pub use num_bigint::BigInt;
pub use std::{convert::TryFrom, str::FromStr};
