use bytes::Bytes;
use jksn::{Float, Jksn, VecMap};
use num_bigint::BigInt;
use num_traits::Num;
use proptest::prelude::*;

/// arbitrary integer past the `i64` range for use with proptest
pub fn arb_bigint() -> impl Strategy<Value = BigInt> {
    "-?1[0-1]{63,130}".prop_map(|n| -> BigInt { BigInt::from_str_radix(&n, 2).unwrap() })
}

/// arbitrary Bytes for use with proptest
pub fn arb_bs() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..300).prop_map(Bytes::from)
}

/// NaN and the infinities travel without a width, so they always come back as doubles.
pub fn canonical_float(f: Float) -> Float {
    if f.is_nan() {
        Float::nan()
    } else if f.is_infinite() {
        Float::infinity(f.to_f64() < 0.0)
    } else {
        f
    }
}

/// arbitrary Float for use with proptest, already in the form the decoder produces
pub fn arb_float() -> impl Strategy<Value = Float> {
    prop_oneof![
        any::<f64>().prop_map(Float::from),
        any::<f32>().prop_map(Float::from),
        Just(Float::nan()),
        any::<bool>().prop_map(Float::infinity),
    ]
    .prop_map(canonical_float)
}

/// arbitrary object key for use with proptest
pub fn arb_key() -> impl Strategy<Value = Jksn> {
    prop_oneof![
        4 => "[a-z]{0,6}".prop_map(Jksn::Str),
        1 => any::<i16>().prop_map(Jksn::from),
        1 => Just(Jksn::Null),
    ]
}

/// arbitrary leaf value for use with proptest
pub fn arb_leaf() -> impl Strategy<Value = Jksn> {
    prop_oneof![
        Just(Jksn::Null),
        any::<bool>().prop_map(Jksn::Bool),
        any::<String>().prop_map(Jksn::Str),
        // short strings repeat often, which exercises back-references
        "[ab]{0,3}".prop_map(Jksn::Str),
        // integers of every width
        (0..=10i64).prop_map(Jksn::from),
        any::<i8>().prop_map(Jksn::from),
        any::<i16>().prop_map(Jksn::from),
        any::<i32>().prop_map(Jksn::from),
        any::<i64>().prop_map(Jksn::from),
        any::<u64>().prop_map(Jksn::from),
        any::<i128>().prop_map(Jksn::from),
        arb_bigint().prop_map(Jksn::from),
        arb_float().prop_map(Jksn::Jfloat),
        arb_bs().prop_map(Jksn::Blob),
    ]
}

/// arbitrary JKSN value for use with proptest. Never produces the unspecified marker, which
/// only means something inside swapped and lengthless arrays.
pub fn arb_jksn() -> impl Strategy<Value = Jksn> {
    arb_leaf().prop_recursive(
        8,  // max depth
        64, // max nodes
        10, // max items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..10).prop_map(Jksn::Array),
                prop::collection::vec((arb_key(), inner.clone()), 0..10)
                    .prop_map(|pairs| Jksn::Object(pairs.into_iter().collect::<VecMap<_, _>>())),
                // tables: rows sharing most of their keys
                prop::collection::vec(
                    prop::collection::btree_map("[abc]", inner, 0..4),
                    1..6
                )
                .prop_map(|rows| {
                    Jksn::Array(
                        rows.into_iter()
                            .map(|row| {
                                Jksn::Object(row.into_iter().map(|(k, v)| (Jksn::Str(k), v)).collect())
                            })
                            .collect(),
                    )
                }),
            ]
        },
    )
}
