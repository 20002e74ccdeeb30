use jksn::prelude::*;

fn obj(pairs: Vec<(&str, Jksn)>) -> Jksn {
    Jksn::Object(pairs.into_iter().map(|(k, v)| (Jksn::from(k), v)).collect())
}

fn dec(bytes: &[u8]) -> Result<Jksn> { decode_with(bytes, &DecodeOptions::default().header(false)) }

#[test]
fn short_integers_are_short() {
    for n in 0..=10 {
        assert_eq!(encode_full(&Jksn::from(n)).unwrap().len(), 1);
    }
    for n in (-128..=127).filter(|n| !(0..=10).contains(n)) {
        assert_eq!(encode_full(&Jksn::from(n)).unwrap().len(), 2, "{}", n);
    }
    assert_eq!(encode_full(&Jksn::from(-129)).unwrap().len(), 3);
    assert_eq!(encode_full(&Jksn::from(i32::max_value())).unwrap().len(), 5);
    assert_eq!(encode_full(&Jksn::from(i32::min_value())).unwrap().len(), 5);
}

#[test]
fn wide_integers_round_trip() {
    let values = vec![
        Jksn::from(i64::max_value()),
        Jksn::from(i64::min_value()),
        Jksn::from(u64::max_value()),
        Jksn::from(i128::min_value()),
        Jksn::from(BigInt::from(u128::max_value()) * BigInt::from(u128::max_value())),
        Jksn::from(1i64 << 40),
        Jksn::from(-(1i64 << 40)),
    ];
    let arr = Jksn::from(values);
    assert_eq!(dec(&encode_full(&arr).unwrap()).unwrap(), arr);
    assert_eq!(dec(&encode(&arr, &EncodeOptions::plain()).unwrap()).unwrap(), arr);
}

#[test]
fn delta_follows_last_integer() {
    let v = dec(&[0x82, 0x1d, 100, 0xdd, 0xf9]).unwrap();
    assert_eq!(v, Jksn::from(vec![100, 93]));

    // a delta reads the latest integer, delta or not
    let v = dec(&[0x83, 0x1d, 100, 0xdd, 0xf9, 0xd6]).unwrap();
    assert_eq!(v, Jksn::from(vec![100, 93, 88]));
}

#[test]
fn delta_needs_a_previous_integer() {
    let err = dec(&[0xdd, 0xf9]).unwrap_err();
    assert!(err.is_structural(), "{}", err);
    let err = dec(&[0x82, 0x01, 0xd1]).unwrap_err();
    assert!(err.is_structural(), "{}", err);
}

#[test]
fn repeated_text_is_shared() {
    let v = Jksn::from(vec!["shared", "shared", "shared"]);
    let enc = encode_full(&v).unwrap();
    assert_eq!(enc.len(), 1 + 7 + 2 + 2);
    assert_eq!(dec(&enc).unwrap(), v);

    let blob = Jksn::from_static(b"\x00\x01\x02\x03");
    let v = Jksn::from(vec![blob.clone(), blob.clone()]);
    let enc = encode_full(&v).unwrap();
    assert_eq!(enc.len(), 1 + 5 + 2);
    assert_eq!(dec(&enc).unwrap(), v);
}

#[test]
fn unknown_back_reference_is_structural() {
    assert!(dec(&[0x3c, 0x42]).unwrap_err().is_structural());
    assert!(dec(&[0x5c, 0x42]).unwrap_err().is_structural());
    // text and blob tables are separate, "hi" sits in text slot 0x69
    assert!(dec(&[0x82, 0x42, b'h', b'i', 0x5c, 0x69]).unwrap_err().is_structural());
}

#[test]
fn swapped_rows_keep_missing_keys_missing() {
    let rows = Jksn::from(vec![
        obj(vec![("a", Jksn::from(1)), ("b", Jksn::from(2))]),
        obj(vec![("a", Jksn::from(3))]),
    ]);
    let opts = EncodeOptions::plain().swapped_arrays(true);
    let enc = encode(&rows, &opts).unwrap();
    assert_eq!(enc[0], 0xa2);

    let back = dec(&enc).unwrap();
    assert_eq!(back, rows);
    let second = &back.as_array().unwrap()[1];
    assert_eq!(second.get("b"), None);
    assert_eq!(second.as_object().map(VecMap::len), Some(1));
}

#[test]
fn swapped_columns_of_different_lengths() {
    // column "a" covers one row, column "b" two
    let enc = [0xa2, 0x41, b'a', 0x81, 0x11, 0x41, b'b', 0x82, 0xa0, 0x12];
    assert_eq!(
        dec(&enc).unwrap(),
        Jksn::from(vec![
            obj(vec![("a", Jksn::from(1))]),
            obj(vec![("b", Jksn::from(2))]),
        ])
    );
}

#[test]
fn checksum_catches_flipped_payload() {
    let v = Jksn::from(vec![
        Jksn::from_static(b"\x10\x20\x30\x40\x50"),
        Jksn::from(5_000_000),
    ]);
    let opts = EncodeOptions::plain().checksum(ChecksumKind::Crc32, Placement::Prefix);
    let enc = encode(&v, &opts).unwrap();
    assert_eq!(enc[0], 0xf1);
    assert_eq!(dec(&enc).unwrap(), v);

    // 0xf1, four digest bytes, 0x82, 0x55, five blob bytes, 0x1b, four integer bytes
    assert_eq!(enc.len(), 1 + 4 + 1 + 1 + 5 + 1 + 4);
    let payload = (1..5).chain(7..12).chain(13..17);
    for i in payload {
        let mut bad = enc.clone();
        bad[i] ^= 0x01;
        let err = dec(&bad).unwrap_err();
        assert!(err.is_integrity(), "byte {}: {}", i, err);
    }

    // anywhere under the wrapper the stream may break in other ways, but never decodes
    for i in 1..enc.len() {
        for bit in 0..8 {
            let mut bad = enc.clone();
            bad[i] ^= 1 << bit;
            assert!(dec(&bad).is_err(), "byte {} bit {}", i, bit);
        }
    }
}

#[test]
fn lengthless_array_stops_at_the_sentinel() {
    let v = dec(&[0xc8, 0x11, 0x42, b'h', b'i', 0xa0]).unwrap();
    assert_eq!(v, Jksn::from(vec![Jksn::from(1), Jksn::from("hi")]));
    assert_eq!(dec(&[0xc8, 0xa0]).unwrap(), Jksn::from(Vec::<Jksn>::new()));
    assert!(dec(&[0xc8, 0x11]).unwrap_err().is_truncation());
}

#[test]
fn padding_is_transparent() {
    let v = obj(vec![("k", Jksn::from(vec![1, 2]))]);
    let enc = encode(&v, &EncodeOptions::plain()).unwrap();
    // before the object, the key, the array and each of its items
    for &i in &[0, 1, 3, 4, 5] {
        let mut padded = enc.clone();
        padded.insert(i, 0xca);
        assert_eq!(dec(&padded).unwrap(), v, "padding at {}", i);
    }
    let mut padded = vec![0xca, 0xca];
    padded.extend_from_slice(&enc);
    assert_eq!(dec(&padded).unwrap(), v);
}

#[test]
fn hashtable_ops_produce_no_value() {
    // prime the table with "hi", then refer to it
    let hash = 0x68u8.wrapping_shl(5).wrapping_add(0x69);
    assert_eq!(dec(&[0x71, 0x42, b'h', b'i', 0x3c, hash]).unwrap(), Jksn::from("hi"));
    // clearing forgets it
    let stream = [0x82, 0x42, b'h', b'i', 0x70, 0x3c, hash];
    assert!(dec(&stream).unwrap_err().is_structural());
}

#[test]
fn malformed_control_bytes() {
    for &control in &[0x04u8, 0x21, 0x2a, 0x60, 0x6f, 0xb0, 0xc0, 0xe0, 0xf6, 0xf7, 0xfe] {
        let err = dec(&[control, 0, 0, 0, 0]).unwrap_err();
        assert!(err.is_structural(), "0x{:02x}: {}", control, err);
        assert!(err.to_string().contains(&format!("0x{:02x}", control)));
    }
    assert!(dec(&[0x2b; 11]).unwrap_err().is_unsupported());
}

#[test]
fn truncated_streams() {
    for bytes in &[&[][..], &[0x1b, 0, 0][..], &[0x4e][..], &[0x43, b'a'][..], &[0x82, 0x11][..]] {
        assert!(dec(bytes).unwrap_err().is_truncation(), "{:?}", bytes);
    }
    let sha = encode(
        &Jksn::from(1),
        &EncodeOptions::plain().checksum(ChecksumKind::Sha512, Placement::Suffix),
    )
    .unwrap();
    assert!(dec(&sha[..sha.len() - 1]).unwrap_err().is_truncation());
}

#[test]
fn deep_nesting_is_refused() {
    let deep = vec![0x81u8; 100_000];
    assert!(dec(&deep).unwrap_err().is_structural());
}

#[test]
fn large_objects_decode_in_linear_time() {
    let n: u16 = 60_000;
    let mut stream = vec![0x9d];
    stream.extend_from_slice(&n.to_be_bytes());
    for i in 0..n {
        stream.push(0x1b);
        stream.extend_from_slice(&(i as i32).to_be_bytes());
        stream.push(0x01);
    }

    let start = std::time::Instant::now();
    let v = dec(&stream).unwrap();
    let elapsed = start.elapsed();

    let map = v.as_object().unwrap();
    assert_eq!(map.len(), n as usize);
    assert_eq!(map.get(&Jksn::from(59_999)), Some(&Jksn::Null));
    assert!(elapsed < std::time::Duration::from_secs(2), "{:?}", elapsed);
}

#[test]
fn embedded_json() {
    let text = br#"{"x": [1, "two"]}"#;
    let mut stream = vec![0x0f, 0x4e, text.len() as u8];
    stream.extend_from_slice(text);
    assert_eq!(
        dec(&stream).unwrap(),
        obj(vec![("x", Jksn::from(vec![Jksn::from(1), Jksn::from("two")]))])
    );
}

#[test]
fn utf16_text_round_trips() {
    let v = Jksn::from(vec!["日本語のテキスト", "emoji 🎉", "plain"]);
    for &enc in &[StringEncoding::Auto, StringEncoding::Utf16, StringEncoding::Utf8] {
        let bytes = encode(&v, &EncodeOptions::default().string_encoding(enc)).unwrap();
        assert_eq!(dec(&bytes).unwrap(), v);
    }
}
