use cbor_tree::json::{decode, encode, JsonError};
use cbor_tree::{Kind, NodeId, Tree};

fn parse(tree: &mut Tree, text: &str) -> NodeId {
    decode(tree, text.as_bytes()).expect("valid input")
}

#[test]
fn decode_encode_matrix() {
    // Inputs in canonical output form survive a decode/encode cycle
    // byte for byte.
    let cases = [
        "42",
        "-17",
        "true",
        "false",
        "null",
        r#""plain""#,
        r#"{"a": 1, "b": [1, 2], "c": {"d": null}}"#,
        "[]",
        "{}",
        r#"["data:application/octet-stream;base64,AQID"]"#,
    ];
    let mut tree = Tree::new();
    for text in cases {
        let id = parse(&mut tree, text);
        assert_eq!(encode(&tree, id), text, "for input {text}");
    }
}

#[test]
fn comments_and_layout_are_whitespace() {
    let commented = r#"
        // configuration
        {
            "a": 1, /* inline
                       and multi-line /* nested too */ */
            "b": [2, 3] // trailing
        }
    "#;
    let mut tree = Tree::new();
    let root = parse(&mut tree, commented);
    assert_eq!(encode(&tree, root), r#"{"a": 1, "b": [2, 3]}"#);
}

#[test]
fn float_output_is_fixed_precision() {
    let mut tree = Tree::new();
    let id = parse(&mut tree, "2.5");
    assert_eq!(encode(&tree, id), "2.500000");
    // Decoding the lossy form yields the same value again.
    let id = parse(&mut tree, "1.0e-8");
    assert_eq!(encode(&tree, id), "0.000000");
}

#[test]
fn escape_roundtrip_through_codepoints() {
    let mut tree = Tree::new();
    let id = parse(&mut tree, r#""tab\there é 😀""#);
    assert!(tree.eq_str(id, "tab\there \u{e9} \u{1f600}"));
    // Non-ASCII always re-encodes escaped.
    assert_eq!(encode(&tree, id), r#""tab\there \u00e9 \ud83d\ude00""#);
}

#[test]
fn bytes_roundtrip_via_data_uri() {
    let mut tree = Tree::new();
    let bytes = tree.new_bytes(&[0xde, 0xad, 0xbe, 0xef]);
    let text = encode(&tree, bytes);
    let back = decode(&mut tree, text.as_bytes()).unwrap();
    assert_eq!(tree.kind(back), Kind::Bytes);
    assert_eq!(tree.str_bytes(back), [0xde, 0xad, 0xbe, 0xef]);
}

#[test]
fn diagnostics_point_at_the_failure() {
    let cases: Vec<(&str, JsonError)> = vec![
        (
            "{\n  \"a\" 1}",
            JsonError::Expected {
                expected: "`:` as key-value separator",
                line: 2,
                column: 6,
            },
        ),
        (
            "[1, 2\n 3]",
            JsonError::Expected {
                expected: "`,` or `]` in array",
                line: 2,
                column: 1,
            },
        ),
        (
            "nul",
            JsonError::Expected {
                expected: "`null`",
                line: 1,
                column: 0,
            },
        ),
    ];
    for (text, expected) in cases {
        let err = decode(&mut Tree::new(), text.as_bytes()).unwrap_err();
        assert_eq!(err, expected, "for input {text:?}");
    }
}

#[test]
fn binary_and_text_codecs_agree_on_the_tree() {
    let mut tree = Tree::new();
    let root = parse(&mut tree, r#"{"k": [1, true, "s"], "n": null}"#);
    let buf = cbor_tree::cbor::encode(&tree, root);
    let (back, _) = cbor_tree::cbor::decode(&mut tree, &buf).unwrap();
    assert!(tree.deep_eq(root, back));
    assert_eq!(encode(&tree, back), r#"{"k": [1, true, "s"], "n": null}"#);
}
