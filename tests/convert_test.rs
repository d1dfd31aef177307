//! End-to-end conversion tests through the public `convert` entry points.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use svgtint::{Options, bounding_box, classify, convert, convert_with_report, parse_svg};

/// Build a minimal icon with `fill` set to `color`.
fn icon_with_fill(color: &str) -> String {
    format!(r#"<svg xmlns="http://www.w3.org/2000/svg"><path fill="{color}" d="M0 0h1v1z"/></svg>"#)
}

#[test]
fn test_colors_become_current_color() {
    for color in [
        "#f00",
        "#FF0000",
        "red",
        "RebeccaPurple",
        "rgb(255,0,0)",
        "rgba(0, 0, 0, .5)",
        "hsl(0 100% 50%)",
        "HSLA(1,2%,3%,0.4)",
    ] {
        assert!(classify(color).is_color(), "{color}");
        let out = convert(&icon_with_fill(color), false).unwrap();
        assert!(out.contains(r#"fill="currentColor""#), "{color} was not replaced: {out}");
    }
}

#[test]
fn test_non_colors_are_byte_identical() {
    for value in ["none", "url(#g1)", "inherit", "currentColor", "transparent", "#ffff", "#ff000080"] {
        let svg = icon_with_fill(value);
        assert_eq!(convert(&svg, false).unwrap(), svg, "{value} was rewritten");
    }
}

#[test]
fn test_crop_rect_case() {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"><rect x="10" y="10" width="30" height="20" fill="#ff0000"/></svg>"##;
    let out = convert(svg, true).unwrap();
    assert_eq!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="10 10 30 20"><rect x="10" y="10" width="30" height="20" fill="currentColor"/></svg>"#
    );
}

#[test]
fn test_crop_updates_numeric_size() {
    let svg = r#"<svg width="24" height="24px" viewBox="0 0 24 24"><path d="M4 4 H20 V12 Z"/></svg>"#;
    let out = convert(svg, true).unwrap();
    assert_eq!(out, r#"<svg width="16" height="8" viewBox="4 4 16 8"><path d="M4 4 H20 V12 Z"/></svg>"#);
}

#[test]
fn test_no_crop_without_flag() {
    let svg = r#"<svg viewBox="0 0 100 100"><rect width="1" height="1"/></svg>"#;
    assert_eq!(convert(svg, false).unwrap(), svg);
}

#[test]
fn test_path_triangle_bbox() {
    let doc = parse_svg(r#"<svg><path d="M0 0 L10 0 L10 10 Z"/></svg>"#).unwrap();
    let bbox = bounding_box(&doc.root).unwrap();
    assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (0.0, 0.0, 10.0, 10.0));
}

#[test]
fn test_style_block_case() {
    let out = convert("<svg><style>.a{fill:#112233;}</style></svg>", false).unwrap();
    assert_eq!(out, "<svg><style>.a{fill: currentColor;}</style></svg>");
}

#[test]
fn test_style_attribute_without_trailing_semicolon() {
    let out = convert(r#"<svg><g style="stroke-width:2;stroke:#000"/></svg>"#, false).unwrap();
    assert_eq!(out, r#"<svg><g style="stroke-width:2;stroke: currentColor"/></svg>"#);
}

#[test]
fn test_idempotent() {
    let inputs = [
        r##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24">
  <style>
    .a { fill: #123; stroke: none }
    .b{stroke:rgb(1,2,3)}
  </style>
  <!-- artwork -->
  <g fill="red" style="fill:blue;opacity:.5">
    <circle cx="12" cy="12" r="10" stroke="url(#grad)"/>
  </g>
</svg>
"##,
        "<svg><rect fill='none' width='2' height='3'/></svg>",
    ];

    for input in inputs {
        let once = convert(input, false).unwrap();
        assert_eq!(convert(&once, false).unwrap(), once);

        let cropped = convert(input, true).unwrap();
        assert_eq!(convert(&cropped, true).unwrap(), cropped);
    }
}

#[test]
fn test_preserves_document_shape() {
    let svg = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n<svg>\n  <!-- keep me -->\n  <title>Icon</title>\n  <rect width=\"1\" height=\"1\"/>\n</svg>\n";
    assert_eq!(convert(svg, false).unwrap(), svg);
}

#[test]
fn test_envelope_roundtrip() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><rect fill="none" width="4" height="4"/></svg>"#;
    let input = format!("data:image/svg+xml;charset=utf-8;base64,{}", BASE64_STANDARD.encode(svg));

    let out = convert(&input, false).unwrap();
    assert_eq!(out, input);

    let payload = out.strip_prefix("data:image/svg+xml;charset=utf-8;base64,").unwrap();
    assert_eq!(BASE64_STANDARD.decode(payload).unwrap(), svg.as_bytes());
}

#[test]
fn test_envelope_is_converted_and_rewrapped() {
    let svg = r##"<svg><rect x="1" y="2" width="3" height="4" fill="#abcdef"/></svg>"##;
    let input = format!("data:image/svg+xml;base64,{}", BASE64_STANDARD.encode(svg));

    let out = convert(&input, true).unwrap();
    let payload = out.strip_prefix("data:image/svg+xml;base64,").unwrap();
    let decoded = String::from_utf8(BASE64_STANDARD.decode(payload).unwrap()).unwrap();
    assert_eq!(
        decoded,
        r#"<svg viewBox="1 2 3 4"><rect x="1" y="2" width="3" height="4" fill="currentColor"/></svg>"#
    );
}

#[test]
fn test_parse_errors_surface() {
    for bad in ["<svg><g></svg>", "<svg>", "", "plain text", "<svg/><svg/>"] {
        let err = convert(bad, false).unwrap_err();
        assert!(err.is_parse(), "{bad:?} gave {err}");
    }

    let bad_envelope = "data:image/svg+xml;base64,@@@";
    assert!(convert(bad_envelope, false).unwrap_err().is_parse());
}

#[test]
fn test_report_counts_rewrites() {
    let svg = r#"<svg><style>.a{fill:red}</style><rect fill="red" stroke="blue" style="fill:green" width="2" height="2"/></svg>"#;
    let options = Options {
        crop: true,
        ..Options::default()
    };
    let conversion = convert_with_report(svg, &options).unwrap();
    assert_eq!(conversion.recolored.attributes, 2);
    assert_eq!(conversion.recolored.style_attributes, 1);
    assert_eq!(conversion.recolored.style_blocks, 1);
    assert!(conversion.cropped.is_some());
}

#[test]
fn test_degenerate_geometry_does_not_crop() {
    let svg = r#"<svg viewBox="0 0 10 10"><rect width="0" height="0"/><circle r="0"/><line x1="1" y1="1" x2="1" y2="1"/></svg>"#;
    assert_eq!(convert(svg, true).unwrap(), svg);
}

#[test]
fn test_style_non_colors_are_byte_identical() {
    for value in ["none", "inherit", "url(#g)", "currentColor"] {
        let attr = format!(r#"<svg><g style="fill:{value};stroke: {value} !important"/></svg>"#);
        assert_eq!(convert(&attr, false).unwrap(), attr, "{value} rewritten in style attribute");

        let block = format!("<svg><style>.a {{ fill: {value}; }} .b{{stroke:{value}}}</style></svg>");
        assert_eq!(convert(&block, false).unwrap(), block, "{value} rewritten in style block");
    }
}

#[test]
fn test_unterminated_string_in_style_block() {
    let out = convert("<svg><style>.a{fill:'x;} .b{fill:red;}</style></svg>", false).unwrap();
    assert_eq!(out, "<svg><style>.a{fill:'x;} .b{fill: currentColor;}</style></svg>");
}

#[test]
fn test_doctype_entities_are_expanded() {
    let svg = r#"<?xml version="1.0"?><!DOCTYPE svg [ <!ENTITY ns_svg "http://www.w3.org/2000/svg"> ]><svg xmlns="&ns_svg;"><rect fill="red" width="1" height="1"/></svg>"#;
    let out = convert(svg, false).unwrap();
    assert!(out.contains("<!ENTITY ns_svg"), "{out}");
    assert!(
        out.ends_with(r#"<svg xmlns="http://www.w3.org/2000/svg"><rect fill="currentColor" width="1" height="1"/></svg>"#),
        "{out}"
    );
    assert_eq!(convert(&out, false).unwrap(), out);
}
