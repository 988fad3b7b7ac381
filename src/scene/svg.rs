//! SVG serialization of a [`Scene`].
//!
//! Output keeps the group ids and class names of the stylesheet contract so
//! an exported map styles the same way as the live one.

use super::{Element, HemisphereGroup, Primitive, Scene};
use std::fmt::Write;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

impl Scene {
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="{ns}" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            ns = SVG_NAMESPACE,
            w = self.width,
            h = self.height,
        );
        for group in self.groups() {
            write_group(&mut out, group);
        }
        out.push_str("</svg>");
        out
    }
}

fn write_group(out: &mut String, group: &HemisphereGroup) {
    match group.opacity {
        Some(opacity) => {
            let _ = write!(
                out,
                r#"<g id="{}" style="opacity: {}">"#,
                group.id(),
                opacity.get()
            );
        }
        None => {
            let _ = write!(out, r#"<g id="{}">"#, group.id());
        }
    }
    for element in &group.elements {
        write_element(out, group, element);
    }
    out.push_str("</g>");
}

fn write_element(out: &mut String, group: &HemisphereGroup, element: &Element) {
    let class = element.class.class_name(group.hemisphere);
    match &element.primitive {
        Primitive::Rect { width, height } => {
            let _ = write!(
                out,
                r#"<rect class="{}" width="{}" height="{}"/>"#,
                class, width, height
            );
        }
        Primitive::Path { path, .. } => {
            let _ = write!(
                out,
                r#"<path class="{}" d="{}"/>"#,
                class,
                path.to_svg_data()
            );
        }
        Primitive::Text {
            position,
            text,
            font_size,
            bold,
            fill,
        } => {
            let _ = write!(
                out,
                r#"<text class="{}" x="{}" y="{}" font-size="{}px""#,
                class, position.x, position.y, font_size
            );
            if *bold {
                out.push_str(r#" font-weight="bold""#);
            }
            if let Some([r, g, b]) = fill {
                let _ = write!(out, r##" style="fill: #{:02x}{:02x}{:02x}""##, r, g, b);
            }
            let _ = write!(out, ">{}</text>", escape(text));
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
