// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG writer for the dashboard.

use kurbo::{Point, Rect};
use peniko::Color;

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// An SVG document built element by element, in paint order.
#[derive(Debug)]
pub(crate) struct SvgDocument {
    view: Rect,
    background: Option<Color>,
    body: String,
}

impl SvgDocument {
    pub(crate) fn new(view: Rect) -> Self {
        Self {
            view,
            background: None,
            body: String::new(),
        }
    }

    pub(crate) fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// A filled path from SVG path data.
    pub(crate) fn fill_path(&mut self, d: &str, fill: Color) {
        self.body.push_str(&format!(r#"<path d="{d}""#));
        write_paint_attr(&mut self.body, "fill", fill);
        self.body.push_str("/>\n");
    }

    /// A filled path with an outline.
    pub(crate) fn outlined_path(&mut self, d: &str, fill: Color, stroke: Color, width: f64) {
        self.body.push_str(&format!(r#"<path d="{d}""#));
        write_paint_attr(&mut self.body, "fill", fill);
        write_paint_attr(&mut self.body, "stroke", stroke);
        self.body.push_str(&format!(r#" stroke-width="{width}"/>"#));
        self.body.push('\n');
    }

    /// An unfilled stroked path with round caps.
    pub(crate) fn stroke_path(&mut self, d: &str, stroke: Color, width: f64) {
        self.body.push_str(&format!(
            r#"<path d="{d}" fill="none" stroke-width="{width}" stroke-linecap="round" stroke-linejoin="round""#
        ));
        write_paint_attr(&mut self.body, "stroke", stroke);
        self.body.push_str("/>\n");
    }

    pub(crate) fn rect(&mut self, rect: Rect, fill: Color) {
        self.rounded_rect(rect, 0.0, fill);
    }

    pub(crate) fn rounded_rect(&mut self, rect: Rect, radius: f64, fill: Color) {
        self.body.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}""#,
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height(),
        ));
        if radius > 0.0 {
            self.body.push_str(&format!(r#" rx="{radius}""#));
        }
        write_paint_attr(&mut self.body, "fill", fill);
        self.body.push_str("/>\n");
    }

    pub(crate) fn line(&mut self, from: Point, to: Point, stroke: Color, width: f64) {
        self.body.push_str(&format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke-width="{width}""#,
            from.x, from.y, to.x, to.y
        ));
        write_paint_attr(&mut self.body, "stroke", stroke);
        self.body.push_str("/>\n");
    }

    pub(crate) fn text(&mut self, pos: Point, font_size: f64, anchor: Anchor, fill: Color, text: &str) {
        self.body.push_str(&format!(
            r#"<text x="{}" y="{}" font-size="{font_size}" font-family="sans-serif" text-anchor="{}""#,
            pos.x,
            pos.y,
            anchor.as_str()
        ));
        write_paint_attr(&mut self.body, "fill", fill);
        self.body.push('>');
        self.body.push_str(&escape_xml(text));
        self.body.push_str("</text>\n");
    }

    pub(crate) fn to_svg_string(&self) -> String {
        let v = self.view;
        let mut out = String::new();
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(
            r#"viewBox="{} {} {} {}" width="{}" height="{}">"#,
            v.x0,
            v.y0,
            v.width(),
            v.height(),
            v.width(),
            v.height()
        ));
        out.push('\n');
        if let Some(bg) = self.background {
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                v.x0,
                v.y0,
                v.width(),
                v.height()
            ));
            write_paint_attr(&mut out, "fill", bg);
            out.push_str("/>\n");
        }
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }
}

fn svg_paint(color: Color) -> (String, Option<f64>) {
    let rgba = color.to_rgba8();
    let paint = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
    let opacity = if rgba.a == 255 {
        None
    } else {
        Some(f64::from(rgba.a) / 255.0)
    };
    (paint, opacity)
}

fn write_paint_attr(out: &mut String, name: &str, color: Color) {
    let (value, opacity) = svg_paint(color);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o:.3}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_colors_have_no_opacity_attribute() {
        let mut out = String::new();
        write_paint_attr(&mut out, "fill", Color::from_rgb8(0xff, 0x7b, 0x4d));
        assert_eq!(out, r##" fill="#ff7b4d""##);
    }

    #[test]
    fn translucent_colors_carry_opacity() {
        let mut out = String::new();
        write_paint_attr(&mut out, "stroke", Color::from_rgba8(0, 0, 0, 51));
        assert_eq!(out, r##" stroke="#000000" stroke-opacity="0.200""##);
    }

    #[test]
    fn text_is_escaped() {
        let mut doc = SvgDocument::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        doc.text(Point::ZERO, 12.0, Anchor::Start, Color::BLACK, "Fuel & <gas>");
        let svg = doc.to_svg_string();
        assert!(svg.contains("Fuel &amp; &lt;gas&gt;"), "{svg}");
        assert!(svg.starts_with("<svg"), "{svg}");
        assert!(svg.ends_with("</svg>\n"), "{svg}");
    }
}
