// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visually-tight rectangles for shared elements.
//!
//! An element's native bounding box is not always where its pixels are. Icon
//! glyphs often sit inside a padded `viewBox`, and both vector and raster
//! content can be letterboxed when its intrinsic aspect ratio differs from
//! the box it is laid out in. The backend measures the raw facts into a
//! [`VisualBox`]; [`VisualBox::resolve`] turns them into the rectangle the
//! clone should start from or land on.
//!
//! All rectangles are in viewport pixels. Results never have negative width
//! or height.

use kurbo::{Point, Rect, Size};

/// Alignment along one axis, from `preserveAspectRatio`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Align {
    /// `xMin` / `YMin`.
    Min,
    /// `xMid` / `YMid`.
    Mid,
    /// `xMax` / `YMax`.
    Max,
}

impl Align {
    fn factor(self) -> f64 {
        match self {
            Self::Min => 0.0,
            Self::Mid => 0.5,
            Self::Max => 1.0,
        }
    }
}

/// How intrinsic content is fitted into its box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fit {
    /// Scale to fit entirely inside, leaving bars (`meet`).
    Meet,
    /// Scale to cover, clipping the overflow (`slice`).
    Slice,
    /// Stretch non-uniformly to the box (`none`).
    Stretch,
}

/// Parsed `preserveAspectRatio` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AspectAlign {
    /// Horizontal alignment.
    pub x: Align,
    /// Vertical alignment.
    pub y: Align,
    /// Fitting mode.
    pub fit: Fit,
}

impl Default for AspectAlign {
    fn default() -> Self {
        Self::CENTERED
    }
}

impl AspectAlign {
    /// `xMidYMid meet`, the SVG default.
    pub const CENTERED: Self = Self {
        x: Align::Mid,
        y: Align::Mid,
        fit: Fit::Meet,
    };

    /// Parses a `preserveAspectRatio` attribute. Unrecognized input yields
    /// the SVG default.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let mut parts = value.split_ascii_whitespace();
        let Some(align) = parts.next() else {
            return Self::CENTERED;
        };
        if align == "none" {
            return Self {
                fit: Fit::Stretch,
                ..Self::CENTERED
            };
        }
        let axis = |s: &str| match s {
            "Min" => Some(Align::Min),
            "Mid" => Some(Align::Mid),
            "Max" => Some(Align::Max),
            _ => None,
        };
        let parsed = align
            .strip_prefix('x')
            .filter(|rest| rest.len() == 7)
            .and_then(|rest| {
                let (x, y) = rest.split_at(3);
                Some((axis(x)?, axis(y.strip_prefix('Y')?)?))
            });
        let Some((x, y)) = parsed else {
            return Self::CENTERED;
        };
        let fit = match parts.next() {
            Some("slice") => Fit::Slice,
            _ => Fit::Meet,
        };
        Self { x, y, fit }
    }
}

/// Parses a `viewBox` attribute: four numbers separated by whitespace and/or
/// commas. Width and height must be positive.
#[must_use]
pub fn parse_view_box(value: &str) -> Option<Rect> {
    let mut nums = value
        .split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok().filter(|n| n.is_finite()));
    let x = nums.next()??;
    let y = nums.next()??;
    let w = nums.next()??;
    let h = nums.next()??;
    if nums.next().is_some() || w <= 0.0 || h <= 0.0 {
        return None;
    }
    Some(Rect::from_origin_size((x, y), (w, h)))
}

/// Returns `true` when `rect` covers a non-zero area.
#[must_use]
pub fn has_area(rect: Rect) -> bool {
    rect.width() > 0.0 && rect.height() > 0.0
}

/// Clamps a measured rectangle to something drawable.
///
/// Non-finite coordinates collapse to [`Rect::ZERO`]; inverted edges collapse
/// to zero width or height at the leading edge.
#[must_use]
pub fn sanitize(rect: Rect) -> Rect {
    if !(rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite())
    {
        return Rect::ZERO;
    }
    Rect::new(rect.x0, rect.y0, rect.x1.max(rect.x0), rect.y1.max(rect.y0))
}

/// Fits a rectangle of aspect ratio `aspect` (width / height) inside
/// `bounds` according to `align`.
///
/// `slice` and `none` fill the whole box, so `bounds` is returned unchanged,
/// as it is for a degenerate aspect ratio.
#[must_use]
pub fn letterbox(bounds: Rect, aspect: f64, align: AspectAlign) -> Rect {
    let bounds = sanitize(bounds);
    if align.fit != Fit::Meet || !(aspect.is_finite() && aspect > 0.0) || !has_area(bounds) {
        return bounds;
    }
    let (bw, bh) = (bounds.width(), bounds.height());
    let size = if bw / bh > aspect {
        Size::new(bh * aspect, bh)
    } else {
        Size::new(bw, bw / aspect)
    };
    let origin = Point::new(
        bounds.x0 + (bw - size.width) * align.x.factor(),
        bounds.y0 + (bh - size.height) * align.y.factor(),
    );
    Rect::from_origin_size(origin, size)
}

/// Maps `content` (in `view_box` units) into `visible`, the on-screen
/// rectangle that `view_box` occupies.
///
/// The result is proportional to the ratio of content to viewBox in both
/// axes and never extends past `visible`.
#[must_use]
pub fn content_crop(visible: Rect, view_box: Rect, content: Rect) -> Rect {
    let visible = sanitize(visible);
    if !has_area(view_box) || covers(content, view_box) {
        return visible;
    }
    let sx = visible.width() / view_box.width();
    let sy = visible.height() / view_box.height();
    let mapped = Rect::new(
        visible.x0 + (content.x0 - view_box.x0) * sx,
        visible.y0 + (content.y0 - view_box.y0) * sy,
        visible.x0 + (content.x1 - view_box.x0) * sx,
        visible.y0 + (content.y1 - view_box.y0) * sy,
    );
    let clipped = mapped.intersect(visible);
    sanitize(clipped)
}

fn covers(content: Rect, view_box: Rect) -> bool {
    content.x0 <= view_box.x0
        && content.y0 <= view_box.y0
        && content.x1 >= view_box.x1
        && content.y1 >= view_box.y1
}

/// The clone's rectangle at full explosion: `start` scaled by `scale` and
/// centered on the viewport.
#[must_use]
pub fn explode_rect(start: Rect, viewport: Size, scale: f64) -> Rect {
    let start = sanitize(start);
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };
    let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
    Rect::from_center_size(center, start.size() * scale)
}

/// What the backend measured about an element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VisualBox {
    /// No intrinsic geometry; the bounding box is the answer.
    Plain(Rect),
    /// Vector content with an intrinsic coordinate system.
    Vector {
        /// Native bounding box.
        bounds: Rect,
        /// Parsed `viewBox`, if any.
        view_box: Option<Rect>,
        /// Content bounding box in user units (`getBBox()`), if measurable.
        content: Option<Rect>,
        /// Parsed `preserveAspectRatio`.
        align: AspectAlign,
    },
    /// Raster content with a natural size.
    Raster {
        /// Native bounding box.
        bounds: Rect,
        /// Natural (intrinsic) pixel size.
        natural: Size,
        /// Whether the image is fitted with `object-fit: contain` or
        /// `scale-down`, i.e. letterboxed inside its box.
        contain: bool,
    },
}

impl VisualBox {
    /// Resolves the visually-accurate rectangle.
    #[must_use]
    pub fn resolve(&self) -> Rect {
        match *self {
            Self::Plain(bounds) => sanitize(bounds),
            Self::Vector {
                bounds,
                view_box,
                content,
                align,
            } => {
                let bounds = sanitize(bounds);
                let (visible, user_space) = match view_box {
                    Some(vb) => (letterbox(bounds, vb.width() / vb.height(), align), vb),
                    // Without a viewBox, user units are CSS pixels.
                    None => (bounds, Rect::from_origin_size(Point::ZERO, bounds.size())),
                };
                match content {
                    Some(content) if has_area(content) => {
                        content_crop(visible, user_space, content)
                    }
                    _ => visible,
                }
            }
            Self::Raster {
                bounds,
                natural,
                contain,
            } => {
                if contain && natural.height > 0.0 {
                    letterbox(bounds, natural.width / natural.height, AspectAlign::CENTERED)
                } else {
                    sanitize(bounds)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: Rect, b: Rect) -> bool {
        let d = |x: f64, y: f64| (x - y) < 1e-9 && (y - x) < 1e-9;
        d(a.x0, b.x0) && d(a.y0, b.y0) && d(a.x1, b.x1) && d(a.y1, b.y1)
    }

    #[test]
    fn view_box_parsing() {
        assert_eq!(
            parse_view_box("0 0 24 24"),
            Some(Rect::new(0.0, 0.0, 24.0, 24.0))
        );
        assert_eq!(
            parse_view_box("-2,4, 10 20"),
            Some(Rect::new(-2.0, 4.0, 8.0, 24.0))
        );
        assert_eq!(parse_view_box("0 0 0 24"), None);
        assert_eq!(parse_view_box("0 0 24"), None);
        assert_eq!(parse_view_box("0 0 24 24 1"), None);
        assert_eq!(parse_view_box("a b c d"), None);
    }

    #[test]
    fn aspect_align_parsing() {
        assert_eq!(AspectAlign::parse(""), AspectAlign::CENTERED);
        assert_eq!(AspectAlign::parse("none").fit, Fit::Stretch);
        let a = AspectAlign::parse("xMinYMax slice");
        assert_eq!((a.x, a.y, a.fit), (Align::Min, Align::Max, Fit::Slice));
        assert_eq!(AspectAlign::parse("xMidYMid"), AspectAlign::CENTERED);
        assert_eq!(AspectAlign::parse("bogus meet"), AspectAlign::CENTERED);
    }

    #[test]
    fn full_cover_content_matches_bounding_box() {
        let bounds = Rect::new(10.0, 20.0, 58.0, 68.0);
        let resolved = VisualBox::Vector {
            bounds,
            view_box: Some(Rect::new(0.0, 0.0, 24.0, 24.0)),
            content: Some(Rect::new(0.0, 0.0, 24.0, 24.0)),
            align: AspectAlign::CENTERED,
        }
        .resolve();
        assert_eq!(resolved, bounds);
    }

    #[test]
    fn cropped_content_is_proportionally_contained() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let resolved = VisualBox::Vector {
            bounds,
            view_box: Some(Rect::new(0.0, 0.0, 20.0, 20.0)),
            content: Some(Rect::new(5.0, 2.0, 15.0, 12.0)),
            align: AspectAlign::CENTERED,
        }
        .resolve();
        assert!(near(resolved, Rect::new(25.0, 10.0, 75.0, 60.0)), "{resolved:?}");
        assert!(
            bounds.intersect(resolved) == resolved && resolved != bounds,
            "crop must be strictly inside the bounding box"
        );
    }

    #[test]
    fn wide_view_box_is_letterboxed_vertically() {
        let resolved = VisualBox::Vector {
            bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
            view_box: Some(Rect::new(0.0, 0.0, 200.0, 100.0)),
            content: None,
            align: AspectAlign::CENTERED,
        }
        .resolve();
        assert!(near(resolved, Rect::new(0.0, 25.0, 100.0, 75.0)), "{resolved:?}");
    }

    #[test]
    fn letterbox_respects_alignment_and_stretch() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let min = AspectAlign::parse("xMinYMin");
        assert!(near(letterbox(bounds, 1.0, min), Rect::new(0.0, 0.0, 50.0, 50.0)));
        let max = AspectAlign::parse("xMaxYMax meet");
        assert!(near(letterbox(bounds, 1.0, max), Rect::new(50.0, 0.0, 100.0, 50.0)));
        assert_eq!(letterbox(bounds, 1.0, AspectAlign::parse("none")), bounds);
        assert_eq!(letterbox(bounds, 1.0, AspectAlign::parse("xMidYMid slice")), bounds);
    }

    #[test]
    fn contained_raster_is_letterboxed() {
        let resolved = VisualBox::Raster {
            bounds: Rect::new(0.0, 0.0, 300.0, 100.0),
            natural: Size::new(640.0, 640.0),
            contain: true,
        }
        .resolve();
        assert!(near(resolved, Rect::new(100.0, 0.0, 200.0, 100.0)), "{resolved:?}");

        let filled = VisualBox::Raster {
            bounds: Rect::new(0.0, 0.0, 300.0, 100.0),
            natural: Size::new(640.0, 640.0),
            contain: false,
        }
        .resolve();
        assert_eq!(filled, Rect::new(0.0, 0.0, 300.0, 100.0));
    }

    #[test]
    fn explode_is_centered_and_scaled() {
        let start = Rect::new(10.0, 10.0, 30.0, 20.0);
        let r = explode_rect(start, Size::new(1000.0, 800.0), 100.0);
        assert!(near(r, Rect::new(-500.0, -100.0, 1500.0, 900.0)), "{r:?}");
        assert_eq!(r.center(), Point::new(500.0, 400.0));
    }

    #[test]
    fn zero_size_source_explodes_to_a_point() {
        let r = explode_rect(Rect::new(5.0, 5.0, 5.0, 5.0), Size::new(200.0, 100.0), 100.0);
        assert!(!has_area(r), "zero-size sources stay zero-size");
        assert_eq!(r.origin(), Point::new(100.0, 50.0));
    }

    #[test]
    fn sanitize_never_yields_negative_extent() {
        let r = sanitize(Rect::new(10.0, 10.0, 0.0, 5.0));
        assert_eq!(r.width(), 0.0);
        assert_eq!(r.height(), 0.0);
        assert_eq!(sanitize(Rect::new(f64::NAN, 0.0, 1.0, 1.0)), Rect::ZERO);
    }
}
