// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/geometry.rs - Geometry primitives and placement transforms
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * # `geometry` Module
 *
 * Value types for the contours found in a nest file: points, line and arc
 * segments, the 3x3 placement matrix, and the extents accumulator used to
 * compute bounding boxes.
 */

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{NestError, Result};

/// A 2D point in sheet coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: Decimal,
    pub y: Decimal,
}

impl Point {
    pub fn new(x: Decimal, y: Decimal) -> Self {
        Self { x, y }
    }
}

/// The rotation sense of an arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Clockwise.
    Cw,
    /// Counterclockwise.
    Ccw,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Self::Cw => Self::Ccw,
            Self::Ccw => Self::Cw,
        }
    }
}

/// A straight segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

/// A circular arc segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc {
    pub start: Point,
    pub end: Point,
    pub center: Point,
    pub direction: Direction,
}

/// A single segment of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    Line(Line),
    Arc(Arc),
}

impl Geometry {
    pub fn start(&self) -> Point {
        match self {
            Self::Line(line) => line.start,
            Self::Arc(arc) => arc.start,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Self::Line(line) => line.end,
            Self::Arc(arc) => arc.end,
        }
    }

    /// Swaps the rotation sense of an arc. Lines are left untouched.
    ///
    /// Only the direction tag changes; start, end and center keep their
    /// coordinates.
    pub fn reverse_direction(&mut self) {
        match self {
            Self::Line(_) => {}
            Self::Arc(arc) => arc.direction = arc.direction.reversed(),
        }
    }
}

/// A 3x3 placement matrix, coefficients in row-major order.
///
/// Points are treated as row vectors `[x y 1]`, so the translation lives in
/// coefficients 6 and 7. Coefficient 8 carries the mirror sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matrix33 {
    pub m: [Decimal; 9],
}

impl Default for Matrix33 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix33 {
    pub fn new(m: [Decimal; 9]) -> Self {
        Self { m }
    }

    pub fn identity() -> Self {
        let (o, l) = (Decimal::ZERO, Decimal::ONE);
        Self::new([l, o, o, o, l, o, o, o, l])
    }

    /// Moves `p` through the matrix. Fails when a product or sum leaves the
    /// range of [Decimal].
    pub fn transform_point(&self, p: Point) -> Result<Point> {
        let m = &self.m;
        let axis = |a: Decimal, b: Decimal, offset: Decimal| {
            p.x.checked_mul(a)
                .zip(p.y.checked_mul(b))
                .and_then(|(u, v)| u.checked_add(v))
                .and_then(|sum| sum.checked_add(offset))
                .ok_or(NestError::CoordinateOverflow { x: p.x, y: p.y })
        };
        Ok(Point {
            x: axis(m[0], m[3], m[6])?,
            y: axis(m[1], m[4], m[7])?,
        })
    }

    /// Whether this placement mirrors the part, judged by the sign of
    /// coefficient 8.
    pub fn is_mirrored(&self) -> bool {
        self.m[8].is_sign_negative() && !self.m[8].is_zero()
    }

    /// The determinant, or `None` if it does not fit a [Decimal].
    pub fn determinant(&self) -> Option<Decimal> {
        let m = &self.m;
        let minor = |a: usize, b: usize, c: usize, d: usize| {
            m[a].checked_mul(m[b])?.checked_sub(m[c].checked_mul(m[d])?)
        };
        let first = m[0].checked_mul(minor(4, 8, 5, 7)?)?;
        let second = m[1].checked_mul(minor(3, 8, 5, 6)?)?;
        let third = m[2].checked_mul(minor(3, 7, 4, 6)?)?;
        first.checked_sub(second)?.checked_add(third)
    }
}

/// An axis-aligned rectangle with integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Running minimum and maximum of a set of points.
///
/// Arcs contribute only their endpoints, so an arc bulging past its chord
/// is not fully covered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extents {
    bounds: Option<(Point, Point)>,
}

impl Extents {
    pub fn include(&mut self, p: Point) {
        self.bounds = Some(match self.bounds {
            None => (p, p),
            Some((min, max)) => (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            ),
        });
    }

    pub fn include_geometry(&mut self, geometry: &Geometry) {
        self.include(geometry.start());
        self.include(geometry.end());
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Rounds the extents outward: origin and size are all ceilings.
    pub fn to_rectangle(&self) -> Option<Rectangle> {
        let (min, max) = self.bounds?;
        Some(Rectangle {
            x: ceil_to_i64(min.x),
            y: ceil_to_i64(min.y),
            width: span(min.x, max.x),
            height: span(min.y, max.y),
        })
    }
}

/// `max - min` rounded up, saturating when the difference leaves the range
/// of [Decimal].
fn span(min: Decimal, max: Decimal) -> i64 {
    max.checked_sub(min).map_or(i64::MAX, ceil_to_i64)
}

fn ceil_to_i64(value: Decimal) -> i64 {
    value.ceil().to_i64().unwrap_or(if value.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i64, y: i64) -> Point {
        Point::new(Decimal::from(x), Decimal::from(y))
    }

    fn matrix(values: [i64; 9]) -> Matrix33 {
        Matrix33::new(values.map(Decimal::from))
    }

    #[test]
    fn identity_keeps_points() {
        let p = Point::new(Decimal::new(125, 1), Decimal::new(-3, 0));
        assert_eq!(Matrix33::identity().transform_point(p).unwrap(), p);
        assert!(!Matrix33::identity().is_mirrored());
        assert_eq!(Matrix33::identity().determinant(), Some(Decimal::ONE));
    }

    #[test]
    fn transform_rotates_and_translates() {
        // 90 degree rotation followed by a (100, 50) offset.
        let m = matrix([0, 1, 0, -1, 0, 0, 100, 50, 1]);
        assert_eq!(m.transform_point(pt(10, 0)).unwrap(), pt(100, 60));
        assert_eq!(m.transform_point(pt(0, 10)).unwrap(), pt(90, 50));
    }

    #[test]
    fn transform_reports_overflow() {
        let huge = Decimal::from_scientific("1e19").unwrap();
        let o = Decimal::ZERO;
        let m = Matrix33::new([huge, o, o, o, Decimal::ONE, o, o, o, Decimal::ONE]);
        let p = Point::new(huge, Decimal::ZERO);

        assert!(matches!(
            m.transform_point(p),
            Err(NestError::CoordinateOverflow { x, .. }) if x == huge
        ));

        let m = Matrix33::new([huge, huge, o, huge, huge, o, o, o, huge]);
        assert_eq!(m.determinant(), None);
    }

    #[test]
    fn mirror_sign_comes_from_coefficient_eight() {
        assert!(matrix([1, 0, 0, 0, 1, 0, 0, 0, -1]).is_mirrored());
        assert!(!matrix([-1, 0, 0, 0, 1, 0, 0, 0, 1]).is_mirrored());
        assert!(!Matrix33::new([Decimal::ZERO; 9]).is_mirrored());
        assert_eq!(
            matrix([-1, 0, 0, 0, 1, 0, 0, 0, 1]).determinant(),
            Some(Decimal::from(-1))
        );
    }

    #[test]
    fn reversing_direction_only_touches_arcs() {
        let line = Line {
            start: pt(0, 0),
            end: pt(1, 1),
        };
        let arc = Arc {
            start: pt(0, 0),
            end: pt(2, 0),
            center: pt(1, 0),
            direction: Direction::Cw,
        };

        let mut g = Geometry::Line(line);
        g.reverse_direction();
        assert_eq!(g, Geometry::Line(line));

        let mut g = Geometry::Arc(arc);
        g.reverse_direction();
        assert_eq!(
            g,
            Geometry::Arc(Arc {
                direction: Direction::Ccw,
                ..arc
            })
        );
        g.reverse_direction();
        assert_eq!(g, Geometry::Arc(arc));
    }

    #[test]
    fn extents_round_outward() {
        let mut extents = Extents::default();
        assert!(extents.is_empty());
        assert_eq!(extents.to_rectangle(), None);

        extents.include(Point::new(Decimal::new(-15, 1), Decimal::new(2, 1)));
        extents.include(Point::new(Decimal::new(101, 1), Decimal::new(49, 0)));
        assert_eq!(
            extents.to_rectangle(),
            Some(Rectangle {
                x: -1,
                y: 1,
                width: 12,
                height: 49,
            })
        );
    }

    #[test]
    fn extents_saturate_spans_beyond_decimal_range() {
        let far = Decimal::from_scientific("6e28").unwrap();
        let mut extents = Extents::default();
        extents.include(Point::new(-far, Decimal::ZERO));
        extents.include(Point::new(far, Decimal::ONE));

        let rect = extents.to_rectangle().unwrap();
        assert_eq!(rect.x, i64::MIN);
        assert_eq!(rect.width, i64::MAX);
        assert_eq!(rect.height, 1);
    }

    #[test]
    fn extents_ignore_insertion_order() {
        let points = [pt(3, -2), pt(-7, 4), pt(10, 10), pt(0, 0)];

        let mut forward = Extents::default();
        points.iter().for_each(|&p| forward.include(p));
        let mut backward = Extents::default();
        points.iter().rev().for_each(|&p| backward.include(p));

        assert_eq!(forward, backward);
        assert_eq!(
            forward.to_rectangle(),
            Some(Rectangle {
                x: -7,
                y: -2,
                width: 17,
                height: 12,
            })
        );
    }
}
