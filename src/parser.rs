// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/parser.rs - Element decoders for NXL nest documents
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
 * # `parser` Module
 *
 * This module turns individual elements of an inflated nest document into
 * structured records: profiles and their geometry, text placements,
 * dimension annotations, bridges, and the machine and plate headers.
 *
 * ## Usage Example
 *
 * ```
 * use nxlreader::parser::Profile;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let xml = r#"<Profile Type="Outer">
 *         <Geometry>
 *             <Line><Start X="0" Y="0"/><End X="100" Y="0"/></Line>
 *         </Geometry>
 *     </Profile>"#;
 *     let doc = roxmltree::Document::parse(xml)?;
 *
 *     let profile = Profile::read(doc.root_element())?;
 *     assert_eq!(profile.geometry.len(), 1);
 *
 *     Ok(())
 * }
 * ```
 */

use std::str::FromStr;

use roxmltree::Node;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::{debug, warn};

use crate::error::{NestError, Result};
use crate::geometry::{Arc, Direction, Geometry, Line, Matrix33, Point};

pub(crate) fn elements<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    elements(node).find(|n| n.tag_name().name() == name)
}

pub(crate) fn required_child<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> Result<Node<'a, 'input>> {
    child(node, name).ok_or_else(|| NestError::MissingElement {
        parent: node.tag_name().name().to_string(),
        name,
    })
}

fn required_attribute<'a>(node: Node<'a, '_>, name: &'static str) -> Result<&'a str> {
    node.attribute(name)
        .ok_or_else(|| NestError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            name,
        })
}

fn optional_decimal(node: Node, name: &str) -> Result<Option<Decimal>> {
    node.attribute(name).map(parse_decimal).transpose()
}

/// Parses a coordinate or coefficient. Commas are read as decimal points.
/// Exponents too small for 28 decimal places are rounded.
pub(crate) fn parse_decimal(s: &str) -> Result<Decimal> {
    let s = s.trim().replace(',', ".");
    Decimal::from_str(&s)
        .or_else(|_| Decimal::from_scientific(&s))
        .or_else(|err| {
            s.parse::<f64>()
                .ok()
                .and_then(Decimal::from_f64)
                .ok_or(err)
        })
        .map_err(|source| NestError::InvalidNumber { value: s, source })
}

/// Reads a point from the `X` and `Y` attributes of `node`.
pub fn parse_point(node: Node) -> Result<Point> {
    Ok(Point {
        x: parse_decimal(required_attribute(node, "X")?)?,
        y: parse_decimal(required_attribute(node, "Y")?)?,
    })
}

/// Reads the nine whitespace or `;` separated coefficients of a `<Matrix>`.
pub fn parse_matrix(node: Node) -> Result<Matrix33> {
    let values = node
        .text()
        .unwrap_or("")
        .split(|c: char| c.is_whitespace() || c == ';')
        .filter(|s| !s.is_empty())
        .map(parse_decimal)
        .collect::<Result<Vec<_>>>()?;

    let m: [Decimal; 9] = values
        .try_into()
        .map_err(|values: Vec<Decimal>| NestError::InvalidMatrix(values.len()))?;
    Ok(Matrix33::new(m))
}

fn parse_direction(s: &str) -> Result<Direction> {
    match s.trim() {
        "CW" => Ok(Direction::Cw),
        "CCW" => Ok(Direction::Ccw),
        other => Err(NestError::InvalidDirection(other.to_string())),
    }
}

/// Decodes a single primitive. Returns `None` for element kinds this
/// decoder does not know.
pub fn parse_geometry(node: Node) -> Result<Option<Geometry>> {
    let geometry = match node.tag_name().name() {
        "Line" => Geometry::Line(Line {
            start: parse_point(required_child(node, "Start")?)?,
            end: parse_point(required_child(node, "End")?)?,
        }),
        "Arc" => Geometry::Arc(Arc {
            start: parse_point(required_child(node, "Start")?)?,
            end: parse_point(required_child(node, "End")?)?,
            center: parse_point(required_child(node, "Center")?)?,
            direction: parse_direction(required_attribute(node, "Direction")?)?,
        }),
        other => {
            debug!(kind = other, "skipping unknown geometry element");
            return Ok(None);
        }
    };
    Ok(Some(geometry))
}

/// The role a contour plays, taken from the `Type` attribute of a
/// template profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileKind {
    /// The outer cut contour.
    Outer,
    /// A hole inside the outer contour.
    Inner,
    /// A marking or engraving path that does not cut through.
    Marking,
    Other(String),
}

impl ProfileKind {
    fn from_attribute(value: &str) -> Self {
        match value {
            "Outer" => Self::Outer,
            "Inner" => Self::Inner,
            "Marking" => Self::Marking,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Machining metadata attached to a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Technology {
    /// The name of the technology table entry.
    pub name: Option<String>,
    /// The number of ridges left on this contour.
    pub ridges_count: u32,
}

impl Technology {
    pub fn read(node: Node) -> Result<Self> {
        let ridges_count = match node.attribute("RidgesCount") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|source| NestError::InvalidCount {
                    value: value.to_string(),
                    source,
                })?,
            None => 0,
        };

        Ok(Self {
            name: node.attribute("Name").map(String::from),
            ridges_count,
        })
    }
}

/// An ordered contour of geometry primitives.
///
/// The order of [Profile::geometry] is the traversal order of the cut.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// The contour's role, known only for template and plate profiles.
    pub kind: Option<ProfileKind>,
    pub geometry: Vec<Geometry>,
    pub technology: Option<Technology>,
}

impl Profile {
    /// Decodes a template or plate profile, whose primitives live under
    /// `<Geometry>`.
    pub fn read(node: Node) -> Result<Self> {
        let mut profile = Self::read_contour(node, "Geometry")?;
        profile.kind = node.attribute("Type").map(ProfileKind::from_attribute);
        Ok(profile)
    }

    /// Decodes an instance override profile, whose primitives live under
    /// `<Contour>`.
    pub fn read_part_info(node: Node) -> Result<Self> {
        Self::read_contour(node, "Contour")
    }

    fn read_contour(node: Node, container: &'static str) -> Result<Self> {
        let mut geometry = Vec::new();
        for element in elements(required_child(node, container)?) {
            if let Some(g) = parse_geometry(element)? {
                geometry.push(g);
            }
        }

        let technology = child(node, "Technology").map(Technology::read).transpose()?;

        Ok(Self {
            kind: None,
            geometry,
            technology,
        })
    }
}

/// Reads every `<Profile>` child of `node` with `read`, ignoring other
/// children.
pub(crate) fn read_profiles(node: Node, read: fn(Node) -> Result<Profile>) -> Result<Vec<Profile>> {
    elements(node)
        .filter(|n| n.tag_name().name() == "Profile")
        .map(read)
        .collect()
}

/// Reads every `<TextProfile>` child of `node`, ignoring other children.
pub(crate) fn read_texts(node: Node) -> Result<Vec<TextProfile>> {
    elements(node)
        .filter(|n| n.tag_name().name() == "TextProfile")
        .map(TextProfile::read)
        .collect()
}

/// Font and sizing of a text placement. Carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Font {
    pub name: Option<String>,
    pub height: Option<Decimal>,
    pub angle: Option<Decimal>,
}

/// A label placed on the sheet or on a part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextProfile {
    pub reference_point: Point,
    /// The placement of the owning part. Assigned when the part is
    /// resolved, never at decode time.
    pub matrix: Option<Matrix33>,
    pub text: String,
    pub font: Font,
}

impl TextProfile {
    pub fn read(node: Node) -> Result<Self> {
        Ok(Self {
            reference_point: parse_point(required_child(node, "ReferencePoint")?)?,
            matrix: None,
            text: required_attribute(node, "Text")?.to_string(),
            font: Font {
                name: node.attribute("Font").map(String::from),
                height: optional_decimal(node, "Height")?,
                angle: optional_decimal(node, "Angle")?,
            },
        })
    }

    /// The number of characters excluding spaces.
    pub fn symbols_count(&self) -> usize {
        self.text.chars().filter(|&c| c != ' ').count()
    }
}

/// A length dimension drawn on the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionLineAnnotation {
    pub start: Point,
    pub end: Point,
    pub text_position: Option<Point>,
    pub value: Option<String>,
}

impl DimensionLineAnnotation {
    pub fn read(node: Node) -> Result<Self> {
        Ok(Self {
            start: parse_point(required_child(node, "Start")?)?,
            end: parse_point(required_child(node, "End")?)?,
            text_position: child(node, "TextPosition").map(parse_point).transpose()?,
            value: node.attribute("Value").map(String::from),
        })
    }
}

/// Reads the `<Annotations>` section. Only length annotations are kept.
pub fn read_annotations(node: Node) -> Result<Vec<DimensionLineAnnotation>> {
    let mut annotations = Vec::new();
    for element in elements(node) {
        match element.tag_name().name() {
            "AnnotationLength" => {
                let dimension = required_child(element, "DimensionLineAnnotation")?;
                annotations.push(DimensionLineAnnotation::read(dimension)?);
            }
            other => warn!(kind = other, "unknown annotation element"),
        }
    }
    Ok(annotations)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeKind {
    Bridge,
    HalfBridge,
}

/// A connector left uncut between adjacent pieces. Half-bridges carry only
/// a start point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bridge {
    pub kind: BridgeKind,
    pub start: Point,
    pub end: Option<Point>,
    pub width: Option<Decimal>,
}

impl Bridge {
    pub fn read(node: Node, kind: BridgeKind) -> Result<Self> {
        Ok(Self {
            kind,
            start: parse_point(required_child(node, "Start")?)?,
            end: child(node, "End").map(parse_point).transpose()?,
            width: optional_decimal(node, "Width")?,
        })
    }
}

/// Reads the `<Bridges>` section in document order.
pub fn read_bridges(node: Node) -> Result<Vec<Bridge>> {
    let mut bridges = Vec::new();
    for element in elements(node) {
        let kind = match element.tag_name().name() {
            "Bridge" => BridgeKind::Bridge,
            "HalfBridge" => BridgeKind::HalfBridge,
            other => {
                warn!(kind = other, "unknown bridges element");
                continue;
            }
        };
        bridges.push(Bridge::read(element, kind)?);
    }
    Ok(bridges)
}

/// The cutting machine the nest was produced for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Machine {
    pub name: Option<String>,
    pub technology: Option<String>,
}

impl Machine {
    pub fn read(node: Node) -> Self {
        Self {
            name: node.attribute("Name").map(String::from),
            technology: node.attribute("Technology").map(String::from),
        }
    }
}

/// The stock sheet being cut.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plate {
    pub material: Option<String>,
    pub thickness: Option<Decimal>,
    pub profiles: Vec<Profile>,
}

impl Plate {
    pub fn read(node: Node) -> Result<Self> {
        Ok(Self {
            material: node.attribute("Material").map(String::from),
            thickness: optional_decimal(node, "Thickness")?,
            profiles: read_profiles(required_child(node, "Elements")?, Profile::read)?,
        })
    }

    /// Reads the plate from a `<Sheets>` section, preferring `<Plate>` over
    /// the legacy `<Sheet>` element.
    pub fn read_sheets(sheets: Node) -> Result<Option<Self>> {
        child(sheets, "Plate")
            .or_else(|| child(sheets, "Sheet"))
            .map(Self::read)
            .transpose()
    }
}
