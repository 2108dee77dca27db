// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/interpreter.rs - Template library and placement resolution
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
 * # `interpreter` Module
 *
 * This module interprets the two halves of a nest's part data. The
 * `<OriginalParts>` section holds unplaced part and remnant templates; the
 * `<PartInfos>` section holds placed instances that refer to a part template
 * by its order line identifier.
 *
 * [TemplateLibrary] indexes the templates, and [Placements::resolve] turns
 * each instance into a [Part] or [Remnant] owning its own copy of the
 * template geometry.
 *
 * ## Usage Example
 *
 * ```
 * use nxlreader::interpreter::{Placements, TemplateLibrary};
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let templates = roxmltree::Document::parse(
 *         r#"<OriginalParts>
 *             <Part>
 *                 <DbInfo><ID>A</ID></DbInfo>
 *                 <Elements/>
 *                 <Texts/>
 *             </Part>
 *         </OriginalParts>"#,
 *     )?;
 *     let instances = roxmltree::Document::parse(
 *         r#"<PartInfos>
 *             <PartInfo>
 *                 <DbInfo><ID>A</ID></DbInfo>
 *                 <Matrix>1 0 0 0 1 0 0 0 1</Matrix>
 *                 <Profiles/>
 *             </PartInfo>
 *         </PartInfos>"#,
 *     )?;
 *
 *     let library = TemplateLibrary::read(templates.root_element())?;
 *     let placements = Placements::resolve(instances.root_element(), &library)?;
 *     assert_eq!(placements.parts.len(), 1);
 *
 *     Ok(())
 * }
 * ```
 */

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use roxmltree::Node;
use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::Matrix33;
use crate::parser::{
    Profile, TextProfile, child, elements, parse_matrix, read_profiles, read_texts,
    required_child,
};

/// An unplaced part or remnant definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    /// The order line identifier. Only part templates carry one.
    pub orderline_info: Option<String>,
    pub profiles: Vec<Profile>,
    pub texts: Vec<TextProfile>,
}

impl Template {
    fn read(node: Node, orderline_info: Option<String>) -> Result<Self> {
        Ok(Self {
            orderline_info,
            profiles: read_profiles(required_child(node, "Elements")?, Profile::read)?,
            texts: read_texts(required_child(node, "Texts")?)?,
        })
    }
}

/// Reads the order line identifier from `<DbInfo><ID>`.
///
/// The text is taken verbatim. Identifiers that differ only in surrounding
/// whitespace are distinct.
fn orderline_info(node: Node) -> Option<String> {
    let id = child(child(node, "DbInfo")?, "ID")?;
    Some(id.text().unwrap_or("").to_string())
}

fn required_orderline_info(node: Node) -> Result<String> {
    let id = required_child(required_child(node, "DbInfo")?, "ID")?;
    Ok(id.text().unwrap_or("").to_string())
}

/// The templates of a nest, in document order.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    parts: Vec<Template>,
    remnants: Vec<Template>,
    index: HashMap<String, usize>,
}

impl TemplateLibrary {
    /// Builds the library from an `<OriginalParts>` section.
    ///
    /// A part template without an order line identifier fails the whole
    /// section. When identifiers repeat, the first template wins lookups.
    pub fn read(node: Node) -> Result<Self> {
        let mut library = Self::default();

        for element in elements(node) {
            match element.tag_name().name() {
                "Part" => {
                    let id = required_orderline_info(element)?;
                    let template = Template::read(element, Some(id.clone()))?;
                    library.insert_part(id, template);
                }
                "Remnant" => {
                    library.remnants.push(Template::read(element, None)?);
                }
                other => debug!(kind = other, "skipping unknown template element"),
            }
        }

        debug!(
            parts = library.parts.len(),
            remnants = library.remnants.len(),
            "built template library"
        );
        Ok(library)
    }

    fn insert_part(&mut self, id: String, template: Template) {
        match self.index.entry(id) {
            Entry::Vacant(entry) => {
                entry.insert(self.parts.len());
            }
            Entry::Occupied(entry) => {
                debug!(id = entry.key().as_str(), "duplicate part template identifier");
            }
        }
        self.parts.push(template);
    }

    /// Looks up the part template for an order line identifier.
    pub fn find(&self, orderline_info: &str) -> Option<&Template> {
        self.index.get(orderline_info).map(|&i| &self.parts[i])
    }

    /// Every part template, duplicates included.
    pub fn parts(&self) -> &[Template] {
        &self.parts
    }

    pub fn remnants(&self) -> &[Template] {
        &self.remnants
    }
}

/// A placed part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub matrix: Matrix33,
    /// Template profiles followed by the instance's override profiles.
    pub profiles: Vec<Profile>,
    pub texts: Vec<TextProfile>,
    pub detail_id: Option<TextProfile>,
}

impl Part {
    fn read(node: Node, template: &Template) -> Result<Self> {
        let matrix = parse_matrix(required_child(node, "Matrix")?)?;

        let mut profiles = template.profiles.clone();
        profiles.extend(read_profiles(
            required_child(node, "Profiles")?,
            Profile::read_part_info,
        )?);

        let detail_id = match child(node, "DetailId") {
            Some(detail) => Some(TextProfile::read(required_child(detail, "TextProfile")?)?),
            None => None,
        };

        Ok(Self {
            matrix,
            profiles,
            texts: template.texts.clone(),
            detail_id,
        })
    }

    pub fn ridges_count(&self) -> u64 {
        self.profiles
            .iter()
            .filter_map(|profile| profile.technology.as_ref())
            .map(|tech| u64::from(tech.ridges_count))
            .sum()
    }

    /// Applies the placement to this part.
    ///
    /// Mirrored placements reverse every arc. Text reference points are
    /// moved through the matrix; profile coordinates are not.
    pub fn apply_placement(&mut self) -> Result<()> {
        let matrix = self.matrix;

        if matrix.is_mirrored() {
            self.profiles
                .iter_mut()
                .flat_map(|profile| profile.geometry.iter_mut())
                .for_each(|geometry| geometry.reverse_direction());
        }

        for text in &mut self.texts {
            text.matrix = Some(matrix);
            text.reference_point = matrix.transform_point(text.reference_point)?;
        }
        Ok(())
    }
}

/// A placed remnant. Remnant instances do not refer to a template and carry
/// no texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remnant {
    pub matrix: Matrix33,
    pub profiles: Vec<Profile>,
}

impl Remnant {
    fn read(node: Node) -> Result<Self> {
        Ok(Self {
            matrix: parse_matrix(required_child(node, "Matrix")?)?,
            profiles: read_profiles(required_child(node, "Profiles")?, Profile::read_part_info)?,
        })
    }
}

/// The resolved instances of a `<PartInfos>` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placements {
    pub parts: Vec<Part>,
    pub remnants: Vec<Remnant>,
}

impl Placements {
    /// Resolves every instance against `library`.
    ///
    /// Part instances whose template cannot be found are dropped. Missing
    /// `<Matrix>` or `<Profiles>` in any other instance is an error, and so
    /// is a placement that moves a text out of the coordinate range.
    pub fn resolve(node: Node, library: &TemplateLibrary) -> Result<Self> {
        let mut placements = Self::default();

        for element in elements(node) {
            match element.tag_name().name() {
                "PartInfo" => {
                    let Some(id) = orderline_info(element) else {
                        warn!("part instance without order line identifier");
                        continue;
                    };
                    let Some(template) = library.find(&id) else {
                        warn!(id = id.as_str(), "no part template for instance");
                        continue;
                    };
                    placements.parts.push(Part::read(element, template)?);
                }
                "RemnantInfo" => placements.remnants.push(Remnant::read(element)?),
                other => debug!(kind = other, "skipping unknown instance element"),
            }
        }

        for part in &mut placements.parts {
            part.apply_placement()?;
        }

        debug!(
            parts = placements.parts.len(),
            remnants = placements.remnants.len(),
            "resolved placements"
        );
        Ok(placements)
    }
}
