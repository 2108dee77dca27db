// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/nest.rs - Aggregated view of a decoded nest file
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

use std::path::Path;

use roxmltree::Document;
use tracing::debug;

use crate::decoder::DecodedNestFile;
use crate::error::{NestError, Result};
use crate::geometry::{Extents, Rectangle};
use crate::interpreter::{Part, Placements, Remnant, Template, TemplateLibrary};
use crate::parser::{
    Bridge, DimensionLineAnnotation, Machine, Plate, TextProfile, child, read_annotations,
    read_bridges, read_texts, required_child,
};

/// A fully decoded cutting plan.
#[derive(Debug, Default)]
pub struct Nest {
    /// The target machine. `None` only for a nest that was never read.
    pub machine: Option<Machine>,
    pub plate: Option<Plate>,
    /// Placed parts, in document order.
    pub parts: Vec<Part>,
    /// Placed remnants, in document order.
    pub remnants: Vec<Remnant>,
    pub dimension_line_annotations: Vec<DimensionLineAnnotation>,
    /// Free texts placed directly on the sheet.
    pub texts: Vec<TextProfile>,
    pub bridges: Vec<Bridge>,
    templates: TemplateLibrary,
}

impl Nest {
    /// Reads the nest file at `filename`.
    ///
    /// A path that does not name an existing file yields an empty nest.
    pub fn read(filename: impl AsRef<Path>) -> Result<Self> {
        let path = filename.as_ref();
        if !path.is_file() {
            debug!(?path, "nest file does not exist");
            return Ok(Self::default());
        }

        let decoded = DecodedNestFile::from_filename(path)?;
        Self::from_decoded(&decoded)
    }

    pub fn from_decoded(decoded: &DecodedNestFile) -> Result<Self> {
        let doc = Document::parse(&decoded.content)?;
        Self::from_document(&doc)
    }

    /// Builds the nest from a parsed `<NestFile>` document.
    pub fn from_document(doc: &Document) -> Result<Self> {
        let root = doc.root_element();
        if root.tag_name().name() != "NestFile" {
            return Err(NestError::UnexpectedRoot {
                found: root.tag_name().name().to_string(),
            });
        }
        let nest = required_child(root, "Nest")?;

        let machine = child(nest, "Machine").map(Machine::read).unwrap_or_default();

        let plate = match child(nest, "Sheets") {
            Some(sheets) => Plate::read_sheets(sheets)?,
            None => None,
        };

        let templates = TemplateLibrary::read(required_child(nest, "OriginalParts")?)?;
        let Placements { parts, remnants } =
            Placements::resolve(required_child(nest, "PartInfos")?, &templates)?;

        let dimension_line_annotations = read_annotations(required_child(nest, "Annotations")?)?;
        let texts = read_texts(required_child(nest, "Texts")?)?;
        let bridges = read_bridges(required_child(nest, "Bridges")?)?;

        debug!(
            parts = parts.len(),
            remnants = remnants.len(),
            annotations = dimension_line_annotations.len(),
            texts = texts.len(),
            bridges = bridges.len(),
            "decoded nest"
        );

        Ok(Self {
            machine: Some(machine),
            plate,
            parts,
            remnants,
            dimension_line_annotations,
            texts,
            bridges,
            templates,
        })
    }

    /// The template library the parts were resolved against.
    pub fn templates(&self) -> &TemplateLibrary {
        &self.templates
    }

    /// Remnant templates from `<OriginalParts>`.
    pub fn original_remnants(&self) -> &[Template] {
        self.templates.remnants()
    }

    /// Characters, excluding spaces, across the texts of every part
    /// template.
    pub fn text_symbols_count(&self) -> usize {
        self.templates
            .parts()
            .iter()
            .flat_map(|template| &template.texts)
            .map(TextProfile::symbols_count)
            .sum()
    }

    pub fn bridges_count(&self) -> usize {
        self.bridges.len()
    }

    pub fn ridges_count(&self) -> u64 {
        self.parts.iter().map(Part::ridges_count).sum()
    }

    /// The integer bounding box of all plate, remnant and part geometry and
    /// of the free text reference points.
    ///
    /// Returns `None` when there is nothing to measure.
    pub fn bounding_box(&self) -> Option<Rectangle> {
        let mut extents = Extents::default();

        let plate = self.plate.iter().flat_map(|plate| &plate.profiles);
        let remnants = self.remnants.iter().flat_map(|remnant| &remnant.profiles);
        let original_remnants = self
            .original_remnants()
            .iter()
            .flat_map(|remnant| &remnant.profiles);
        let parts = self.parts.iter().flat_map(|part| &part.profiles);

        plate
            .chain(remnants)
            .chain(original_remnants)
            .chain(parts)
            .flat_map(|profile| &profile.geometry)
            .for_each(|geometry| extents.include_geometry(geometry));

        for text in &self.texts {
            extents.include(text.reference_point);
        }

        if extents.is_empty() {
            debug!("no geometry to measure");
            return None;
        }
        extents.to_rectangle()
    }
}
