// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Library for decoding NXL nest files
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
 * # `nxlreader` Crate
 *
 * A library for decoding the compressed, XML-structured nest files written
 * by sheet-cutting nesting engines.
 *
 * This crate provides a full pipeline for reading a nest file into a
 * geometric model:
 *
 * 1. [decoder]: Inflates the gzip (or zlib) container into XML text.
 * 2. [parser]: Decodes individual elements such as profiles, texts,
 *    annotations and bridges.
 * 3. [interpreter]: Builds the template library and resolves placed parts
 *    and remnants against it.
 * 4. [nest]: Drives the above in document order and computes counters and
 *    the bounding box.
 *
 * ## Usage Example
 *
 * ```no_run
 * use nxlreader::nest::Nest;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     // Decode the whole file
 *     let nest = Nest::read("example.nxl")?;
 *
 *     // Access resolved parts
 *     for part in &nest.parts {
 *         println!("Part with {} profiles", part.profiles.len());
 *     }
 *
 *     if let Some(bbox) = nest.bounding_box() {
 *         println!("{}x{} at ({}, {})", bbox.width, bbox.height, bbox.x, bbox.y);
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

pub mod decoder;
pub mod error;
pub mod geometry;
pub mod interpreter;
pub mod nest;
pub mod parser;

pub use error::{NestError, Result};
pub use nest::Nest;
