// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error types for NXL nest file decoding
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

use std::num::ParseIntError;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors that abort decoding of a nest file.
///
/// Recoverable conditions (unknown element kinds, unresolved template
/// references) are not represented here. They are reported through
/// `tracing` and decoding continues.
#[derive(Debug, Error)]
pub enum NestError {
    #[error("failed to read file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unrecognized container format in {path:?}")]
    UnknownContainer { path: PathBuf },
    #[error("failed to decompress {path:?}: {source}")]
    Decompress {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
    #[error("malformed document: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("unexpected root element <{found}>, expected <NestFile>")]
    UnexpectedRoot { found: String },
    #[error("<{parent}> is missing required element <{name}>")]
    MissingElement { parent: String, name: &'static str },
    #[error("<{element}> is missing required attribute {name:?}")]
    MissingAttribute { element: String, name: &'static str },
    #[error("invalid number {value:?}: {source}")]
    InvalidNumber {
        value: String,
        #[source]
        source: rust_decimal::Error,
    },
    #[error("invalid count {value:?}: {source}")]
    InvalidCount {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid arc direction {0:?}, expected \"CW\" or \"CCW\"")]
    InvalidDirection(String),
    #[error("<Matrix> must contain 9 coefficients, found {0}")]
    InvalidMatrix(usize),
    #[error("placing point ({x}, {y}) overflows the coordinate range")]
    CoordinateOverflow {
        x: rust_decimal::Decimal,
        y: rust_decimal::Decimal,
    },
}

pub type Result<T, E = NestError> = std::result::Result<T, E>;
