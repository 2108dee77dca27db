// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/decoder.rs - Decoder for compressed NXL nest containers
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

use std::fs::File;
use std::io::BufReader;
use std::io::prelude::*;
use std::path::Path;

use flate2::read::{GzDecoder, ZlibDecoder};
use tracing::debug;

use crate::error::{NestError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZLIB_CMF: u8 = 0x78;
const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Gzip,
    Zlib,
}

impl Container {
    fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(&GZIP_MAGIC) {
            Some(Self::Gzip)
        } else if data.len() >= 2
            && data[0] == ZLIB_CMF
            && u16::from_be_bytes([data[0], data[1]]) % 31 == 0
        {
            Some(Self::Zlib)
        } else {
            None
        }
    }
}

fn decompress(container: Container, data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(data.len() * 4);
    match container {
        Container::Gzip => GzDecoder::new(data).read_to_end(&mut buffer)?,
        Container::Zlib => ZlibDecoder::new(data).read_to_end(&mut buffer)?,
    };
    Ok(buffer)
}

/// The inflated XML text of a nest file.
#[derive(Debug)]
pub struct DecodedNestFile {
    pub content: String,
}

impl DecodedNestFile {
    /// Reads and inflates the container at `filename`.
    ///
    /// The file handle is only held for the duration of the read.
    pub fn from_filename(filename: impl AsRef<Path>) -> Result<Self> {
        let path = filename.as_ref();
        let io_error = |source| NestError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_error)?;
        let mut reader = BufReader::new(file);

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).map_err(io_error)?;

        let container = Container::detect(&buffer).ok_or_else(|| NestError::UnknownContainer {
            path: path.to_path_buf(),
        })?;
        debug!(?path, ?container, compressed = buffer.len(), "inflating nest file");

        let inflated = decompress(container, &buffer).map_err(|source| NestError::Decompress {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_bytes(inflated)
    }

    /// Wraps already inflated document bytes.
    pub fn from_bytes(inflated: Vec<u8>) -> Result<Self> {
        let mut content = String::from_utf8(inflated)?;
        if content.starts_with(BYTE_ORDER_MARK) {
            content.drain(..BYTE_ORDER_MARK.len_utf8());
        }
        Ok(Self { content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_gzip_and_zlib_headers() {
        assert_eq!(Container::detect(&[0x1f, 0x8b, 0x08]), Some(Container::Gzip));
        assert_eq!(Container::detect(&[0x78, 0x9c]), Some(Container::Zlib));
        assert_eq!(Container::detect(&[0x78, 0x00]), None);
        assert_eq!(Container::detect(b"<NestFile/>"), None);
        assert_eq!(Container::detect(&[]), None);
    }

    #[test]
    fn strips_byte_order_mark() {
        let bytes = "\u{feff}<NestFile/>".as_bytes().to_vec();
        let decoded = DecodedNestFile::from_bytes(bytes).unwrap();
        assert_eq!(decoded.content, "<NestFile/>");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = DecodedNestFile::from_bytes(vec![0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, NestError::Encoding(_)));
    }
}
