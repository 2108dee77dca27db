// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  nestinfo.rs - Summary printer for NXL nest files.
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

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nxlreader::decoder::*;
use nxlreader::nest::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to read.
    file: String,

    /// Print the full decoded structure instead of a summary.
    #[arg(long)]
    dump: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let decoded = match DecodedNestFile::from_filename(&args.file) {
        Ok(nf) => nf,
        Err(error) => {
            eprintln!("Error opening file {:?}: {:?}", &args.file, error);
            return;
        }
    };

    let nest = match Nest::from_decoded(&decoded) {
        Ok(nest) => nest,
        Err(error) => {
            eprintln!("Error parsing file {:?}: {:?}", &args.file, error);
            return;
        }
    };

    if args.dump {
        println!("{:#?}", nest);
        return;
    }

    let now = chrono::Utc::now();
    println!("Nest report for {} ({})", args.file, now.format("%Y-%m-%d %H:%M"));

    if let Some(machine) = &nest.machine {
        println!(
            "  Machine: {} / {}",
            machine.name.as_deref().unwrap_or("-"),
            machine.technology.as_deref().unwrap_or("-")
        );
    }
    if let Some(plate) = &nest.plate {
        println!(
            "  Plate: {} profiles, material {}",
            plate.profiles.len(),
            plate.material.as_deref().unwrap_or("-")
        );
    }

    println!("  Part templates: {}", nest.templates().parts().len());
    println!("  Parts: {}", nest.parts.len());
    println!("  Remnants: {}", nest.remnants.len());
    println!("  Annotations: {}", nest.dimension_line_annotations.len());
    println!("  Texts: {}", nest.texts.len());
    println!("  Text symbols: {}", nest.text_symbols_count());
    println!("  Bridges: {}", nest.bridges_count());
    println!("  Ridges: {}", nest.ridges_count());

    match nest.bounding_box() {
        Some(bbox) => println!(
            "  Bounding box: {}x{} at ({}, {})",
            bbox.width, bbox.height, bbox.x, bbox.y
        ),
        None => println!("  Bounding box: empty"),
    }
}
