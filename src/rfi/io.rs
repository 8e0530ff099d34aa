// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read and write [`Rfi`] records in their binary layout.
//!
//! Each record is, in order and in the platform's native byte order:
//! `freq_avg` (f32), `freq_var` (f32), `sigma_avg` (f32), `numobs` (i32), then
//! the channel bit array (`ceil(num_chan / 8)` bytes) and the interval bit
//! array (`ceil(num_int / 8)` bytes). Neither the grid shape nor the number of
//! records is stored; the reader must supply both.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use super::{GridShape, Rfi, RfiReadError, RfiVector, RfiWriteError};

impl Rfi {
    /// Write this record.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), RfiWriteError> {
        self.write_record(writer, 0)
    }

    /// Read a single record for the given grid.
    pub fn read_from<R: Read>(reader: &mut R, grid: GridShape) -> Result<Rfi, RfiReadError> {
        let mut rfi = Rfi::try_new(grid)?;
        rfi.read_record(reader, 0, 1)?;
        Ok(rfi)
    }

    fn write_record<W: Write>(&self, writer: &mut W, record: usize) -> Result<(), RfiWriteError> {
        let numobs = i32::try_from(self.numobs).map_err(|_| RfiWriteError::NumObsOverflow {
            record,
            numobs: self.numobs,
        })?;
        writer.write_f32::<NativeEndian>(self.freq_avg)?;
        writer.write_f32::<NativeEndian>(self.freq_var)?;
        writer.write_f32::<NativeEndian>(self.sigma_avg)?;
        writer.write_i32::<NativeEndian>(numobs)?;
        writer.write_all(self.chans.as_bytes())?;
        writer.write_all(self.times.as_bytes())?;
        Ok(())
    }

    /// Overwrite this record with one read from `reader`. The bit arrays must
    /// already be sized for the grid being read.
    fn read_record<R: Read>(
        &mut self,
        reader: &mut R,
        record: usize,
        num_records: usize,
    ) -> Result<(), RfiReadError> {
        let truncated = |e: std::io::Error| match e.kind() {
            ErrorKind::UnexpectedEof => RfiReadError::Truncated {
                record,
                num_records,
            },
            _ => RfiReadError::IO(e),
        };

        self.freq_avg = reader.read_f32::<NativeEndian>().map_err(truncated)?;
        self.freq_var = reader.read_f32::<NativeEndian>().map_err(truncated)?;
        self.sigma_avg = reader.read_f32::<NativeEndian>().map_err(truncated)?;
        let numobs = reader.read_i32::<NativeEndian>().map_err(truncated)?;
        self.numobs =
            u32::try_from(numobs).map_err(|_| RfiReadError::NegativeNumObs { record, numobs })?;
        reader
            .read_exact(self.chans.as_bytes_mut())
            .map_err(truncated)?;
        reader
            .read_exact(self.times.as_bytes_mut())
            .map_err(truncated)?;
        Ok(())
    }
}

impl RfiVector {
    /// Write every live record, in order. The number of records written is
    /// [`RfiVector::len`]; it must be stored elsewhere by the caller.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), RfiWriteError> {
        for (i, rfi) in self.iter().enumerate() {
            rfi.write_record(writer, i)?;
        }
        Ok(())
    }

    /// Read exactly `num_rfi` records for the given grid. A stream that ends
    /// before all of the records are read is an error; trailing data is left
    /// unread.
    pub fn read_from<R: Read>(
        reader: &mut R,
        grid: GridShape,
        num_rfi: usize,
    ) -> Result<RfiVector, RfiReadError> {
        let mut rfis = RfiVector::with_slots(grid, num_rfi)?;
        for record in 0..num_rfi {
            let i = rfis.next_slot()?;
            rfis.slot_mut(i).read_record(reader, record, num_rfi)?;
        }
        Ok(rfis)
    }
}

/// Write the live records of `rfis` to a file.
pub fn write_rfi_file<P: AsRef<Path>>(file: P, rfis: &RfiVector) -> Result<(), RfiWriteError> {
    let file = file.as_ref();
    let mut writer = BufWriter::new(File::create(file)?);
    rfis.write_to(&mut writer)?;
    writer.flush()?;
    debug!("Wrote {} RFI records to {}", rfis.len(), file.display());
    Ok(())
}

/// Read `num_rfi` records for the given grid from a file.
pub fn read_rfi_file<P: AsRef<Path>>(
    file: P,
    grid: GridShape,
    num_rfi: usize,
) -> Result<RfiVector, RfiReadError> {
    let file = file.as_ref();
    let mut reader = BufReader::new(File::open(file)?);
    let rfis = RfiVector::read_from(&mut reader, grid, num_rfi)?;
    debug!("Read {} RFI records from {}", rfis.len(), file.display());
    Ok(rfis)
}
