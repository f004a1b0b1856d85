use std::fmt;

use crate::io::byte_order::ByteOrder;
use crate::tiff::ifd::IFD;

/// Parsed structure of a TIFF or BigTIFF file, without pixel data
#[derive(Debug)]
pub struct TIFF {
    /// Every IFD of the chain, in file order
    pub ifds: Vec<IFD>,
    pub is_big_tiff: bool,
    pub byte_order: ByteOrder,
}

impl TIFF {
    pub fn new(is_big_tiff: bool, byte_order: ByteOrder) -> Self {
        TIFF { ifds: Vec::new(), is_big_tiff, byte_order }
    }

    /// The scan itself
    ///
    /// Some scanner drivers write a thumbnail first. The first IFD not
    /// flagged as reduced resolution is taken, else the first IFD.
    pub fn main_ifd(&self) -> Option<&IFD> {
        let mut candidates = self.ifds.iter();
        candidates.find(|ifd| !ifd.is_reduced_resolution()).or(self.ifds.first())
    }

    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }
}

impl fmt::Display for TIFF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = match self.is_big_tiff {
            true => "BigTIFF",
            false => "TIFF",
        };
        writeln!(f, "{}, {}, {} IFD(s)", format, self.byte_order.name(), self.ifd_count())?;
        match self.main_ifd() {
            Some(ifd) => write!(f, "{}", ifd),
            None => Ok(()),
        }
    }
}
