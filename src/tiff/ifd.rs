//! Image File Directories
//!
//! Film scans normally carry a single IFD. The whole chain is still kept
//! so that thumbnails written ahead of the scan can be recognised.

use std::collections::BTreeMap;
use std::fmt;
use log::trace;

use crate::tiff::constants::{field_types, tags};
use crate::utils::tag_utils;

/// One tag of an IFD
///
/// When the values fit into the entry, `value_offset` holds the first of
/// them and `inline_values` all of them. Otherwise `value_offset` points
/// at the value array in the file.
#[derive(Debug, Clone)]
pub struct IFDEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u64,
    pub value_offset: u64,
    pub inline_values: Vec<u64>,
}

impl IFDEntry {
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64) -> Self {
        IFDEntry { tag, field_type, count, value_offset, inline_values: Vec::new() }
    }

    pub fn with_inline_values(self, values: Vec<u64>) -> Self {
        IFDEntry {
            value_offset: values.first().copied().unwrap_or(self.value_offset),
            inline_values: values,
            ..self
        }
    }

    /// Inline values; a single-valued entry built without them yields
    /// `value_offset`
    pub fn inline_values(&self) -> Vec<u64> {
        match (self.inline_values.is_empty(), self.count) {
            (true, 1) => vec![self.value_offset],
            _ => self.inline_values.clone(),
        }
    }

    pub fn is_rational(&self) -> bool {
        self.field_type == field_types::RATIONAL || self.field_type == field_types::SRATIONAL
    }

    /// One-line summary used by `--inspect` and the trace log
    pub fn description(&self) -> String {
        let value = match self.tag {
            tags::COMPRESSION =>
                format!("{} ({})", self.value_offset, tag_utils::get_compression_name(self.value_offset)),
            tags::PHOTOMETRIC_INTERPRETATION =>
                format!("{} ({})", self.value_offset, tag_utils::get_photometric_name(self.value_offset)),
            _ => self.value_offset.to_string(),
        };
        format!("{:<28} {:>9} x{:<6} {}",
                format!("{} ({})", tag_utils::get_tag_name(self.tag), self.tag),
                tag_utils::get_field_type_name(self.field_type),
                self.count,
                value)
    }
}

/// A tag table, in file order, with lookup by tag
#[derive(Debug, Clone)]
pub struct IFD {
    pub entries: Vec<IFDEntry>,
    /// Position in the chain, 0 for the first IFD
    pub number: usize,
    /// File offset of the entry count
    pub offset: u64,
    by_tag: BTreeMap<u16, usize>,
}

impl IFD {
    pub fn new(number: usize, offset: u64) -> Self {
        IFD { entries: Vec::new(), number, offset, by_tag: BTreeMap::new() }
    }

    /// Appends an entry; a repeated tag shadows the earlier one on lookup
    pub fn add_entry(&mut self, entry: IFDEntry) {
        trace!("IFD #{} += {}", self.number, entry.description());
        self.by_tag.insert(entry.tag, self.entries.len());
        self.entries.push(entry);
    }

    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.by_tag.get(&tag).map(|&index| &self.entries[index])
    }

    /// First value of a tag, or its value offset when stored out of line
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        self.get_entry(tag).map(|entry| entry.value_offset)
    }

    pub fn has_tag(&self, tag: u16) -> bool {
        self.by_tag.contains_key(&tag)
    }

    /// `(width, height)` when both tags are present
    pub fn get_dimensions(&self) -> Option<(u64, u64)> {
        Some((self.get_tag_value(tags::IMAGE_WIDTH)?, self.get_tag_value(tags::IMAGE_LENGTH)?))
    }

    pub fn get_samples_per_pixel(&self) -> u64 {
        self.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    pub fn is_tiled(&self) -> bool {
        self.has_tag(tags::TILE_WIDTH) && self.has_tag(tags::TILE_LENGTH)
    }

    /// NewSubfileType bit 0: this IFD is a thumbnail of another one
    pub fn is_reduced_resolution(&self) -> bool {
        self.get_tag_value(tags::NEW_SUBFILE_TYPE).is_some_and(|kind| kind & 1 == 1)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IFD #{} at offset {}, {} entries", self.number, self.offset, self.entries.len())?;
        if self.is_reduced_resolution() {
            write!(f, " (thumbnail)")?;
        }
        writeln!(f)?;
        if let Some((width, height)) = self.get_dimensions() {
            writeln!(f, "  Dimensions: {}x{}", width, height)?;
        }
        writeln!(f, "  Samples per pixel: {}", self.get_samples_per_pixel())?;
        for entry in &self.entries {
            writeln!(f, "    {}", entry.description())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_entry_wins_lookup() {
        let mut ifd = IFD::new(0, 8);
        ifd.add_entry(IFDEntry::new(tags::IMAGE_WIDTH, field_types::SHORT, 1, 10));
        ifd.add_entry(IFDEntry::new(tags::IMAGE_WIDTH, field_types::SHORT, 1, 20));
        assert_eq!(ifd.get_tag_value(tags::IMAGE_WIDTH), Some(20));
        assert_eq!(ifd.entry_count(), 2);
    }

    #[test]
    fn dimensions_need_both_tags() {
        let mut ifd = IFD::new(0, 8);
        ifd.add_entry(IFDEntry::new(tags::IMAGE_WIDTH, field_types::LONG, 1, 640));
        assert_eq!(ifd.get_dimensions(), None);
        ifd.add_entry(IFDEntry::new(tags::IMAGE_LENGTH, field_types::LONG, 1, 480));
        assert_eq!(ifd.get_dimensions(), Some((640, 480)));
        assert_eq!(ifd.get_samples_per_pixel(), 1);
    }

    #[test]
    fn inline_values_replace_the_raw_field() {
        let entry = IFDEntry::new(tags::BITS_PER_SAMPLE, field_types::SHORT, 3, 0)
            .with_inline_values(vec![16, 16, 16]);
        assert_eq!(entry.value_offset, 16);
        assert_eq!(entry.inline_values(), vec![16, 16, 16]);
    }
}
