//! The codec between a space race record's stored flag fields and a
//! [`PixelGrid`].
//!
//! Galacticraft has written flags in two layouts. The old one stores one
//! signed byte per channel per pixel under `Color{R,G,B}-X{x}-Y{y}` keys,
//! sized by `FlagWidth`/`FlagHeight`. Newer versions pack a whole row into
//! one `FRow{y}` int array, one 32-bit element per pixel, sized by
//! `FWidth`/`FHeight`. Decoding accepts either; encoding only ever produces
//! the packed form.
//!
//! In both layouts a stored byte in `[-128, 127]` stands for the display
//! value `stored + 128`. The shift is exact two's-complement wraparound at
//! the 128 boundary, not a clamp, and it is its own inverse.

use quartz_nbt::NbtCompound;

use crate::{error::Error, grid::PixelGrid};

/// Which on-disk pixel layout a record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One packed 32-bit element per pixel, one `FRow{y}` array per row.
    ModernRows,
    /// One signed byte per channel per pixel.
    LegacyPixels,
}

impl Layout {
    /// Determine the layout from the dimension fields present in a record.
    ///
    /// Presence of `FWidth` wins over `FlagWidth`, so a record that has been
    /// re-encoded next to stale legacy fields reads as packed. Detection
    /// says nothing about the pixel fields themselves; the decoder checks
    /// every one of those.
    pub fn detect(record: &NbtCompound) -> Result<Self, Error> {
        if record.contains_key("FWidth") {
            Ok(Layout::ModernRows)
        } else if record.contains_key("FlagWidth") {
            Ok(Layout::LegacyPixels)
        } else {
            Err(Error::MalformedRecord(
                "record carries neither flag layout".into(),
            ))
        }
    }
}

/// The canvas dimensions a record declares, from whichever layout is
/// present, or `None` when it has no flag at all.
pub fn declared_size(record: &NbtCompound) -> Result<Option<(u32, u32)>, Error> {
    match Layout::detect(record) {
        Ok(layout) => dimensions(record, layout).map(Some),
        Err(_) => Ok(None),
    }
}

/// Decode a record's stored flag into a pixel grid.
///
/// Works on either layout and never mutates the record. Any missing or
/// undersized pixel field for the declared dimensions is a
/// [`Error::MalformedRecord`]; missing data is never read as black.
pub fn decode(record: &NbtCompound) -> Result<PixelGrid, Error> {
    let layout = Layout::detect(record)?;
    let (width, height) = dimensions(record, layout)?;

    match layout {
        Layout::ModernRows => decode_rows(record, width, height),
        Layout::LegacyPixels => decode_pixels(record, width, height),
    }
}

/// Encode a pixel grid into a record, always in the packed-row layout.
///
/// A record that already declares dimensions (in either layout) must match
/// the grid exactly, otherwise [`Error::DimensionMismatch`] is returned and
/// the record is left untouched. Stale legacy channel fields are not
/// deleted; `FWidth` takes precedence on the next decode, so nothing reads
/// them again.
pub fn encode(record: &mut NbtCompound, grid: &PixelGrid) -> Result<(), Error> {
    if let Some(expected) = declared_size(record)? {
        let actual = (grid.width(), grid.height());
        if expected != actual {
            return Err(Error::DimensionMismatch { expected, actual });
        }
    }

    record.insert("FWidth", grid.width() as i32);
    record.insert("FHeight", grid.height() as i32);
    for y in 0..grid.height() {
        let row: Vec<i32> = (0..grid.width()).map(|x| pack(grid.pixel(x, y))).collect();
        record.insert(format!("FRow{y}"), row);
    }

    Ok(())
}

fn dimensions(record: &NbtCompound, layout: Layout) -> Result<(u32, u32), Error> {
    let (width_key, height_key) = match layout {
        Layout::ModernRows => ("FWidth", "FHeight"),
        Layout::LegacyPixels => ("FlagWidth", "FlagHeight"),
    };

    let width: i32 = record
        .get(width_key)
        .map_err(|_| Error::MalformedRecord(format!("missing or non-integer {width_key}")))?;
    let height: i32 = record
        .get(height_key)
        .map_err(|_| Error::MalformedRecord(format!("missing or non-integer {height_key}")))?;

    if width < 1 || height < 1 {
        return Err(Error::MalformedRecord(format!(
            "non-positive flag dimensions {width}x{height}"
        )));
    }

    Ok((width as u32, height as u32))
}

fn decode_rows(record: &NbtCompound, width: u32, height: u32) -> Result<PixelGrid, Error> {
    let mut grid = PixelGrid::new(width, height);

    for y in 0..height {
        let key = format!("FRow{y}");
        let row: &[i32] = record
            .get(key.as_str())
            .map_err(|_| Error::MalformedRecord(format!("missing row array {key}")))?;
        if row.len() < width as usize {
            return Err(Error::MalformedRecord(format!(
                "row {y} holds {} of {width} pixels",
                row.len()
            )));
        }

        for x in 0..width {
            grid.set_pixel(x, y, unpack(row[x as usize]));
        }
    }

    Ok(grid)
}

fn decode_pixels(record: &NbtCompound, width: u32, height: u32) -> Result<PixelGrid, Error> {
    let mut grid = PixelGrid::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mut triple = [0u8; 3];
            for (channel, value) in ["R", "G", "B"].iter().zip(triple.iter_mut()) {
                let key = format!("Color{channel}-X{x}-Y{y}");
                let stored: i8 = record
                    .get(key.as_str())
                    .map_err(|_| Error::MalformedRecord(format!("missing channel field {key}")))?;
                *value = (stored as u8).wrapping_add(128);
            }
            grid.set_pixel(x, y, triple);
        }
    }

    Ok(grid)
}

/// Unpack one packed element into a display triple. The stored bytes sit at
/// bits 16–23, 8–15 and 0–7 for R, G and B.
fn unpack(element: i32) -> [u8; 3] {
    [
        ((element >> 16) as u8).wrapping_add(128),
        ((element >> 8) as u8).wrapping_add(128),
        (element as u8).wrapping_add(128),
    ]
}

/// Pack a display triple into one element, shifting each channel back into
/// its stored form first.
fn pack([r, g, b]: [u8; 3]) -> i32 {
    ((r.wrapping_sub(128) as i32) << 16)
        | ((g.wrapping_sub(128) as i32) << 8)
        | (b.wrapping_sub(128) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_grid(width: u32, height: u32) -> PixelGrid {
        PixelGrid::from_fn(width, height, |x, y| {
            [
                (x * 13 % 256) as u8,
                (y * 29 % 256) as u8,
                ((x + y) * 7 % 256) as u8,
            ]
        })
    }

    fn modern_record(grid: &PixelGrid) -> NbtCompound {
        let mut record = NbtCompound::new();
        encode(&mut record, grid).unwrap();
        record
    }

    fn legacy_record(grid: &PixelGrid) -> NbtCompound {
        let mut record = NbtCompound::new();
        record.insert("FlagWidth", grid.width() as i32);
        record.insert("FlagHeight", grid.height() as i32);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let [r, g, b] = grid.pixel(x, y);
                record.insert(format!("ColorR-X{x}-Y{y}"), r.wrapping_sub(128) as i8);
                record.insert(format!("ColorG-X{x}-Y{y}"), g.wrapping_sub(128) as i8);
                record.insert(format!("ColorB-X{x}-Y{y}"), b.wrapping_sub(128) as i8);
            }
        }
        record
    }

    #[test]
    fn round_trip_is_exact() {
        let grid = checker_grid(20, 14);

        assert_eq!(decode(&modern_record(&grid)).unwrap(), grid);
    }

    #[test]
    fn single_pixel_round_trips() {
        let grid = PixelGrid::from_fn(1, 1, |_, _| [7, 200, 0]);

        assert_eq!(decode(&modern_record(&grid)).unwrap(), grid);
    }

    #[test]
    fn legacy_and_modern_decode_identically() {
        let grid = checker_grid(6, 4);

        assert_eq!(
            decode(&legacy_record(&grid)).unwrap(),
            decode(&modern_record(&grid)).unwrap(),
        );
    }

    #[test]
    fn channel_boundaries_use_twos_complement_fold() {
        let grid = PixelGrid::from_fn(1, 1, |_, _| [0, 255, 128]);
        let record = modern_record(&grid);

        let row: &[i32] = record.get("FRow0").unwrap();
        assert_eq!((row[0] >> 16) as i8, -128);
        assert_eq!((row[0] >> 8) as i8, 127);
        assert_eq!(row[0] as i8, 0);

        assert_eq!(decode(&record).unwrap(), grid);
    }

    #[test]
    fn encode_packs_shifted_bytes() {
        let grid = PixelGrid::from_fn(1, 1, |_, _| [255, 0, 128]);
        let record = modern_record(&grid);

        let row: &[i32] = record.get("FRow0").unwrap();
        assert_eq!(row[0], 0x7F8000);
        assert_eq!(record.get::<_, i32>("FWidth").unwrap(), 1);
        assert_eq!(record.get::<_, i32>("FHeight").unwrap(), 1);
    }

    #[test]
    fn missing_row_is_malformed() {
        let mut record = NbtCompound::new();
        record.insert("FWidth", 2i32);
        record.insert("FHeight", 2i32);
        record.insert("FRow0", vec![0i32, 0]);

        assert!(matches!(
            decode(&record),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn short_row_is_malformed() {
        let mut record = NbtCompound::new();
        record.insert("FWidth", 3i32);
        record.insert("FHeight", 1i32);
        record.insert("FRow0", vec![0i32, 0]);

        assert!(matches!(
            decode(&record),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn missing_legacy_channel_is_malformed() {
        let grid = PixelGrid::new(1, 1);
        let mut record = legacy_record(&grid);
        record.insert("FlagWidth", 2i32);

        assert!(matches!(
            decode(&record),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn absent_layouts_are_malformed_not_black() {
        assert!(matches!(
            decode(&NbtCompound::new()),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn non_positive_dimensions_are_malformed() {
        let mut record = NbtCompound::new();
        record.insert("FWidth", 0i32);
        record.insert("FHeight", 14i32);

        assert!(matches!(
            decode(&record),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn encode_rejects_mismatched_grid() {
        let mut record = modern_record(&checker_grid(4, 4));
        let before = record.clone();

        let result = encode(&mut record, &checker_grid(3, 3));
        assert!(matches!(
            result,
            Err(Error::DimensionMismatch {
                expected: (4, 4),
                actual: (3, 3),
            })
        ));

        // The failed encode must not have touched the record.
        assert_eq!(record, before);
    }

    #[test]
    fn encode_respects_legacy_declared_size() {
        let mut record = legacy_record(&checker_grid(4, 2));

        let result = encode(&mut record, &checker_grid(2, 4));
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn encode_migrates_legacy_without_deleting_it() {
        let grid = checker_grid(5, 3);
        let mut record = legacy_record(&grid);

        encode(&mut record, &grid).unwrap();

        // Stale legacy fields stay, packed fields win on the next read.
        assert!(record.contains_key("ColorR-X0-Y0"));
        assert_eq!(Layout::detect(&record).unwrap(), Layout::ModernRows);
        assert_eq!(decode(&record).unwrap(), grid);
    }

    #[test]
    fn encode_leaves_other_fields_untouched() {
        let grid = checker_grid(2, 2);
        let mut record = modern_record(&grid);
        record.insert("TeamName", "Rocketeers");
        record.insert("SpaceRaceID", 7i32);
        record.insert("TicksSpent", 987_654i64);
        record.insert("teamColorR", 0.25f64);

        encode(&mut record, &checker_grid(2, 2)).unwrap();

        assert_eq!(record.get::<_, &str>("TeamName").unwrap(), "Rocketeers");
        assert_eq!(record.get::<_, i32>("SpaceRaceID").unwrap(), 7);
        assert_eq!(record.get::<_, i64>("TicksSpent").unwrap(), 987_654);
        assert_eq!(record.get::<_, f64>("teamColorR").unwrap(), 0.25);
    }
}
