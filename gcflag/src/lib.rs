//! gcflag reads and writes the flag bitmaps that Galacticraft keeps for each
//! space race team inside a Minecraft world save. Flags are stored as NBT
//! fields in `data/GCSpaceRaceData.dat`, in one of two layouts: an old
//! one-scalar-per-channel-per-pixel form, and the packed one-array-per-row
//! form newer versions write. This crate decodes either layout into an RGB
//! pixel grid, fits arbitrary images onto the flag canvas, and always writes
//! flags back in the packed form.
//!
//! If you're looking for a tool rather than a library, the `gcflag_tools`
//! crate wraps all of this in a command line interface.
//!
//! # Example
//! ## Exporting a flag
//! ```no_run
//! let save = gcflag::SpaceRaceData::open("my_world")?;
//!
//! let flag = save.race(0)?.flag()?;
//! flag.to_image().save("flag.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Replacing a flag with an external image
//! ```no_run
//! use gcflag::{fit, FitMode, PixelGrid};
//!
//! let mut save = gcflag::SpaceRaceData::open("my_world")?;
//!
//! let source = PixelGrid::from_image(&image::open("banner.png")?.into_rgb8());
//! let (width, height) = save.race(0)?.flag_size().ok_or("race has no flag")?;
//! let fitted = fit(&source, width, height, FitMode::Pad)?;
//!
//! save.race_mut(0)?.set_flag(&fitted)?;
//! save.save()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod fit;
pub mod flag;
pub mod grid;
pub mod race;
pub mod savefile;

// ----------------------- //
// INLINED USEFUL FEATURES //
// ----------------------- //
#[doc(inline)]
pub use error::Error;

#[doc(inline)]
pub use fit::{fit, FitMode};

#[doc(inline)]
pub use grid::PixelGrid;

#[doc(inline)]
pub use race::SpaceRace;

#[doc(inline)]
pub use savefile::SpaceRaceData;
