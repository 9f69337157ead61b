//! Locating and (de)serializing the space race container,
//! `<world>/data/GCSpaceRaceData.dat`: a gzip-compressed NBT file whose
//! root holds a `data` compound with the `SpaceRaceList`.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use quartz_nbt::{
    io::{read_nbt, write_nbt, Flavor},
    NbtCompound, NbtList, NbtTag,
};

use crate::{error::Error, race::SpaceRace};

const DATA_FILE: &str = "GCSpaceRaceData.dat";

/// The on-disk space race container for one world save.
///
/// The root compound is kept verbatim apart from the race list itself, so a
/// rewrite preserves whatever else the game stored next to it.
pub struct SpaceRaceData {
    data_path: PathBuf,
    root: NbtCompound,
    root_name: String,
    races: Vec<SpaceRace>,
}

impl SpaceRaceData {
    /// Open the container under a world folder.
    ///
    /// A folder without a `level.dat` is rejected. A world that simply has
    /// no space race data yet opens as an empty container.
    pub fn open(world_dir: impl AsRef<Path>) -> Result<Self, Error> {
        let world_dir = world_dir.as_ref();
        if !world_dir.join("level.dat").is_file() {
            return Err(Error::NotAWorld(world_dir.to_path_buf()));
        }

        let data_path = world_dir.join("data").join(DATA_FILE);
        if !data_path.is_file() {
            let mut root = NbtCompound::new();
            root.insert("data", NbtCompound::new());
            return Ok(Self {
                data_path,
                root,
                root_name: String::new(),
                races: Vec::new(),
            });
        }

        let mut reader = BufReader::new(File::open(&data_path)?);
        let (root, root_name) = read_nbt(&mut reader, Flavor::GzCompressed)?;

        let races = root
            .get::<_, &NbtCompound>("data")
            .ok()
            .and_then(|data| data.get::<_, &NbtList>("SpaceRaceList").ok())
            .map(|list| {
                list.iter_map::<&NbtCompound>()
                    .filter_map(Result::ok)
                    .cloned()
                    .map(SpaceRace::from_nbt)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            data_path,
            root,
            root_name,
            races,
        })
    }

    /// Path of the data file this container was opened from.
    pub fn path(&self) -> &Path {
        &self.data_path
    }

    pub fn races(&self) -> &[SpaceRace] {
        &self.races
    }

    pub fn race(&self, index: usize) -> Result<&SpaceRace, Error> {
        self.races.get(index).ok_or(Error::NotFound(index))
    }

    pub fn race_mut(&mut self, index: usize) -> Result<&mut SpaceRace, Error> {
        self.races.get_mut(index).ok_or(Error::NotFound(index))
    }

    /// Write the container back to disk.
    ///
    /// An existing file is first copied to `GCSpaceRaceData.dat.backup`.
    /// The new contents go to a temporary sibling which is renamed over the
    /// original, so a crash mid-write never leaves a half-written container.
    pub fn save(&mut self) -> Result<(), Error> {
        let data_dir = self
            .data_path
            .parent()
            .ok_or_else(|| Error::Io(std::io::Error::other("data path has no parent")))?;
        fs::create_dir_all(data_dir)?;

        if self.data_path.is_file() {
            fs::copy(&self.data_path, self.data_path.with_extension("dat.backup"))?;
        }

        let list = NbtList::from(
            self.races
                .iter()
                .map(|race| NbtTag::Compound(race.as_nbt().clone()))
                .collect::<Vec<_>>(),
        );
        if !self.root.contains_key("data") {
            self.root.insert("data", NbtCompound::new());
        }
        let data = self
            .root
            .get_mut::<_, &mut NbtCompound>("data")
            .map_err(|_| {
                Error::MalformedRecord("save root's data entry is not a compound".into())
            })?;
        data.insert("SpaceRaceList", list);

        let tmp_path = self.data_path.with_extension("dat.tmp");
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        write_nbt(
            &mut writer,
            Some(self.root_name.as_str()),
            &self.root,
            Flavor::GzCompressed,
        )?;
        writer.flush()?;
        drop(writer);
        fs::rename(&tmp_path, &self.data_path)?;

        Ok(())
    }
}
