use quartz_nbt::{NbtCompound, NbtList};

use crate::{error::Error, flag, grid::PixelGrid};

/// One team's entry in the `SpaceRaceList`, wrapped around its raw compound
/// so every field this crate does not understand survives a rewrite
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceRace {
    nbt: NbtCompound,
}

impl SpaceRace {
    pub fn from_nbt(nbt: NbtCompound) -> Self {
        Self { nbt }
    }

    pub fn as_nbt(&self) -> &NbtCompound {
        &self.nbt
    }

    pub fn into_nbt(self) -> NbtCompound {
        self.nbt
    }

    pub fn team_name(&self) -> &str {
        self.nbt.get::<_, &str>("TeamName").unwrap_or("Unnamed")
    }

    pub fn space_race_id(&self) -> i32 {
        self.nbt.get::<_, i32>("SpaceRaceID").unwrap_or(0)
    }

    /// Elapsed game ticks, whatever the game decided those mean.
    pub fn ticks_spent(&self) -> i64 {
        self.nbt.get::<_, i64>("TicksSpent").unwrap_or(0)
    }

    /// The team accent color as unit-range RGB.
    pub fn team_color(&self) -> [f64; 3] {
        ["teamColorR", "teamColorG", "teamColorB"]
            .map(|key| self.nbt.get::<_, f64>(key).unwrap_or(0.5))
    }

    pub fn players(&self) -> Vec<String> {
        let Ok(list) = self.nbt.get::<_, &NbtList>("PlayerList") else {
            return Vec::new();
        };
        list.iter_map::<&NbtCompound>()
            .filter_map(Result::ok)
            .filter_map(|entry| entry.get::<_, &str>("PlayerName").ok())
            .map(str::to_owned)
            .collect()
    }

    /// Visited celestial bodies and the tick count each one took.
    pub fn celestial_bodies(&self) -> Vec<(String, i32)> {
        let Ok(list) = self.nbt.get::<_, &NbtList>("CelestialBodyList") else {
            return Vec::new();
        };
        list.iter_map::<&NbtCompound>()
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.get::<_, &str>("CelestialBodyName").ok()?;
                let time = entry.get::<_, i32>("TimeTaken").unwrap_or(0);
                Some((name.to_owned(), time))
            })
            .collect()
    }

    /// Declared flag canvas size, or `None` when no flag is stored.
    pub fn flag_size(&self) -> Option<(u32, u32)> {
        flag::declared_size(&self.nbt).ok().flatten()
    }

    /// Decode the stored flag.
    pub fn flag(&self) -> Result<PixelGrid, Error> {
        flag::decode(&self.nbt)
    }

    /// Replace the stored flag, writing the packed layout.
    pub fn set_flag(&mut self, grid: &PixelGrid) -> Result<(), Error> {
        flag::encode(&mut self.nbt, grid)
    }
}
