use std::path::Path;

use gcflag::FitMode;
use text_io::read;

pub enum Assume {
    Yes,
    No,
}

/// clap value parser for `--mode`.
pub fn fit_mode(s: &str) -> Result<FitMode, String> {
    s.parse::<FitMode>().map_err(|err| err.to_string())
}

pub fn mode_description(mode: FitMode) -> &'static str {
    match mode {
        FitMode::Stretch => "stretch (fill target size)",
        FitMode::Pad => "pad (preserve aspect ratio, black background)",
    }
}

pub fn exists_decision<P: AsRef<Path>>(place: &str, action: &str, path: &P, assume: Option<Assume>) -> bool {
    let path = path.as_ref();

    match assume {
        Some(Assume::Yes) => return true,
        Some(Assume::No) => return false,
        None => (),
    }

    print!("{place} file {path:?} already exists. {action}? [y/N] ");

    let opt: String = read!("{}\n");

    opt.to_lowercase() == "y"
}
