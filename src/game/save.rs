//! World save files
//!
//! Reads and writes the whole entity population through the text
//! format. The parser itself stays value-based (see `serial`); this
//! boundary wraps it with file I/O and a proper error enum so callers
//! get one `Result` to check.

use std::fs;
use std::path::Path;

use crate::serial::{Deserialize, Deserializer, Serialize, Serializer};

use super::world::World;

/// Error type for world save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    /// The file was read but is not a well-formed world document
    Malformed,
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Malformed => write!(f, "malformed world file"),
        }
    }
}

impl std::error::Error for SaveError {}

/// Write the world's population to a text file.
pub fn save_world<P: AsRef<Path>>(world: &World, path: P) -> Result<(), SaveError> {
    let mut s = Serializer::new();
    world.serialize(&mut s);
    fs::write(path.as_ref(), s.finish())?;
    Ok(())
}

/// Load a save file, appending its population to `world`.
///
/// Entities that cannot be placed (unknown kind, full pool) are
/// dropped with a warning rather than failing the load.
pub fn load_world<P: AsRef<Path>>(world: &mut World, path: P) -> Result<(), SaveError> {
    let text = fs::read_to_string(path.as_ref())?;
    let mut d = Deserializer::new(&text);
    if !world.deserialize(&mut d) {
        return Err(SaveError::Malformed);
    }
    log::debug!("loaded {} entities from {:?}", world.count(), path.as_ref());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::EntityKind;

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.save");

        let mut world = World::new();
        let h = world.create(EntityKind::Player);
        world.get_mut(h).unwrap().sprite = 9;
        save_world(&world, &path).unwrap();

        let mut loaded = World::new();
        load_world(&mut loaded, &path).unwrap();
        assert_eq!(loaded.count(), 1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut world = World::new();
        let err = load_world(&mut world, dir.path().join("nope.save")).unwrap_err();
        assert!(matches!(err, SaveError::Io(_)));
    }

    #[test]
    fn test_load_garbage_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.save");
        std::fs::write(&path, "this is not a world file").unwrap();

        let mut world = World::new();
        let err = load_world(&mut world, &path).unwrap_err();
        assert!(matches!(err, SaveError::Malformed));
    }
}
