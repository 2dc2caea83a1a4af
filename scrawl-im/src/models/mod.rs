//! Import engine models

pub mod legacy;

pub use legacy::{
    LegacyCharacter, LegacyCollection, LegacyLocation, LegacyProject, LegacyScene, LegacyText,
    LegacyVersion,
};
