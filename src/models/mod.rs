pub mod city;
pub mod location;

pub use city::{CityMoodRecord, MoodSample, Theme};
pub use location::{Coordinate, LocationFix, LocationRecord, Region};
