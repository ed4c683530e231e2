//! Payload handlers wired into the dispatcher by the CLI

pub mod image;
pub mod steering;

pub use image::ImageInspector;
pub use steering::GroundSteeringPrinter;
