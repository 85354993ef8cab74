pub mod enums;
pub mod patient;
pub mod species;
pub mod vital_sign;

pub use enums::*;
pub use patient::*;
pub use species::*;
pub use vital_sign::*;
