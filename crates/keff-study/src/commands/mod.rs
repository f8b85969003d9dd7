pub mod doctor;
pub mod extract;
pub mod preview;
pub mod restore;
pub mod sweep;
