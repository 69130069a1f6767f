mod programs;
pub use programs::*;

mod seeds;
pub use seeds::*;

mod metadata_layout;
pub use metadata_layout::*;

mod client;
pub use client::*;
