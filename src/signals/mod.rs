/**
* filename : mod
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

pub mod signal_types;
pub mod signal_analyzer;

pub use signal_types::*;
pub use signal_analyzer::*;
