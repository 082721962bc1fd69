// Shared helpers: byte packing, text fields, time formatting
pub mod encoding;
pub mod io;
pub mod time;
