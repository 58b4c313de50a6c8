// Library root: everything the `gridcast` binary needs to load a league,
// draft it with bots, and report the result.

pub mod bot;
pub mod cheatsheet;
pub mod config;
pub mod presets;
pub mod render;
pub mod runner;
