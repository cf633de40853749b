pub mod group;
pub mod injector;
pub mod loader;
