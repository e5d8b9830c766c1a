mod conanfile;
mod inspect;
mod resolve;
mod settings;

pub use conanfile::cmd_conanfile;
pub use inspect::cmd_inspect;
pub use resolve::cmd_resolve;
pub use settings::cmd_settings;
