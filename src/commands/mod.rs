pub mod inspect;
pub mod run;

pub use inspect::handle_inspect;
pub use run::handle_run;
