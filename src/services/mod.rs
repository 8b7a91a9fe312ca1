pub mod language_model;
pub mod process;

pub use language_model::LanguageModelService;
pub use process::ProcessInvoker;
