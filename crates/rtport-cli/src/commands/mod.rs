pub mod create;

pub use create::CreateDataCommand;
