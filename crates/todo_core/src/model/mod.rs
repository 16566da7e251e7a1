mod task;
pub mod timestamp;

pub use task::Task;
