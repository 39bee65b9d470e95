pub mod controller;
pub mod loop_worker;
pub mod source;
pub mod watcher;

pub use controller::SensorController;
pub use source::SensorFeed;
pub use watcher::TemperatureWatcher;
