//! Business logic services for the farm weather dashboard

pub mod poller;
pub mod weather;

pub use poller::DashboardPoller;
pub use weather::WeatherService;
