pub mod app_settings;

pub use app_settings::AppSettings;
