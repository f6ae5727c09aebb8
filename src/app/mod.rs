pub(crate) mod app_state;
pub(crate) mod logging;

pub use app_state::AppState;
