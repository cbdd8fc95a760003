mod state;
mod status;

pub use state::AppState;
pub use status::StatusResponse;
